// src/integrations/ytdlp.rs
//
// Download Executor - yt-dlp subprocess
//
// Opaque, possibly slow, possibly failing. Output always lands in the
// caller-provided workspace, never in a movie directory, so a partial
// fetch can never corrupt the live trailer slot.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{AppError, AppResult};
use crate::integrations::TrailerDownloader;

/// Base name for everything a fetch attempt produces.
const OUTPUT_STEM: &str = "trailer";

pub struct YtDlpDownloader {
    binary: String,
}

impl YtDlpDownloader {
    pub fn new() -> Self {
        Self {
            binary: "yt-dlp".to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_binary(binary: &str) -> Self {
        Self {
            binary: binary.to_string(),
        }
    }

    /// Format ladder: exact preferred height as mp4 first, then exact
    /// height in any container, then best-at-or-below, then anything.
    fn format_string(max_height: u32) -> String {
        let h = max_height;
        format!(
            "bestvideo[height={h}][ext=mp4]+bestaudio[ext=m4a]/\
             bestvideo[height={h}]+bestaudio/\
             best[height={h}]/\
             bestvideo[height<={h}][ext=mp4]+bestaudio[ext=m4a]/\
             best[height<={h}]/\
             best"
        )
    }

    fn build_args(
        &self,
        url: &str,
        max_height: u32,
        workspace: &Path,
        force_mp4: bool,
    ) -> Vec<String> {
        let output_template = workspace
            .join(format!("{}.%(ext)s", OUTPUT_STEM))
            .to_string_lossy()
            .into_owned();

        let mut args: Vec<String> = vec![
            "--quiet".into(),
            "--no-progress".into(),
            "--no-warnings".into(),
            "--retries".into(),
            "10".into(),
            "--fragment-retries".into(),
            "10".into(),
            "--format".into(),
            Self::format_string(max_height),
            "--format-sort".into(),
            format!("res:{},res,ext:mp4:m4a", max_height),
            "--output".into(),
            output_template,
            "--paths".into(),
            format!("temp:{}", workspace.display()),
        ];

        if force_mp4 {
            args.extend([
                "--merge-output-format".into(),
                "mp4".into(),
                "--recode-video".into(),
                "mp4".into(),
                "--postprocessor-args".into(),
                "ffmpeg:-movflags +faststart".into(),
            ]);
        }

        args.push(url.to_string());
        args
    }
}

impl Default for YtDlpDownloader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TrailerDownloader for YtDlpDownloader {
    async fn fetch(
        &self,
        url: &str,
        max_height: u32,
        workspace: &Path,
        force_mp4: bool,
    ) -> AppResult<PathBuf> {
        let args = self.build_args(url, max_height, workspace, force_mp4);

        log::info!("Downloading {} (target {}p)", url, max_height);
        log::debug!("{} {}", self.binary, args.join(" "));

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| AppError::Download(format!("cannot run {}: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail: String = stderr
                .lines()
                .rev()
                .take(3)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect::<Vec<_>>()
                .join("; ");
            return Err(AppError::Download(format!(
                "{} exited with {}: {}",
                self.binary, output.status, tail
            )));
        }

        // yt-dlp decides the final extension; find what it produced.
        find_output(workspace).ok_or_else(|| {
            AppError::Download("downloader reported success but produced no file".to_string())
        })
    }
}

fn find_output(workspace: &Path) -> Option<PathBuf> {
    let entries = std::fs::read_dir(workspace).ok()?;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = path.file_name()?.to_string_lossy().into_owned();
        if name.starts_with(OUTPUT_STEM) && !name.ends_with(".part") {
            return Some(path);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ladder_prefers_exact_height_mp4() {
        let fmt = YtDlpDownloader::format_string(1080);
        assert!(fmt.starts_with("bestvideo[height=1080][ext=mp4]"));
        assert!(fmt.ends_with("/best"));
        assert!(fmt.contains("best[height<=1080]"));
    }

    #[test]
    fn test_force_mp4_adds_remux_args() {
        let d = YtDlpDownloader::new();
        let ws = PathBuf::from("/tmp/ws");
        let with = d.build_args("https://example/v", 1080, &ws, true);
        let without = d.build_args("https://example/v", 1080, &ws, false);
        assert!(with.iter().any(|a| a == "--recode-video"));
        assert!(!without.iter().any(|a| a == "--recode-video"));
        // URL always comes last
        assert_eq!(with.last().unwrap(), "https://example/v");
    }

    #[test]
    fn test_find_output_skips_partials() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("trailer.mp4.part"), b"x").unwrap();
        assert!(find_output(dir.path()).is_none());

        std::fs::write(dir.path().join("trailer.mkv"), b"video").unwrap();
        let found = find_output(dir.path()).unwrap();
        assert_eq!(found.file_name().unwrap(), "trailer.mkv");
    }

    #[tokio::test]
    async fn test_missing_binary_is_download_error() {
        let dir = tempfile::tempdir().unwrap();
        let d = YtDlpDownloader::with_binary("definitely-not-a-real-binary-xyz");
        let err = d
            .fetch("https://example/v", 720, dir.path(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Download(_)));
    }
}
