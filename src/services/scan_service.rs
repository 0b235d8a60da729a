// src/services/scan_service.rs
//
// Scan Service - movie units from library roots
//
// Each immediate child directory of a root is one movie; the primary
// video is the largest recognized video file inside it. Title and year
// come from the folder name first, the file name second.

use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::domain::{validate_movie, MovieUnit};

pub struct ScanService {
    video_extensions: HashSet<String>,
    rules: ScanRules,
}

impl ScanService {
    pub fn new(video_extensions: HashSet<String>) -> Self {
        Self {
            video_extensions,
            rules: ScanRules::default(),
        }
    }

    /// Enumerate movie units across all configured roots. Unreadable
    /// roots are logged and skipped; startup validation already caught
    /// misconfigured ones.
    pub fn scan_roots(&self, roots: &[PathBuf]) -> Vec<MovieUnit> {
        let mut movies = Vec::new();
        for root in roots {
            if !root.is_dir() {
                log::warn!("Root not found or not a directory: {}", root.display());
                continue;
            }
            movies.extend(self.scan_root(root));
        }
        log::info!("Scan found {} movie(s)", movies.len());
        movies
    }

    /// One movie unit from a single directory, for targeting a movie
    /// directly instead of walking the roots.
    pub fn scan_single(&self, dir: &Path) -> Option<MovieUnit> {
        if !dir.is_dir() {
            log::warn!("Not a directory: {}", dir.display());
            return None;
        }
        self.movie_from_dir(dir)
    }

    fn scan_root(&self, root: &Path) -> Vec<MovieUnit> {
        let mut movies = Vec::new();
        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e: Result<walkdir::DirEntry, walkdir::Error>| e.ok())
        {
            if !entry.file_type().is_dir() {
                continue;
            }
            match self.movie_from_dir(entry.path()) {
                Some(movie) => movies.push(movie),
                None => log::debug!("No video file in {}", entry.path().display()),
            }
        }
        movies
    }

    fn movie_from_dir(&self, dir: &Path) -> Option<MovieUnit> {
        let primary_video = self.primary_video(dir)?;

        let folder_name = dir.file_name()?.to_string_lossy();
        let (mut title, mut year) = self.rules.extract_from_folder(&folder_name);

        // Folder names like "4K" or "_" carry no identity; the file
        // name is the better witness then.
        if title.len() < 2 {
            let file_stem = primary_video.file_stem()?.to_string_lossy();
            let (file_title, file_year) = self.rules.extract_from_filename(&file_stem);
            if !file_title.is_empty() {
                title = file_title;
            }
            year = file_year.or(year);
        }

        let movie = MovieUnit::new(title, year, dir.to_path_buf(), primary_video);
        match validate_movie(&movie) {
            Ok(()) => Some(movie),
            Err(e) => {
                log::warn!("Skipping {}: {}", dir.display(), e);
                None
            }
        }
    }

    /// The largest recognized video file directly inside the directory.
    fn primary_video(&self, dir: &Path) -> Option<PathBuf> {
        let mut best: Option<(u64, PathBuf)> = None;
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let ext = path
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            if !self.video_extensions.contains(&ext) {
                continue;
            }
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            match &best {
                Some((best_size, _)) if *best_size >= size => {}
                _ => best = Some((size, path.to_path_buf())),
            }
        }
        best.map(|(_, p)| p)
    }
}

/// Compiled title/year extraction rules. Deterministic: same name in,
/// same identity out.
struct ScanRules {
    folder_patterns: Vec<Regex>,
    year_anywhere: Regex,
    year_bracketed: Regex,
    release_tags: Regex,
}

impl Default for ScanRules {
    fn default() -> Self {
        Self {
            folder_patterns: vec![
                // "Title (1999)" / "Title [1999]"
                Regex::new(r"^(?P<title>.+?)\s*[\(\[](?P<year>19\d{2}|20\d{2})[\)\]]$").unwrap(),
                // "Title - Subtitle (1999)"
                Regex::new(r"^(?P<title>.+?)\s*[-–:,]\s*.+?\s*[\(\[](?P<year>19\d{2}|20\d{2})[\)\]]$")
                    .unwrap(),
                // "Title 1999"
                Regex::new(r"^(?P<title>.+?)\s+(?P<year>19\d{2}|20\d{2})$").unwrap(),
            ],
            year_anywhere: Regex::new(r"(19\d{2}|20\d{2})").unwrap(),
            year_bracketed: Regex::new(r"[\(\[]?(19\d{2}|20\d{2})[\)\]]?").unwrap(),
            release_tags: Regex::new(
                r"(?i)(German|Deutsch|DL|EAC3|DTS|AC3|BluRay|WEB[- ]?DL|x265|x264|1080p|720p|2160p|UHD)$",
            )
            .unwrap(),
        }
    }
}

impl ScanRules {
    fn extract_from_folder(&self, folder_name: &str) -> (String, Option<i32>) {
        let raw = folder_name.trim();
        for pattern in &self.folder_patterns {
            if let Some(caps) = pattern.captures(raw) {
                let title = normalize_title(&caps["title"]);
                let year = caps["year"].parse().ok();
                return (title, year);
            }
        }

        // No clean pattern; salvage a year anywhere and strip it out.
        let year = self
            .year_anywhere
            .find(raw)
            .and_then(|m| m.as_str().parse().ok());
        let title = self.year_bracketed.replace_all(raw, "");
        let title = title.trim_end_matches(['-', '–', ',', ':', ' ']);
        (normalize_title(title), year)
    }

    fn extract_from_filename(&self, file_stem: &str) -> (String, Option<i32>) {
        let mut base = file_stem.to_string();
        let year = match self.year_anywhere.find(&base) {
            Some(m) => {
                let year = m.as_str().parse().ok();
                base.truncate(m.start());
                year
            }
            None => None,
        };
        let base = normalize_title(&base);
        let base = self.release_tags.replace_all(&base, "");
        (base.trim().to_string(), year)
    }
}

fn normalize_title(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_was_space = true;
    for c in s.trim().chars() {
        let c = if c == '.' || c == '_' { ' ' } else { c };
        if c == ' ' {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
    out.trim().to_string()
}
