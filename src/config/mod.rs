// src/config/mod.rs
//
// Configuration - loaded once at startup, shared read-only afterwards
//
// CRITICAL RULES:
// - Any configuration error is fatal BEFORE the first movie is processed
// - A missing keyword-search key only degrades the fallback; it warns,
//   it does not abort
// - Credentials may come from the environment when absent from the file

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::SelectionPolicy;
use crate::error::{AppError, AppResult};

/// Minimum plausible length for a provider API key.
const MIN_KEY_LEN: usize = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub settings: SettingsConfig,

    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Catalog provider (TMDB) API key
    #[serde(default)]
    pub tmdb_api_key: String,

    /// Keyword-search provider (YouTube Data API) key
    #[serde(default)]
    pub youtube_api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettingsConfig {
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub strict_language: bool,

    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,

    #[serde(default = "default_trailer_suffix")]
    pub trailer_suffix: String,

    #[serde(default = "default_preferred_height")]
    pub preferred_height: u32,

    #[serde(default)]
    pub allow_non_mp4_for_quality: bool,

    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            strict_language: false,
            video_extensions: default_video_extensions(),
            trailer_suffix: default_trailer_suffix(),
            preferred_height: default_preferred_height(),
            allow_non_mp4_for_quality: false,
            temp_dir: default_temp_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    /// Library roots; each immediate child directory is one movie
    pub roots: Vec<PathBuf>,
}

fn default_language() -> String {
    "de".to_string()
}

fn default_video_extensions() -> Vec<String> {
    ["mkv", "mp4", "m4v", "avi", "mov"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_trailer_suffix() -> String {
    "-trailer".to_string()
}

fn default_preferred_height() -> u32 {
    1080
}

fn default_temp_dir() -> PathBuf {
    std::env::temp_dir().join("trailhub")
}

impl Config {
    /// Read and parse the config file, then apply environment fallbacks
    /// for credentials.
    pub fn load(path: &Path) -> AppResult<Config> {
        if !path.is_file() {
            return Err(AppError::Config(format!(
                "Config not found: {}",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;

        if config.auth.tmdb_api_key.trim().is_empty() {
            if let Ok(key) = std::env::var("TMDB_API_KEY") {
                config.auth.tmdb_api_key = key;
            }
        }
        if config.auth.youtube_api_key.trim().is_empty() {
            if let Ok(key) = std::env::var("YT_API_KEY") {
                config.auth.youtube_api_key = key;
            }
        }

        config.auth.tmdb_api_key = config.auth.tmdb_api_key.trim().to_string();
        config.auth.youtube_api_key = config.auth.youtube_api_key.trim().to_string();

        Ok(config)
    }

    /// Full startup validation for a fetching run over the library.
    /// Any failure here is fatal before the first movie is processed.
    pub fn validate(&self) -> AppResult<()> {
        if self.auth.tmdb_api_key.len() < MIN_KEY_LEN {
            return Err(AppError::Config(
                "Missing/invalid TMDB API key in [auth]".to_string(),
            ));
        }

        if self.auth.youtube_api_key.len() < MIN_KEY_LEN {
            log::warn!("No valid YouTube API key in [auth]; keyword-search fallback will be limited");
        }

        self.validate_library()
    }

    /// Checks for modes that walk the roots but call no provider
    /// (coverage stats need no API keys).
    pub fn validate_library(&self) -> AppResult<()> {
        if self.paths.roots.is_empty() {
            return Err(AppError::Config(
                "No roots configured under [paths]; add at least one directory".to_string(),
            ));
        }

        for root in &self.paths.roots {
            if !root.is_dir() {
                return Err(AppError::Config(format!(
                    "Library root is not a directory: {}",
                    root.display()
                )));
            }
        }

        self.validate_base()
    }

    /// Checks every mode needs: a trailer suffix and a usable temp dir.
    /// Creates the temp working directory.
    pub fn validate_base(&self) -> AppResult<()> {
        if self.settings.trailer_suffix.trim().is_empty() {
            return Err(AppError::Config(
                "trailer_suffix must not be empty".to_string(),
            ));
        }

        fs::create_dir_all(&self.settings.temp_dir).map_err(|e| {
            AppError::Config(format!(
                "Cannot create temp dir {}: {}",
                self.settings.temp_dir.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Recognized video extensions, normalized: lowercase, no leading dot.
    pub fn video_extensions(&self) -> HashSet<String> {
        self.settings
            .video_extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect()
    }

    /// The read-only selection policy shared across all movies.
    pub fn selection_policy(&self) -> SelectionPolicy {
        SelectionPolicy {
            target_language: self.settings.language.trim().to_lowercase(),
            strict: self.settings.strict_language,
            preferred_height: self.settings.preferred_height,
            allow_non_mp4_for_quality: self.settings.allow_non_mp4_for_quality,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("trailhub.toml");
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_full_config() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("movies");
        fs::create_dir(&root).unwrap();

        let body = format!(
            r#"
[auth]
tmdb_api_key = "0123456789abcdef"
youtube_api_key = "fedcba9876543210"

[settings]
language = "de"
strict_language = true
video_extensions = [".MKV", "mp4"]
trailer_suffix = "-trailer"
preferred_height = 2160
allow_non_mp4_for_quality = true
temp_dir = "{}"

[paths]
roots = ["{}"]
"#,
            dir.path().join("tmp").display(),
            root.display()
        );
        let path = write_config(dir.path(), &body);

        let config = Config::load(&path).unwrap();
        config.validate().unwrap();

        assert!(config.settings.strict_language);
        assert_eq!(config.settings.preferred_height, 2160);
        assert!(config.video_extensions().contains("mkv"));
        assert!(config.video_extensions().contains("mp4"));

        let policy = config.selection_policy();
        assert_eq!(policy.target_language, "de");
        assert!(policy.allow_non_mp4_for_quality);
    }

    #[test]
    fn test_defaults_applied() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("movies");
        fs::create_dir(&root).unwrap();

        let body = format!(
            "[auth]\ntmdb_api_key = \"0123456789abcdef\"\n\n[paths]\nroots = [\"{}\"]\n",
            root.display()
        );
        let path = write_config(dir.path(), &body);

        let config = Config::load(&path).unwrap();
        assert_eq!(config.settings.language, "de");
        assert_eq!(config.settings.preferred_height, 1080);
        assert_eq!(config.settings.trailer_suffix, "-trailer");
        assert!(!config.settings.allow_non_mp4_for_quality);
    }

    #[test]
    fn test_missing_catalog_key_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("movies");
        fs::create_dir(&root).unwrap();

        let body = format!("[paths]\nroots = [\"{}\"]\n", root.display());
        let path = write_config(dir.path(), &body);

        // Guard against an ambient key making this test pass vacuously.
        if std::env::var("TMDB_API_KEY").is_ok() {
            return;
        }

        let config = Config::load(&path).unwrap();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
        // Keyless modes (stats, manual fetch) still pass their checks
        assert!(config.validate_library().is_ok());
        assert!(config.validate_base().is_ok());
    }

    #[test]
    fn test_missing_roots_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let body = "[auth]\ntmdb_api_key = \"0123456789abcdef\"\n\n[paths]\nroots = []\n";
        let path = write_config(dir.path(), body);

        let config = Config::load(&path).unwrap();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_nonexistent_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let body = format!(
            "[auth]\ntmdb_api_key = \"0123456789abcdef\"\n\n[paths]\nroots = [\"{}\"]\n",
            dir.path().join("does-not-exist").display()
        );
        let path = write_config(dir.path(), &body);

        let config = Config::load(&path).unwrap();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_missing_config_file() {
        let result = Config::load(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
