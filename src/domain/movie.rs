// src/domain/movie.rs
//
// Movie Unit - one movie directory discovered by the library scan
//
// INVARIANTS:
// - Immutable per run; the scan phase produces it, nothing mutates it
// - `primary_video` lives inside `directory`
// - The trailer slot next to the primary video holds zero or one file at rest

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::{DomainError, DomainResult};

/// One movie as found on disk: its identity plus the file the trailer
/// is named after.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieUnit {
    /// Title extracted from the folder or file name
    pub title: String,

    /// Release year, when one could be extracted
    pub year: Option<i32>,

    /// The movie's own directory; all file operations stay inside it
    pub directory: PathBuf,

    /// The main video file (largest recognized video in the directory)
    pub primary_video: PathBuf,
}

impl MovieUnit {
    pub fn new(
        title: String,
        year: Option<i32>,
        directory: PathBuf,
        primary_video: PathBuf,
    ) -> Self {
        Self {
            title,
            year,
            directory,
            primary_video,
        }
    }

    /// Base name shared by the primary video and its trailer:
    /// the primary video's file name without extension, plus the suffix.
    pub fn trailer_stem(&self, suffix: &str) -> String {
        let base = self
            .primary_video
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{}{}", base, suffix)
    }

    /// Canonical install path for the trailer: `<base><suffix>.mp4`
    /// inside the movie directory.
    pub fn trailer_target_path(&self, suffix: &str) -> PathBuf {
        self.directory
            .join(format!("{}.mp4", self.trailer_stem(suffix)))
    }

    /// Label used in logs and the run report.
    pub fn display_name(&self) -> String {
        match self.year {
            Some(year) => format!("{} ({})", self.title, year),
            None => self.title.clone(),
        }
    }
}

/// Validates all MovieUnit invariants
pub fn validate_movie(movie: &MovieUnit) -> DomainResult<()> {
    if movie.title.trim().len() < 2 {
        return Err(DomainError::InvariantViolation(format!(
            "Movie title too short: {:?}",
            movie.title
        )));
    }

    if !movie.directory.is_absolute() {
        return Err(DomainError::InvariantViolation(format!(
            "Movie directory must be absolute: {:?}",
            movie.directory
        )));
    }

    if !movie.primary_video.starts_with(&movie.directory) {
        return Err(DomainError::InvariantViolation(format!(
            "Primary video {:?} is outside movie directory {:?}",
            movie.primary_video, movie.directory
        )));
    }

    Ok(())
}

/// True when `path` occupies the movie's trailer slot, regardless of
/// container extension.
pub fn is_trailer_slot(path: &Path, stem: &str) -> bool {
    path.file_stem()
        .map(|s| s.to_string_lossy() == stem)
        .unwrap_or(false)
}
