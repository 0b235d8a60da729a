// src/integrations/mod.rs
//
// Integrations - external providers and tools behind trait seams
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Providers return domain candidates; they never select or install
// - Services depend on `Arc<dyn Trait>`, so a third provider slots in
//   without touching selection logic

pub mod ffprobe;
pub mod rate_limit;
pub mod tmdb;
pub mod youtube;
pub mod ytdlp;

pub use ffprobe::FfprobeProbe;
pub use rate_limit::RateLimiter;
pub use tmdb::TmdbClient;
pub use youtube::{canonical_watch_url, YouTubeClient};
pub use ytdlp::YtDlpDownloader;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::domain::TrailerCandidate;
use crate::error::AppResult;

/// Curated catalog of language-tagged trailer links for known movies.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// All trailers the catalog knows for this movie. Order-irrelevant;
    /// ranking is the selector's job.
    async fn trailers(
        &self,
        title: &str,
        year: Option<i32>,
    ) -> AppResult<Vec<TrailerCandidate>>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// General video search used as fallback when the catalog yields
/// nothing eligible. Results come back in provider rank order.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(
        &self,
        title: &str,
        year: Option<i32>,
    ) -> AppResult<Vec<TrailerCandidate>>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// Opaque, possibly slow, possibly failing download execution.
#[async_trait]
pub trait TrailerDownloader: Send + Sync {
    /// Fetch `url` capped at `max_height` vertical pixels into
    /// `workspace` (never a movie directory) and return the produced
    /// file's path. `force_mp4` asks for a remux/convert to mp4.
    async fn fetch(
        &self,
        url: &str,
        max_height: u32,
        workspace: &Path,
        force_mp4: bool,
    ) -> AppResult<PathBuf>;
}

/// What a probe learned about a materialized media file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbedMedia {
    /// Vertical resolution of the first video stream
    pub height: u32,

    /// Container extension, lowercase, no dot
    pub extension: String,
}

/// Inspects a local media file. A probe failure means "no usable file",
/// never a fatal error.
pub trait MediaProbe: Send + Sync {
    fn probe(&self, path: &Path) -> AppResult<ProbedMedia>;
}
