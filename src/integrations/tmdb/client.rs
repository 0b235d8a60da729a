// src/integrations/tmdb/client.rs
//
// TMDB Catalog Integration
//
// ARCHITECTURE:
// - REST client for the TMDB v3 API
// - Handles authentication, rate limiting, locale scoping
// - Maps external data → domain TrailerCandidate (NO selection here)
// - Used by TrailerService through the CatalogProvider seam

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::{CandidateSource, LanguageProfile, TrailerCandidate, TrailerKind};
use crate::error::{AppError, AppResult};
use crate::integrations::{CatalogProvider, RateLimiter};

const BASE_URL: &str = "https://api.themoviedb.org/3";

/// Minimum spacing between catalog requests; TMDB enforces a quota.
const REQUEST_INTERVAL: Duration = Duration::from_millis(250);

/// TMDB movie search response
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<MovieHit>,
}

#[derive(Debug, Deserialize)]
struct MovieHit {
    id: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    popularity: f64,
}

/// TMDB videos listing response
#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    results: Vec<VideoEntry>,
}

#[derive(Debug, Deserialize)]
struct VideoEntry {
    #[serde(default)]
    key: String,
    #[serde(default)]
    site: String,
    #[serde(rename = "type", default)]
    video_type: String,
    #[serde(default)]
    official: bool,
    #[serde(default)]
    size: Option<u32>,
    #[serde(rename = "iso_639_1", default)]
    language: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
}

/// TMDB API Client
pub struct TmdbClient {
    http_client: Client,
    api_key: String,
    /// Two-letter code, e.g. "de"
    language: String,
    /// Full locale, e.g. "de-DE"
    locale: String,
    rate_limiter: RateLimiter,
}

impl TmdbClient {
    pub fn new(api_key: String, language: &str) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .expect("Failed to create HTTP client");

        let profile = LanguageProfile::for_code(language);

        Self {
            http_client,
            api_key,
            language: language.to_string(),
            locale: profile.locale.to_string(),
            rate_limiter: RateLimiter::new(REQUEST_INTERVAL),
        }
    }

    /// Find the TMDB id for a movie title. Retries once without the
    /// year filter when the filtered search comes back empty.
    pub async fn search_movie(&self, title: &str, year: Option<i32>) -> AppResult<Option<i64>> {
        let mut hits = self.search_movie_raw(title, year).await?;
        if hits.is_empty() && year.is_some() {
            hits = self.search_movie_raw(title, None).await?;
        }
        if hits.is_empty() {
            return Ok(None);
        }

        // Exact (cleaned) title match outranks raw popularity.
        let target = clean_title(title);
        hits.sort_by(|a, b| {
            let a_key = (clean_title(&a.title) == target, a.popularity);
            let b_key = (clean_title(&b.title) == target, b.popularity);
            b_key
                .partial_cmp(&a_key)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(Some(hits[0].id))
    }

    async fn search_movie_raw(&self, title: &str, year: Option<i32>) -> AppResult<Vec<MovieHit>> {
        self.rate_limiter.acquire().await;

        let mut params: Vec<(&str, String)> = vec![
            ("api_key", self.api_key.clone()),
            ("language", self.locale.clone()),
            ("query", title.to_string()),
            ("include_adult", "false".to_string()),
        ];
        if let Some(year) = year {
            params.push(("year", year.to_string()));
        }

        let response = self
            .http_client
            .get(format!("{}/search/movie", BASE_URL))
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Provider(format!(
                "TMDB search returned {}",
                response.status()
            )));
        }

        let body: SearchResponse = response.json().await?;
        Ok(body.results)
    }

    /// All trailer/teaser videos TMDB knows for a movie. Lists the
    /// language-scoped set first, then an unscoped set, so non-matching
    /// languages are still visible to the selector (strictness filtering
    /// is the selector's job, not the adapter's).
    async fn videos(&self, movie_id: i64) -> AppResult<Vec<VideoEntry>> {
        let scoped = self
            .videos_raw(movie_id, &self.locale, Some(&self.language))
            .await?;
        let unscoped = self.videos_raw(movie_id, "en-US", None).await?;

        let mut merged = scoped;
        for entry in unscoped {
            if !merged.iter().any(|v| v.key == entry.key) {
                merged.push(entry);
            }
        }
        Ok(merged)
    }

    async fn videos_raw(
        &self,
        movie_id: i64,
        locale: &str,
        include_video_language: Option<&str>,
    ) -> AppResult<Vec<VideoEntry>> {
        self.rate_limiter.acquire().await;

        let mut params: Vec<(&str, String)> = vec![
            ("api_key", self.api_key.clone()),
            ("language", locale.to_string()),
        ];
        if let Some(lang) = include_video_language {
            params.push(("include_video_language", lang.to_string()));
        }

        let response = self
            .http_client
            .get(format!("{}/movie/{}/videos", BASE_URL, movie_id))
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Provider(format!(
                "TMDB videos returned {}",
                response.status()
            )));
        }

        let body: VideosResponse = response.json().await?;
        Ok(body.results)
    }
}

#[async_trait]
impl CatalogProvider for TmdbClient {
    async fn trailers(
        &self,
        title: &str,
        year: Option<i32>,
    ) -> AppResult<Vec<TrailerCandidate>> {
        let movie_id = match self.search_movie(title, year).await? {
            Some(id) => id,
            None => {
                log::debug!("TMDB has no match for '{}'", title);
                return Ok(Vec::new());
            }
        };

        let videos = self.videos(movie_id).await?;
        Ok(videos.into_iter().filter_map(map_video).collect())
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

/// Map one TMDB video entry to a domain candidate. Only YouTube-hosted
/// trailers and teasers qualify.
fn map_video(entry: VideoEntry) -> Option<TrailerCandidate> {
    if entry.site != "YouTube" || entry.key.is_empty() {
        return None;
    }

    let kind = match entry.video_type.as_str() {
        "Trailer" if entry.official => TrailerKind::Official,
        "Trailer" => TrailerKind::Other,
        "Teaser" => TrailerKind::Teaser,
        _ => return None,
    };

    let published_at = entry
        .published_at
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    Some(TrailerCandidate {
        source: CandidateSource::Catalog,
        language: entry.language.filter(|l| !l.is_empty()),
        kind,
        declared_height: entry.size.filter(|s| *s > 0),
        url: format!("https://www.youtube.com/watch?v={}", entry.key),
        published_at,
    })
}

/// Lowercased title with everything non-alphanumeric stripped, for
/// exact-match ranking.
fn clean_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}
