// src/integrations/youtube/client.rs
//
// YouTube Keyword-Search Integration
//
// ARCHITECTURE:
// - REST client for the YouTube Data API v3 search endpoint
// - The query itself embeds the language intent (native word, region,
//   relevanceLanguage); hits are assumed to satisfy it but are not
//   independently verified
// - Returns candidates in rank order; the selector takes the top hit

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::{CandidateSource, LanguageProfile, TrailerCandidate, TrailerKind};
use crate::error::{AppError, AppResult};
use crate::integrations::{RateLimiter, SearchProvider};

const BASE_URL: &str = "https://www.googleapis.com/youtube/v3/search";

/// Search quota is tight; keep calls well apart.
const REQUEST_INTERVAL: Duration = Duration::from_millis(250);

const MAX_RESULTS: u32 = 6;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: VideoId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct VideoId {
    #[serde(rename = "videoId", default)]
    video_id: String,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(rename = "channelTitle", default)]
    channel_title: String,
    #[serde(rename = "publishedAt", default)]
    published_at: Option<String>,
}

/// YouTube Data API Client
pub struct YouTubeClient {
    http_client: Client,
    api_key: String,
    language: String,
    profile: LanguageProfile,
    rate_limiter: RateLimiter,
}

impl YouTubeClient {
    pub fn new(api_key: String, language: &str) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            api_key,
            language: language.to_string(),
            profile: LanguageProfile::for_code(language),
            rate_limiter: RateLimiter::new(REQUEST_INTERVAL),
        }
    }

    fn build_query(&self, title: &str, year: Option<i32>) -> String {
        match year {
            Some(year) => format!("{} {} Trailer {}", title, year, self.profile.native_word),
            None => format!("{} Trailer {}", title, self.profile.native_word),
        }
    }
}

#[async_trait]
impl SearchProvider for YouTubeClient {
    async fn search(
        &self,
        title: &str,
        year: Option<i32>,
    ) -> AppResult<Vec<TrailerCandidate>> {
        if self.api_key.is_empty() {
            log::debug!("No YouTube API key; skipping keyword search");
            return Ok(Vec::new());
        }

        self.rate_limiter.acquire().await;

        let query = self.build_query(title, year);
        let max_results = MAX_RESULTS.to_string();
        let params: Vec<(&str, &str)> = vec![
            ("key", self.api_key.as_str()),
            ("part", "snippet"),
            ("type", "video"),
            ("maxResults", max_results.as_str()),
            ("q", query.as_str()),
            ("relevanceLanguage", self.language.as_str()),
            ("regionCode", self.profile.region),
            ("safeSearch", "none"),
        ];

        let response = self
            .http_client
            .get(BASE_URL)
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Provider(format!(
                "YouTube search returned {}",
                response.status()
            )));
        }

        let body: SearchResponse = response.json().await?;
        let mut items: Vec<SearchItem> = body
            .items
            .into_iter()
            .filter(|i| !i.id.video_id.is_empty())
            .collect();

        // Re-rank API relevance: obvious trailers first, language hits
        // next, trailer channels, then recency.
        let native = self.profile.native_word.to_lowercase();
        items.sort_by(|a, b| score(b, &native).cmp(&score(a, &native)));

        Ok(items.into_iter().map(map_item).collect())
    }

    fn name(&self) -> &'static str {
        "youtube"
    }
}

fn score(item: &SearchItem, native_word: &str) -> (bool, bool, bool, String) {
    let title = item.snippet.title.to_lowercase();
    let channel = item.snippet.channel_title.to_lowercase();
    (
        title.contains("trailer"),
        title.contains(native_word),
        channel.contains("trailer"),
        item.snippet.published_at.clone().unwrap_or_default(),
    )
}

/// Canonical watch URL for a user-supplied YouTube reference: a full
/// watch URL, a youtu.be short link, or a raw 11-character video id.
pub fn canonical_watch_url(input: &str) -> Option<String> {
    let id = extract_video_id(input)?;
    Some(format!("https://www.youtube.com/watch?v={}", id))
}

/// First 11-character id-shaped token in the input. Video ids are the
/// only such tokens in the URL forms users paste.
fn extract_video_id(input: &str) -> Option<&str> {
    input
        .trim()
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .find(|segment| segment.len() == 11)
}

fn map_item(item: SearchItem) -> TrailerCandidate {
    let published_at = item
        .snippet
        .published_at
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    TrailerCandidate {
        source: CandidateSource::KeywordSearch,
        // Assumed to follow the query's language intent, not verified
        language: None,
        kind: TrailerKind::Unranked,
        declared_height: None,
        url: format!("https://www.youtube.com/watch?v={}", item.id.video_id),
        published_at,
    }
}
