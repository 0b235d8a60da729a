// src/domain/candidate.rs
//
// Trailer Candidates and Selection Outcome
//
// Pure, immutable data structures flowing from the providers into the
// selection core. Produced fresh per query, never mutated, consumed once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which provider produced a candidate.
///
/// Catalog metadata is curated and language-labeled; keyword-search hits
/// are only assumed to satisfy the query's language intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    Catalog,
    KeywordSearch,
}

/// Provider classification of a trailer video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailerKind {
    Official,
    Teaser,
    Other,
    /// Keyword-search hits carry no classification
    Unranked,
}

/// One trailer the system could fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailerCandidate {
    pub source: CandidateSource,

    /// Language tag; authoritative only for Catalog candidates
    pub language: Option<String>,

    pub kind: TrailerKind,

    /// Provider-declared resolution; advisory only. The only trusted
    /// height is one probed from a materialized file.
    pub declared_height: Option<u32>,

    pub url: String,

    /// Recency ordering key, when the provider supplies one
    pub published_at: Option<DateTime<Utc>>,
}

impl TrailerCandidate {
    pub fn is_official(&self) -> bool {
        self.kind == TrailerKind::Official
    }

    pub fn matches_language(&self, language: &str) -> bool {
        self.language.as_deref() == Some(language)
    }
}

/// The outcome of candidate selection for one movie.
/// Either a single winner or an explicit "nothing acceptable".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Selection {
    /// Neither provider yielded an eligible candidate. A normal,
    /// per-movie outcome, not an error.
    NoCandidate,

    /// The single best candidate under the active policy
    Selected(TrailerCandidate),
}

impl Selection {
    pub fn is_selected(&self) -> bool {
        matches!(self, Selection::Selected(_))
    }

    /// Extracts the winning candidate, if any
    pub fn candidate(&self) -> Option<&TrailerCandidate> {
        match self {
            Selection::Selected(c) => Some(c),
            Selection::NoCandidate => None,
        }
    }
}
