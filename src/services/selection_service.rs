// src/services/selection_service.rs
//
// Selection Service - picks one trailer candidate per movie
//
// CRITICAL RULES:
// - Deterministic: same candidates + same policy → same selection,
//   no randomness, no wall-clock dependence
// - Catalog metadata is higher-trust than keyword search and always
//   takes priority when any eligible entry exists
// - Strictness constrains WHICH catalog entries are eligible; it never
//   changes the catalog-before-search priority and never forbids the
//   fallback search

use crate::domain::{Selection, SelectionPolicy, TrailerCandidate};

pub struct SelectionService {
    policy: SelectionPolicy,
}

impl SelectionService {
    pub fn new(policy: SelectionPolicy) -> Self {
        Self { policy }
    }

    /// The best eligible catalog candidate, if any.
    ///
    /// Eligibility: in strict mode only language-matched candidates; in
    /// non-strict mode language matches are preferred but any catalog
    /// candidate may serve as fallback. Ranking among eligible entries:
    /// Official first, then declared height (unknown lowest), then
    /// recency (unknown oldest). Ties keep provider order.
    pub fn select_from_catalog(
        &self,
        catalog: &[TrailerCandidate],
    ) -> Option<TrailerCandidate> {
        let matched: Vec<&TrailerCandidate> = catalog
            .iter()
            .filter(|c| c.matches_language(&self.policy.target_language))
            .collect();

        let eligible: Vec<&TrailerCandidate> = if !matched.is_empty() {
            matched
        } else if self.policy.strict {
            // Strict mode with no language match: the catalog is skipped
            // entirely, control falls through to keyword search.
            return None;
        } else {
            catalog.iter().collect()
        };

        if eligible.is_empty() {
            return None;
        }

        let mut ranked = eligible;
        // Stable sort: equal-ranked candidates stay in provider order,
        // which keeps the tie-break deterministic across runs.
        ranked.sort_by(|a, b| rank_key(b).cmp(&rank_key(a)));
        Some(ranked[0].clone())
    }

    /// Full selection: catalog first, keyword-search fallback second.
    /// Keyword hits are pre-ranked by the provider; the top hit wins.
    pub fn select(
        &self,
        catalog: &[TrailerCandidate],
        keyword: &[TrailerCandidate],
    ) -> Selection {
        if let Some(winner) = self.select_from_catalog(catalog) {
            return Selection::Selected(winner);
        }
        match keyword.first() {
            Some(hit) => Selection::Selected(hit.clone()),
            None => Selection::NoCandidate,
        }
    }
}

/// Ordering key for eligible catalog candidates, higher is better.
fn rank_key(c: &TrailerCandidate) -> (bool, u32, i64) {
    (
        c.is_official(),
        c.declared_height.unwrap_or(0),
        c.published_at.map(|t| t.timestamp()).unwrap_or(i64::MIN),
    )
}
