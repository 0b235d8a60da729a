// src/services/trailer_service.rs
//
// Trailer Service - the per-run pipeline over all scanned movies
//
// CRITICAL RULES:
// - One movie's failure never stops the run; it is recorded and the
//   loop continues
// - The keyword-search provider is only queried when the catalog gave
//   nothing eligible; search quota is the scarce resource
// - A provider error means "no candidates from that source", not a
//   fatal error
// - Dry-run reports the would-be decision and touches nothing on disk

use std::sync::Arc;

use crate::domain::{
    CandidateSource, MovieUnit, ReconcileOutcome, RunSummary, Selection, TrailerCandidate,
    TrailerKind,
};
use crate::integrations::{CatalogProvider, SearchProvider};
use crate::services::{ReconcileService, SelectionService};

pub struct TrailerService {
    catalog: Arc<dyn CatalogProvider>,
    search: Arc<dyn SearchProvider>,
    selector: SelectionService,
    reconciler: ReconcileService,
    dry_run: bool,
}

impl TrailerService {
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        search: Arc<dyn SearchProvider>,
        selector: SelectionService,
        reconciler: ReconcileService,
        dry_run: bool,
    ) -> Self {
        Self {
            catalog,
            search,
            selector,
            reconciler,
            dry_run,
        }
    }

    /// Process every movie in order and return the run tally.
    pub async fn run(&self, movies: &[MovieUnit]) -> RunSummary {
        let mut summary = RunSummary::new();

        for movie in movies {
            log::info!("Processing {}", movie.display_name());
            let outcome = self.process_movie(movie).await;
            log::info!("  -> {}", outcome.label());
            summary.record(&movie.display_name(), &outcome);
        }

        summary.log_report();
        summary
    }

    /// Manual mode: reconcile one movie against a user-supplied trailer
    /// URL, bypassing both providers. The same probe-compare-replace
    /// protocol applies; a worse manual pick is discarded like any other.
    pub async fn run_single(&self, movie: &MovieUnit, url: &str) -> RunSummary {
        let mut summary = RunSummary::new();

        let selection = Selection::Selected(TrailerCandidate {
            source: CandidateSource::KeywordSearch,
            language: None,
            kind: TrailerKind::Unranked,
            declared_height: None,
            url: url.to_string(),
            published_at: None,
        });

        log::info!("Processing {} (manual url)", movie.display_name());
        let outcome = if self.dry_run {
            dry_run_outcome(movie, &selection)
        } else {
            self.reconciler.reconcile(movie, &selection).await
        };
        log::info!("  -> {}", outcome.label());
        summary.record(&movie.display_name(), &outcome);

        summary.log_report();
        summary
    }

    async fn process_movie(&self, movie: &MovieUnit) -> ReconcileOutcome {
        let catalog = self.catalog_candidates(movie).await;

        // The search provider is only consulted when the catalog cannot
        // satisfy the policy on its own.
        let selection = match self.selector.select_from_catalog(&catalog) {
            Some(winner) => Selection::Selected(winner),
            None => {
                let hits = self.search_candidates(movie).await;
                self.selector.select(&[], &hits)
            }
        };

        if self.dry_run {
            return dry_run_outcome(movie, &selection);
        }

        self.reconciler.reconcile(movie, &selection).await
    }

    async fn catalog_candidates(&self, movie: &MovieUnit) -> Vec<TrailerCandidate> {
        match self.catalog.trailers(&movie.title, movie.year).await {
            Ok(candidates) => {
                log::debug!(
                    "{}: {} catalog candidate(s) from {}",
                    movie.display_name(),
                    candidates.len(),
                    self.catalog.name()
                );
                candidates
            }
            Err(e) => {
                log::warn!(
                    "{} lookup failed for {}: {}",
                    self.catalog.name(),
                    movie.display_name(),
                    e
                );
                Vec::new()
            }
        }
    }

    async fn search_candidates(&self, movie: &MovieUnit) -> Vec<TrailerCandidate> {
        match self.search.search(&movie.title, movie.year).await {
            Ok(hits) => {
                log::debug!(
                    "{}: {} search hit(s) from {}",
                    movie.display_name(),
                    hits.len(),
                    self.search.name()
                );
                hits
            }
            Err(e) => {
                log::warn!(
                    "{} search failed for {}: {}",
                    self.search.name(),
                    movie.display_name(),
                    e
                );
                Vec::new()
            }
        }
    }
}

/// What a real run would have done, without touching the filesystem.
fn dry_run_outcome(movie: &MovieUnit, selection: &Selection) -> ReconcileOutcome {
    match selection {
        Selection::Selected(candidate) => {
            log::info!(
                "[dry-run] {} would fetch {} ({:?})",
                movie.display_name(),
                candidate.url,
                candidate.source
            );
        }
        Selection::NoCandidate => {
            log::info!("[dry-run] {}: no candidate", movie.display_name());
        }
    }
    ReconcileOutcome::Skipped
}
