// src/domain/outcome.rs
//
// Reconciliation Outcomes and the Run Summary
//
// One outcome per movie per run. The run continues past any single
// movie's failure; the summary is the user-visible report.

use serde::{Deserialize, Serialize};

/// What reconciliation did for one movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReconcileOutcome {
    /// No existing file, fetched and installed a new one
    Downloaded,

    /// Existing file replaced by a strictly better fetch
    Replaced,

    /// Existing file left in place (fetch worse, or nothing found)
    Kept,

    /// Nothing to do: no existing file and no candidate
    Skipped,

    /// Per-movie recoverable failure; existing file untouched
    Failed(String),
}

impl ReconcileOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ReconcileOutcome::Failed(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReconcileOutcome::Downloaded => "downloaded",
            ReconcileOutcome::Replaced => "replaced",
            ReconcileOutcome::Kept => "kept",
            ReconcileOutcome::Skipped => "skipped",
            ReconcileOutcome::Failed(_) => "failed",
        }
    }
}

/// Tally of outcomes across one run.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub downloaded: usize,
    pub replaced: usize,
    pub kept: usize,
    pub skipped: usize,
    pub failed: usize,

    /// (movie display name, reason) for every failed movie
    pub failures: Vec<(String, String)>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, movie_name: &str, outcome: &ReconcileOutcome) {
        match outcome {
            ReconcileOutcome::Downloaded => self.downloaded += 1,
            ReconcileOutcome::Replaced => self.replaced += 1,
            ReconcileOutcome::Kept => self.kept += 1,
            ReconcileOutcome::Skipped => self.skipped += 1,
            ReconcileOutcome::Failed(reason) => {
                self.failed += 1;
                self.failures
                    .push((movie_name.to_string(), reason.clone()));
            }
        }
    }

    pub fn total(&self) -> usize {
        self.downloaded + self.replaced + self.kept + self.skipped + self.failed
    }

    /// Log the per-run report.
    pub fn log_report(&self) {
        log::info!(
            "Run complete: {} movies, {} downloaded, {} replaced, {} kept, {} skipped, {} failed",
            self.total(),
            self.downloaded,
            self.replaced,
            self.kept,
            self.skipped,
            self.failed
        );
        for (movie, reason) in &self.failures {
            log::warn!("  failed: {}: {}", movie, reason);
        }
    }
}

/// At-rest trailer coverage across the library, independent of any run.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CoverageReport {
    /// Height a trailer must reach to count as good enough
    pub target_height: u32,

    pub total: usize,

    /// Movies with at least one file in their trailer slot
    pub with_trailer: usize,

    /// (movie display name, probed height; None when no slot file could
    /// be probed) for trailers under the target
    pub below_target: Vec<(String, Option<u32>)>,

    /// Movies with no trailer file at all
    pub missing: Vec<String>,
}

impl CoverageReport {
    pub fn new(target_height: u32) -> Self {
        Self {
            target_height,
            ..Self::default()
        }
    }

    pub fn coverage_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.with_trailer as f64 / self.total as f64 * 100.0
    }

    /// Log the coverage report. `list_limit` caps each listing section;
    /// zero lists everything.
    pub fn log_report(&self, list_limit: usize) {
        log::info!(
            "Library coverage: {} movies, {} with trailer ({:.1}%), {} below {}p or unknown, {} missing",
            self.total,
            self.with_trailer,
            self.coverage_percent(),
            self.below_target.len(),
            self.target_height,
            self.missing.len()
        );

        let limit = if list_limit == 0 {
            usize::MAX
        } else {
            list_limit
        };

        for (name, height) in self.below_target.iter().take(limit) {
            match height {
                Some(h) => log::info!("  below target: {} ({}p)", name, h),
                None => log::info!("  below target: {} (unknown height)", name),
            }
        }
        if self.below_target.len() > limit {
            log::info!(
                "  ... and {} more below target",
                self.below_target.len() - limit
            );
        }

        for name in self.missing.iter().take(limit) {
            log::info!("  missing: {}", name);
        }
        if self.missing.len() > limit {
            log::info!("  ... and {} more missing", self.missing.len() - limit);
        }
    }
}
