// src/services/reconcile_service.rs
//
// Reconcile Service - decides fetch/replace/keep for one movie's trailer
//
// CRITICAL RULES:
// - A working file is never deleted because a search found nothing
// - A probe failure alone never deletes anything
// - Replacement only on strictly greater probed height
// - Fetches land in a workspace; the movie directory is touched only by
//   the final install, which is a single same-directory rename
// - Every failure here is per-movie recoverable; the run continues

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::movie::is_trailer_slot;
use crate::domain::{MovieUnit, ReconcileOutcome, Selection, SelectionPolicy, TrailerCandidate};
use crate::error::AppResult;
use crate::infrastructure::FetchWorkspace;
use crate::integrations::{MediaProbe, ProbedMedia, TrailerDownloader};

/// On-disk state of a movie's trailer slot at the start of reconciliation.
#[derive(Debug)]
enum ExistingState {
    /// No file occupies the trailer slot
    Absent,

    /// A file exists and probes cleanly
    Usable(PathBuf, ProbedMedia),

    /// A file exists but cannot be probed; treated as "no usable file"
    /// for fetching, but never deleted on that evidence alone
    Unreadable(PathBuf),
}

pub struct ReconcileService {
    probe: Arc<dyn MediaProbe>,
    downloader: Arc<dyn TrailerDownloader>,
    policy: SelectionPolicy,
    trailer_suffix: String,
    temp_dir: PathBuf,
}

impl ReconcileService {
    pub fn new(
        probe: Arc<dyn MediaProbe>,
        downloader: Arc<dyn TrailerDownloader>,
        policy: SelectionPolicy,
        trailer_suffix: String,
        temp_dir: PathBuf,
    ) -> Self {
        Self {
            probe,
            downloader,
            policy,
            trailer_suffix,
            temp_dir,
        }
    }

    /// Apply the decision table: existing-file state × selection outcome.
    pub async fn reconcile(&self, movie: &MovieUnit, selection: &Selection) -> ReconcileOutcome {
        let existing = self.existing_state(movie);

        match (&existing, selection) {
            (ExistingState::Absent, Selection::NoCandidate) => ReconcileOutcome::Skipped,

            (ExistingState::Usable(path, media), Selection::NoCandidate) => {
                log::debug!(
                    "Keeping {} ({}p); no candidate this run",
                    path.display(),
                    media.height
                );
                ReconcileOutcome::Kept
            }

            (ExistingState::Unreadable(path), Selection::NoCandidate) => {
                log::debug!(
                    "Keeping unreadable {}; cannot safely judge it",
                    path.display()
                );
                ReconcileOutcome::Kept
            }

            (_, Selection::Selected(candidate)) => self
                .fetch_and_install(movie, candidate, &existing)
                .await
                .unwrap_or_else(|e| {
                    log::warn!("Reconcile failed for {}: {}", movie.display_name(), e);
                    ReconcileOutcome::Failed(e.to_string())
                }),
        }
    }

    /// Probe whatever occupies the trailer slot. The slot is matched by
    /// stem, not extension, since quality policy may have installed a
    /// non-mp4 container on an earlier run.
    fn existing_state(&self, movie: &MovieUnit) -> ExistingState {
        let stem = movie.trailer_stem(&self.trailer_suffix);
        let entries = match fs::read_dir(&movie.directory) {
            Ok(entries) => entries,
            Err(_) => return ExistingState::Absent,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() || !is_trailer_slot(&path, &stem) {
                continue;
            }
            return match self.probe.probe(&path) {
                Ok(media) => ExistingState::Usable(path, media),
                Err(e) => {
                    log::warn!("Existing trailer {} failed probe: {}", path.display(), e);
                    ExistingState::Unreadable(path)
                }
            };
        }
        ExistingState::Absent
    }

    async fn fetch_and_install(
        &self,
        movie: &MovieUnit,
        candidate: &TrailerCandidate,
        existing: &ExistingState,
    ) -> AppResult<ReconcileOutcome> {
        let workspace = FetchWorkspace::create(&self.temp_dir)?;
        let force_mp4 = !self.policy.allow_non_mp4_for_quality;

        let fetched = match self
            .downloader
            .fetch(
                &candidate.url,
                self.policy.preferred_height,
                workspace.dir(),
                force_mp4,
            )
            .await
        {
            Ok(path) => path,
            Err(e) => {
                workspace.cleanup();
                return Ok(ReconcileOutcome::Failed(format!("fetch failed: {}", e)));
            }
        };

        // Only a probed height is trusted; a fetched file that cannot
        // be probed is rejected like a failed fetch.
        let fetched_media = match self.probe.probe(&fetched) {
            Ok(media) => media,
            Err(e) => {
                workspace.cleanup();
                return Ok(ReconcileOutcome::Failed(format!(
                    "fetched file unreadable: {}",
                    e
                )));
            }
        };

        if let ExistingState::Usable(path, current) = existing {
            if fetched_media.height <= current.height {
                log::info!(
                    "Existing trailer {} ({}p) is equal/better than fetch ({}p); discarding fetch",
                    path.display(),
                    current.height,
                    fetched_media.height
                );
                workspace.cleanup();
                return Ok(ReconcileOutcome::Kept);
            }
        }

        let extension = match self.install_extension(&fetched_media) {
            Some(ext) => ext,
            None => {
                workspace.cleanup();
                return Ok(ReconcileOutcome::Failed(format!(
                    "downloader produced '{}' but policy requires mp4",
                    fetched_media.extension
                )));
            }
        };

        let final_path = movie.directory.join(format!(
            "{}.{}",
            movie.trailer_stem(&self.trailer_suffix),
            extension
        ));
        let old_path = match existing {
            ExistingState::Usable(path, _) | ExistingState::Unreadable(path) => Some(path.as_path()),
            ExistingState::Absent => None,
        };

        let install_result = install(&fetched, &final_path, old_path);
        workspace.cleanup();
        install_result?;

        log::info!(
            "Installed {} ({}p, {})",
            final_path.display(),
            fetched_media.height,
            extension
        );

        Ok(match existing {
            ExistingState::Usable(_, _) => ReconcileOutcome::Replaced,
            _ => ReconcileOutcome::Downloaded,
        })
    }

    /// Final container extension under the format policy. None means the
    /// fetch violates the policy and must be rejected.
    fn install_extension(&self, media: &ProbedMedia) -> Option<String> {
        if media.extension == "mp4" {
            return Some("mp4".to_string());
        }
        if self.policy.allow_non_mp4_for_quality && !media.extension.is_empty() {
            // Quality over uniformity: keep the fetched container.
            return Some(media.extension.clone());
        }
        None
    }
}

/// Install protocol: stage next to the final path, rename into place,
/// remove the displaced file last. The directory is never observable
/// with zero or two trailer files relative to its pre-run state.
fn install(fetched: &Path, final_path: &Path, old_path: Option<&Path>) -> AppResult<()> {
    let staging = staging_path(final_path);

    // Cross-device move out of the temp area; not yet visible as a
    // trailer because of the .partial suffix.
    move_file(fetched, &staging)?;

    // The actual substitution: one same-directory rename.
    if let Err(e) = fs::rename(&staging, final_path) {
        let _ = fs::remove_file(&staging);
        return Err(e.into());
    }

    if let Some(old) = old_path {
        if old != final_path && old.exists() {
            if let Err(e) = fs::remove_file(old) {
                log::warn!("Could not remove displaced trailer {}: {}", old.display(), e);
            }
        }
    }

    Ok(())
}

fn staging_path(final_path: &Path) -> PathBuf {
    let name = final_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    final_path.with_file_name(format!("{}.partial", name))
}

/// Rename when possible; copy-then-remove across devices.
fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(from, to)?;
            fs::remove_file(from)?;
            Ok(())
        }
    }
}
