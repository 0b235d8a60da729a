// src/services/stats_service.rs
//
// Stats Service - at-rest trailer coverage across the library
//
// Read-only: scans and probes, never downloads, never writes. A slot
// file that cannot be probed counts as present but below target with
// an unknown height.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::movie::is_trailer_slot;
use crate::domain::{CoverageReport, MovieUnit};
use crate::integrations::MediaProbe;

pub struct StatsService {
    probe: Arc<dyn MediaProbe>,
    trailer_suffix: String,
    target_height: u32,
}

impl StatsService {
    pub fn new(probe: Arc<dyn MediaProbe>, trailer_suffix: String, target_height: u32) -> Self {
        Self {
            probe,
            trailer_suffix,
            target_height,
        }
    }

    /// Coverage over the given movies: who has a trailer, who has none,
    /// and whose trailer falls short of the target height.
    pub fn report(&self, movies: &[MovieUnit]) -> CoverageReport {
        let mut report = CoverageReport::new(self.target_height);

        for movie in movies {
            report.total += 1;

            let slot_files = self.slot_files(movie);
            if slot_files.is_empty() {
                report.missing.push(movie.display_name());
                continue;
            }
            report.with_trailer += 1;

            // More than one slot file only happens after an interrupted
            // extension change; judge by the best of them.
            let best_height = slot_files
                .iter()
                .filter_map(|p| self.probe.probe(p).ok().map(|m| m.height))
                .max();

            match best_height {
                Some(h) if h >= self.target_height => {}
                other => report.below_target.push((movie.display_name(), other)),
            }
        }

        report
    }

    fn slot_files(&self, movie: &MovieUnit) -> Vec<PathBuf> {
        let stem = movie.trailer_stem(&self.trailer_suffix);
        let entries = match fs::read_dir(&movie.directory) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };
        entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.is_file() && is_trailer_slot(p, &stem))
            .collect()
    }
}
