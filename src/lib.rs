// src/lib.rs
// TrailHub - Local-first movie trailer fetcher
//
// Architecture:
// - Domain-centric: selection and replacement rules live in domain + services
// - Explicit: No implicit behavior, no magic
// - Local-first: the movie library on disk is the source of truth
// - Providers and tools sit behind trait seams in integrations

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// ============================================================================
// PIPELINE
// ============================================================================

pub mod integrations;
pub mod services;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use domain::{
    validate_movie,
    // Candidates
    CandidateSource,
    // Outcomes
    CoverageReport,
    // Movie
    MovieUnit,
    ReconcileOutcome,
    RunSummary,
    Selection,
    // Policy
    SelectionPolicy,
    TrailerCandidate,
    TrailerKind,
};

pub use error::{AppError, AppResult};

pub use services::{
    ReconcileService, ScanService, SelectionService, StatsService, TrailerService,
};
