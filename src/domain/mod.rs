// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file declares all domain modules and re-exports their public API.
// All other modules import from `crate::domain::*`

pub mod candidate;
pub mod movie;
pub mod outcome;
pub mod policy;

// Movie Domain
pub use movie::{validate_movie, MovieUnit};

// Candidate Domain
pub use candidate::{CandidateSource, Selection, TrailerCandidate, TrailerKind};

// Policy
pub use policy::{LanguageProfile, SelectionPolicy};

// Outcomes
pub use outcome::{CoverageReport, ReconcileOutcome, RunSummary};

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
