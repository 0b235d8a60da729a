// src/services/mod.rs
//
// Services - the pipeline's business logic
//
// CRITICAL RULES:
// - Services own decisions; integrations own I/O with the outside world
// - Every service is deterministic given its inputs and policy
// - External dependencies enter through `Arc<dyn Trait>` seams

pub mod reconcile_service;
pub mod scan_service;
pub mod selection_service;
pub mod stats_service;
pub mod trailer_service;

#[cfg(test)]
mod selection_service_tests;

pub use reconcile_service::ReconcileService;
pub use scan_service::ScanService;
pub use selection_service::SelectionService;
pub use stats_service::StatsService;
pub use trailer_service::TrailerService;
