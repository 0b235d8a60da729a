// src/infrastructure/mod.rs

pub mod fetch_workspace;

pub use fetch_workspace::FetchWorkspace;
