// src/infrastructure/fetch_workspace.rs
//
// Fetch Workspace Management
//
// CRITICAL RULES:
// - One workspace per fetch attempt, uniquely namespaced
// - A failed or partial fetch can never touch the movie directory
// - Cleanup is explicit; stale workspaces are harmless leftovers in the
//   shared temp area, never in a watched library folder

use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::AppResult;

/// A temporary directory holding one fetch attempt's output.
///
/// INVARIANTS:
/// - Each workspace has a unique ID, so concurrent attempts cannot collide
/// - Everything the downloader writes lands inside `dir`
/// - The movie directory is only touched by the final install step
#[derive(Debug, Clone)]
pub struct FetchWorkspace {
    /// Unique workspace identifier
    pub id: Uuid,

    /// Path to the workspace directory
    dir: PathBuf,
}

impl FetchWorkspace {
    /// Create a fresh workspace under the configured temp area.
    pub fn create(base: &Path) -> AppResult<Self> {
        let id = Uuid::new_v4();
        let dir = base.join(id.to_string());
        fs::create_dir_all(&dir)?;
        Ok(Self { id, dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Remove the workspace and everything in it. Failure is logged,
    /// never propagated; leftovers live outside any movie directory.
    pub fn cleanup(&self) {
        if let Err(e) = fs::remove_dir_all(&self.dir) {
            if self.dir.exists() {
                log::warn!(
                    "Could not clean fetch workspace {}: {}",
                    self.dir.display(),
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspaces_are_uniquely_namespaced() {
        let base = tempfile::tempdir().unwrap();
        let a = FetchWorkspace::create(base.path()).unwrap();
        let b = FetchWorkspace::create(base.path()).unwrap();
        assert_ne!(a.dir(), b.dir());
        assert!(a.dir().is_dir());
        assert!(b.dir().is_dir());
    }

    #[test]
    fn test_cleanup_removes_directory() {
        let base = tempfile::tempdir().unwrap();
        let ws = FetchWorkspace::create(base.path()).unwrap();
        fs::write(ws.dir().join("trailer.mp4"), b"video").unwrap();
        ws.cleanup();
        assert!(!ws.dir().exists());
    }
}
