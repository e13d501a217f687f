//! Cloner backed by a local checkout

use std::collections::HashMap;
use std::path::PathBuf;

use tempfile::TempDir;
use tracker_core::{CloneError, ClonedSource, Cloner, Repository};
use tracker_fs::io;
use uuid::Uuid;

/// Copies each repository's configured checkout into a run-owned temp dir.
#[derive(Debug, Default)]
pub struct LocalCheckout {
    checkouts: HashMap<Uuid, PathBuf>,
}

impl LocalCheckout {
    pub fn new(checkouts: impl IntoIterator<Item = (Uuid, PathBuf)>) -> Self {
        Self {
            checkouts: checkouts.into_iter().collect(),
        }
    }
}

impl Cloner for LocalCheckout {
    fn clone_repository(&self, repository: &Repository) -> Result<ClonedSource, CloneError> {
        let checkout = self
            .checkouts
            .get(&repository.repository_id)
            .ok_or_else(|| CloneError::Unavailable {
                message: format!("no checkout configured for {}", repository.name),
            })?;
        if !checkout.is_dir() {
            return Err(CloneError::Unavailable {
                message: format!("checkout {} is not a directory", checkout.display()),
            });
        }

        let dir = TempDir::with_prefix("policy-tracker-").map_err(|e| CloneError::Unavailable {
            message: format!("failed to create temp dir: {e}"),
        })?;
        io::copy_tree(checkout, dir.path())?;

        tracing::debug!(
            from = %checkout.display(),
            to = %dir.path().display(),
            "Copied checkout"
        );
        Ok(ClonedSource::new(dir, repository.packages_path()))
    }
}
