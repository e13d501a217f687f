//! Collaborator contracts consumed by the tracker
//!
//! Every call is blocking from the tracker's point of view. Implementations
//! may be shared by concurrent runs for different repositories.

use std::path::Path;

use tempfile::TempDir;
use tracker_fs::NormalizedPath;
use uuid::Uuid;

use crate::error::{CatalogError, CloneError, FetchError, ImageError};
use crate::package::PackageRecord;
use crate::reconcile::PackageDigests;
use crate::repository::Repository;

/// A run-owned local copy of a repository's source tree.
///
/// The directory is removed when this value is dropped, on every exit path
/// of the run.
#[derive(Debug)]
pub struct ClonedSource {
    dir: TempDir,
    packages_path: String,
}

impl ClonedSource {
    pub fn new(dir: TempDir, packages_path: impl Into<String>) -> Self {
        Self {
            dir,
            packages_path: packages_path.into(),
        }
    }

    /// Root of the local copy.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Subpath of the root where package directories live.
    pub fn packages_path(&self) -> &str {
        &self.packages_path
    }

    pub fn packages_dir(&self) -> NormalizedPath {
        NormalizedPath::new(self.root()).join(&self.packages_path)
    }
}

/// Produces a local copy of a repository's source tree.
pub trait Cloner: Send + Sync {
    fn clone_repository(&self, repository: &Repository) -> Result<ClonedSource, CloneError>;
}

/// Read side of the catalog.
pub trait CatalogReader: Send + Sync {
    /// Digests of every version the catalog holds for the repository,
    /// keyed by `name@version`.
    fn registered_digests(&self, repository_id: Uuid) -> Result<PackageDigests, CatalogError>;
}

/// Write side of the catalog. Both operations must be idempotent.
pub trait CatalogWriter: Send + Sync {
    fn register(&self, record: &PackageRecord) -> Result<(), CatalogError>;

    fn unregister(&self, record: &PackageRecord) -> Result<(), CatalogError>;
}

/// Stores logo images.
pub trait ImageStore: Send + Sync {
    /// Store `data` and return its image identifier.
    ///
    /// Returns [`ImageError::UnsupportedFormat`] for bytes that are not a
    /// recognized image.
    fn save_image(&self, data: &[u8]) -> Result<String, ImageError>;
}

/// Downloads remote logo images.
pub trait LogoFetcher: Send + Sync {
    fn download(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}
