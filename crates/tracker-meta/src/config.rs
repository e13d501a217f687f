//! Tracker configuration types and loading
//!
//! ```toml
//! [tracker]
//! bypass_digest_check = false
//! ledger = "catalog.json"
//! images_dir = "images"
//!
//! [[repositories]]
//! id = "0b0c5b3a-8a0e-4b8e-9a55-4c1b6a9f2f10"
//! name = "gatekeeper"
//! url = "https://github.com/org/policies/library"
//! checkout = "checkouts/gatekeeper"
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracker_fs::{ConfigStore, NormalizedPath};
use uuid::Uuid;

use crate::{Error, Result};

/// Options consumed by a tracking run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerSettings {
    /// Re-register every discovered version, even ones already in the catalog
    #[serde(default)]
    pub bypass_digest_check: bool,
}

/// The `[tracker]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerSection {
    #[serde(flatten)]
    pub settings: TrackerSettings,

    /// JSON ledger used as the catalog
    #[serde(default = "default_ledger")]
    pub ledger: PathBuf,

    /// Directory logos are written to
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,
}

fn default_ledger() -> PathBuf {
    PathBuf::from("catalog.json")
}

fn default_images_dir() -> PathBuf {
    PathBuf::from("images")
}

impl Default for TrackerSection {
    fn default() -> Self {
        Self {
            settings: TrackerSettings::default(),
            ledger: default_ledger(),
            images_dir: default_images_dir(),
        }
    }
}

/// A repository to track and where its source tree lives locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySource {
    pub id: Uuid,
    pub name: String,
    /// Remote URL, used for source links and the packages subpath
    pub url: String,
    /// Local checkout of the repository
    pub checkout: PathBuf,
}

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub tracker: TrackerSection,

    #[serde(default)]
    pub repositories: Vec<RepositorySource>,
}

impl TrackerConfig {
    /// Resolve relative paths against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        resolve(&mut self.tracker.ledger);
        resolve(&mut self.tracker.images_dir);
        for repository in &mut self.repositories {
            resolve(&mut repository.checkout);
        }
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let mut seen = HashSet::new();
        for repository in &self.repositories {
            if repository.name.trim().is_empty() {
                return Err(Error::InvalidConfig {
                    path: path.to_path_buf(),
                    message: format!("repository {} has an empty name", repository.id),
                });
            }
            if !seen.insert(repository.id) {
                return Err(Error::InvalidConfig {
                    path: path.to_path_buf(),
                    message: format!("duplicate repository id {}", repository.id),
                });
            }
        }
        Ok(())
    }
}

/// Load and validate the configuration file at `path`.
///
/// Relative paths inside the file are resolved against its directory.
pub fn load_config(path: &Path) -> Result<TrackerConfig> {
    if !path.is_file() {
        return Err(Error::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut config: TrackerConfig = ConfigStore::new().load(&NormalizedPath::new(path))?;
    config.validate(path)?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    config.resolve_paths(base);

    tracing::debug!(
        path = %path.display(),
        repositories = config.repositories.len(),
        "Loaded tracker configuration"
    );
    Ok(config)
}
