//! Repository identity and package version keys

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::source_link::RepoUrl;

/// A tracked repository. Read-only for the duration of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub repository_id: Uuid,
    pub name: String,
    /// Remote URL; may point below the repository root to where packages live
    pub url: String,
}

impl Repository {
    pub fn new(repository_id: Uuid, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            repository_id,
            name: name.into(),
            url: url.into(),
        }
    }

    /// Subpath of the source tree holding the packages, taken from the URL.
    ///
    /// Empty when the URL has no subpath or is not a recognized provider URL.
    pub fn packages_path(&self) -> String {
        RepoUrl::parse(&self.url)
            .map(|url| url.packages_path)
            .unwrap_or_default()
    }
}

/// Identifies one package version within a repository.
///
/// Rendered as `name@version`, the form used as the catalog's digest map
/// key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageVersionKey {
    pub name: String,
    pub version: String,
}

impl PackageVersionKey {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Split a `name@version` key on its first `@`.
    pub fn parse(key: &str) -> Option<Self> {
        let (name, version) = key.split_once('@')?;
        if name.is_empty() || version.is_empty() {
            return None;
        }
        Some(Self::new(name, version))
    }
}

impl fmt::Display for PackageVersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}
