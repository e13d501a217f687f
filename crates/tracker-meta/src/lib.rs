//! Package metadata and configuration for the policy tracker.
//!
//! This crate defines the per-version descriptor schema, loads descriptors
//! and payloads from version directories, validates metadata against the
//! catalog's required fields, and reads the tracker configuration file.

pub mod config;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use config::{RepositorySource, TrackerConfig, TrackerSettings, load_config};
pub use error::{Error, Result};
pub use loader::{VersionDir, VersionDocument};
pub use schema::{Link, Maintainer, PackageMetadata, Provider};
