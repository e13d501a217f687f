//! Reconciliation engine for the policy tracker
//!
//! Keeps the packages a catalog knows about for one repository in step with
//! the package versions present in that repository's source tree:
//!
//! - **VersionSet**: discovers strict-semver version directories, newest first
//! - **DigestReconciler**: decides skip/register/unregister per `name@version` key
//! - **Source links**: browsable URLs derived from the repository's remote URL
//! - **PackageRecord**: the catalog-facing record assembled per version
//! - **Tracker**: drives a run, isolating per-item failures into an
//!   [`ErrorsCollector`] and observing cooperative cancellation
//!
//! # Architecture
//!
//! ```text
//!                 Tracker
//!                    |
//!   +---------+------+------+-----------+
//!   |         |             |           |
//! VersionSet  Reconciler  SourceLink  PackageRecord
//!   |                                   |
//! tracker-fs                       tracker-meta
//! ```
//!
//! Collaborators (cloner, catalog, image store, logo fetcher, error
//! collector) are reached only through the traits in [`services`].

pub mod collector;
pub mod error;
pub mod package;
pub mod reconcile;
pub mod repository;
pub mod services;
pub mod source_link;
pub mod tracker;
pub mod versions;

pub use collector::{ErrorCollector, ErrorsCollector};
pub use error::{CatalogError, CloneError, Error, FetchError, ImageError, Result};
pub use package::{POLICIES_KEY, PackageRecord};
pub use reconcile::{DigestReconciler, Outcome, PackageDigests, decide};
pub use repository::{PackageVersionKey, Repository};
pub use services::{CatalogReader, CatalogWriter, ClonedSource, Cloner, ImageStore, LogoFetcher};
pub use source_link::{GitProvider, RepoUrl, source_link};
pub use tokio_util::sync::CancellationToken;
pub use tracker::{TrackReport, Tracker, TrackerServices};
pub use versions::{VersionEntry, VersionSet};
