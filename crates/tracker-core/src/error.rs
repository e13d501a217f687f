//! Error types for tracker-core

use std::path::PathBuf;

/// Result type for tracker-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while tracking a repository.
///
/// `Clone`, `RegisteredDigests` and `ReadPackages` end the run. Every other
/// variant is confined to one package or version and is handed to the
/// errors collector instead of being returned.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("error cloning repository {url}: {source}")]
    Clone {
        url: String,
        #[source]
        source: CloneError,
    },

    #[error("error getting registered packages: {0}")]
    RegisteredDigests(#[source] CatalogError),

    #[error("error reading packages at {path}: {source}")]
    ReadPackages {
        path: PathBuf,
        #[source]
        source: tracker_fs::Error,
    },

    #[error("error reading package {package} versions: {source}")]
    ReadVersions {
        package: String,
        #[source]
        source: tracker_fs::Error,
    },

    #[error("invalid package {package} version ({version}): {source}")]
    InvalidVersion {
        package: String,
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("error loading package {package} version {version} metadata: {source}")]
    Descriptor {
        package: String,
        version: String,
        #[source]
        source: tracker_meta::Error,
    },

    #[error("error reading package {package} version {version} policies: {source}")]
    Payload {
        package: String,
        version: String,
        #[source]
        source: tracker_meta::Error,
    },

    #[error("error preparing package {package} version {version} from metadata: {source}")]
    Prepare {
        package: String,
        version: String,
        #[source]
        source: tracker_meta::Error,
    },

    #[error("error downloading package {package} version {version} logo: {source}")]
    LogoDownload {
        package: String,
        version: String,
        #[source]
        source: FetchError,
    },

    #[error("error saving package {package} version {version} logo: {source}")]
    LogoStore {
        package: String,
        version: String,
        #[source]
        source: ImageError,
    },

    #[error("error registering package {package} version {version}: {source}")]
    Register {
        package: String,
        version: String,
        #[source]
        source: CatalogError,
    },

    #[error("error unregistering package {package} version {version}: {source}")]
    Unregister {
        package: String,
        version: String,
        #[source]
        source: CatalogError,
    },

    #[error("malformed registered package key '{key}' (expected name@version)")]
    MalformedKey { key: String },
}

impl Error {
    /// Whether this error ends the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Clone { .. } | Self::RegisteredDigests(_) | Self::ReadPackages { .. }
        )
    }
}

/// Failure to produce a local copy of a repository's source tree.
#[derive(Debug, thiserror::Error)]
pub enum CloneError {
    #[error(transparent)]
    Fs(#[from] tracker_fs::Error),

    #[error("source not available: {message}")]
    Unavailable { message: String },
}

/// Failure reported by the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {message}")]
    Unavailable { message: String },

    #[error("catalog rejected {key}: {reason}")]
    Rejected { key: String, reason: String },

    #[error(transparent)]
    Fs(#[from] tracker_fs::Error),
}

/// Failure reported by the image store.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// The bytes are not an image format the store recognizes
    #[error("unsupported image format")]
    UnsupportedFormat,

    #[error("image storage failed: {message}")]
    Storage { message: String },

    #[error(transparent)]
    Fs(#[from] tracker_fs::Error),
}

impl ImageError {
    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, Self::UnsupportedFormat)
    }
}

/// Failure downloading a remote logo.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("GET {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("GET {url} failed: {message}")]
    Transport { url: String, message: String },
}
