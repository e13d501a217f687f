//! Loader for the documents inside one package version directory
//!
//! ```text
//! <packages>/
//!   k8s-required-labels/
//!     1.2.0/
//!       artifacthub.yaml   descriptor
//!       policies.rego      payload
//! ```

use tracker_fs::{ConfigStore, NormalizedPath, PackageFile, io};

use crate::schema::PackageMetadata;
use crate::{Error, Result};

/// A parsed descriptor together with the bytes it was parsed from.
#[derive(Debug, Clone)]
pub struct VersionDocument {
    pub metadata: PackageMetadata,
    pub raw: Vec<u8>,
}

/// One `<package>/<version>` directory in a source tree.
#[derive(Debug, Clone)]
pub struct VersionDir {
    path: NormalizedPath,
    store: ConfigStore,
}

impl VersionDir {
    pub fn new(path: NormalizedPath) -> Self {
        Self {
            path,
            store: ConfigStore::new(),
        }
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    pub fn descriptor_path(&self) -> NormalizedPath {
        self.path.join(PackageFile::Descriptor)
    }

    pub fn payload_path(&self) -> NormalizedPath {
        self.path.join(PackageFile::Payload)
    }

    /// Read and parse the version descriptor.
    ///
    /// The descriptor must exist, parse, and carry a non-empty `name` and
    /// `version`.
    pub fn load_descriptor(&self) -> Result<VersionDocument> {
        let path = self.descriptor_path();
        let content = io::read_text(&path)?;
        if content.trim().is_empty() {
            return Err(Error::EmptyDescriptor {
                path: path.to_native(),
            });
        }

        let metadata: PackageMetadata = self.store.parse(&path, &content)?;
        if metadata.name.trim().is_empty() {
            return Err(Error::MissingField {
                path: path.to_native(),
                field: "name",
            });
        }
        if metadata.version.trim().is_empty() {
            return Err(Error::MissingField {
                path: path.to_native(),
                field: "version",
            });
        }

        tracing::trace!(path = %path, name = %metadata.name, "Loaded descriptor");
        Ok(VersionDocument {
            metadata,
            raw: content.into_bytes(),
        })
    }

    /// Read the raw policy payload. The content is not interpreted.
    pub fn load_payload(&self) -> Result<Vec<u8>> {
        Ok(io::read_bytes(&self.payload_path())?)
    }
}
