//! Well-known file names inside a package version directory.

use std::path::Path;

/// Files every package version directory is expected to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageFile {
    /// Structured descriptor: name, version, logo reference, catalog fields
    Descriptor,
    /// Raw policy payload stored verbatim in the package record
    Payload,
}

impl PackageFile {
    /// Get the file name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Descriptor => "artifacthub.yaml",
            Self::Payload => "policies.rego",
        }
    }
}

impl AsRef<Path> for PackageFile {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for PackageFile {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
