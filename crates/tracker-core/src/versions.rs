//! Discovery of the versions available for one package

use semver::Version;
use tracker_fs::{NormalizedPath, io};

use crate::{Error, Result};

/// A version directory whose name is a strict semantic version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionEntry {
    /// Directory name, exactly as found on disk
    pub dir: String,
    pub version: Version,
}

/// The valid versions of a package, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionSet {
    entries: Vec<VersionEntry>,
}

impl VersionSet {
    /// Scan `package_dir` for version subdirectories.
    ///
    /// Files are ignored. Directory names that are not strict semantic
    /// versions are left out and returned as isolated errors alongside the
    /// set; failing to list the directory at all is an error.
    pub fn scan(package_dir: &NormalizedPath) -> Result<(Self, Vec<Error>)> {
        let package = package_dir.file_name().unwrap_or_default().to_string();
        let names = io::list_dirs(package_dir).map_err(|source| Error::ReadVersions {
            package: package.clone(),
            source,
        })?;
        Ok(Self::from_dir_names(package, names))
    }

    /// Build a set from candidate directory names.
    pub fn from_dir_names(
        package: impl Into<String>,
        names: impl IntoIterator<Item = String>,
    ) -> (Self, Vec<Error>) {
        let package = package.into();
        let mut entries = Vec::new();
        let mut rejected = Vec::new();

        for dir in names {
            match Version::parse(&dir) {
                Ok(version) => entries.push(VersionEntry { dir, version }),
                Err(source) => rejected.push(Error::InvalidVersion {
                    package: package.clone(),
                    version: dir,
                    source,
                }),
            }
        }
        entries.sort_by(|a, b| b.version.cmp(&a.version));

        (Self { entries }, rejected)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VersionEntry> {
        self.entries.iter()
    }
}
