//! [`SourceTree`] builder for package source-tree scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracker_fs::PackageFile;

/// A temporary checkout laid out as `<root>/<packages_path>/<name>/<version>/`.
///
/// # Example
///
/// ```rust,no_run
/// use tracker_test_utils::tree::SourceTree;
///
/// let tree = SourceTree::with_packages_path("library");
/// tree.add_version("k8s-required-labels", "1.0.0");
/// tree.add_version("k8s-required-labels", "1.1.0");
/// ```
pub struct SourceTree {
    temp_dir: TempDir,
    packages_path: String,
}

impl Default for SourceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceTree {
    /// Packages live directly under the checkout root.
    pub fn new() -> Self {
        Self::with_packages_path("")
    }

    /// Packages live under `packages_path` inside the checkout.
    pub fn with_packages_path(packages_path: &str) -> Self {
        let tree = Self {
            temp_dir: TempDir::new().unwrap(),
            packages_path: packages_path.trim_matches('/').to_string(),
        };
        fs::create_dir_all(tree.packages_dir()).unwrap();
        tree
    }

    /// Root of the checkout.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn packages_path(&self) -> &str {
        &self.packages_path
    }

    /// Directory that holds one subdirectory per package.
    pub fn packages_dir(&self) -> PathBuf {
        if self.packages_path.is_empty() {
            self.root().to_path_buf()
        } else {
            self.root().join(&self.packages_path)
        }
    }

    pub fn version_dir(&self, package: &str, version: &str) -> PathBuf {
        self.packages_dir().join(package).join(version)
    }

    /// Add a well-formed version whose descriptor matches its directory.
    pub fn add_version(&self, package: &str, version: &str) -> PathBuf {
        self.add_version_with(
            package,
            version,
            &descriptor(package, version, ""),
            Some(&payload(package)),
        )
    }

    /// Add a version that also declares a logo reference.
    pub fn add_version_with_logo(&self, package: &str, version: &str, logo_url: &str) -> PathBuf {
        self.add_version_with(
            package,
            version,
            &descriptor(package, version, &format!("logoURL: {logo_url}\n")),
            Some(&payload(package)),
        )
    }

    /// Add a version directory with explicit descriptor and payload content.
    ///
    /// A `None` payload leaves the payload file out.
    pub fn add_version_with(
        &self,
        package: &str,
        dir_version: &str,
        descriptor: &str,
        payload: Option<&str>,
    ) -> PathBuf {
        let dir = self.version_dir(package, dir_version);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(PackageFile::Descriptor), descriptor).unwrap();
        if let Some(payload) = payload {
            fs::write(dir.join(PackageFile::Payload), payload).unwrap();
        }
        dir
    }

    /// Write an arbitrary file relative to the packages directory.
    pub fn add_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.packages_dir().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Create an empty directory relative to the packages directory.
    pub fn add_dir(&self, relative: &str) -> PathBuf {
        let path = self.packages_dir().join(relative);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Delete a version directory.
    pub fn remove_version(&self, package: &str, version: &str) {
        fs::remove_dir_all(self.version_dir(package, version)).unwrap();
    }
}

/// Render a minimal descriptor, with `extra` YAML lines appended.
pub fn descriptor(name: &str, version: &str, extra: &str) -> String {
    format!("name: {name}\nversion: {version}\ndisplayName: {name}\n{extra}")
}

/// Render a small policy payload.
pub fn payload(name: &str) -> String {
    let module = name.replace('-', "_");
    format!("package {module}\n\nviolation[{{\"msg\": msg}}] {{\n  msg := \"denied\"\n}}\n")
}
