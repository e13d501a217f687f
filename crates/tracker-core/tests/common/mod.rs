//! Collaborator fakes shared by the tracker integration tests

#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use tracker_core::{
    CancellationToken, CatalogError, CatalogReader, CatalogWriter, ClonedSource, CloneError,
    Cloner, ErrorCollector, FetchError, ImageError, ImageStore, LogoFetcher, PackageDigests,
    PackageRecord, Repository, Tracker, TrackerServices,
};
use tracker_meta::TrackerSettings;
use tracker_test_utils::tree::SourceTree;
use uuid::Uuid;

/// Bytes served for every logo download.
pub const LOGO_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nlogo";

/// Copies a prepared source tree into a fresh temp dir per run.
pub struct DirCloner {
    source: PathBuf,
    packages_path: String,
    pub clones: Mutex<Vec<PathBuf>>,
}

impl DirCloner {
    pub fn new(source: &Path, packages_path: &str) -> Self {
        Self {
            source: source.to_path_buf(),
            packages_path: packages_path.to_string(),
            clones: Mutex::new(Vec::new()),
        }
    }
}

impl Cloner for DirCloner {
    fn clone_repository(&self, _repository: &Repository) -> Result<ClonedSource, CloneError> {
        let dir = TempDir::new().map_err(|e| CloneError::Unavailable {
            message: e.to_string(),
        })?;
        tracker_fs::io::copy_tree(&self.source, dir.path())?;
        self.clones.lock().unwrap().push(dir.path().to_path_buf());
        Ok(ClonedSource::new(dir, self.packages_path.clone()))
    }
}

pub struct FailingCloner;

impl Cloner for FailingCloner {
    fn clone_repository(&self, _repository: &Repository) -> Result<ClonedSource, CloneError> {
        Err(CloneError::Unavailable {
            message: "remote hung up".into(),
        })
    }
}

/// In-memory catalog recording every call.
#[derive(Default)]
pub struct MemoryCatalog {
    pub digests: Mutex<PackageDigests>,
    pub registrations: Mutex<Vec<PackageRecord>>,
    pub unregistrations: Mutex<Vec<PackageRecord>>,
    pub reject_keys: Mutex<HashSet<String>>,
    pub unavailable: Mutex<bool>,
    pub reject_unregister: Mutex<HashSet<String>>,
    /// Cancelled right after the first successful registration
    pub cancel_on_register: Mutex<Option<CancellationToken>>,
    /// Cancelled right after the first successful unregistration
    pub cancel_on_unregister: Mutex<Option<CancellationToken>>,
    /// Runs once, after the first successful registration
    pub on_register: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl MemoryCatalog {
    pub fn with_registered(keys: &[&str]) -> Self {
        let catalog = Self::default();
        {
            let mut digests = catalog.digests.lock().unwrap();
            for key in keys {
                digests.insert(key.to_string(), format!("sha256:{key}"));
            }
        }
        catalog
    }

    pub fn registered_keys(&self) -> Vec<String> {
        self.registrations
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.key().to_string())
            .collect()
    }

    pub fn unregistered_keys(&self) -> Vec<String> {
        self.unregistrations
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.key().to_string())
            .collect()
    }

    pub fn record(&self, key: &str) -> Option<PackageRecord> {
        self.registrations
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.key().to_string() == key)
            .cloned()
    }
}

impl CatalogReader for MemoryCatalog {
    fn registered_digests(&self, _repository_id: Uuid) -> Result<PackageDigests, CatalogError> {
        if *self.unavailable.lock().unwrap() {
            return Err(CatalogError::Unavailable {
                message: "connection refused".into(),
            });
        }
        Ok(self.digests.lock().unwrap().clone())
    }
}

impl CatalogWriter for MemoryCatalog {
    fn register(&self, record: &PackageRecord) -> Result<(), CatalogError> {
        let key = record.key().to_string();
        if self.reject_keys.lock().unwrap().contains(&key) {
            return Err(CatalogError::Rejected {
                key,
                reason: "constraint violation".into(),
            });
        }
        self.digests
            .lock()
            .unwrap()
            .insert(key, record.digest.clone());
        self.registrations.lock().unwrap().push(record.clone());
        if let Some(token) = self.cancel_on_register.lock().unwrap().as_ref() {
            token.cancel();
        }
        if let Some(hook) = self.on_register.lock().unwrap().take() {
            hook();
        }
        Ok(())
    }

    fn unregister(&self, record: &PackageRecord) -> Result<(), CatalogError> {
        let key = record.key().to_string();
        if self.reject_unregister.lock().unwrap().contains(&key) {
            return Err(CatalogError::Rejected {
                key,
                reason: "still referenced".into(),
            });
        }
        self.digests.lock().unwrap().remove(&key);
        self.unregistrations.lock().unwrap().push(record.clone());
        if let Some(token) = self.cancel_on_unregister.lock().unwrap().as_ref() {
            token.cancel();
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageMode {
    #[default]
    Accept,
    Unsupported,
    Broken,
}

#[derive(Default)]
pub struct RecordingImageStore {
    pub mode: Mutex<ImageMode>,
    pub saved: Mutex<Vec<Vec<u8>>>,
}

impl ImageStore for RecordingImageStore {
    fn save_image(&self, data: &[u8]) -> Result<String, ImageError> {
        match *self.mode.lock().unwrap() {
            ImageMode::Accept => {
                let mut saved = self.saved.lock().unwrap();
                saved.push(data.to_vec());
                Ok(format!("image-{}", saved.len()))
            }
            ImageMode::Unsupported => Err(ImageError::UnsupportedFormat),
            ImageMode::Broken => Err(ImageError::Storage {
                message: "disk full".into(),
            }),
        }
    }
}

#[derive(Default)]
pub struct RecordingFetcher {
    pub fail: Mutex<bool>,
    pub requests: Mutex<Vec<String>>,
}

impl LogoFetcher for RecordingFetcher {
    fn download(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        if *self.fail.lock().unwrap() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            });
        }
        Ok(LOGO_BYTES.to_vec())
    }
}

/// A source tree wired to fake collaborators.
pub struct Harness {
    pub tree: SourceTree,
    pub repository: Repository,
    pub cloner: Arc<DirCloner>,
    pub catalog: Arc<MemoryCatalog>,
    pub images: Arc<RecordingImageStore>,
    pub logos: Arc<RecordingFetcher>,
    pub errors: Arc<ErrorCollector>,
    pub cancel: CancellationToken,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_catalog(MemoryCatalog::default())
    }

    pub fn with_catalog(catalog: MemoryCatalog) -> Self {
        let tree = SourceTree::with_packages_path("library");
        let cloner = Arc::new(DirCloner::new(tree.root(), tree.packages_path()));
        Self {
            repository: Repository::new(
                Uuid::new_v4(),
                "policies",
                "https://github.com/org/policies/library",
            ),
            tree,
            cloner,
            catalog: Arc::new(catalog),
            images: Arc::new(RecordingImageStore::default()),
            logos: Arc::new(RecordingFetcher::default()),
            errors: Arc::new(ErrorCollector::new()),
            cancel: CancellationToken::new(),
        }
    }

    pub fn services(&self) -> TrackerServices {
        TrackerServices {
            cloner: self.cloner.clone(),
            catalog_reader: self.catalog.clone(),
            catalog_writer: self.catalog.clone(),
            images: self.images.clone(),
            logos: self.logos.clone(),
            errors: self.errors.clone(),
        }
    }

    pub fn tracker(&self, bypass_digest_check: bool) -> Tracker {
        Tracker::new(
            self.repository.clone(),
            TrackerSettings {
                bypass_digest_check,
            },
            self.services(),
            self.cancel.clone(),
        )
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.messages_for(self.repository.repository_id)
    }
}
