//! Catalog backed by a JSON ledger file
//!
//! ```json
//! {
//!   "<repository id>": {
//!     "<name@version>": { "digest": "sha256:...", "record": { ... } }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracker_core::{CatalogError, CatalogReader, CatalogWriter, PackageDigests, PackageRecord};
use tracker_fs::{ConfigStore, NormalizedPath, io};
use uuid::Uuid;

/// A registered version as the ledger stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub digest: String,
    pub record: PackageRecord,
}

/// Versions per repository, keyed by `name@version`.
pub type Ledger = BTreeMap<Uuid, BTreeMap<String, LedgerEntry>>;

/// [`CatalogReader`] and [`CatalogWriter`] over one JSON file.
///
/// Every write is a locked read-modify-write followed by an atomic
/// replace, so concurrent runs for different repositories can share it.
#[derive(Debug, Clone)]
pub struct LedgerCatalog {
    path: NormalizedPath,
    store: ConfigStore,
}

impl LedgerCatalog {
    pub fn new(path: impl Into<NormalizedPath>) -> Self {
        Self {
            path: path.into(),
            store: ConfigStore::new(),
        }
    }

    /// Read the whole ledger. A missing file is an empty ledger.
    pub fn load(&self) -> tracker_fs::Result<Ledger> {
        match self.store.load(&self.path) {
            Ok(ledger) => Ok(ledger),
            Err(e) if e.is_not_found() => Ok(Ledger::new()),
            Err(e) => Err(e),
        }
    }

    fn update(&self, f: impl FnOnce(&mut Ledger)) -> Result<(), CatalogError> {
        io::with_lock(&self.path, || {
            let mut ledger = self.load()?;
            f(&mut ledger);
            self.store.save(&self.path, &ledger)
        })?;
        Ok(())
    }
}

impl CatalogReader for LedgerCatalog {
    fn registered_digests(&self, repository_id: Uuid) -> Result<PackageDigests, CatalogError> {
        let ledger = self.load()?;
        Ok(ledger
            .get(&repository_id)
            .map(|entries| {
                entries
                    .iter()
                    .map(|(key, entry)| (key.clone(), entry.digest.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl CatalogWriter for LedgerCatalog {
    fn register(&self, record: &PackageRecord) -> Result<(), CatalogError> {
        if record.repository.repository_id.is_nil() {
            return Err(CatalogError::Rejected {
                key: record.key().to_string(),
                reason: "record has no repository".into(),
            });
        }
        self.update(|ledger| {
            ledger
                .entry(record.repository.repository_id)
                .or_default()
                .insert(
                    record.key().to_string(),
                    LedgerEntry {
                        digest: record.digest.clone(),
                        record: record.clone(),
                    },
                );
        })
    }

    fn unregister(&self, record: &PackageRecord) -> Result<(), CatalogError> {
        let repository_id = record.repository.repository_id;
        self.update(|ledger| {
            if let Some(entries) = ledger.get_mut(&repository_id) {
                entries.remove(&record.key().to_string());
                if entries.is_empty() {
                    ledger.remove(&repository_id);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tracker_core::{PackageVersionKey, Repository};

    fn record(repository: &Repository, name: &str, version: &str) -> PackageRecord {
        PackageRecord {
            name: name.into(),
            version: version.into(),
            digest: format!("sha256:{name}{version}"),
            repository: repository.clone(),
            ..Default::default()
        }
    }

    fn repository() -> Repository {
        Repository::new(Uuid::new_v4(), "policies", "https://github.com/o/r")
    }

    #[test]
    fn test_missing_ledger_is_empty() {
        let temp = TempDir::new().unwrap();
        let catalog = LedgerCatalog::new(temp.path().join("catalog.json"));

        assert!(catalog.registered_digests(Uuid::new_v4()).unwrap().is_empty());
    }

    #[test]
    fn test_register_then_unregister() {
        let temp = TempDir::new().unwrap();
        let catalog = LedgerCatalog::new(temp.path().join("catalog.json"));
        let repo = repository();

        catalog.register(&record(&repo, "a", "1.0.0")).unwrap();
        catalog.register(&record(&repo, "b", "2.0.0")).unwrap();
        let digests = catalog.registered_digests(repo.repository_id).unwrap();
        assert_eq!(
            digests.keys().cloned().collect::<Vec<_>>(),
            vec!["a@1.0.0".to_string(), "b@2.0.0".to_string()]
        );
        assert_eq!(digests["a@1.0.0"], "sha256:a1.0.0");

        let key = PackageVersionKey::new("b", "2.0.0");
        catalog
            .unregister(&PackageRecord::for_unregister(&key, repo.clone()))
            .unwrap();
        let digests = catalog.registered_digests(repo.repository_id).unwrap();
        assert_eq!(digests.len(), 1);
    }

    #[test]
    fn test_repositories_are_kept_apart() {
        let temp = TempDir::new().unwrap();
        let catalog = LedgerCatalog::new(temp.path().join("catalog.json"));
        let first = repository();
        let second = repository();

        catalog.register(&record(&first, "a", "1.0.0")).unwrap();
        catalog.register(&record(&second, "a", "1.0.0")).unwrap();
        catalog
            .unregister(&record(&first, "a", "1.0.0"))
            .unwrap();

        assert!(catalog.registered_digests(first.repository_id).unwrap().is_empty());
        assert_eq!(catalog.registered_digests(second.repository_id).unwrap().len(), 1);
    }

    #[test]
    fn test_unregister_missing_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let catalog = LedgerCatalog::new(temp.path().join("catalog.json"));

        catalog.unregister(&record(&repository(), "a", "1.0.0")).unwrap();
        catalog.unregister(&record(&repository(), "a", "1.0.0")).unwrap();
    }

    #[test]
    fn test_record_without_repository_rejected() {
        let temp = TempDir::new().unwrap();
        let catalog = LedgerCatalog::new(temp.path().join("catalog.json"));

        let err = catalog.register(&record(&Repository::default(), "a", "1.0.0")).unwrap_err();
        assert!(matches!(err, CatalogError::Rejected { .. }));
    }

    #[test]
    fn test_concurrent_registrations_all_land() {
        let temp = TempDir::new().unwrap();
        let catalog = Arc::new(LedgerCatalog::new(temp.path().join("catalog.json")));
        let repo = repository();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let catalog = catalog.clone();
                let repo = repo.clone();
                std::thread::spawn(move || {
                    catalog
                        .register(&record(&repo, "pkg", &format!("1.{i}.0")))
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(catalog.registered_digests(repo.repository_id).unwrap().len(), 8);
    }
}
