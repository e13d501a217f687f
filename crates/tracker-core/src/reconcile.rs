//! Register/skip/unregister decisions for package version keys
//!
//! The catalog hands back a digest map keyed by `name@version`. Presence
//! of a key is what counts as "already registered"; the digest values are
//! carried but never compared. Only `bypass_digest_check` forces a known
//! key to be registered again.

use std::collections::{BTreeMap, HashSet};

use crate::repository::PackageVersionKey;

/// Digests of the package versions the catalog holds for a repository.
pub type PackageDigests = BTreeMap<String, String>;

/// What to do with one package version key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to do
    Skip,
    /// Submit the version to the catalog
    Register,
    /// Remove the version from the catalog
    Unregister,
}

/// Decide the outcome for a key from where it was seen.
///
/// | registered | discovered | bypass | outcome    |
/// |------------|------------|--------|------------|
/// | yes        | yes        | no     | Skip       |
/// | yes        | yes        | yes    | Register   |
/// | no         | yes        | any    | Register   |
/// | yes        | no         | any    | Unregister |
/// | no         | no         | any    | Skip       |
pub fn decide(registered: bool, discovered: bool, bypass_digest_check: bool) -> Outcome {
    match (registered, discovered) {
        (true, true) if !bypass_digest_check => Outcome::Skip,
        (_, true) => Outcome::Register,
        (true, false) => Outcome::Unregister,
        (false, false) => Outcome::Skip,
    }
}

/// Tracks registered and discovered keys across one run.
#[derive(Debug)]
pub struct DigestReconciler {
    registered: PackageDigests,
    available: HashSet<String>,
    bypass_digest_check: bool,
}

impl DigestReconciler {
    pub fn new(registered: PackageDigests, bypass_digest_check: bool) -> Self {
        Self {
            registered,
            available: HashSet::new(),
            bypass_digest_check,
        }
    }

    /// Record `key` as present in the source tree and decide whether it
    /// must be registered.
    ///
    /// The key is marked available even when the outcome is `Skip`, so the
    /// unregister pass never removes a version that is still present.
    pub fn observe(&mut self, key: &PackageVersionKey) -> Outcome {
        let key = key.to_string();
        let registered = self.registered.contains_key(&key);
        self.available.insert(key);
        decide(registered, true, self.bypass_digest_check)
    }

    /// Registered keys that were not discovered, in key order.
    pub fn stale(&self) -> Vec<String> {
        self.registered
            .keys()
            .filter(|key| {
                decide(true, self.available.contains(*key), self.bypass_digest_check)
                    == Outcome::Unregister
            })
            .cloned()
            .collect()
    }
}
