//! Process-wide collection of isolated errors

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use crate::Error;

/// Receives errors that were isolated to a single package or version.
///
/// Shared by every concurrent run; appends must not block for long.
pub trait ErrorsCollector: Send + Sync {
    fn append(&self, repository_id: Uuid, err: Error);
}

/// An isolated error and the repository it came from.
#[derive(Debug)]
struct ErrorEntry {
    repository_id: Uuid,
    error: Error,
}

/// In-memory [`ErrorsCollector`].
///
/// Entries from one repository keep their append order; entries from
/// different repositories interleave in arrival order.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    entries: Mutex<Vec<ErrorEntry>>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ErrorEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Messages recorded for one repository, in append order.
    pub fn messages_for(&self, repository_id: Uuid) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|entry| entry.repository_id == repository_id)
            .map(|entry| entry.error.to_string())
            .collect()
    }

    /// All messages grouped by repository.
    pub fn grouped(&self) -> BTreeMap<Uuid, Vec<String>> {
        let mut grouped: BTreeMap<Uuid, Vec<String>> = BTreeMap::new();
        for entry in self.lock().iter() {
            grouped
                .entry(entry.repository_id)
                .or_default()
                .push(entry.error.to_string());
        }
        grouped
    }
}

impl ErrorsCollector for ErrorCollector {
    fn append(&self, repository_id: Uuid, err: Error) {
        self.lock().push(ErrorEntry {
            repository_id,
            error: err,
        });
    }
}
