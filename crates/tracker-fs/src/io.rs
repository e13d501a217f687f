//! Directory listing, reads, and atomic writes with file locking

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use fs2::FileExt;
use walkdir::WalkDir;

use crate::{Error, NormalizedPath, Result};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// List the names of the subdirectories of `dir`, sorted by name.
///
/// Entries that are not directories (files, symlinks) are skipped.
/// Failing to open or iterate `dir` is an error.
pub fn list_dirs(dir: &NormalizedPath) -> Result<Vec<String>> {
    let native_path = dir.to_native();
    let entries = fs::read_dir(&native_path).map_err(|e| Error::io(&native_path, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(&native_path, e))?;
        let file_type = entry.file_type().map_err(|e| Error::io(entry.path(), e))?;
        if !file_type.is_dir() {
            continue;
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

/// Read raw bytes from a file.
pub fn read_bytes(path: &NormalizedPath) -> Result<Vec<u8>> {
    let native_path = path.to_native();
    fs::read(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let bytes = read_bytes(path)?;
    String::from_utf8(bytes).map_err(|_| Error::NotUtf8 {
        path: path.to_native(),
    })
}

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename strategy to prevent partial writes.
/// Acquires an advisory lock to prevent concurrent access.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Temp file in the same directory keeps the rename on one filesystem
    let temp_name = format!(
        ".{}.{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    fs::rename(&temp_path, &native_path).map_err(|e| Error::io(&native_path, e))?;

    Ok(())
}

/// Run `f` while holding an exclusive lock on `<path>.lock`.
///
/// Serializes read-modify-write cycles on a shared state file across
/// threads and processes.
pub fn with_lock<T>(path: &NormalizedPath, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let native_path = path.to_native();
    let mut lock_name = native_path.as_os_str().to_owned();
    lock_name.push(".lock");
    let lock_path = std::path::PathBuf::from(lock_name);

    if let Some(parent) = lock_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let lock_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)
        .map_err(|e| Error::io(&lock_path, e))?;
    lock_file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    let result = f();

    if let Err(e) = lock_file.unlock() {
        tracing::warn!(path = %lock_path.display(), error = %e, "Failed to release lock");
    }
    result
}

/// Recursively copy the tree rooted at `src` into `dst`.
///
/// `.git` directories are not copied. Symlinks are skipped.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    let src = dunce::canonicalize(src).map_err(|e| Error::io(src, e))?;

    let walker = WalkDir::new(&src)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.file_name() != ".git");

    for entry in walker {
        let entry = entry.map_err(|e| Error::Walk {
            path: src.clone(),
            message: e.to_string(),
        })?;
        let relative = entry
            .path()
            .strip_prefix(&src)
            .map_err(|e| Error::Walk {
                path: entry.path().to_path_buf(),
                message: e.to_string(),
            })?;
        let target = dst.join(relative);

        let file_type = entry.file_type();
        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
        } else if file_type.is_file() {
            fs::copy(entry.path(), &target).map_err(|e| Error::io(&target, e))?;
        } else {
            tracing::debug!(path = %entry.path().display(), "Skipping non-regular file");
        }
    }

    Ok(())
}
