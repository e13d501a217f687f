//! Filesystem abstraction for the policy tracker
//!
//! Provides normalized path handling, directory listing, and safe I/O
//! operations over cloned source trees and local state files.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use constants::PackageFile;
pub use error::{Error, Result};
pub use path::NormalizedPath;
