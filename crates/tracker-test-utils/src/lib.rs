//! Shared test utilities for the policy-tracker workspace.
//!
//! This crate provides source-tree fixtures so every crate's tests lay out
//! packages the same way. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`tree`]: [`tree::SourceTree`] builder for `<packages>/<name>/<version>/` layouts

pub mod tree;
