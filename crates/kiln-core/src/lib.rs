//! Core data types for the Kiln package manager.
//!
//! This crate defines the on-disk formats a Kiln project is made of: the
//! `Kiln.toml` manifest, the `Kiln.lock` lockfile, and the global user
//! configuration.
//!
//! This crate is intentionally free of network I/O and of resolution logic.

/// File name of the project manifest.
pub const MANIFEST_FILE: &str = "Kiln.toml";

/// File name of the lockfile, written next to the manifest.
pub const LOCKFILE_FILE: &str = "Kiln.lock";

pub mod config;
pub mod lockfile;
pub mod manifest;
