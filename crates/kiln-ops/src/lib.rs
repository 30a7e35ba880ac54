//! High-level operations behind the `kiln` subcommands.
//!
//! Each `ops_*` module is one command. [`project`] holds what they share:
//! loading the manifest and config, picking the registry, running the
//! resolver and converting between resolved graphs and `Kiln.lock`.

pub mod ops_lock;
pub mod ops_resolve;
pub mod ops_tree;
pub mod project;
