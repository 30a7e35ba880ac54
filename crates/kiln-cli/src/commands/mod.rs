//! Command dispatch and handler modules.

mod lock;
mod resolve;
mod tree;

use std::path::PathBuf;

use miette::Result;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    let registry = cli.registry.as_deref();
    match cli.command {
        Command::Resolve { format } => resolve::exec(format, registry),
        Command::Lock => lock::exec(registry),
        Command::Tree {
            depth,
            why,
            inverted,
        } => tree::exec(depth, why, inverted, registry),
    }
}

/// The directory holding `Kiln.toml`, searched upwards from the current
/// directory.
fn project_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir().map_err(kiln_util::errors::KilnError::Io)?;
    let root = kiln_core::manifest::find_project_root(&cwd)?;
    tracing::info!(root = %root.display(), "found project root");
    Ok(root)
}
