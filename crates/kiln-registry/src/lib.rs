//! Registry index access: where the published versions the resolver
//! chooses from come from.
//!
//! An index is a flat list of `(name, version, dependencies)` entries in
//! TOML or JSON, read from a local file or fetched over HTTP, and turned
//! into an [`IndexOracle`].

pub mod download;
pub mod index;
pub mod source;

use std::time::Duration;

use kiln_resolver::IndexOracle;

pub use index::{IndexEntry, RegistryIndex};
pub use source::{IndexFormat, IndexSource};

/// Load the index at `source` (a path or an `http(s)://` URL) into an
/// oracle. `timeout` bounds each HTTP request.
pub fn load(source: &str, timeout: Duration) -> miette::Result<IndexOracle> {
    let source = IndexSource::parse(source);
    tracing::debug!(%source, "loading registry index");

    let (content, format) = match &source {
        IndexSource::File(path) => {
            let content = std::fs::read_to_string(path).map_err(|e| {
                kiln_util::errors::KilnError::Registry {
                    message: format!("Failed to read index {}: {e}", path.display()),
                }
            })?;
            (content, source.format_hint().unwrap_or(IndexFormat::Toml))
        }
        IndexSource::Url(url) => {
            let client = download::build_client(timeout)?;
            let fetched = download::fetch_text(&client, url)?;
            let format = source
                .format_hint()
                .or(fetched.format)
                .unwrap_or(IndexFormat::Toml);
            (fetched.body, format)
        }
    };

    let index = RegistryIndex::parse(&content, format)?;
    let oracle = index.into_oracle()?;
    tracing::info!(%source, entries = oracle.len(), "loaded registry index");
    Ok(oracle)
}
