//! Operation: resolve the project's dependencies and print the result.

use std::path::Path;

use kiln_resolver::ResolvedGraph;
use kiln_util::errors::KilnError;
use kiln_util::progress::status;

use crate::project::{GraphSource, Project};

/// Output format for `kiln resolve`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Options for `kiln resolve`.
#[derive(Debug, Default)]
pub struct ResolveOptions {
    pub format: OutputFormat,
    /// Registry index overriding the manifest and global config.
    pub registry: Option<String>,
}

/// Resolve (or reuse an up-to-date `Kiln.lock`) and print the graph.
pub fn resolve(project_root: &Path, opts: &ResolveOptions) -> miette::Result<()> {
    let project = Project::load(project_root)?;
    let (graph, source) = project.resolve_or_reuse(opts.registry.as_deref())?;

    match source {
        GraphSource::Lockfile => status("Fresh", "Kiln.lock is up to date"),
        GraphSource::Resolved => status("Locked", &format!("{} packages", graph.len())),
    }
    print!("{}", render(&graph, opts.format)?);
    Ok(())
}

/// Render a graph the way `kiln resolve` prints it.
pub fn render(graph: &ResolvedGraph, format: OutputFormat) -> miette::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(graph)),
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(&graph.to_entries()).map_err(|e| {
                KilnError::Generic {
                    message: format!("Failed to serialize resolution: {e}"),
                }
            })?;
            out.push('\n');
            Ok(out)
        }
    }
}

/// One line per package: `name version`, then `-> dep@version, ...` when it
/// has dependencies.
fn render_text(graph: &ResolvedGraph) -> String {
    let mut out = String::new();
    for (id, deps) in graph.iter() {
        out.push_str(&format!("{} {}", id.name, id.version));
        if !deps.is_empty() {
            let deps: Vec<String> = deps.iter().map(ToString::to_string).collect();
            out.push_str(&format!(" -> {}", deps.join(", ")));
        }
        out.push('\n');
    }
    out
}
