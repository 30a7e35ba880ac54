//! Operation: display the dependency tree.

use std::path::Path;

use kiln_resolver::{DependencyGraph, ResolvedGraph};

use crate::project::Project;

/// Options for `kiln tree`.
#[derive(Debug, Default)]
pub struct TreeOptions {
    /// Maximum tree depth to display.
    pub depth: Option<usize>,
    /// Show the path from the project to this package.
    pub why: Option<String>,
    /// Show the packages that depend on this one.
    pub inverted: Option<String>,
    pub registry: Option<String>,
}

/// Display the dependency tree for the project.
pub fn tree(project_root: &Path, opts: &TreeOptions) -> miette::Result<()> {
    let project = Project::load(project_root)?;
    let (graph, _) = project.resolve_or_reuse(opts.registry.as_deref())?;
    print!("{}", render_tree(&project, &graph, opts));
    Ok(())
}

/// Build the text `kiln tree` prints for an already-resolved graph.
pub fn render_tree(project: &Project, graph: &ResolvedGraph, opts: &TreeOptions) -> String {
    let view = DependencyGraph::build(
        project.package_id(),
        graph,
        project.roots.keys().map(String::as_str),
    );

    if let Some(target) = &opts.why {
        return match view.find_path(target) {
            Some(path) => {
                let mut out = format!("Path to {target}:\n");
                for (i, node) in path.iter().enumerate() {
                    out.push_str(&format!("{}{node}\n", "  ".repeat(i)));
                }
                out
            }
            None => format!("Dependency '{target}' not found in the graph.\n"),
        };
    }

    if let Some(target) = &opts.inverted {
        let inverted = view.print_inverted_tree(target);
        return if inverted.is_empty() {
            format!("Dependency '{target}' not found in the graph.\n")
        } else {
            inverted
        };
    }

    if view.is_empty() {
        return format!("{}\n(no dependencies)\n", project.package_id());
    }
    view.print_tree(opts.depth)
}
