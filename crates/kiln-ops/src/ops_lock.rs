//! Operation: resolve all dependencies and regenerate Kiln.lock.

use std::path::Path;

use kiln_util::progress::status;

use crate::project::Project;

/// Force re-resolve all dependencies and regenerate `Kiln.lock`.
pub fn lock(project_root: &Path, registry: Option<&str>) -> miette::Result<()> {
    let project = Project::load(project_root)?;

    // No lockfile fast path: an up-to-date lock is rewritten too.
    let graph = project.resolve_fresh(registry)?;
    project.write_lockfile(&graph)?;

    status(
        "Locked",
        &format!("{} packages in {}", graph.len(), project.lockfile_path().display()),
    );
    Ok(())
}
