//! A loaded project and the resolution plumbing the commands share.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use kiln_core::config::GlobalConfig;
use kiln_core::lockfile::{LockedDependencyRef, LockedPackage, Lockfile};
use kiln_core::manifest::Manifest;
use kiln_core::{LOCKFILE_FILE, MANIFEST_FILE};
use kiln_resolver::{PackageId, ResolvedGraph, ResolvedPackage, Resolver, VersionRange};
use kiln_util::errors::KilnError;
use kiln_util::progress::{spinner, status, status_warn};

/// Where a graph came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphSource {
    /// Freshly resolved against the registry.
    Resolved,
    /// Read back from an up-to-date `Kiln.lock`.
    Lockfile,
}

/// The manifest, its root requirements, and the user's global config.
#[derive(Debug)]
pub struct Project {
    pub root: PathBuf,
    pub manifest: Manifest,
    pub roots: BTreeMap<String, String>,
    pub config: GlobalConfig,
}

impl Project {
    /// Load `Kiln.toml` from `project_root` and the global config.
    pub fn load(project_root: &Path) -> miette::Result<Self> {
        Self::with_config(project_root, GlobalConfig::load()?)
    }

    pub fn with_config(project_root: &Path, config: GlobalConfig) -> miette::Result<Self> {
        let manifest = Manifest::from_path(&project_root.join(MANIFEST_FILE))?;
        let roots = manifest.roots()?;
        Ok(Self {
            root: project_root.to_path_buf(),
            manifest,
            roots,
            config,
        })
    }

    pub fn lockfile_path(&self) -> PathBuf {
        self.root.join(LOCKFILE_FILE)
    }

    /// The project itself, as the root of a dependency tree.
    pub fn package_id(&self) -> PackageId {
        PackageId::new(
            self.manifest.package.name.clone(),
            self.manifest.package.version.clone(),
        )
    }

    /// Pick the registry index: `--registry`, then the manifest, then the
    /// global config.
    pub fn registry_source(&self, cli: Option<&str>) -> miette::Result<String> {
        if let Some(source) = cli {
            return Ok(source.to_string());
        }
        if let Some(source) = self.manifest.registry_index(&self.root) {
            return Ok(source);
        }
        self.config.registry.index.clone().ok_or_else(|| {
            KilnError::Registry {
                message: "no registry index configured; pass --registry or set \
                          [registry] index in Kiln.toml or the global config"
                    .to_string(),
            }
            .into()
        })
    }

    /// Resolve against the registry, ignoring any lockfile.
    pub fn resolve_fresh(&self, registry: Option<&str>) -> miette::Result<ResolvedGraph> {
        let source = self.registry_source(registry)?;
        let timeout = Duration::from_secs(self.config.registry.timeout_secs);
        let oracle = kiln_registry::load(&source, timeout)?;

        let roots: BTreeMap<String, VersionRange> = self
            .roots
            .iter()
            .map(|(name, range)| (name.clone(), VersionRange::new(range.as_str())))
            .collect();
        let options = kiln_resolver::ResolveOptions {
            exactly_one_threshold: self.config.resolver.exactly_one_threshold,
            ..kiln_resolver::ResolveOptions::default()
        };

        status(
            "Resolving",
            &format!("{} root dependencies against {source}", roots.len()),
        );
        let sp = spinner("Resolving dependencies...");
        let result = Resolver::new(&oracle).with_options(options).resolve(&roots);
        sp.finish_and_clear();

        let resolution = result?;
        tracing::info!(
            candidates = resolution.stats.candidates,
            variables = resolution.stats.variables,
            clauses = resolution.stats.clauses,
            "resolution finished"
        );
        Ok(resolution.graph)
    }

    /// Reuse `Kiln.lock` when it was resolved from the current roots,
    /// otherwise resolve and rewrite it.
    pub fn resolve_or_reuse(
        &self,
        registry: Option<&str>,
    ) -> miette::Result<(ResolvedGraph, GraphSource)> {
        if let Some(graph) = self.fresh_lockfile_graph() {
            return Ok((graph, GraphSource::Lockfile));
        }
        let graph = self.resolve_fresh(registry)?;
        self.write_lockfile(&graph)?;
        Ok((graph, GraphSource::Resolved))
    }

    fn fresh_lockfile_graph(&self) -> Option<ResolvedGraph> {
        let path = self.lockfile_path();
        if !path.is_file() {
            return None;
        }
        let lock = match Lockfile::from_path(&path) {
            Ok(lock) => lock,
            Err(e) => {
                status_warn("Warning", &format!("ignoring unreadable {LOCKFILE_FILE}: {e}"));
                return None;
            }
        };
        if !lock.is_fresh(&self.roots) {
            tracing::info!("{LOCKFILE_FILE} is out of date, re-resolving");
            return None;
        }
        match lockfile_to_graph(&lock) {
            Ok(graph) => Some(graph),
            Err(e) => {
                status_warn("Warning", &format!("ignoring inconsistent {LOCKFILE_FILE}: {e}"));
                None
            }
        }
    }

    pub fn write_lockfile(&self, graph: &ResolvedGraph) -> miette::Result<()> {
        graph_to_lockfile(&self.roots, graph).write_to(&self.lockfile_path())
    }
}

/// Flatten a resolved graph into a lockfile recording `roots`.
pub fn graph_to_lockfile(roots: &BTreeMap<String, String>, graph: &ResolvedGraph) -> Lockfile {
    let packages = graph
        .to_entries()
        .into_iter()
        .map(|entry| LockedPackage {
            name: entry.name,
            version: entry.version,
            dependencies: entry
                .dependencies
                .into_iter()
                .map(|dep| LockedDependencyRef {
                    name: dep.name,
                    version: dep.version,
                })
                .collect(),
        })
        .collect();
    Lockfile::new(roots.clone(), packages)
}

/// Rebuild the graph recorded in a lockfile. Two versions of one name, or a
/// dependency on a package the lockfile does not list, are errors.
pub fn lockfile_to_graph(lock: &Lockfile) -> miette::Result<ResolvedGraph> {
    let entries = lock.package.iter().map(|pkg| ResolvedPackage {
        name: pkg.name.clone(),
        version: pkg.version.clone(),
        dependencies: pkg
            .dependencies
            .iter()
            .map(|dep| PackageId::new(dep.name.clone(), dep.version.clone()))
            .collect(),
    });
    let graph = ResolvedGraph::from_entries(entries).map_err(|clash| KilnError::Lockfile {
        message: format!("more than one version of `{}` is locked", clash.name),
    })?;

    for (id, deps) in graph.iter() {
        if let Some(missing) = deps.iter().find(|dep| !graph.contains(dep)) {
            return Err(KilnError::Lockfile {
                message: format!("{id} depends on {missing}, which is not locked"),
            }
            .into());
        }
    }
    Ok(graph)
}
