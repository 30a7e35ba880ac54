use std::path::Path;

use kiln_core::config::GlobalConfig;
use kiln_core::lockfile::{LockedDependencyRef, LockedPackage, Lockfile};
use kiln_ops::ops_tree::{render_tree, TreeOptions};
use kiln_ops::project::{graph_to_lockfile, lockfile_to_graph, GraphSource, Project};
use kiln_resolver::PackageId;

const INDEX: &str = r#"
[[package]]
name = "fmt"
version = "9.1.0"

[[package]]
name = "fmt"
version = "10.1.0"

[[package]]
name = "spdlog"
version = "1.12.0"
[package.dependencies]
fmt = ">=9.0.0 and <10.0.0"
"#;

const MANIFEST: &str = r#"
[package]
name = "hello"
version = "0.1.0"

[registry]
index = "index.toml"

[dependencies]
spdlog = ">=1.0"
"#;

fn write_project(dir: &Path, manifest: &str) {
    std::fs::write(dir.join("Kiln.toml"), manifest).unwrap();
    std::fs::write(dir.join("index.toml"), INDEX).unwrap();
}

fn load(dir: &Path) -> Project {
    Project::with_config(dir, GlobalConfig::default()).unwrap()
}

#[test]
fn resolves_and_writes_lockfile() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path(), MANIFEST);
    let project = load(dir.path());

    let (graph, source) = project.resolve_or_reuse(None).unwrap();
    assert_eq!(source, GraphSource::Resolved);
    assert_eq!(graph.find("fmt"), Some(&PackageId::new("fmt", "9.1.0")));

    let lock = Lockfile::from_path(&project.lockfile_path()).unwrap();
    assert!(lock.is_fresh(&project.roots));
    assert_eq!(lock.find("spdlog").unwrap().dependencies.len(), 1);
}

#[test]
fn reuses_fresh_lockfile() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path(), MANIFEST);
    let project = load(dir.path());
    let (first, _) = project.resolve_or_reuse(None).unwrap();

    // The registry is no longer needed once the lock is fresh.
    std::fs::remove_file(dir.path().join("index.toml")).unwrap();
    let (second, source) = project.resolve_or_reuse(None).unwrap();
    assert_eq!(source, GraphSource::Lockfile);
    assert_eq!(second, first);
}

#[test]
fn stale_lockfile_is_re_resolved() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path(), MANIFEST);
    load(dir.path()).resolve_or_reuse(None).unwrap();

    let changed = MANIFEST.replace("spdlog = \">=1.0\"", "fmt = \">=10.0\"");
    std::fs::write(dir.path().join("Kiln.toml"), changed).unwrap();
    let project = load(dir.path());
    let (graph, source) = project.resolve_or_reuse(None).unwrap();
    assert_eq!(source, GraphSource::Resolved);
    assert_eq!(graph.len(), 1);
    assert_eq!(graph.find("fmt"), Some(&PackageId::new("fmt", "10.1.0")));
}

#[test]
fn registry_precedence() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path(), MANIFEST);
    let mut config = GlobalConfig::default();
    config.registry.index = Some("/global/index.toml".to_string());
    let project = Project::with_config(dir.path(), config.clone()).unwrap();

    assert_eq!(
        project.registry_source(Some("cli.toml")).unwrap(),
        "cli.toml"
    );
    assert_eq!(
        project.registry_source(None).unwrap(),
        dir.path().join("index.toml").display().to_string()
    );

    let bare = MANIFEST.replace("[registry]\nindex = \"index.toml\"\n", "");
    std::fs::write(dir.path().join("Kiln.toml"), bare).unwrap();
    let project = Project::with_config(dir.path(), config).unwrap();
    assert_eq!(project.registry_source(None).unwrap(), "/global/index.toml");

    let project = load(dir.path());
    let err = project.registry_source(None).unwrap_err();
    assert!(err.to_string().contains("no registry index configured"), "{err}");
}

#[test]
fn conflict_surfaces_as_error() {
    let dir = tempfile::tempdir().unwrap();
    write_project(
        dir.path(),
        &MANIFEST.replace("spdlog = \">=1.0\"", "spdlog = \">=1.0\"\nfmt = \">=10.0\""),
    );
    let err = load(dir.path()).resolve_fresh(None).unwrap_err();
    assert!(
        err.to_string().contains("conflicting version constraints on fmt, spdlog"),
        "{err}"
    );
    assert!(!dir.path().join("Kiln.lock").exists());
}

#[test]
fn lockfile_graph_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path(), MANIFEST);
    let project = load(dir.path());
    let graph = project.resolve_fresh(None).unwrap();
    let lock = graph_to_lockfile(&project.roots, &graph);
    assert_eq!(lockfile_to_graph(&lock).unwrap(), graph);
}

#[test]
fn inconsistent_lockfile_rejected() {
    let pkg = |name: &str, version: &str, deps: Vec<LockedDependencyRef>| LockedPackage {
        name: name.to_string(),
        version: version.to_string(),
        dependencies: deps,
    };
    let twice = Lockfile::new(
        Default::default(),
        vec![pkg("fmt", "9.1.0", vec![]), pkg("fmt", "10.1.0", vec![])],
    );
    let err = lockfile_to_graph(&twice).unwrap_err();
    assert!(err.to_string().contains("more than one version of `fmt`"), "{err}");

    let dangling = Lockfile::new(
        Default::default(),
        vec![pkg(
            "spdlog",
            "1.12.0",
            vec![LockedDependencyRef {
                name: "fmt".to_string(),
                version: "9.1.0".to_string(),
            }],
        )],
    );
    let err = lockfile_to_graph(&dangling).unwrap_err();
    assert!(err.to_string().contains("which is not locked"), "{err}");
}

#[test]
fn tree_rendering() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path(), MANIFEST);
    let project = load(dir.path());
    let graph = project.resolve_fresh(None).unwrap();

    let tree = render_tree(&project, &graph, &TreeOptions::default());
    assert_eq!(tree, "hello@0.1.0\n└── spdlog@1.12.0\n    └── fmt@9.1.0\n");

    let why = TreeOptions {
        why: Some("fmt".to_string()),
        ..TreeOptions::default()
    };
    assert_eq!(
        render_tree(&project, &graph, &why),
        "Path to fmt:\nhello@0.1.0\n  spdlog@1.12.0\n    fmt@9.1.0\n"
    );

    let inverted = TreeOptions {
        inverted: Some("fmt".to_string()),
        ..TreeOptions::default()
    };
    assert_eq!(
        render_tree(&project, &graph, &inverted),
        "fmt@9.1.0\n└── spdlog@1.12.0\n    └── hello@0.1.0\n"
    );

    let missing = TreeOptions {
        why: Some("ghost".to_string()),
        ..TreeOptions::default()
    };
    assert!(render_tree(&project, &graph, &missing).contains("not found"));
}
