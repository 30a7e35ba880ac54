use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const INDEX: &str = r#"
[[package]]
name = "fmt"
version = "10.1.0"

[[package]]
name = "spdlog"
version = "1.12.0"
[package.dependencies]
fmt = ">=10.0.0"
"#;

const MANIFEST: &str = r#"
[package]
name = "hello"
version = "0.1.0"

[registry]
index = "index.toml"

[dependencies]
spdlog = "*"
"#;

fn kiln_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("kiln").unwrap();
    cmd.env("KILN_HOME", home)
        .env_remove("KILN_REGISTRY")
        .env_remove("RUST_LOG");
    cmd
}

fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("Kiln.toml"), MANIFEST).unwrap();
    fs::write(tmp.path().join("index.toml"), INDEX).unwrap();
    tmp
}

#[test]
fn lock_writes_lockfile() {
    let tmp = project();

    kiln_cmd(tmp.path())
        .current_dir(tmp.path())
        .arg("lock")
        .assert()
        .success()
        .stderr(predicate::str::contains("Locked"));

    let lock = fs::read_to_string(tmp.path().join("Kiln.lock")).unwrap();
    assert!(lock.contains("[metadata.roots]"), "{lock}");
    assert!(lock.contains("spdlog = \"*\""), "{lock}");
    assert!(lock.contains("version = \"10.1.0\""), "{lock}");
}

#[test]
fn resolve_reuses_lockfile() {
    let tmp = project();

    kiln_cmd(tmp.path())
        .current_dir(tmp.path())
        .arg("lock")
        .assert()
        .success();
    fs::remove_file(tmp.path().join("index.toml")).unwrap();

    kiln_cmd(tmp.path())
        .current_dir(tmp.path())
        .arg("resolve")
        .assert()
        .success()
        .stderr(predicate::str::contains("Fresh"))
        .stdout(predicate::str::contains("spdlog 1.12.0 -> fmt@10.1.0"));
}

#[test]
fn unreadable_lockfile_warns_and_re_resolves() {
    let tmp = project();
    fs::write(tmp.path().join("Kiln.lock"), "this is [not toml").unwrap();

    kiln_cmd(tmp.path())
        .current_dir(tmp.path())
        .arg("resolve")
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning"))
        .stderr(predicate::str::contains("ignoring unreadable Kiln.lock"))
        .stdout(predicate::str::contains("spdlog 1.12.0 -> fmt@10.1.0"));

    let lock = fs::read_to_string(tmp.path().join("Kiln.lock")).unwrap();
    assert!(lock.contains("[metadata.roots]"), "{lock}");
}

#[test]
fn inconsistent_lockfile_warns_and_re_resolves() {
    let tmp = project();
    fs::write(
        tmp.path().join("Kiln.lock"),
        r#"
[metadata.roots]
spdlog = "*"

[[package]]
name = "spdlog"
version = "1.12.0"
dependencies = [{ name = "fmt", version = "10.1.0" }]
"#,
    )
    .unwrap();

    kiln_cmd(tmp.path())
        .current_dir(tmp.path())
        .arg("resolve")
        .assert()
        .success()
        .stderr(predicate::str::contains("ignoring inconsistent Kiln.lock"))
        .stdout(predicate::str::contains("fmt 10.1.0"));
}

#[test]
fn verbose_logs_project_root() {
    let tmp = project();

    kiln_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["-v", "lock"])
        .assert()
        .success()
        .stderr(predicate::str::contains("found project root"));

    kiln_cmd(tmp.path())
        .current_dir(tmp.path())
        .arg("lock")
        .assert()
        .success()
        .stderr(predicate::str::contains("found project root").not());
}

#[test]
fn lock_always_re_resolves() {
    let tmp = project();

    kiln_cmd(tmp.path())
        .current_dir(tmp.path())
        .arg("lock")
        .assert()
        .success();
    fs::remove_file(tmp.path().join("index.toml")).unwrap();

    kiln_cmd(tmp.path())
        .current_dir(tmp.path())
        .arg("lock")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read index"));
}

#[test]
fn tree_prints_dependencies() {
    let tmp = project();

    kiln_cmd(tmp.path())
        .current_dir(tmp.path())
        .arg("tree")
        .assert()
        .success()
        .stdout(predicate::str::contains("hello@0.1.0"))
        .stdout(predicate::str::contains("└── spdlog@1.12.0"))
        .stdout(predicate::str::contains("    └── fmt@10.1.0"));
}

#[test]
fn tree_depth_limit() {
    let tmp = project();

    kiln_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["tree", "--depth", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("spdlog@1.12.0"))
        .stdout(predicate::str::contains("fmt@10.1.0").not());
}

#[test]
fn tree_why() {
    let tmp = project();

    kiln_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["tree", "--why", "fmt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Path to fmt:"))
        .stdout(predicate::str::contains("  spdlog@1.12.0"));
}

#[test]
fn tree_inverted() {
    let tmp = project();

    kiln_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["tree", "--inverted", "fmt"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("fmt@10.1.0"));
}

#[test]
fn version_flag() {
    let tmp = TempDir::new().unwrap();
    kiln_cmd(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("kiln"));
}
