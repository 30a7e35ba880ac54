use kiln_core::lockfile::{LockedDependencyRef, LockedPackage, Lockfile};
use std::collections::BTreeMap;

fn dep(name: &str, version: &str) -> LockedDependencyRef {
    LockedDependencyRef {
        name: name.to_string(),
        version: version.to_string(),
    }
}

fn roots() -> BTreeMap<String, String> {
    BTreeMap::from([("fmt".to_string(), ">=10.0".to_string())])
}

fn sample() -> Lockfile {
    Lockfile::new(
        roots(),
        vec![
            LockedPackage {
                name: "spdlog".to_string(),
                version: "1.12.0".to_string(),
                dependencies: vec![],
            },
            LockedPackage {
                name: "fmt".to_string(),
                version: "10.1.0".to_string(),
                dependencies: vec![dep("spdlog", "1.12.0"), dep("base", "2.0")],
            },
        ],
    )
}

#[test]
fn new_sorts_packages_and_deps() {
    let lock = sample();
    assert_eq!(lock.package[0].name, "fmt");
    assert_eq!(lock.package[1].name, "spdlog");
    assert_eq!(
        lock.package[0].dependencies,
        vec![dep("base", "2.0"), dep("spdlog", "1.12.0")]
    );
}

#[test]
fn round_trip_serialize_deserialize() {
    let lock = sample();
    let serialized = lock.to_string_pretty().unwrap();
    assert!(serialized.contains("[metadata"), "{serialized}");
    assert!(serialized.contains("[[package]]"), "{serialized}");
    let parsed = Lockfile::from_str(&serialized).unwrap();
    assert_eq!(parsed, lock);
}

#[test]
fn empty_lockfile_parses() {
    let lock = Lockfile::from_str("").unwrap();
    assert!(lock.package.is_empty());
    assert!(lock.metadata.roots.is_empty());
}

#[test]
fn freshness_compares_roots() {
    let lock = sample();
    assert!(lock.is_fresh(&roots()));

    let mut changed = roots();
    changed.insert("fmt".to_string(), ">=11.0".to_string());
    assert!(!lock.is_fresh(&changed));
}

#[test]
fn write_and_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Kiln.lock");
    let lock = sample();
    lock.write_to(&path).unwrap();

    let loaded = Lockfile::from_path(&path).unwrap();
    assert_eq!(loaded, lock);
    assert_eq!(loaded.find("spdlog").map(|p| p.version.as_str()), Some("1.12.0"));
    assert!(loaded.find("missing").is_none());
}

#[test]
fn malformed_lockfile_is_error() {
    let err = Lockfile::from_str("[[package]]\nname = 3\n").unwrap_err();
    assert!(err.to_string().contains("Lockfile error"), "{err}");
}
