use std::fs;
use std::path::Path;

use apimap_core::error::LoadError;
use apimap_core::model::{Resource, Service};
use apimap_core::registry::Registry;

const USERS: &str = include_str!("fixtures/users.yaml");
const COMPUTE: &str = include_str!("fixtures/compute.json");

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// `example/users` (two versions, one empty), `google/compute`, and a
/// service without a `latest` version.
fn layout(root: &Path) {
    write(&root.join("example/users/meta.yaml"), "latest: v1\ncategories: [social]\n");
    write(&root.join("example/users/v1/openapi.yaml"), USERS);
    fs::create_dir_all(root.join("example/users/v2")).unwrap();

    write(&root.join("google/compute/meta.yaml"), "latest: v1\n");
    write(&root.join("google/compute/v1/googleapi.json"), COMPUTE);

    write(&root.join("unversioned/meta.yaml"), "orientation: absolute\n");
    write(&root.join("unversioned/v1/openapi.json"), r#"{"openapi": "3.0.0", "paths": {}}"#);
}

#[test]
fn available_services_are_sorted_and_dashed() {
    let dir = tempfile::tempdir().unwrap();
    layout(dir.path());
    let registry = Registry::new(dir.path());
    assert_eq!(
        registry.available_services().unwrap(),
        vec!["example-users", "google-compute", "unversioned"]
    );
}

#[test]
fn version_defaults_to_latest() {
    let dir = tempfile::tempdir().unwrap();
    layout(dir.path());
    let registry = Registry::new(dir.path());

    let service = registry.load_service("example-users", None).unwrap();
    assert_eq!(service.name(), "example-users");
    assert_eq!(service.title(), "Example Users API");
    assert!(service.categories().contains(&"social".to_string()));
    assert!(service.resource("user").is_ok());
}

#[test]
fn descriptor_format_picks_adapter() {
    let dir = tempfile::tempdir().unwrap();
    layout(dir.path());
    let registry = Registry::new(dir.path());

    let service = registry.load_service("google-compute", Some("v1")).unwrap();
    assert_eq!(service.provider(), "google.com");
    let disk = service.resource("instanceDisk").unwrap();
    assert_eq!(disk.parent().unwrap().name(), "instance");
}

#[test]
fn empty_version_directory_has_no_descriptor() {
    let dir = tempfile::tempdir().unwrap();
    layout(dir.path());
    let registry = Registry::new(dir.path());

    match registry.load_service("example-users", Some("v2")) {
        Err(LoadError::NoDescriptor { name, version }) => {
            assert_eq!(name, "example-users");
            assert_eq!(version, "v2");
        }
        Err(other) => panic!("expected NoDescriptor, got {other}"),
        Ok(_) => panic!("expected NoDescriptor, got a service"),
    }
}

#[test]
fn missing_latest_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    layout(dir.path());
    let registry = Registry::new(dir.path());

    assert!(matches!(
        registry.load_service("unversioned", None),
        Err(LoadError::NoVersion(name)) if name == "unversioned"
    ));
    let service = registry.load_service("unversioned", Some("v1")).unwrap();
    assert!(service.resources().is_empty());
}

#[test]
fn invalid_meta_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("broken/meta.yaml"), "latest: [unclosed\n");
    let registry = Registry::new(dir.path());
    assert!(matches!(
        registry.load_service("broken", None),
        Err(LoadError::Meta { .. })
    ));
}
