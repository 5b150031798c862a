use std::fs;
use std::path::Path;

use abi_lens::{canonicalize_or_current, infer_project_name, log_filter};
use tempfile::tempdir;

#[test]
fn canonicalize_or_current_returns_cwd_for_dot() {
    let original = std::env::current_dir().expect("cwd");
    let tmp = tempdir().expect("tempdir");
    std::env::set_current_dir(tmp.path()).expect("chdir tmp");

    let result = canonicalize_or_current(".").expect("canonicalize").canonicalize().expect("canon");
    let expected = tmp.path().canonicalize().expect("canon tmp");
    assert_eq!(result, expected);

    std::env::set_current_dir(original).expect("restore cwd");
}

#[test]
fn canonicalize_or_current_joins_missing_paths_onto_cwd() {
    let tmp = tempdir().expect("tempdir");
    let existing = tmp.path().join("nested");
    fs::create_dir_all(&existing).expect("create nested");

    let result = canonicalize_or_current(existing.to_str().expect("utf8")).expect("existing");
    assert_eq!(result, existing.canonicalize().expect("canonicalize nested"));

    let missing = canonicalize_or_current("does-not-exist-yet").expect("missing");
    assert!(missing.is_absolute());
    assert!(missing.ends_with("does-not-exist-yet"));
}

#[test]
fn infer_project_name_uses_last_path_component() {
    assert_eq!(infer_project_name(Path::new("/tmp/project-root")), "project-root");
    assert_eq!(infer_project_name(Path::new("/")), "unnamed-project");
}

#[test]
fn verbose_forces_debug_filter() {
    assert_eq!(log_filter(true).to_string(), "debug");
}
