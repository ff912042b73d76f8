use catalyst_wp::error::Error;
use catalyst_wp::guard::{
    clear_dir, create_dir_if_absent, ensure_empty_dir, is_empty_dir, remove_path,
    write_if_absent, WriteOutcome,
};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_if_absent() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("provision/vvv-init.sh");

    assert_eq!(write_if_absent("init", &path, "first").unwrap(), WriteOutcome::Written);
    assert_eq!(write_if_absent("init", &path, "second").unwrap(), WriteOutcome::Skipped);
    assert_eq!(fs::read_to_string(&path).unwrap(), "first");
}

#[test]
fn test_create_dir_if_absent() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("htdocs");

    assert!(create_dir_if_absent("htdocs", &dir).unwrap());
    assert!(!create_dir_if_absent("htdocs", &dir).unwrap());
    assert!(dir.is_dir());
}

#[test]
fn test_empty_dir_checks() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing");

    assert!(is_empty_dir(&missing).unwrap());
    assert!(is_empty_dir(temp_dir.path()).unwrap());
    assert!(ensure_empty_dir(temp_dir.path()).is_ok());

    fs::write(temp_dir.path().join("index.php"), "").unwrap();
    assert!(!is_empty_dir(temp_dir.path()).unwrap());
    assert!(!is_empty_dir(temp_dir.path().join("index.php")).unwrap());
    assert!(matches!(
        ensure_empty_dir(temp_dir.path()),
        Err(Error::DirectoryNotEmpty { .. })
    ));
}

#[test]
fn test_clear_and_remove() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("htdocs");
    fs::create_dir_all(root.join(".git/objects")).unwrap();
    fs::write(root.join("index.php"), "").unwrap();

    clear_dir(&root).unwrap();
    assert!(root.is_dir());
    assert!(is_empty_dir(&root).unwrap());

    remove_path(&root).unwrap();
    assert!(!root.exists());
    assert!(remove_path(&root).is_ok());
}
