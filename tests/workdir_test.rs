use email_decompose::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_prepare_creates_missing_directory() {
    let base = TempDir::new().unwrap();
    let dir = base.path().join("a").join("b");
    let mut warnings = Vec::new();

    prepare_workdir(&dir, true, &mut warnings).unwrap();

    assert!(dir.is_dir());
    assert!(warnings.is_empty());
}

#[test]
fn test_prepare_clears_top_level_files() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("old.pdf"), b"old").unwrap();
    fs::write(dir.path().join("notes.txt"), b"old").unwrap();
    let mut warnings = Vec::new();

    prepare_workdir(dir.path(), true, &mut warnings).unwrap();

    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    assert!(warnings.is_empty());
}

#[test]
fn test_prepare_keeps_hidden_entries() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".keep"), b"").unwrap();
    let mut warnings = Vec::new();

    prepare_workdir(dir.path(), true, &mut warnings).unwrap();

    assert!(dir.path().join(".keep").exists());
}

#[test]
fn test_prepare_reports_undeletable_subdirectory() {
    let dir = TempDir::new().unwrap();
    let subdir = dir.path().join("docs");
    fs::create_dir(&subdir).unwrap();
    fs::write(dir.path().join("old.pdf"), b"old").unwrap();
    let mut warnings = Vec::new();

    prepare_workdir(dir.path(), true, &mut warnings).unwrap();

    // Cleanup is not recursive, the rest still goes
    assert!(subdir.exists());
    assert!(!dir.path().join("old.pdf").exists());
    assert_eq!(warnings.len(), 1);
    assert!(matches!(&warnings[0], Warning::Cleanup { path, .. } if *path == subdir));
}

#[test]
fn test_prepare_without_clearing() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("old.pdf"), b"old").unwrap();
    let mut warnings = Vec::new();

    prepare_workdir(dir.path(), false, &mut warnings).unwrap();

    assert!(dir.path().join("old.pdf").exists());
}

#[test]
fn test_leftovers_survive_when_clearing_is_disabled() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("old.pdf"), b"old").unwrap();
    let decomposer = Decomposer::new(DecomposeOptions::default().with_clear_existing(false));

    let result = decomposer
        .decompose(b"Subject: x\r\n\r\nbody", "msg-1", dir.path())
        .unwrap();

    assert_eq!(result.metadata.files, vec![dir.path().join("old.pdf")]);
}

#[test]
fn test_catalog_filters_extensions() {
    let dir = TempDir::new().unwrap();
    for name in [
        "a.png", "b.jpg", "c.tiff", "d.jpeg", "e.pdf", "f.txt", "g.zip", "h.gif", "noext",
        "i.PDF",
    ] {
        fs::write(dir.path().join(name), b"x").unwrap();
    }

    let options = DecomposeOptions::default().with_case_insensitive_extensions(false);
    let mut files = catalog_files(dir.path(), &options).unwrap();
    files.sort();

    let expected: Vec<_> = ["a.png", "b.jpg", "c.tiff", "d.jpeg", "e.pdf"]
        .iter()
        .map(|n| dir.path().join(n))
        .collect();
    assert_eq!(files, expected);
}

#[test]
fn test_catalog_skips_directories_and_hidden_files() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("folder.pdf")).unwrap();
    fs::write(dir.path().join(".hidden.pdf"), b"x").unwrap();
    fs::write(dir.path().join("real.pdf"), b"x").unwrap();

    let files = catalog_files(dir.path(), &DecomposeOptions::default()).unwrap();

    assert_eq!(files, vec![dir.path().join("real.pdf")]);
}

#[test]
fn test_catalog_missing_directory_is_an_error() {
    let base = TempDir::new().unwrap();

    let missing = base.path().join("missing");
    let err = catalog_files(&missing, &DecomposeOptions::default()).unwrap_err();

    assert!(matches!(err, DecomposeError::Io { .. }));
}

#[test]
fn test_unique_subdir_is_fresh() {
    let base = TempDir::new().unwrap();

    let a = unique_subdir(base.path());
    let b = unique_subdir(base.path());

    assert_ne!(a, b);
    assert_eq!(a.parent(), Some(base.path()));
    assert!(!a.exists());
}
