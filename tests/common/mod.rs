// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Create a bundle directory with the given manifest and payload files.
///
/// Returns the TempDir - keep it alive to prevent cleanup.
pub fn setup_bundle(manifest: &str, files: &[&str]) -> TempDir {
    let temp_dir = tempfile::tempdir().unwrap();
    write_bundle(temp_dir.path(), manifest, files);
    temp_dir
}

/// Write a manifest and payload files into an existing directory
pub fn write_bundle(dir: &Path, manifest: &str, files: &[&str]) {
    fs::write(dir.join("bundle.toml"), manifest).expect("Failed to write bundle.toml");
    for relative in files {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create bundle subdirectory");
        }
        fs::write(&path, b"placeholder").expect("Failed to write bundle file");
    }
}
