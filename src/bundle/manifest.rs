// src/bundle/manifest.rs
//! Loading bundle descriptions from disk
//!
//! A packaged bundle carries a `bundle.toml` at its root describing the
//! service: identity, image knobs, environment, and the files the packager
//! placed alongside it. Loading and scanning happen before rendering; the
//! renderer itself never touches the filesystem.

use crate::bundle::{BundleSpec, MANIFEST_FILE};
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Parse a bundle description from TOML text
pub fn parse(content: &str) -> Result<BundleSpec> {
    toml::from_str(content)
        .map_err(|e| Error::ParseError(format!("Invalid bundle manifest: {}", e)))
}

/// Load `bundle.toml` from a bundle directory
pub fn load(bundle_dir: &Path) -> Result<BundleSpec> {
    let manifest_path = bundle_dir.join(MANIFEST_FILE);
    let content = fs::read_to_string(&manifest_path).map_err(|e| {
        Error::IoError(format!("Failed to read {}: {}", manifest_path.display(), e))
    })?;
    parse(&content)
}

/// Load a bundle description and record the files actually present.
///
/// The packager normally lists payload files in the manifest; when it has
/// not, the file set is filled in from a directory walk so the install
/// planner still sees what is there.
pub fn load_dir(bundle_dir: &Path) -> Result<BundleSpec> {
    let mut spec = load(bundle_dir)?;
    if spec.files.is_empty() {
        spec.files = scan(bundle_dir)?;
    }
    Ok(spec)
}

/// Collect bundle-relative paths of every regular file under a directory.
///
/// The manifest itself is not payload and is excluded.
pub fn scan(bundle_dir: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(bundle_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::IoError(format!("Failed to scan bundle: {}", e)))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(bundle_dir)
            .map_err(|e| Error::IoError(format!("Failed to scan bundle: {}", e)))?;
        let relative = relative.to_string_lossy().to_string();
        if relative == MANIFEST_FILE {
            continue;
        }
        files.push(relative);
    }
    debug!(
        "Scanned {} bundle files under {}",
        files.len(),
        bundle_dir.display()
    );
    Ok(files)
}
