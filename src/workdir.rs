//! Working directory lifecycle: preparation and cataloging

use crate::error::{DecomposeError, Result};
use crate::options::DecomposeOptions;
use crate::types::Warning;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Create the working directory, then optionally clear its top-level files.
///
/// Clearing is best effort and non-recursive: every entry that cannot be
/// removed (subdirectories included) is recorded as a [`Warning::Cleanup`]
/// and the call carries on.
pub fn prepare_workdir(
    dir: &Path,
    clear_existing: bool,
    warnings: &mut Vec<Warning>,
) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| DecomposeError::io(dir, e))?;

    if !clear_existing {
        return Ok(());
    }

    let entries = match visible_entries(dir) {
        Ok(entries) => entries,
        Err(e) => {
            record_cleanup_failure(dir, &e, warnings);
            return Ok(());
        }
    };

    for path in entries {
        if let Err(e) = fs::remove_file(&path) {
            record_cleanup_failure(&path, &e, warnings);
        }
    }

    Ok(())
}

/// List the allow-listed regular files directly inside `dir`, in listing order
pub fn catalog_files(dir: &Path, options: &DecomposeOptions) -> Result<Vec<PathBuf>> {
    let files: Vec<PathBuf> = visible_entries(dir)
        .map_err(|e| DecomposeError::io(dir, e))?
        .into_iter()
        .filter(|p| p.is_file() && options.is_allowed(p))
        .collect();

    debug!("Cataloged {} file(s) in {}", files.len(), dir.display());
    Ok(files)
}

/// Fresh per-call directory under `base`
#[must_use]
pub fn unique_subdir(base: &Path) -> PathBuf {
    base.join(uuid::Uuid::new_v4().simple().to_string())
}

/// Direct children of `dir`, skipping dot-entries the way a `*` glob does
pub fn visible_entries(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        paths.push(entry.path());
    }
    Ok(paths)
}

fn record_cleanup_failure(path: &Path, err: &std::io::Error, warnings: &mut Vec<Warning>) {
    warn!("Could not remove {}: {err}", path.display());
    warnings.push(Warning::Cleanup {
        path: path.to_path_buf(),
        message: err.to_string(),
    });
}
