//! Expansion of zip attachments inside the working directory

use crate::error::{DecomposeError, Result};
use crate::options::{ArchiveExpansion, DecomposeOptions, is_archive};
use crate::types::Warning;
use crate::workdir::visible_entries;
use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Expand every zip sitting directly in `dir` into `dir` itself.
///
/// The set of archives is snapshotted before extraction starts. With
/// [`ArchiveExpansion::SinglePass`] archives unpacked from them are left
/// alone; with [`ArchiveExpansion::Recursive`] they are queued and expanded
/// in turn, up to `max_archive_depth` levels.
///
/// Returns the number of archives expanded.
pub fn expand_archives(
    dir: &Path,
    options: &DecomposeOptions,
    warnings: &mut Vec<Warning>,
) -> Result<usize> {
    let mut queue: VecDeque<(PathBuf, usize)> = visible_entries(dir)
        .map_err(|e| DecomposeError::io(dir, e))?
        .into_iter()
        .filter(|p| p.is_file() && is_archive(p))
        .map(|p| (p, 0))
        .collect();

    let mut expanded = 0;
    while let Some((archive, depth)) = queue.pop_front() {
        if depth > options.max_archive_depth {
            warn!(
                "Archive {} exceeds nesting depth {}",
                archive.display(),
                options.max_archive_depth
            );
            warnings.push(Warning::ArchiveDepthExceeded { archive, depth });
            continue;
        }

        let extracted = extract_zip(&archive, dir, warnings)?;
        expanded += 1;

        if options.archive_expansion == ArchiveExpansion::Recursive {
            queue.extend(
                extracted
                    .into_iter()
                    .filter(|p| is_archive(p))
                    .map(|p| (p, depth + 1)),
            );
        }
    }

    Ok(expanded)
}

/// Extract all entries of `archive` under `dest`, keeping their relative paths.
///
/// Existing files are overwritten. Entries whose names would land outside
/// `dest` are skipped and reported. Returns the paths of the extracted files.
pub fn extract_zip(
    archive: &Path,
    dest: &Path,
    warnings: &mut Vec<Warning>,
) -> Result<Vec<PathBuf>> {
    let file = fs::File::open(archive).map_err(|e| DecomposeError::io(archive, e))?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| corrupt(archive, &e))?;

    let mut extracted = Vec::new();
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(|e| corrupt(archive, &e))?;

        let Some(relative) = entry.enclosed_name() else {
            warn!(
                "Skipping unsafe entry {:?} in {}",
                entry.name(),
                archive.display()
            );
            warnings.push(Warning::ArchiveEntrySkipped {
                archive: archive.to_path_buf(),
                entry: entry.name().to_string(),
            });
            continue;
        };
        let output_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&output_path).map_err(|e| DecomposeError::io(&output_path, e))?;
            continue;
        }

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| DecomposeError::io(parent, e))?;
        }
        let mut outfile =
            fs::File::create(&output_path).map_err(|e| DecomposeError::io(&output_path, e))?;
        io::copy(&mut entry, &mut outfile).map_err(|e| DecomposeError::io(&output_path, e))?;
        extracted.push(output_path);
    }

    debug!(
        "Expanded {} file(s) from {}",
        extracted.len(),
        archive.display()
    );
    Ok(extracted)
}

fn corrupt(archive: &Path, err: &zip::result::ZipError) -> DecomposeError {
    DecomposeError::Archive {
        archive: archive.to_path_buf(),
        details: err.to_string(),
    }
}
