//! Decomposition settings

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Working directory used when the caller does not pick one
pub const DEFAULT_OUTPUT_DIR: &str = "tmp";

/// Document extensions reported in [`crate::EmailMetadata::files`]
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "tiff", "jpeg", "pdf"];

/// Extension of attachments that get unpacked
pub const ARCHIVE_EXTENSION: &str = "zip";

const DEFAULT_MAX_ARCHIVE_DEPTH: usize = 8;

/// How attached archives are expanded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveExpansion {
    /// Expand only the archives present after attachments are written.
    /// Archives found inside them stay packed.
    #[default]
    SinglePass,

    /// Keep expanding newly extracted archives until none are left
    Recursive,
}

/// Settings for [`crate::Decomposer`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecomposeOptions {
    /// Delete the top-level entries of an existing working directory first
    pub clear_existing: bool,

    pub archive_expansion: ArchiveExpansion,

    /// Only used by [`ArchiveExpansion::Recursive`]
    pub max_archive_depth: usize,

    /// Match allow-listed extensions ignoring ASCII case
    pub case_insensitive_extensions: bool,

    /// Work in a fresh unique subdirectory of the output directory
    pub isolate: bool,
}

impl Default for DecomposeOptions {
    fn default() -> Self {
        Self {
            clear_existing: true,
            archive_expansion: ArchiveExpansion::default(),
            max_archive_depth: DEFAULT_MAX_ARCHIVE_DEPTH,
            case_insensitive_extensions: cfg!(feature = "case-insensitive-extensions"),
            isolate: false,
        }
    }
}

impl DecomposeOptions {
    #[must_use]
    pub const fn with_clear_existing(mut self, clear: bool) -> Self {
        self.clear_existing = clear;
        self
    }

    #[must_use]
    pub const fn with_archive_expansion(mut self, expansion: ArchiveExpansion) -> Self {
        self.archive_expansion = expansion;
        self
    }

    #[must_use]
    pub const fn with_max_archive_depth(mut self, depth: usize) -> Self {
        self.max_archive_depth = depth;
        self
    }

    #[must_use]
    pub const fn with_case_insensitive_extensions(mut self, enabled: bool) -> Self {
        self.case_insensitive_extensions = enabled;
        self
    }

    #[must_use]
    pub const fn with_isolation(mut self, isolate: bool) -> Self {
        self.isolate = isolate;
        self
    }

    /// Check whether a path carries one of [`ALLOWED_EXTENSIONS`]
    #[must_use]
    pub fn is_allowed(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };

        ALLOWED_EXTENSIONS.iter().any(|allowed| {
            if self.case_insensitive_extensions {
                allowed.eq_ignore_ascii_case(ext)
            } else {
                *allowed == ext
            }
        })
    }
}

/// Check whether a path looks like an archive to expand
#[must_use]
pub fn is_archive(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == ARCHIVE_EXTENSION)
}
