//! Core types for decomposed emails

use crate::error::{DecomposeError, Result};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Metadata extracted from one inbound message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMetadata {
    /// Sender header, raw
    pub from: Option<String>,

    /// Recipient header, raw
    pub to: Option<String>,

    /// Date header, raw and unparsed
    pub date: Option<String>,

    /// Subject header, raw
    pub subject: Option<String>,

    /// Plain-text body.
    ///
    /// For multipart messages this is the UTF-8 text of the last inline
    /// `text/plain` part. For single-part messages it is the byte-literal
    /// rendering of the decoded payload (`b'...'`).
    pub body: Option<String>,

    /// Allow-listed files left in the working directory
    pub files: Vec<PathBuf>,

    /// Caller-supplied identifier, echoed back
    pub email_name: String,
}

impl EmailMetadata {
    /// Interpret the raw `Date` header as an RFC 2822 timestamp
    #[must_use]
    pub fn parsed_date(&self) -> Option<DateTime<FixedOffset>> {
        self.date
            .as_deref()
            .and_then(|d| DateTime::parse_from_rfc2822(d.trim()).ok())
    }

    #[must_use]
    pub const fn has_files(&self) -> bool {
        !self.files.is_empty()
    }

    /// Render the record the way it is forwarded downstream
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| DecomposeError::Serialize(e.to_string()))
    }
}

/// Non-fatal condition observed during a decomposition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Warning {
    /// A pre-existing entry could not be removed
    Cleanup { path: PathBuf, message: String },

    /// Attachment filename had no usable final component
    UnsafeFilename { filename: String },

    /// Zip entry would have escaped the working directory
    ArchiveEntrySkipped { archive: PathBuf, entry: String },

    /// Nested archive beyond the configured depth
    ArchiveDepthExceeded { archive: PathBuf, depth: usize },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cleanup { path, message } => {
                write!(f, "could not remove {}: {message}", path.display())
            }
            Self::UnsafeFilename { filename } => {
                write!(f, "skipped attachment with unusable filename {filename:?}")
            }
            Self::ArchiveEntrySkipped { archive, entry } => {
                write!(f, "skipped unsafe entry {entry:?} in {}", archive.display())
            }
            Self::ArchiveDepthExceeded { archive, depth } => {
                write!(f, "not expanding {} at depth {depth}", archive.display())
            }
        }
    }
}

/// Full result of a decomposition call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition {
    pub metadata: EmailMetadata,

    /// Directory the attachments were written to
    pub output_dir: PathBuf,

    /// Everything that went wrong without aborting the call
    pub warnings: Vec<Warning>,
}

impl Decomposition {
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
