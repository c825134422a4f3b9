// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Inbound Email Decomposer
//!
//! Turns a raw RFC 2822 / MIME message into structured metadata and a
//! directory of attachment files ready to be forwarded.
//!
//! # Pipeline
//!
//! 1. Read `From`, `To`, `Date` and `Subject` verbatim
//! 2. Create (and by default clear) the working directory
//! 3. Walk the MIME tree: inline `text/plain` becomes the body, named parts
//!    are written to disk
//! 4. Unpack `.zip` attachments into the same directory
//! 5. Report the files with a `png`, `jpg`, `tiff`, `jpeg` or `pdf` extension
//!
//! The working directory is left populated; removing it is up to the caller.
//! Calls sharing a directory must not run concurrently unless
//! [`DecomposeOptions::isolate`] is set.
//!
//! # Example
//!
//! ```rust
//! use email_decompose::parse_email;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let raw = b"From: sender@example.com\r\nSubject: Hello\r\n\r\nBody";
//! let metadata = parse_email(raw, "msg-1", dir.path()).unwrap();
//!
//! assert_eq!(metadata.subject.as_deref(), Some("Hello"));
//! assert_eq!(metadata.body.as_deref(), Some("b'Body'"));
//! assert!(metadata.files.is_empty());
//! ```

mod archive;
mod error;
mod options;
mod parser;
mod types;
mod workdir;

pub use archive::{expand_archives, extract_zip};
pub use error::{DecomposeError, Result};
pub use options::{
    ALLOWED_EXTENSIONS, ARCHIVE_EXTENSION, ArchiveExpansion, DEFAULT_OUTPUT_DIR, DecomposeOptions,
};
pub use parser::{Decomposer, parse_email, parse_email_default, render_byte_literal};
pub use types::*;
pub use workdir::{catalog_files, prepare_workdir, unique_subdir};
