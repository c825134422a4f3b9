//! MIME decomposition pipeline

use crate::archive::expand_archives;
use crate::error::{DecomposeError, Result};
use crate::options::{DEFAULT_OUTPUT_DIR, DecomposeOptions};
use crate::types::{Decomposition, EmailMetadata, Warning};
use crate::workdir::{catalog_files, prepare_workdir, unique_subdir};
use mailparse::ParsedMail;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Decompose a raw message into `output_dir` with default options.
///
/// Cleanup warnings are logged and dropped; use [`Decomposer`] to observe them.
pub fn parse_email(
    raw: &[u8],
    message_id: &str,
    output_dir: impl AsRef<Path>,
) -> Result<EmailMetadata> {
    Decomposer::default()
        .decompose(raw, message_id, output_dir)
        .map(|d| d.metadata)
}

/// Decompose a raw message into [`DEFAULT_OUTPUT_DIR`], relative to the
/// current directory, with default options.
pub fn parse_email_default(raw: &[u8], message_id: &str) -> Result<EmailMetadata> {
    parse_email(raw, message_id, DEFAULT_OUTPUT_DIR)
}

/// Splits inbound messages into metadata and attachment files
#[derive(Debug, Clone, Default)]
pub struct Decomposer {
    options: DecomposeOptions,
}

impl Decomposer {
    #[must_use]
    pub const fn new(options: DecomposeOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub const fn options(&self) -> &DecomposeOptions {
        &self.options
    }

    /// [`Decomposer::decompose`] into [`DEFAULT_OUTPUT_DIR`]
    pub fn decompose_default(&self, raw: &[u8], message_id: &str) -> Result<Decomposition> {
        self.decompose(raw, message_id, DEFAULT_OUTPUT_DIR)
    }

    /// Parse `raw`, materialize its attachments and catalog the results.
    ///
    /// The working directory is `output_dir`, or a fresh subdirectory of it
    /// when isolation is enabled. Files written before an error are left in
    /// place.
    pub fn decompose(
        &self,
        raw: &[u8],
        message_id: &str,
        output_dir: impl AsRef<Path>,
    ) -> Result<Decomposition> {
        let parsed =
            mailparse::parse_mail(raw).map_err(|e| DecomposeError::Structure(e.to_string()))?;

        let mut metadata = EmailMetadata {
            from: raw_header(&parsed.headers, "from"),
            to: raw_header(&parsed.headers, "to"),
            date: raw_header(&parsed.headers, "date"),
            subject: raw_header(&parsed.headers, "subject"),
            email_name: message_id.to_string(),
            ..EmailMetadata::default()
        };

        let dir = if self.options.isolate {
            unique_subdir(output_dir.as_ref())
        } else {
            output_dir.as_ref().to_path_buf()
        };

        let mut warnings = Vec::new();
        prepare_workdir(&dir, self.options.clear_existing, &mut warnings)?;

        if is_multipart(&parsed) || is_forwarded(&parsed) {
            walk_parts(&parsed, &dir, &mut metadata.body, &mut warnings)?;
        } else {
            let payload = parsed.get_body_raw().map_err(decode_error)?;
            metadata.body = Some(render_byte_literal(&payload));
        }

        let expanded = expand_archives(&dir, &self.options, &mut warnings)?;
        metadata.files = catalog_files(&dir, &self.options)?;

        debug!(
            "Decomposed {message_id}: {} file(s), {expanded} archive(s), {} warning(s)",
            metadata.files.len(),
            warnings.len()
        );

        Ok(Decomposition {
            metadata,
            output_dir: dir,
            warnings,
        })
    }
}

/// Render bytes as a quoted byte-string literal, e.g. `b'caf\xc3\xa9\n'`.
///
/// Printable ASCII is kept as is; everything else is escaped. Single quotes
/// delimit the literal unless the data contains `'` but no `"`.
#[must_use]
pub fn render_byte_literal(bytes: &[u8]) -> String {
    let quote = if bytes.contains(&b'\'') && !bytes.contains(&b'"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(bytes.len() + 3);
    out.push('b');
    out.push(quote);
    for &byte in bytes {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'\t' => out.push_str("\\t"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            _ if char::from(byte) == quote => {
                out.push('\\');
                out.push(quote);
            }
            0x20..=0x7e => out.push(char::from(byte)),
            _ => out.push_str(&format!("\\x{byte:02x}")),
        }
    }
    out.push(quote);
    out
}

fn raw_header(headers: &[mailparse::MailHeader], name: &str) -> Option<String> {
    headers
        .iter()
        .find(|h| h.get_key().eq_ignore_ascii_case(name))
        .map(|h| {
            String::from_utf8_lossy(h.get_value_raw())
                .trim_end_matches(['\r', '\n'])
                .to_string()
        })
}

/// A multipart container needs a boundary; without one it is an opaque leaf
fn is_multipart(part: &ParsedMail) -> bool {
    !part.subparts.is_empty()
        || (part
            .ctype
            .mimetype
            .to_ascii_lowercase()
            .starts_with("multipart/")
            && part.ctype.params.contains_key("boundary"))
}

fn is_forwarded(part: &ParsedMail) -> bool {
    part.subparts.is_empty() && part.ctype.mimetype.eq_ignore_ascii_case("message/rfc822")
}

fn decode_error(err: mailparse::MailParseError) -> DecomposeError {
    DecomposeError::Decode(err.to_string())
}

/// Visit `part` and its descendants in document order
fn walk_parts(
    part: &ParsedMail,
    dir: &Path,
    body: &mut Option<String>,
    warnings: &mut Vec<Warning>,
) -> Result<()> {
    if !is_multipart(part) {
        visit_leaf(part, dir, body, warnings)?;
    }

    for subpart in &part.subparts {
        walk_parts(subpart, dir, body, warnings)?;
    }

    // Forwarded messages are walked like any other subtree
    if is_forwarded(part) {
        let inner_raw = part.get_body_raw().map_err(decode_error)?;
        let inner = mailparse::parse_mail(&inner_raw)
            .map_err(|e| DecomposeError::Structure(e.to_string()))?;
        walk_parts(&inner, dir, body, warnings)?;
    }

    Ok(())
}

fn visit_leaf(
    part: &ParsedMail,
    dir: &Path,
    body: &mut Option<String>,
    warnings: &mut Vec<Warning>,
) -> Result<()> {
    let disposition = part
        .headers
        .iter()
        .find(|h| h.get_key().eq_ignore_ascii_case("content-disposition"))
        .map(mailparse::MailHeader::get_value)
        .unwrap_or_default();

    let inline_text =
        part.ctype.mimetype.eq_ignore_ascii_case("text/plain") && !disposition.contains("attachment");

    if inline_text {
        let bytes = part.get_body_raw().map_err(decode_error)?;
        let text = String::from_utf8(bytes)
            .map_err(|e| DecomposeError::Decode(format!("text/plain part is not UTF-8: {e}")))?;
        // Later parts overwrite earlier ones
        *body = Some(strip_delimiter_break(text));
    } else if let Some(filename) = attachment_filename(part) {
        save_attachment(part, &filename, dir, warnings)?;
    }

    Ok(())
}

/// Drop the line break that belongs to the following boundary delimiter
fn strip_delimiter_break(mut text: String) -> String {
    for suffix in ["\r\n", "\r", "\n"] {
        if text.ends_with(suffix) {
            text.truncate(text.len() - suffix.len());
            break;
        }
    }
    text
}

/// `filename` from Content-Disposition, falling back to the Content-Type `name`
fn attachment_filename(part: &ParsedMail) -> Option<String> {
    let disposition = part.get_content_disposition();
    disposition
        .params
        .get("filename")
        .or_else(|| part.ctype.params.get("name"))
        .filter(|name| !name.is_empty())
        .cloned()
}

fn save_attachment(
    part: &ParsedMail,
    filename: &str,
    dir: &Path,
    warnings: &mut Vec<Warning>,
) -> Result<()> {
    let Some(name) = final_component(filename) else {
        warn!("Skipping attachment with unusable filename {filename:?}");
        warnings.push(Warning::UnsafeFilename {
            filename: filename.to_string(),
        });
        return Ok(());
    };

    let path = dir.join(name);
    let bytes = part.get_body_raw().map_err(decode_error)?;
    fs::write(&path, &bytes).map_err(|e| DecomposeError::io(&path, e))?;

    debug!("Saved attachment {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

/// Last path segment of a sender-chosen filename, if it names a file
fn final_component(filename: &str) -> Option<&str> {
    let name = filename.rsplit(['/', '\\']).next()?;
    (!name.is_empty() && name != "." && name != "..").then_some(name)
}

