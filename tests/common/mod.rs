#![allow(dead_code)]

use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::io::{Cursor, Write};

pub const BOUNDARY: &str = "XYZ-boundary";

/// Build a multipart/mixed message from already-rendered parts
pub fn multipart(parts: &[String]) -> Vec<u8> {
    let mut raw = String::from(
        "From: Alice <alice@example.com>\r\n\
         To: docs@example.com\r\n\
         Date: Thu, 01 Jan 2025 12:00:00 +0000\r\n\
         Subject: Invoice attached\r\n\
         MIME-Version: 1.0\r\n",
    );
    raw.push_str(&format!(
        "Content-Type: multipart/mixed; boundary=\"{BOUNDARY}\"\r\n\r\n"
    ));
    raw.push_str(&multipart_body(BOUNDARY, parts));
    raw.into_bytes()
}

pub fn multipart_body(boundary: &str, parts: &[String]) -> String {
    let mut body = String::new();
    for part in parts {
        body.push_str(&format!("--{boundary}\r\n{part}\r\n"));
    }
    body.push_str(&format!("--{boundary}--\r\n"));
    body
}

pub fn text_part(text: &str) -> String {
    format!("Content-Type: text/plain; charset=utf-8\r\n\r\n{text}")
}

pub fn attachment(filename: &str, content: &[u8]) -> String {
    format!(
        "Content-Type: application/octet-stream\r\n\
         Content-Disposition: attachment; filename=\"{filename}\"\r\n\
         Content-Transfer-Encoding: base64\r\n\r\n{}",
        STANDARD.encode(content)
    )
}

/// Build an in-memory zip with stored entries
pub fn zip_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    for (name, content) in files {
        writer.start_file(name.to_string(), options).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub fn base64(content: &[u8]) -> String {
    STANDARD.encode(content)
}
