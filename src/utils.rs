/*!
 * Utility functions for csbundle
 */

use std::borrow::Cow;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use md5::{Digest, Md5};

/// Count lines as the number of line feeds plus one.
///
/// A file ending in a newline therefore counts one extra, empty line.
pub fn count_lines(content: &str) -> usize {
    content.bytes().filter(|&b| b == b'\n').count() + 1
}

/// First 8 uppercase hex characters of the MD5 digest of the content
pub fn fingerprint(content: &str) -> String {
    let digest = Md5::digest(content.as_bytes());
    digest[..4].iter().map(|b| format!("{:02X}", b)).collect()
}

/// Decode file bytes as text, dropping a leading UTF-8 byte order mark.
///
/// Invalid sequences become U+FFFD; the flag reports whether that happened.
pub fn decode_text(bytes: &[u8]) -> (String, bool) {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(text) => (text.to_string(), false),
        Cow::Owned(text) => (text, true),
    }
}

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Current UTC time as an ISO-8601 timestamp
pub fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Name of the final path component, lossily converted
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
