/*!
 * Lightweight type-name index
 *
 * Comments are removed with a regex before matching declarations. This is
 * not a lexer: comment markers inside string literals are stripped too, and
 * a declaration keyword inside a string may be picked up.
 */

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::utils::utc_timestamp;

static COMMENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?ms)//.*?$|/\*.*?\*/").unwrap());

static DECLARATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:class|struct|interface|enum)\s+(?P<name>[A-Za-z_][A-Za-z0-9_]*)").unwrap()
});

/// On-disk shape of `<folder>-types.json`
#[derive(Debug, Serialize, Deserialize)]
pub struct TypeIndexFile {
    pub generated: String,
    pub types: BTreeMap<String, String>,
}

/// Maps type names to the first file that declared them
#[derive(Debug, Default)]
pub struct TypeIndex {
    types: BTreeMap<String, String>,
}

impl TypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every uppercase-initial declaration in `content`
    pub fn record(&mut self, path: &str, content: &str) {
        for name in declared_types(content) {
            self.types
                .entry(name.to_string())
                .or_insert_with(|| path.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.types.get(name).map(String::as_str)
    }

    /// Write the index to `path`; nothing is written for an empty index.
    pub fn write(&self, path: &Path) -> Result<Option<PathBuf>> {
        if self.is_empty() {
            return Ok(None);
        }

        let file = TypeIndexFile {
            generated: utc_timestamp(),
            types: self.types.clone(),
        };
        fs::write(path, serde_json::to_string_pretty(&file)?)?;
        info!(path = %path.display(), types = self.types.len(), "Wrote type index");

        Ok(Some(path.to_path_buf()))
    }
}

/// Remove `//` line comments and `/* */` block comments
pub fn strip_comments(content: &str) -> String {
    COMMENT_REGEX.replace_all(content, "").into_owned()
}

/// Type names declared in `content`, in source order
pub fn declared_types(content: &str) -> Vec<String> {
    let code = strip_comments(content);
    DECLARATION_REGEX
        .captures_iter(&code)
        .map(|caps| caps["name"].to_string())
        .filter(|name| name.starts_with(|c: char| c.is_uppercase()))
        .collect()
}
