/*!
 * Core types and data structures for csbundle
 */

use std::fmt;

use crate::classifier::classify;
use crate::utils::{count_lines, fingerprint};

/// Bucket a source file is combined into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Regular runtime code
    Main,
    /// Code under a `test`/`tests` directory
    Test,
    /// Code under an `editor` directory
    Editor,
}

impl Category {
    /// Every category, in flush order
    pub const ALL: [Category; 3] = [Category::Main, Category::Test, Category::Editor];

    /// Lowercase name used in output file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Main => "main",
            Category::Test => "test",
            Category::Editor => "editor",
        }
    }

    /// Position in `ALL`, used to index per-category state
    pub(crate) fn index(&self) -> usize {
        match self {
            Category::Main => 0,
            Category::Test => 1,
            Category::Editor => 2,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discovered input file with its derived attributes
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path relative to the scan root, forward slashes, original casing
    pub path: String,
    /// Raw text content
    pub content: String,
    /// Number of lines (`\n` count + 1)
    pub lines: usize,
    /// Short MD5 fingerprint of the content
    pub fingerprint: String,
    /// Bucket this file belongs to
    pub category: Category,
}

impl SourceFile {
    /// Build a source file, deriving line count, fingerprint and category.
    ///
    /// `classify_path` is the path the classifier sees; it may carry more
    /// context (the scan root's place in the project) than the stored relative path.
    pub fn new(path: String, content: String, classify_path: &str) -> Self {
        Self {
            lines: count_lines(&content),
            fingerprint: fingerprint(&content),
            category: classify(classify_path),
            path,
            content,
        }
    }
}

/// A completed part handed from the bucket writer to a sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlushedPart {
    /// Category the part belongs to
    pub category: Category,
    /// 1-based part number within the category
    pub part: usize,
    /// Output file name, e.g. `Scripts-main-2.cs`
    pub file_name: String,
    /// Combined text of every block in the part
    pub contents: String,
    /// Accumulated line count of the member files
    pub lines: usize,
    /// Relative paths of the member files in processing order
    pub includes: Vec<String>,
}

/// What was written for one part, kept for the run summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartRecord {
    pub category: Category,
    pub part: usize,
    pub file_name: String,
    pub lines: usize,
    pub files: usize,
}

impl From<&FlushedPart> for PartRecord {
    fn from(part: &FlushedPart) -> Self {
        Self {
            category: part.category,
            part: part.part,
            file_name: part.file_name.clone(),
            lines: part.lines,
            files: part.includes.len(),
        }
    }
}
