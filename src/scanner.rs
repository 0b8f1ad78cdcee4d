/*!
 * Discovery and loading of input files
 */

use std::fs;
use std::path::{Path, PathBuf};

use glob_match::glob_match;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Result;
use crate::types::SourceFile;
use crate::utils::{decode_text, file_name_of};

/// A discovered file before its content is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path relative to the scan root, forward slashes
    pub rel_path: String,
    /// Absolute path on disk
    pub abs_path: PathBuf,
}

/// Finds and loads the files of a combine run
pub struct Scanner {
    /// Scanner configuration
    config: Config,
    /// Canonical scan root
    root: PathBuf,
    /// Path of the scan root as the classifier sees it
    classify_prefix: String,
    /// Canonical output directory, excluded from discovery
    exclude: Option<PathBuf>,
}

impl Scanner {
    /// Create a scanner; the target directory must exist
    pub fn new(config: Config) -> Result<Self> {
        let root = fs::canonicalize(&config.target_dir)?;
        let exclude = fs::canonicalize(config.output_dir()).ok();

        // Classify relative to the project root when the scan root lives
        // under it, so enclosing `Editor`/`Tests` directories still count.
        let classify_prefix = match fs::canonicalize(&config.project_root) {
            Ok(project) if root.starts_with(&project) => relative_path(&project, &root),
            _ => folder_name_of(&root),
        };

        Ok(Self {
            config,
            root,
            classify_prefix,
            exclude,
        })
    }

    /// Directory name of the scan root
    pub fn folder_name(&self) -> String {
        folder_name_of(&self.root)
    }

    /// All matching files, sorted by relative path
    pub fn discover(&self) -> Result<Vec<FileEntry>> {
        let max_depth = if self.config.recurse { usize::MAX } else { 1 };
        let mut entries = Vec::new();

        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(max_depth)
            .into_iter()
            .filter_entry(|e| !self.is_excluded(e.path()));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() || !self.should_include(entry.path()) {
                continue;
            }

            let rel_path = relative_path(&self.root, entry.path());
            debug!(path = %rel_path, "Discovered file");
            entries.push(FileEntry {
                rel_path,
                abs_path: entry.path().to_path_buf(),
            });
        }

        entries.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
        Ok(entries)
    }

    /// Read a discovered file and derive its attributes
    pub fn load(&self, entry: &FileEntry) -> Result<SourceFile> {
        let bytes = fs::read(&entry.abs_path)?;
        let (content, lossy) = decode_text(&bytes);
        if lossy {
            warn!(path = %entry.rel_path, "File is not valid UTF-8, invalid bytes replaced");
        }

        Ok(SourceFile::new(
            entry.rel_path.clone(),
            content,
            &self.classify_path(&entry.rel_path),
        ))
    }

    /// Path handed to the classifier for a file relative to the scan root
    pub fn classify_path(&self, rel_path: &str) -> String {
        if self.classify_prefix.is_empty() {
            rel_path.to_string()
        } else {
            format!("{}/{}", self.classify_prefix, rel_path)
        }
    }

    /// Whether a file has the configured extension and no ignore pattern hits
    pub fn should_include(&self, path: &Path) -> bool {
        let file_name = file_name_of(path);
        let suffix = format!(".{}", self.config.extension);
        if !file_name.ends_with(&suffix) {
            return false;
        }

        !self
            .config
            .ignore_patterns
            .iter()
            .any(|pattern| glob_match(pattern, &file_name))
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.exclude.as_deref().map_or(false, |dir| path == dir)
    }
}

/// Final component of a directory; the filesystem root has none
fn folder_name_of(dir: &Path) -> String {
    match dir.file_name() {
        Some(name) => name.to_string_lossy().to_string(),
        None => "root".to_string(),
    }
}

/// `path` relative to `root` with forward slashes
fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
