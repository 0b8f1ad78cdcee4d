/*!
 * Output directory management
 *
 * Every artifact of a run lands in one directory, named after the source
 * folder. Stale artifacts for the same folder are removed before a run so a
 * shrinking input set never leaves orphaned parts behind.
 */

use std::fs;
use std::path::{Path, PathBuf};

use glob_match::glob_match;
use tracing::{debug, info};

use crate::bucket::PartSink;
use crate::error::Result;
use crate::manifest::write_manifest;
use crate::types::{FlushedPart, PartRecord};

/// Name of the output directory under the project root
pub const OUTPUT_DIR_NAME: &str = "combined-code";

/// The output directory for one source folder
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
    folder: String,
    extension: String,
}

impl OutputDir {
    pub fn new(root: PathBuf, folder: &str, extension: &str) -> Self {
        Self {
            root,
            folder: folder.to_string(),
            extension: extension.to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<folder>-types.json`
    pub fn types_path(&self) -> PathBuf {
        self.root.join(format!("{}-types.json", self.folder))
    }

    /// `<folder>-upload.zip`
    pub fn archive_path(&self) -> PathBuf {
        self.root.join(format!("{}-upload.zip", self.folder))
    }

    /// Whether a file name belongs to a previous run for this folder
    ///
    /// The folder prefix is compared literally; only the remainder is
    /// globbed, so folder names with glob syntax still match.
    pub fn is_stale_artifact(&self, file_name: &str) -> bool {
        let Some(rest) = file_name.strip_prefix(&format!("{}-", self.folder)) else {
            return false;
        };
        glob_match(&format!("*.{}", self.extension), rest) || glob_match("*.json", rest)
    }

    /// Create the directory if needed and delete stale parts and manifests.
    ///
    /// Returns the number of files removed.
    pub fn prepare(&self) -> Result<usize> {
        fs::create_dir_all(&self.root)?;

        let mut removed = 0;
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if self.is_stale_artifact(&name) {
                fs::remove_file(entry.path())?;
                debug!(file = %name, "Removed stale artifact");
                removed += 1;
            }
        }

        Ok(removed)
    }
}

/// Writes flushed parts and their manifests into an output directory
#[derive(Debug)]
pub struct DirSink {
    root: PathBuf,
    artifacts: Vec<PathBuf>,
    parts: Vec<PartRecord>,
}

impl DirSink {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            artifacts: Vec::new(),
            parts: Vec::new(),
        }
    }

    /// Every file written so far, in creation order
    pub fn artifacts(&self) -> &[PathBuf] {
        &self.artifacts
    }

    pub fn parts(&self) -> &[PartRecord] {
        &self.parts
    }

    /// Register an artifact produced outside the sink, e.g. the type index
    pub fn record_artifact(&mut self, path: PathBuf) {
        self.artifacts.push(path);
    }

    pub fn into_parts(self) -> (Vec<PathBuf>, Vec<PartRecord>) {
        (self.artifacts, self.parts)
    }
}

impl PartSink for DirSink {
    fn flush(&mut self, part: FlushedPart) -> Result<()> {
        let path = self.root.join(&part.file_name);
        fs::write(&path, &part.contents)?;
        info!(path = %path.display(), lines = part.lines, files = part.includes.len(), "Wrote part");
        self.artifacts.push(path.clone());

        if let Some(manifest) = write_manifest(&path, &part.includes)? {
            self.artifacts.push(manifest);
        }
        self.parts.push(PartRecord::from(&part));

        Ok(())
    }
}
