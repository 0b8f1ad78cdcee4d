/*!
 * The combine run: scan, bucket, index, package
 */

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::info;

use crate::bucket::BucketWriter;
use crate::config::Config;
use crate::error::{CombineError, Result};
use crate::output::{DirSink, OutputDir};
use crate::scanner::Scanner;
use crate::status::StatusSink;
use crate::type_index::TypeIndex;
use crate::types::PartRecord;
use crate::{archive, bail};

/// Everything a successful run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Source folder name used as the artifact prefix
    pub folder: String,
    /// Number of input files combined
    pub files: usize,
    /// Total lines across all input files
    pub total_lines: usize,
    /// Every part written, in flush order
    pub parts: Vec<PartRecord>,
    /// Number of types in the index, zero when disabled
    pub types: usize,
    /// Stale artifacts removed before the run
    pub removed: usize,
    /// Output directory
    pub output_dir: PathBuf,
    /// The upload archive
    pub archive: PathBuf,
    /// Entry names inside the archive
    pub archived: Vec<String>,
    /// Wall time of the run
    pub duration: Duration,
}

/// Runs the aggregation engine for one configuration
pub struct Combiner {
    config: Config,
}

impl Combiner {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run and report the outcome to `status`.
    ///
    /// Rejections ("Invalid folder", "No .cs files found") leave the output
    /// directory untouched. Any other failure aborts the run; artifacts
    /// written so far stay on disk and the error is logged.
    pub fn run(&self, status: &dyn StatusSink) -> Result<RunSummary> {
        match self.run_inner(status) {
            Ok(summary) => {
                status.status("Done");
                status.reveal(&summary.archive);
                Ok(summary)
            }
            Err(e) => {
                match &e {
                    CombineError::InvalidInput(_) => status.status("Invalid folder"),
                    CombineError::NoInputFiles(_) => {
                        status.status(&format!("No .{} files found", self.config.extension))
                    }
                    other => {
                        tracing::error!(error = %other, "Combine run failed");
                        status.status(&format!("Error: {}", other));
                    }
                }
                Err(e)
            }
        }
    }

    fn run_inner(&self, status: &dyn StatusSink) -> Result<RunSummary> {
        let start = Instant::now();
        self.config.validate()?;

        status.status("Scanning…");
        let scanner = Scanner::new(self.config.clone())?;
        let entries = scanner.discover()?;
        if entries.is_empty() {
            bail!(
                NoInputFiles,
                "No .{} files under {}",
                self.config.extension,
                self.config.target_dir.display()
            );
        }

        let folder = scanner.folder_name();
        let output = OutputDir::new(self.config.output_dir(), &folder, &self.config.extension);
        let removed = output.prepare()?;
        info!(
            folder = %folder,
            files = entries.len(),
            removed,
            output = %output.root().display(),
            "Combining files"
        );

        status.status(&format!("Combining {} files…", entries.len()));
        let mut writer = BucketWriter::new(
            &folder,
            &self.config.extension,
            self.config.max_lines_per_part,
            DirSink::new(output.root()),
        );
        let mut types = TypeIndex::new();
        let mut total_lines = 0;

        for (i, entry) in entries.iter().enumerate() {
            let file = scanner.load(entry)?;
            if self.config.type_index {
                types.record(&file.path, &file.content);
            }
            writer.append_file(&file)?;
            total_lines += file.lines;
            status.progress(i + 1, entries.len(), &file.path);
        }

        let mut sink = writer.finish()?;
        if self.config.type_index {
            if let Some(path) = types.write(&output.types_path())? {
                sink.record_artifact(path);
            }
        }

        status.status("Zipping…");
        let (artifacts, parts) = sink.into_parts();
        let archive_path = output.archive_path();
        let archived = archive::create_archive(&archive_path, &artifacts)?;

        let summary = RunSummary {
            folder,
            files: entries.len(),
            total_lines,
            parts,
            types: if self.config.type_index { types.len() } else { 0 },
            removed,
            output_dir: output.root().to_path_buf(),
            archive: archive_path,
            archived,
            duration: start.elapsed(),
        };
        info!(
            parts = summary.parts.len(),
            types = summary.types,
            archive = %summary.archive.display(),
            "Combine finished"
        );

        Ok(summary)
    }
}

/// Convenience wrapper: build a combiner and run it
pub fn combine(config: Config, status: &dyn StatusSink) -> Result<RunSummary> {
    Combiner::new(config).run(status)
}
