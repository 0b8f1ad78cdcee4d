/*!
 * Zip packaging of a run's artifacts
 */

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::utils::file_name_of;

/// Drop repeated paths, keeping the first occurrence
pub fn dedup_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen = std::collections::HashSet::new();
    paths
        .iter()
        .filter(|p| seen.insert(p.to_path_buf()))
        .cloned()
        .collect()
}

/// Write `artifacts` into a fresh archive at `archive_path`.
///
/// Entries are named by file name only. An existing archive is replaced.
/// Returns the entry names in the order they were added.
pub fn create_archive(archive_path: &Path, artifacts: &[PathBuf]) -> Result<Vec<String>> {
    if archive_path.exists() {
        fs::remove_file(archive_path)?;
    }

    let file = File::create(archive_path)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut entries = Vec::new();
    for path in dedup_paths(artifacts) {
        let name = file_name_of(&path);
        if entries.contains(&name) {
            // Two artifacts flattening to the same name would produce an
            // ambiguous archive; keep the first.
            warn!(path = %path.display(), "Skipping duplicate archive entry name");
            continue;
        }

        zip.start_file(name.as_str(), options)?;
        let mut reader = BufReader::new(File::open(&path)?);
        io::copy(&mut reader, &mut zip)?;
        entries.push(name);
    }

    zip.finish()?;
    info!(path = %archive_path.display(), entries = entries.len(), "Wrote archive");

    Ok(entries)
}
