/*!
 * Companion JSON manifests for part files
 */

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::utils::{file_name_of, utc_timestamp};

/// Cross-reference from a part file back to its original sources
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartManifest {
    /// File name of the part this manifest describes
    pub combined: String,
    /// UTC generation time
    pub generated: String,
    /// Original paths in the order they were merged
    pub includes: Vec<String>,
}

/// Path of the manifest belonging to a part file
pub fn manifest_path(part_file: &Path) -> PathBuf {
    part_file.with_extension("json")
}

/// Write `<part stem>.json` beside `part_file`.
///
/// Returns `None` without touching the disk when `includes` is empty.
pub fn write_manifest(part_file: &Path, includes: &[String]) -> Result<Option<PathBuf>> {
    if includes.is_empty() {
        return Ok(None);
    }

    let manifest = PartManifest {
        combined: file_name_of(part_file),
        generated: utc_timestamp(),
        includes: includes.to_vec(),
    };
    let path = manifest_path(part_file);
    fs::write(&path, serde_json::to_string_pretty(&manifest)?)?;

    Ok(Some(path))
}
