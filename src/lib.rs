/*!
 * csbundle - Combine source trees into upload-sized bundles
 *
 * This library concatenates the source files under a folder into a few
 * large part files per category, with per-file provenance headers, JSON
 * manifests, an optional type index and a zip archive for upload.
 */

pub mod archive;
pub mod bucket;
pub mod classifier;
pub mod combiner;
pub mod config;
pub mod error;
pub mod manifest;
pub mod output;
pub mod report;
pub mod scanner;
pub mod status;
pub mod type_index;
pub mod types;
pub mod utils;

#[cfg(test)]
mod tests;

// Re-export main components for easier access
pub use bucket::{BucketWriter, PartSink, MAX_LINES_PER_PART};
pub use classifier::classify;
pub use combiner::{combine, Combiner, RunSummary};
pub use config::Config;
pub use error::{CombineError, Result};
pub use report::{ReportFormat, Reporter};
pub use scanner::Scanner;
pub use status::{NullStatus, StatusLog, StatusSink};
pub use type_index::TypeIndex;
pub use types::{Category, FlushedPart, PartRecord, SourceFile};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
