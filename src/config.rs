/*!
 * Configuration handling for csbundle
 */

use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell;

use crate::bucket::MAX_LINES_PER_PART;
use crate::ensure;
use crate::error::Result;
use crate::output::OUTPUT_DIR_NAME;

/// Command-line arguments for csbundle
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "csbundle",
    version = env!("CARGO_PKG_VERSION"),
    about = "Combine a tree of source files into size-bounded bundles for LLM upload",
    long_about = "Concatenates every source file under a folder into a few large part files per category (main, test, editor), writes a manifest per part and an optional type index, and zips the result for upload."
)]
pub struct Args {
    /// Source folder to combine
    #[clap(default_value = ".")]
    pub directory_path: String,

    /// Project root; output goes to <project-root>/combined-code
    #[clap(long, default_value = ".")]
    pub project_root: String,

    /// Only combine files directly inside the source folder
    #[clap(long)]
    pub no_recurse: bool,

    /// Skip generating the <folder>-types.json index
    #[clap(long)]
    pub no_type_index: bool,

    /// Extension of the files to combine
    #[clap(long, default_value = "cs")]
    pub extension: String,

    /// Maximum accumulated lines per part file
    #[clap(long, default_value_t = MAX_LINES_PER_PART)]
    pub max_lines: usize,

    /// Comma-separated list of file name patterns to skip
    #[clap(long, value_delimiter = ',')]
    pub ignore_patterns: Vec<String>,

    /// Suppress the progress bar and the final report
    #[clap(long, short)]
    pub quiet: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Options for one combine run
#[derive(Clone, Debug)]
pub struct Config {
    /// Source folder to combine
    pub target_dir: PathBuf,

    /// Directory that receives `combined-code/`
    pub project_root: PathBuf,

    /// Whether to descend into sub-directories
    pub recurse: bool,

    /// Whether to write the type index
    pub type_index: bool,

    /// Extension of input files, without the dot
    pub extension: String,

    /// Maximum accumulated lines per part
    pub max_lines_per_part: usize,

    /// File name patterns to skip
    pub ignore_patterns: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_dir: PathBuf::from("."),
            project_root: PathBuf::from("."),
            recurse: true,
            type_index: true,
            extension: "cs".to_string(),
            max_lines_per_part: MAX_LINES_PER_PART,
            ignore_patterns: Vec::new(),
        }
    }
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        Self {
            target_dir: PathBuf::from(args.directory_path),
            project_root: PathBuf::from(args.project_root),
            recurse: !args.no_recurse,
            type_index: !args.no_type_index,
            extension: args.extension.trim_start_matches('.').to_string(),
            max_lines_per_part: args.max_lines,
            ignore_patterns: args.ignore_patterns,
        }
    }

    /// Configuration for `target_dir` with defaults for everything else
    pub fn for_dir(target_dir: impl Into<PathBuf>, project_root: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            project_root: project_root.into(),
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.target_dir.is_dir(),
            InvalidInput,
            "Target directory not found: {}",
            self.target_dir.display()
        );
        ensure!(
            !self.extension.is_empty(),
            InvalidInput,
            "File extension must not be empty"
        );
        ensure!(
            !matches!(self.extension.to_lowercase().as_str(), "json" | "zip"),
            InvalidInput,
            "File extension .{} is reserved for manifests and archives",
            self.extension
        );
        ensure!(
            self.max_lines_per_part > 0,
            InvalidInput,
            "Maximum lines per part must be greater than zero"
        );

        Ok(())
    }

    /// `<project-root>/combined-code`
    pub fn output_dir(&self) -> PathBuf {
        self.project_root.join(OUTPUT_DIR_NAME)
    }
}
