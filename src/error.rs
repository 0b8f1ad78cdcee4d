//! Global error handling for csbundle
//!
//! This module provides a centralized error type covering every way a
//! combine run can fail.

use std::io;

use thiserror::Error;

/// Global error type for csbundle operations
#[derive(Error, Debug)]
pub enum CombineError {
    /// Root is missing, not a directory, or the configuration is unusable
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The scan found nothing to combine
    #[error("No input files: {0}")]
    NoInputFiles(String),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Directory traversal errors
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Archive creation errors
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

impl CombineError {
    /// Whether the run was rejected before touching any output
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::NoInputFiles(_))
    }
}

/// Specialized Result type for csbundle operations
pub type Result<T> = std::result::Result<T, CombineError>;

/// Creates a CombineError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::CombineError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}
