use polars::prelude::PolarsError;
use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/**
Result type to simplify function signatures.

Functions can return `ViewerResult<T>` and then use `?` to automatically propagate errors.
*/
pub type ViewerResult<T> = Result<T, ViewerError>;

/**
Custom error type for the Parquet viewer.

Every user action catches these at its boundary and turns them into a `Notice`;
none of them terminates the application.
*/
#[derive(Error, Debug)]
pub enum ViewerError {
    // Wrapper for standard IO errors.
    // The #[from] attribute automatically converts io::Error to ViewerError::Io.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // Wrapper for Polars errors raised outside of a specific file read.
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    // The background worker went away without delivering a result.
    #[error("Channel receive error: {0}")]
    ChannelReceive(String),

    /// A single file could not be opened or decoded.
    #[error("Error reading file '{}': {cause}", .path.display())]
    Read { path: PathBuf, cause: String },

    /// A file whose columns differ from the first file of a folder load.
    #[error(
        "Skipped file '{}': columns do not match the first file.\n\
         expected: {expected:?}\n\
         found: {found:?}",
        .path.display()
    )]
    SchemaMismatch {
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// The chosen folder holds no Parquet files.
    #[error("No Parquet files found in the selected folder: {}", .0.display())]
    NoMatchingFiles(PathBuf),

    /// Every file of a folder load failed.
    #[error("None of the Parquet files in '{}' could be read.", .0.display())]
    NothingLoaded(PathBuf),

    /// Copy was requested while no row is selected.
    #[error("Please select rows to copy.")]
    EmptySelection,

    #[error("Invalid value for command-line argument '{arg_name}': {reason}")]
    InvalidArgument {
        arg_name: String, // Context about *which* argument failed
        reason: String,   // The specific error reason
    },
}

impl ViewerError {
    /// Builds a `Read` error from any displayable cause.
    pub fn read(path: impl Into<PathBuf>, cause: impl ToString) -> Self {
        ViewerError::Read {
            path: path.into(),
            cause: cause.to_string(),
        }
    }

    /// Informational conditions are shown as notices, not as failures.
    pub fn is_informational(&self) -> bool {
        matches!(
            self,
            ViewerError::NoMatchingFiles(_) | ViewerError::EmptySelection
        )
    }

    /// The file or folder the error refers to.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ViewerError::Read { path, .. }
            | ViewerError::SchemaMismatch { path, .. }
            | ViewerError::NoMatchingFiles(path)
            | ViewerError::NothingLoaded(path) => Some(path),
            _ => None,
        }
    }

    /// Per-file problems that do not abort a folder load.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            ViewerError::Read { .. } | ViewerError::SchemaMismatch { .. }
        )
    }
}
