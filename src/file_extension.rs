use crate::PathExtension;
use std::path::Path;

/// Extension recognized as a columnar file.
pub const PARQUET_EXTENSION: &str = "parquet";

/// Represents the extension of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileExtension {
    /// Parquet file extension.
    Parquet,
    /// Unknown file extension, storing the extension as a string.
    Unknown(String),
    /// Missing file extension, when no extension is present in the path.
    Missing,
}

impl FileExtension {
    /// Determines the file extension from a given path.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension_as_lowercase()
            .as_deref() // Converts `Option<String>` to `Option<&str>` for matching.
        {
            Some(PARQUET_EXTENSION) => FileExtension::Parquet,
            Some(ext) => FileExtension::Unknown(ext.to_owned()),
            None => FileExtension::Missing,
        }
    }

    pub fn is_parquet(&self) -> bool {
        matches!(self, FileExtension::Parquet)
    }
}
