use crate::{FileExtension, PARQUET_EXTENSION, ViewerResult};

use rfd::AsyncFileDialog;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Opens a native file dialog filtered to Parquet files.
///
/// Returns `None` if the user cancels the dialog.
pub async fn pick_file() -> Option<PathBuf> {
    AsyncFileDialog::new()
        .set_title("Open Parquet File")
        .add_filter("Parquet files", &[PARQUET_EXTENSION])
        .pick_file()
        .await
        .map(|file| file.path().to_path_buf()) // Extract PathBuf from FileHandle.
}

/// Opens a native directory dialog.
///
/// Returns `None` if the user cancels the dialog.
pub async fn pick_folder() -> Option<PathBuf> {
    AsyncFileDialog::new()
        .set_title("Open Folder")
        .pick_folder()
        .await
        .map(|folder| folder.path().to_path_buf())
}

/// Lists the Parquet files directly inside `folder`, in directory listing order.
///
/// Only regular files are kept; sub-directories are not searched. An empty
/// vector is a valid answer and is not an error here.
pub fn list_columnar_files(folder: &Path) -> ViewerResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        let path = entry.path();

        // `metadata` follows symlinks, so a link to a regular file counts as a file.
        let is_file = fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false);

        if is_file && FileExtension::from_path(&path).is_parquet() {
            files.push(path);
        }
    }

    tracing::debug!(
        "fn list_columnar_files(): {} Parquet files in {}",
        files.len(),
        folder.display()
    );

    Ok(files)
}
