//! Application state and the handlers behind each user action.
//!
//! Everything here runs on the UI thread. The egui layer in `layout.rs` only
//! draws this state and forwards button clicks, dialogs and dropped files.

use crate::{
    BackgroundLoader, LoadMessage, Notice, Notification, PathExtension, Summary, Table,
    TableView, ViewerError, ViewerResult, list_columnar_files, read_table,
};

use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
};
use tokio::runtime::Handle;

/// Named user actions bound to the toolbar buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    OpenFile,
    OpenFolder,
    SelectAll,
    CopyToClipboard,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::OpenFolder,
        Action::OpenFile,
        Action::SelectAll,
        Action::CopyToClipboard,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Action::OpenFolder => "🗁 Open Folder",
            Action::OpenFile => "🗋 Open File",
            Action::SelectAll => "☑ Select All",
            Action::CopyToClipboard => "🗐 Copy to Clipboard",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            Action::OpenFolder => "Merge every Parquet file of a folder",
            Action::OpenFile => "Open a single Parquet file",
            Action::SelectAll => "Select every displayed row",
            Action::CopyToClipboard => "Copy the selected rows as tab-separated text",
        }
    }

    /// Open actions are disabled while a folder load is running.
    pub fn opens_data(&self) -> bool {
        matches!(self, Action::OpenFile | Action::OpenFolder)
    }
}

/// Idle -> Loading -> Idle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    /// Folder being loaded.
    Loading { source: PathBuf },
}

/// What a load request resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadRequest {
    File(PathBuf),
    Folder(PathBuf),
}

impl LoadRequest {
    /// Classifies an existing path; `None` when it is neither a file nor a folder.
    pub fn from_path(path: &Path) -> Option<Self> {
        if path.is_dir() {
            Some(LoadRequest::Folder(path.to_path_buf()))
        } else if path.is_file() {
            Some(LoadRequest::File(path.to_path_buf()))
        } else {
            None
        }
    }
}

/// The single owner of the current table and of everything derived from it.
pub struct AppState {
    /// Table currently displayed. Replaced in full by every successful load.
    pub current_table: Option<Table>,
    /// Name of the file or folder the table came from.
    pub source_label: Option<String>,
    pub table_view: TableView,
    pub summary: Summary,
    pub load_state: LoadState,
    /// Modal notices, shown one at a time in arrival order.
    pub notices: VecDeque<Box<dyn Notification>>,
    /// One-line status shown in the bottom panel.
    pub status: String,
    loader: BackgroundLoader,
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new(crate::DEFAULT_ROW_LIMIT)
    }
}

impl AppState {
    pub fn new(row_limit: usize) -> Self {
        AppState {
            current_table: None,
            source_label: None,
            table_view: TableView::new(row_limit),
            summary: Summary::default(),
            load_state: LoadState::Idle,
            notices: VecDeque::new(),
            status: "No file loaded.".to_string(),
            loader: BackgroundLoader::new(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load_state, LoadState::Loading { .. })
    }

    /// Queues a modal notice.
    pub fn notify(&mut self, notice: impl Notification) {
        self.notices.push_back(Box::new(notice));
    }

    /// Queues the notice matching `err` and logs it.
    pub fn report(&mut self, err: &ViewerError) {
        if err.is_informational() {
            tracing::info!("{err}");
        } else if err.is_warning() {
            tracing::warn!("{err}");
        } else {
            tracing::error!("{err}");
        }
        self.notify(Notice::from_error(err));
    }

    /// Replaces the displayed table, the grid and the summary in one step.
    pub fn apply_table(&mut self, source_label: String, table: Table) {
        tracing::info!(
            "Showing '{source_label}': {} rows x {} columns",
            table.height(),
            table.width()
        );

        self.table_view.show(table.clone());
        self.summary.show_summary(&source_label, &table);
        self.status = format!(
            "{source_label}: {} rows, {} columns (showing {})",
            table.height(),
            table.width(),
            self.table_view.displayed_rows()
        );
        self.current_table = Some(table);
        self.source_label = Some(source_label);
    }

    /// Loads a single file on the calling thread.
    ///
    /// Must not be called from an async context (see `read_table`). On failure
    /// the previous table stays displayed and a warning notice is queued.
    pub fn open_file(&mut self, path: &Path) {
        match read_table(path) {
            Ok(table) => self.apply_table(path.display_name(), table),
            Err(err) => self.report(&err),
        }
    }

    /// Lists the Parquet files of `folder` and starts a background merge.
    ///
    /// A folder without Parquet files queues `NoMatchingFiles` and leaves the
    /// displayed table untouched.
    pub fn open_folder<N>(&mut self, folder: &Path, handle: &Handle, repaint: N)
    where
        N: Fn() + Send + 'static,
    {
        if let Err(err) = self.start_folder_load(folder, handle, repaint) {
            self.report(&err);
        }
    }

    fn start_folder_load<N>(&mut self, folder: &Path, handle: &Handle, repaint: N) -> ViewerResult<()>
    where
        N: Fn() + Send + 'static,
    {
        let files = list_columnar_files(folder)?;
        if files.is_empty() {
            return Err(ViewerError::NoMatchingFiles(folder.to_path_buf()));
        }

        self.status = format!("Loading {} files from {}...", files.len(), folder.display());
        self.load_state = LoadState::Loading {
            source: folder.to_path_buf(),
        };
        self.loader.start(handle, files, repaint);
        Ok(())
    }

    /// Loads a file or a folder, whichever `path` is.
    pub fn open_path<N>(&mut self, path: &Path, handle: &Handle, repaint: N)
    where
        N: Fn() + Send + 'static,
    {
        match LoadRequest::from_path(path) {
            Some(LoadRequest::File(file)) => self.open_file(&file),
            Some(LoadRequest::Folder(folder)) => self.open_folder(&folder, handle, repaint),
            None => self.report(&ViewerError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} is neither a file nor a folder", path.display()),
            ))),
        }
    }

    /// Drains the background loader and applies its messages. Returns `true`
    /// while a load is still running.
    pub fn poll_load(&mut self) -> bool {
        for message in self.loader.poll() {
            self.handle_message(message);
        }
        self.is_loading()
    }

    /// Applies one worker message on the UI thread.
    pub fn handle_message(&mut self, message: LoadMessage) {
        match message {
            LoadMessage::Progress(path) => {
                self.status = format!("Loading {}...", path.display_name());
            }
            LoadMessage::Warning(err) => self.report(&err),
            LoadMessage::Done(table) => {
                let state = std::mem::take(&mut self.load_state);
                let LoadState::Loading { source } = state else {
                    tracing::debug!("Done received while idle; ignoring.");
                    return;
                };

                match table {
                    Some(table) => self.apply_table(source.display_name(), table),
                    None => {
                        self.status = "Nothing loaded.".to_string();
                        self.report(&ViewerError::NothingLoaded(source));
                    }
                }
            }
            LoadMessage::Failed(reason) => {
                self.load_state = LoadState::Idle;
                self.status = "Load failed.".to_string();
                self.report(&ViewerError::ChannelReceive(reason));
            }
        }
    }

    pub fn select_all(&mut self) {
        self.table_view.select_all();
    }

    /// Text for the clipboard, or `None` after queueing the "no selection" notice.
    pub fn copy_selection(&mut self) -> Option<String> {
        match self.table_view.copy_selection() {
            Ok(text) => {
                tracing::debug!("Copied {} rows", self.table_view.selected_count());
                Some(text)
            }
            Err(err) => {
                self.report(&err);
                None
            }
        }
    }

    /// Title of the notice on top of the queue.
    pub fn front_notice_title(&self) -> Option<&str> {
        self.notices.front().map(|notice| notice.title())
    }
}

#[cfg(test)]
mod tests_state {
    use super::*;
    use crate::reader::write_parquet;
    use polars::prelude::*;
    use std::{fs, time::Duration};
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, mut df: DataFrame) -> ViewerResult<PathBuf> {
        let path = dir.path().join(name);
        write_parquet(&path, &mut df)?;
        Ok(path)
    }

    async fn wait_until_idle(state: &mut AppState) {
        for _ in 0..500 {
            if !state.poll_load() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("folder load did not finish");
    }

    #[test]
    fn loading_b_after_a_leaves_only_b() -> ViewerResult<()> {
        let dir = TempDir::new()?;
        let a = write(&dir, "a.parquet", df!("x" => &[1i32, 2, 3], "y" => &["p", "q", "r"])?)?;
        let b = write(&dir, "b.parquet", df!("z" => &[true])?)?;

        let mut state = AppState::default();
        state.open_file(&a);
        state.select_all();
        state.open_file(&b);

        assert_eq!(state.table_view.headers(), vec!["z"]);
        assert_eq!(state.table_view.displayed_rows(), 1);
        assert_eq!(state.table_view.selected_count(), 0);
        assert_eq!(
            state.summary.text(),
            "Folder/File: b.parquet\nRows: 1\nColumns: 1\n  z\n"
        );
        assert_eq!(state.source_label.as_deref(), Some("b.parquet"));
        assert!(state.notices.is_empty());
        Ok(())
    }

    #[test]
    fn unreadable_file_keeps_previous_table() -> ViewerResult<()> {
        let dir = TempDir::new()?;
        let good = write(&dir, "good.parquet", df!("x" => &[1i32])?)?;
        let bad = dir.path().join("bad.parquet");
        fs::write(&bad, b"garbage")?;

        let mut state = AppState::default();
        state.open_file(&good);
        state.open_file(&bad);

        assert_eq!(state.table_view.headers(), vec!["x"]);
        assert_eq!(state.front_notice_title(), Some("Error Reading File"));
        Ok(())
    }

    #[test]
    fn copy_with_empty_selection_queues_notice() -> ViewerResult<()> {
        let dir = TempDir::new()?;
        let path = write(&dir, "t.parquet", df!("k" => &["a", "b"], "v" => &[1i64, 2])?)?;

        let mut state = AppState::default();
        state.open_file(&path);

        assert_eq!(state.copy_selection(), None);
        assert_eq!(state.front_notice_title(), Some("No Selection"));

        state.notices.clear();
        state.select_all();
        assert_eq!(state.copy_selection().as_deref(), Some("a\t1\nb\t2"));
        assert!(state.notices.is_empty());
        Ok(())
    }

    #[test]
    fn empty_folder_keeps_previous_table() -> ViewerResult<()> {
        let runtime = tokio::runtime::Runtime::new()?;
        let dir = TempDir::new()?;
        let file = write(&dir, "kept.parquet", df!("x" => &[1i32, 2])?)?;
        let empty = TempDir::new()?;
        fs::write(empty.path().join("notes.txt"), b"")?;

        let mut state = AppState::default();
        state.open_file(&file);
        state.open_folder(empty.path(), runtime.handle(), || {});

        assert!(!state.is_loading());
        assert_eq!(state.front_notice_title(), Some("No Parquet Files"));
        assert_eq!(state.table_view.headers(), vec!["x"]);
        assert_eq!(state.table_view.displayed_rows(), 2);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn folder_load_merges_and_warns_per_failure() -> ViewerResult<()> {
        let dir = TempDir::new()?;
        write(&dir, "p1.parquet", df!("id" => &[1i64, 2])?)?;
        write(&dir, "p2.parquet", df!("id" => &[3i64, 4, 5])?)?;
        fs::write(dir.path().join("p3.parquet"), b"garbage")?;
        fs::write(dir.path().join("p4.parquet"), b"")?;
        fs::write(dir.path().join("ignored.txt"), b"")?;

        let mut state = AppState::default();
        state.open_folder(dir.path(), &Handle::current(), || {});
        assert!(state.is_loading());

        wait_until_idle(&mut state).await;

        assert_eq!(state.notices.len(), 2);
        assert!(state
            .notices
            .iter()
            .all(|notice| notice.title() == "Error Reading File"));
        assert_eq!(state.current_table.as_ref().map(Table::height), Some(5));

        let folder_name = dir.path().display_name();
        assert!(state
            .summary
            .text()
            .starts_with(&format!("Folder/File: {folder_name}\nRows: 5\n")));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn folder_of_broken_files_reports_nothing_loaded() -> ViewerResult<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("x.parquet"), b"garbage")?;

        let mut state = AppState::default();
        state.open_folder(dir.path(), &Handle::current(), || {});
        wait_until_idle(&mut state).await;

        let titles: Vec<&str> = state.notices.iter().map(|n| n.title()).collect();
        assert_eq!(titles, vec!["Error Reading File", "Error"]);
        assert!(state.current_table.is_none());
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn folder_mismatch_is_reported_as_column_mismatch() -> ViewerResult<()> {
        let dir = TempDir::new()?;
        let first = write(&dir, "a.parquet", df!("id" => &[1i64, 2])?)?;
        let other = write(&dir, "b.parquet", df!("city" => &["Porto"])?)?;

        // Same listing the folder load uses; the first readable file fixes the columns.
        let files = list_columnar_files(dir.path())?;
        let first_is_id = files.first() == Some(&first);

        let mut state = AppState::default();
        state.open_folder(dir.path(), &Handle::current(), || {});
        wait_until_idle(&mut state).await;

        assert_eq!(state.front_notice_title(), Some("Column Mismatch"));
        let expected_columns = if first_is_id { vec!["id"] } else { vec!["city"] };
        assert_eq!(state.table_view.headers(), expected_columns);
        assert!(files.contains(&other));
        Ok(())
    }

    #[test]
    fn done_while_idle_is_ignored() {
        let mut state = AppState::default();
        state.handle_message(LoadMessage::Done(None));
        assert!(state.notices.is_empty());
        assert_eq!(state.load_state, LoadState::Idle);
    }

    #[test]
    fn actions_are_labelled() {
        assert!(Action::ALL.iter().all(|action| !action.label().is_empty()));
        assert!(Action::OpenFile.opens_data());
        assert!(!Action::CopyToClipboard.opens_data());
    }
}
