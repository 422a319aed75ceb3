//! Columnar reader: loads Parquet files into `Table`s and concatenates folders.

use crate::{Table, ViewerError, ViewerResult};

use polars::prelude::*;
use std::{
    ops::ControlFlow,
    path::{Path, PathBuf},
    sync::Arc,
};

/// Reads one Parquet file into a `Table`.
///
/// Any failure (missing file, bad magic bytes, truncated footer, unsupported
/// encoding) is reported as `ViewerError::Read` carrying the offending path.
///
/// Runs the Polars streaming engine, which blocks on its own runtime: call it
/// from the UI thread or a blocking worker, never from inside an async task.
pub fn read_table(path: &Path) -> ViewerResult<Table> {
    tracing::debug!("Reading Parquet data from: {}", path.display());

    let args = ScanArgsParquet {
        low_memory: false,
        glob: false, // Paths are concrete files; `[` or `*` in a name is literal.
        ..Default::default()
    };

    let df = PlRefPath::try_from_path(path)
        .and_then(|path| LazyFrame::scan_parquet(path, args))
        .and_then(|lazyframe| lazyframe.with_new_streaming(true).collect())
        .map_err(|err| ViewerError::read(path, err))?;

    tracing::debug!("Parquet read complete. Shape: {:?}", df.shape());

    Ok(Table::new(df))
}

/// Result of reading several files: the concatenated table plus one warning per failed file.
#[derive(Debug, Default)]
pub struct MergeOutcome {
    /// `None` when no file could be read.
    pub table: Option<Table>,
    pub warnings: Vec<ViewerError>,
}

/// Step reported while `read_and_merge_with` walks the file list.
#[derive(Debug)]
pub enum MergeEvent<'a> {
    /// About to read this file.
    Reading(&'a Path),
    /// This file was skipped.
    Failed(ViewerError),
}

/// Reads every path and concatenates the results row-wise, in the given order.
pub fn read_and_merge(paths: &[PathBuf]) -> MergeOutcome {
    let mut warnings = Vec::new();

    let table = read_and_merge_with(paths, |event| {
        if let MergeEvent::Failed(err) = event {
            warnings.push(err);
        }
        ControlFlow::Continue(())
    });

    MergeOutcome { table, warnings }
}

/// Same as `read_and_merge`, handing each step to `observer`.
///
/// Failed files are passed to the observer and not kept. Returning
/// `ControlFlow::Break` stops after the current step; the result then holds
/// what was merged so far.
pub fn read_and_merge_with<F>(paths: &[PathBuf], mut observer: F) -> Option<Table>
where
    F: FnMut(MergeEvent<'_>) -> ControlFlow<()>,
{
    let mut merger = TableMerger::default();

    for path in paths {
        if observer(MergeEvent::Reading(path)).is_break() {
            break;
        }

        let result = read_table(path).and_then(|table| merger.push(path, table));

        if let Err(err) = result {
            tracing::warn!("{err}");
            if observer(MergeEvent::Failed(err)).is_break() {
                break;
            }
        }
    }

    merger.finish()
}

/// Accumulates tables row-wise.
///
/// The first table pushed fixes the columns. A later table must have the same
/// column names, order and types, otherwise it is rejected with
/// `ViewerError::SchemaMismatch` and the accumulated rows stay untouched.
#[derive(Debug, Default)]
pub struct TableMerger {
    merged: Option<DataFrame>,
}

impl TableMerger {
    pub fn push(&mut self, path: &Path, table: Table) -> ViewerResult<()> {
        let Some(merged) = self.merged.as_mut() else {
            self.merged = Some(Arc::unwrap_or_clone(table.df));
            return Ok(());
        };

        let expected = describe_schema(merged);
        let found = describe_schema(&table.df);
        if expected != found {
            return Err(ViewerError::SchemaMismatch {
                path: path.to_path_buf(),
                expected,
                found,
            });
        }

        merged
            .vstack_mut(&table.df)
            .map_err(|err| ViewerError::read(path, err))?;

        Ok(())
    }

    /// The merged table, as one chunk per column.
    pub fn finish(self) -> Option<Table> {
        self.merged.map(|mut df| {
            df.rechunk_mut();
            Table::new(df)
        })
    }
}

/// `name: dtype` for every column, in order.
fn describe_schema(df: &DataFrame) -> Vec<String> {
    df.columns()
        .iter()
        .map(|column| format!("{}: {}", column.name(), column.dtype()))
        .collect()
}

//----------------------------------------------------------------------------//
//                                   Tests                                    //
//----------------------------------------------------------------------------//

/// Writes `df` as a Parquet file, used by tests across the crate.
#[cfg(test)]
pub(crate) fn write_parquet(path: &Path, df: &mut DataFrame) -> ViewerResult<()> {
    let mut file = std::fs::File::create(path)?;
    ParquetWriter::new(&mut file).finish(df)?;
    Ok(())
}

/// Run tests with:
/// cargo test -- --show-output tests_reader
#[cfg(test)]
mod tests_reader {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn people(names: &[&str]) -> PolarsResult<DataFrame> {
        let ages: Vec<i64> = (0..names.len() as i64).map(|i| 20 + i).collect();
        df!("name" => names, "age" => ages)
    }

    #[test]
    fn read_single_file() -> ViewerResult<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("people.parquet");
        write_parquet(&path, &mut people(&["ana", "bob", "cid"])?)?;

        let table = read_table(&path)?;

        assert_eq!(table.column_names(), vec!["name", "age"]);
        assert_eq!(table.height(), 3);
        assert_eq!(table.row_values(1), vec!["bob", "21"]);
        Ok(())
    }

    #[test]
    fn read_corrupt_file_names_the_path() -> ViewerResult<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("broken.parquet");
        fs::write(&path, b"definitely not parquet")?;

        match read_table(&path) {
            Err(ViewerError::Read { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected a read error, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn merge_sums_rows_of_valid_files() -> ViewerResult<()> {
        let dir = TempDir::new()?;
        let a = dir.path().join("a.parquet");
        let b = dir.path().join("b.parquet");
        write_parquet(&a, &mut people(&["ana", "bob"])?)?;
        write_parquet(&b, &mut people(&["cid", "dan", "eve"])?)?;

        let outcome = read_and_merge(&[a, b]);

        assert!(outcome.warnings.is_empty());
        let table = outcome.table.expect("merged table");
        assert_eq!(table.height(), 5);
        assert_eq!(table.row_values(0), vec!["ana", "20"]);
        assert_eq!(table.row_values(2), vec!["cid", "20"]);
        Ok(())
    }

    #[test]
    fn merge_reports_one_warning_per_failed_file() -> ViewerResult<()> {
        let dir = TempDir::new()?;
        let good = dir.path().join("good.parquet");
        let bad_1 = dir.path().join("bad_1.parquet");
        let bad_2 = dir.path().join("bad_2.parquet");
        write_parquet(&good, &mut people(&["ana", "bob"])?)?;
        fs::write(&bad_1, b"garbage")?;
        fs::write(&bad_2, b"")?;

        let outcome = read_and_merge(&[bad_1, good, bad_2]);

        assert_eq!(outcome.warnings.len(), 2);
        assert!(outcome.warnings.iter().all(ViewerError::is_warning));
        assert_eq!(outcome.table.map(|t| t.height()), Some(2));
        Ok(())
    }

    #[test]
    fn merge_of_only_failures_has_no_table() -> ViewerResult<()> {
        let dir = TempDir::new()?;
        let bad = dir.path().join("bad.parquet");
        fs::write(&bad, b"garbage")?;

        let outcome = read_and_merge(&[bad]);

        assert!(outcome.table.is_none());
        assert_eq!(outcome.warnings.len(), 1);
        Ok(())
    }

    #[test]
    fn merge_skips_files_with_other_columns() -> ViewerResult<()> {
        let dir = TempDir::new()?;
        let first = dir.path().join("first.parquet");
        let other = dir.path().join("other.parquet");
        let reordered = dir.path().join("reordered.parquet");
        write_parquet(&first, &mut people(&["ana"])?)?;
        write_parquet(&other, &mut df!("city" => &["Lisbon"])?)?;
        write_parquet(&reordered, &mut df!("age" => &[40i64], "name" => &["zoe"])?)?;

        let outcome = read_and_merge(&[first, other.clone(), reordered]);

        assert_eq!(outcome.warnings.len(), 2);
        match &outcome.warnings[0] {
            ViewerError::SchemaMismatch { path, found, .. } => {
                assert_eq!(path, &other);
                assert_eq!(found, &vec!["city: str".to_string()]);
            }
            err => panic!("expected schema mismatch, got {err:?}"),
        }
        assert_eq!(outcome.table.map(|t| t.height()), Some(1));
        Ok(())
    }

    #[test]
    fn observer_sees_steps_in_file_order() -> ViewerResult<()> {
        let dir = TempDir::new()?;
        let a = dir.path().join("a.parquet");
        let b = dir.path().join("b.parquet");
        write_parquet(&a, &mut people(&["ana"])?)?;
        fs::write(&b, b"garbage")?;

        let mut steps = Vec::new();
        let table = read_and_merge_with(&[a.clone(), b.clone()], |event| {
            steps.push(match event {
                MergeEvent::Reading(path) => format!("reading {}", path.display()),
                MergeEvent::Failed(err) => format!("failed {}", err.is_warning()),
            });
            ControlFlow::Continue(())
        });

        assert_eq!(
            steps,
            vec![
                format!("reading {}", a.display()),
                format!("reading {}", b.display()),
                "failed true".to_string(),
            ]
        );
        assert_eq!(table.map(|t| t.height()), Some(1));
        Ok(())
    }

    #[test]
    fn observer_can_stop_the_merge() -> ViewerResult<()> {
        let dir = TempDir::new()?;
        let a = dir.path().join("a.parquet");
        let b = dir.path().join("b.parquet");
        write_parquet(&a, &mut people(&["ana"])?)?;
        write_parquet(&b, &mut people(&["bob"])?)?;

        let mut reads = 0;
        let table = read_and_merge_with(&[a, b], |event| {
            if let MergeEvent::Reading(_) = event {
                reads += 1;
            }
            if reads > 1 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        assert_eq!(table.map(|t| t.height()), Some(1));
        Ok(())
    }

    #[test]
    fn brackets_in_file_name_are_literal() -> ViewerResult<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("part[1].parquet");
        write_parquet(&path, &mut people(&["ana", "bob"])?)?;

        let table = read_table(&path)?;

        assert_eq!(table.height(), 2);
        Ok(())
    }

    #[test]
    fn star_in_file_name_does_not_pull_in_siblings() -> ViewerResult<()> {
        let dir = TempDir::new()?;
        let star = dir.path().join("x*.parquet");
        let sibling = dir.path().join("x1.parquet");
        write_parquet(&star, &mut people(&["ana", "bob"])?)?;
        write_parquet(&sibling, &mut people(&["cid", "dan", "eve"])?)?;

        assert_eq!(read_table(&star)?.height(), 2);

        let outcome = read_and_merge(&crate::list_columnar_files(dir.path())?);
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.table.map(|t| t.height()), Some(5));
        Ok(())
    }

    #[test]
    fn merged_table_is_a_single_chunk() -> ViewerResult<()> {
        let dir = TempDir::new()?;
        let paths: Vec<PathBuf> = (0..3)
            .map(|i| dir.path().join(format!("part-{i}.parquet")))
            .collect();
        for path in &paths {
            write_parquet(path, &mut people(&["ana", "bob"])?)?;
        }

        let table = read_and_merge(&paths).table.expect("merged table");

        assert_eq!(table.height(), 6);
        assert_eq!(table.df.max_n_chunks(), 1);
        assert_eq!(table.row_values(4), vec!["ana", "20"]);
        Ok(())
    }
}
