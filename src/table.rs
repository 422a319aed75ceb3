use polars::prelude::*;
use std::sync::Arc;

/// In-memory table handed from the reader to the presenters.
///
/// Columns and rows come from a Polars `DataFrame`, which already guarantees
/// that every row has one value per column and that column names are unique.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// The Polars DataFrame, wrapped in an Arc for shared ownership.
    pub df: Arc<DataFrame>,
}

impl Table {
    pub fn new(df: DataFrame) -> Self {
        Table { df: Arc::new(df) }
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// Column names paired with their data types.
    pub fn schema(&self) -> Vec<(String, DataType)> {
        self.df
            .columns()
            .iter()
            .map(|column| (column.name().to_string(), column.dtype().clone()))
            .collect()
    }

    pub fn width(&self) -> usize {
        self.df.width()
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// Display text of a single cell. Out of range cells render as empty text.
    pub fn cell_text(&self, row: usize, column: usize) -> String {
        self.df
            .columns()
            .get(column)
            .and_then(|column| column.get(row).ok())
            .map(format_value)
            .unwrap_or_default()
    }

    /// Display text of a full row, aligned to the column order.
    pub fn row_values(&self, row: usize) -> Vec<String> {
        (0..self.width())
            .map(|column| self.cell_text(row, column))
            .collect()
    }
}

/// Converts a Polars value into the text shown in the grid and copied to the clipboard.
pub fn format_value(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),            // Display empty string for nulls.
        AnyValue::String(s) => s.to_string(),       // Directly use the string, without quotes.
        AnyValue::StringOwned(s) => s.to_string(),
        av => av.to_string(), // Use to_string() for other types.
    }
}
