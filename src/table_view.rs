use crate::{Table, ViewerError, ViewerResult};

use egui::{Modifiers, RichText, Sense, TextStyle, Ui};
use egui_extras::{Column, TableBuilder, TableRow};
use std::collections::BTreeSet;

/// Rows shown in the grid when no `--row-limit` is given.
pub const DEFAULT_ROW_LIMIT: usize = 1000;

/// How a click changes the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    /// Plain click: the clicked row becomes the only selected row.
    Replace,
    /// Ctrl/Cmd click: flips the clicked row.
    Toggle,
    /// Shift click: selects every row between the last clicked row and this one.
    Extend,
}

impl SelectMode {
    pub fn from_modifiers(modifiers: &Modifiers) -> Self {
        if modifiers.shift {
            SelectMode::Extend
        } else if modifiers.command {
            SelectMode::Toggle
        } else {
            SelectMode::Replace
        }
    }
}

/// Scrollable grid of the current table, with row selection and TSV export.
#[derive(Debug, Clone)]
pub struct TableView {
    table: Option<Table>,
    /// Maximum rows displayed; `0` shows every row.
    row_limit: usize,
    /// Indices of selected rows, kept sorted so exports follow display order.
    selection: BTreeSet<usize>,
    /// Row of the last plain or toggle click, the origin of a shift-click range.
    anchor: Option<usize>,
}

impl Default for TableView {
    fn default() -> Self {
        TableView::new(DEFAULT_ROW_LIMIT)
    }
}

impl TableView {
    pub fn new(row_limit: usize) -> Self {
        TableView {
            table: None,
            row_limit,
            selection: BTreeSet::new(),
            anchor: None,
        }
    }

    /// Replaces whatever is displayed with `table` and clears the selection.
    pub fn show(&mut self, table: Table) {
        self.table = Some(table);
        self.selection.clear();
        self.anchor = None;
    }

    /// Header labels currently displayed.
    pub fn headers(&self) -> Vec<String> {
        self.table
            .as_ref()
            .map(Table::column_names)
            .unwrap_or_default()
    }

    pub fn displayed_columns(&self) -> usize {
        self.table.as_ref().map_or(0, Table::width)
    }

    /// `min(table rows, row limit)`, or every row when the limit is `0`.
    pub fn displayed_rows(&self) -> usize {
        let height = self.table.as_ref().map_or(0, Table::height);
        match self.row_limit {
            0 => height,
            limit => height.min(limit),
        }
    }

    /// Display text of a displayed row.
    pub fn row_values(&self, row: usize) -> Option<Vec<String>> {
        if row >= self.displayed_rows() {
            return None;
        }
        self.table.as_ref().map(|table| table.row_values(row))
    }

    pub fn select_all(&mut self) {
        self.selection = (0..self.displayed_rows()).collect();
    }

    /// Applies a click on `row`. Rows outside the displayed range are ignored.
    pub fn select(&mut self, row: usize, mode: SelectMode) {
        if row >= self.displayed_rows() {
            return;
        }

        match (mode, self.anchor) {
            (SelectMode::Extend, Some(anchor)) => {
                let (start, end) = (anchor.min(row), anchor.max(row));
                self.selection = (start..=end).collect();
            }
            (SelectMode::Toggle, _) => {
                if !self.selection.remove(&row) {
                    self.selection.insert(row);
                }
                self.anchor = Some(row);
            }
            (SelectMode::Replace, _) | (SelectMode::Extend, None) => {
                self.selection.clear();
                self.selection.insert(row);
                self.anchor = Some(row);
            }
        }
    }

    pub fn is_selected(&self, row: usize) -> bool {
        self.selection.contains(&row)
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    /// Selected rows as tab-separated fields, one row per line, in display order.
    ///
    /// Returns `ViewerError::EmptySelection` when no row is selected.
    pub fn copy_selection(&self) -> ViewerResult<String> {
        if self.selection.is_empty() {
            return Err(ViewerError::EmptySelection);
        }

        let lines: Vec<String> = self
            .selection
            .iter()
            .filter_map(|&row| self.row_values(row))
            .map(|values| values.join("\t"))
            .collect();

        Ok(lines.join("\n"))
    }

    /// Renders the grid as an `egui_extras` table.
    pub fn render(&mut self, ui: &mut Ui) {
        let Some(table) = self.table.as_ref() else {
            return;
        };

        let mut clicked: Option<usize> = None;

        // Header rendering closure: one bold label per column.
        let analyze_header = |mut table_row: TableRow<'_, '_>| {
            for column_name in table.df.get_column_names() {
                table_row.col(|ui| {
                    ui.label(RichText::new(column_name.as_str()).strong());
                });
            }
        };

        // Rows rendering closure: displays the data for each row in the DataFrame.
        let analyze_rows = |mut table_row: TableRow<'_, '_>| {
            let row_index = table_row.index();
            table_row.set_selected(self.selection.contains(&row_index));

            for column_index in 0..table.width() {
                table_row.col(|ui| {
                    ui.add(egui::Label::new(table.cell_text(row_index, column_index)).truncate());
                });
            }

            if table_row.response().clicked() {
                clicked = Some(row_index);
            }
        };

        let style = ui.style();
        let text_height = TextStyle::Body.resolve(style).size;
        let col_number = table.width().max(1) as f32;
        let available_space = ui.available_width()
            - col_number * style.spacing.item_spacing.x
            - style.spacing.scroll.bar_width;

        // Initial and minimal column widths, calculated based on available space and number of columns.
        let initial_col_width = (available_space / col_number).max(80.0);
        let header_height = style.spacing.interact_size.y + 2.0 * style.spacing.item_spacing.y;
        let min_col_width = style.spacing.interact_size.x.max(initial_col_width / 4.0);

        let column = Column::initial(initial_col_width)
            .at_least(min_col_width)
            .resizable(true)
            .clip(true);

        let num_rows = self.displayed_rows();

        TableBuilder::new(ui)
            .striped(true) // Alternate row background colors for better readability.
            .sense(Sense::click()) // Rows react to clicks for selection.
            .columns(column, table.width())
            .auto_shrink([false, false]) // Disable auto-shrinking to fit content.
            .header(header_height, analyze_header)
            .body(|body| {
                body.rows(text_height, num_rows, analyze_rows);
            });

        if let Some(row) = clicked {
            let mode = ui.input(|i| SelectMode::from_modifiers(&i.modifiers));
            self.select(row, mode);
        }
    }
}
