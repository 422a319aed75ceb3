use crate::Table;

use egui::{Color32, Frame, Stroke, TextEdit, Ui};
use polars::prelude::DataType;

/// Side pane describing the current table.
#[derive(Debug, Clone, Default)]
pub struct Summary {
    /// Text shown in the pane.
    text: String,
    /// Column names with their types, for the schema section.
    schema: Vec<(String, DataType)>,
}

impl Summary {
    /// Replaces the pane content with the source name, row count, column count
    /// and one line per column name.
    pub fn show_summary(&mut self, source_label: &str, table: &Table) {
        let mut text = format!(
            "Folder/File: {source_label}\nRows: {}\nColumns: {}\n",
            table.height(),
            table.width()
        );
        for name in table.column_names() {
            text.push_str(&format!("  {name}\n"));
        }

        self.text = text;
        self.schema = table.schema();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Renders the summary text (read-only, selectable) inside a framed box.
    pub fn render_summary(&self, ui: &mut Ui) {
        Frame::default()
            .stroke(Stroke::new(1.0, Color32::GRAY))
            .outer_margin(2.0)
            .inner_margin(10.0)
            .show(ui, |ui| {
                // A `&str` buffer makes the TextEdit read-only.
                let mut text = self.text.as_str();
                ui.add(
                    TextEdit::multiline(&mut text)
                        .desired_width(f32::INFINITY)
                        .code_editor(),
                );
            });
    }

    /// Renders each column as a collapsing header holding its index and data type.
    /// Right-clicking a column name copies it to the clipboard.
    pub fn render_schema(&self, ui: &mut Ui) {
        ui.label("Tip: Right-click a column name to copy it to the clipboard.");

        for (index, (name, dtype)) in self.schema.iter().enumerate() {
            let header_response = ui.collapsing(name.as_str(), |ui| {
                ui.label(format!("index: {index}"));
                ui.label(format!("type: {dtype}"));
            });

            if header_response
                .header_response
                .clicked_by(egui::PointerButton::Secondary)
            {
                ui.ctx().copy_text(name.clone());
            }
        }
    }
}
