//! Custom traits, trait implementations for `egui` types, and general utility traits.
//!
//! This module centralizes extensions to existing types (`egui::Context`, `std::path::Path`)
//! and defines the `Notification` interface used for modal notices.

use crate::ViewerError;

use egui::{
    Align, Color32, Context,
    FontFamily::Proportional,
    FontId, Frame, Layout, Spacing, Stroke, Style,
    TextStyle::{Body, Button, Heading, Monospace, Small},
    Vec2, Visuals, Window,
    style::ScrollStyle,
};

use std::{ffi::OsStr, path::Path};

/// Defines custom text styles for the egui context.
/// Used by `MyStyle::set_style_init`.
pub const CUSTOM_TEXT_STYLE: [(egui::TextStyle, egui::FontId); 5] = [
    (Heading, FontId::new(18.0, Proportional)),
    (Body, FontId::new(16.0, Proportional)),
    (Button, FontId::new(16.0, Proportional)),
    (Monospace, FontId::new(15.0, Proportional)),
    (Small, FontId::new(14.0, Proportional)),
];

/// A trait for applying custom styling to the `egui` context (`Context`).
/// Used once at startup by `ParquetViewerApp::new`.
pub trait MyStyle {
    /// Applies a pre-defined application style to the `egui` context.
    fn set_style_init(&self, visuals: Visuals);
}

impl MyStyle for Context {
    /// Configures the application's look and feel (theme, spacing, text styles).
    fn set_style_init(&self, visuals: Visuals) {
        let scroll = ScrollStyle {
            handle_min_length: 32.0,
            ..ScrollStyle::default()
        };

        let spacing = Spacing {
            scroll,
            item_spacing: [8.0, 6.0].into(),
            ..Spacing::default()
        };

        let style = Style {
            visuals,
            spacing,
            text_styles: CUSTOM_TEXT_STYLE.into(),
            ..Style::default()
        };

        self.set_style(style);
    }
}

/// Trait for modal Notification windows.
/// Lets the shell queue different notice kinds polymorphically via `Box<dyn Notification>`.
pub trait Notification: Send + Sync + 'static {
    /// Renders the notification window using `egui::Window`.
    ///
    /// ### Returns
    /// `true` if the window should remain open, `false` if closed.
    fn show(&mut self, ctx: &Context) -> bool;

    /// Window title, also used to tell notices apart in tests and logs.
    fn title(&self) -> &str;
}

/// Severity of a `Notice`; selects the frame colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

/// A modal message box: information, per-file warning, or failed action.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: &str, message: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Info,
            title: title.to_string(),
            message: message.into(),
        }
    }

    pub fn warning(title: &str, message: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Warning,
            title: title.to_string(),
            message: message.into(),
        }
    }

    pub fn error(title: &str, message: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Error,
            title: title.to_string(),
            message: message.into(),
        }
    }

    /// Picks kind and title from the error itself.
    pub fn from_error(err: &ViewerError) -> Self {
        let message = err.to_string();
        match err {
            ViewerError::NoMatchingFiles(_) => Notice::info("No Parquet Files", message),
            ViewerError::EmptySelection => Notice::info("No Selection", message),
            ViewerError::Read { .. } => Notice::warning("Error Reading File", message),
            ViewerError::SchemaMismatch { .. } => Notice::warning("Column Mismatch", message),
            _ => Notice::error("Error", message),
        }
    }

    fn colors(&self) -> (Color32, Color32) {
        match self.kind {
            NoticeKind::Info => (Color32::from_rgb(200, 220, 255), Color32::DARK_BLUE),
            NoticeKind::Warning => (Color32::from_rgb(255, 235, 180), Color32::BROWN),
            NoticeKind::Error => (Color32::from_rgb(255, 200, 200), Color32::DARK_RED),
        }
    }
}

impl Notification for Notice {
    /// Renders the notice window.
    ///
    /// ### Logic
    /// 1. Define `open` state (initially `true`).
    /// 2. Create a non-collapsible `egui::Window` bound to `open`, with an OK button.
    /// 3. Show the `message` inside a coloured `Frame`.
    /// 4. Return the `open` state.
    fn show(&mut self, ctx: &Context) -> bool {
        let mut open = true;
        let mut acknowledged = false;
        let (fill, border) = self.colors();

        Window::new(self.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
            .open(&mut open)
            .show(ctx, |ui| {
                let width_max = ui.available_width() * 0.80;
                ui.allocate_ui_with_layout(
                    Vec2::new(width_max, ui.available_height()),
                    Layout::top_down(Align::LEFT),
                    |ui| {
                        Frame::default()
                            .fill(fill)
                            .stroke(Stroke::new(1.0, border))
                            .outer_margin(2.0)
                            .inner_margin(10.0)
                            .show(ui, |ui| {
                                ui.colored_label(Color32::BLACK, &self.message);
                            });
                    },
                );
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        acknowledged = true;
                    }
                });
            });

        open && !acknowledged
    }

    fn title(&self) -> &str {
        &self.title
    }
}

/// Trait to extend `Path` with a convenient method for getting the lowercase file extension.
/// Used by `file_extension.rs`.
pub trait PathExtension {
    /// Returns the file extension as a lowercase `String`, or `None`.
    fn extension_as_lowercase(&self) -> Option<String>;

    /// Final component of the path, or the whole path when it has none (e.g. `/`).
    fn display_name(&self) -> String;
}

impl PathExtension for Path {
    fn extension_as_lowercase(&self) -> Option<String> {
        self.extension() // 1. Get OsStr extension.
            .and_then(OsStr::to_str) // 2. Try converting to &str.
            .map(str::to_lowercase) // 3. Convert to lowercase String if successful.
    }

    fn display_name(&self) -> String {
        self.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.display().to_string())
    }
}

// --- Unit Tests ---
