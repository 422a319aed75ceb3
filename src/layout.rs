use crate::{Action, AppState, Arguments, MyStyle, pick_file, pick_folder};

use egui::{
    CentralPanel, Color32, Context, Direction, FontId, Frame, Grid, Hyperlink, Layout, RichText,
    ScrollArea, SidePanel, Stroke, TopBottomPanel, ViewportCommand, style::Visuals,
    warn_if_debug_build, widgets,
};
use std::path::PathBuf;

/// The main application struct for the Parquet viewer.
pub struct ParquetViewerApp {
    /// Current table, presenters, notices and the background loader.
    pub state: AppState,

    /// Tokio runtime for the native dialogs and background folder loads.
    runtime: tokio::runtime::Runtime,
    /// Path given on the command line, opened on the first frame.
    startup_path: Option<PathBuf>,
}

impl ParquetViewerApp {
    /// Creates a new `ParquetViewerApp` instance.
    pub fn new(cc: &eframe::CreationContext<'_>, args: &Arguments) -> std::io::Result<Self> {
        cc.egui_ctx.set_style_init(Visuals::dark()); // Apply custom styles, dark theme.

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        Ok(ParquetViewerApp {
            state: AppState::new(args.row_limit),
            runtime,
            startup_path: args.path.clone(),
        })
    }

    /// Loads a file or folder; folders go to the background loader.
    fn open_path(&mut self, path: &std::path::Path, ctx: &Context) {
        let ctx_clone = ctx.clone();
        let handle = self.runtime.handle().clone();
        self.state
            .open_path(path, &handle, move || ctx_clone.request_repaint());
    }

    /// Runs the handler bound to a toolbar action.
    fn dispatch(&mut self, action: Action, ctx: &Context) {
        tracing::debug!("fn dispatch(): {action:?}");

        match action {
            Action::OpenFile => {
                if let Some(path) = self.runtime.block_on(pick_file()) {
                    self.state.open_file(&path);
                }
            }
            Action::OpenFolder => {
                if let Some(folder) = self.runtime.block_on(pick_folder()) {
                    let ctx_clone = ctx.clone();
                    let handle = self.runtime.handle().clone();
                    self.state
                        .open_folder(&folder, &handle, move || ctx_clone.request_repaint());
                }
            }
            Action::SelectAll => self.state.select_all(),
            Action::CopyToClipboard => {
                if let Some(text) = self.state.copy_selection() {
                    ctx.copy_text(text);
                }
            }
        }
    }

    /// Shows the notice at the front of the queue; drops it once closed.
    fn check_notification(&mut self, ctx: &Context) {
        if let Some(notification) = self.state.notices.front_mut()
            && !notification.show(ctx)
        {
            self.state.notices.pop_front();
        }
    }

    fn render_toolbar(&mut self, ui: &mut egui::Ui, ctx: &Context) {
        let loading = self.state.is_loading();
        let mut clicked = None;

        ui.horizontal(|ui| {
            for action in Action::ALL {
                let enabled = !(loading && action.opens_data());
                let response = ui
                    .add_enabled(enabled, egui::Button::new(action.label()))
                    .on_hover_text(action.hint());
                if response.clicked() {
                    clicked = Some(action);
                }
            }
        });

        if let Some(action) = clicked {
            self.dispatch(action, ctx);
        }
    }

    fn render_about(ui: &mut egui::Ui) {
        Frame::default()
            .stroke(Stroke::new(1.0, Color32::GRAY)) // Thin gray border for visual separation.
            .outer_margin(2.0)
            .inner_margin(10.0)
            .show(ui, |ui| {
                let version = env!("CARGO_PKG_VERSION");
                let description = env!("CARGO_PKG_DESCRIPTION");

                Grid::new("about_grid")
                    .num_columns(1)
                    .spacing([10.0, 4.0])
                    .show(ui, |ui| {
                        ui.with_layout(Layout::centered_and_justified(Direction::LeftToRight), |ui| {
                            ui.label(RichText::new("Parquet Viewer").font(FontId::proportional(30.0)));
                        });
                        ui.end_row();

                        ui.with_layout(Layout::centered_and_justified(Direction::LeftToRight), |ui| {
                            ui.label(format!("Version: {version}"));
                        });
                        ui.end_row();

                        ui.label(RichText::new(description).font(FontId::proportional(18.0)));
                        ui.end_row();

                        ui.horizontal(|ui| {
                            let url = "https://github.com/pola-rs/polars";
                            ui.label("Powered by ");
                            ui.add(Hyperlink::from_label_and_url("Polars", url))
                                .on_hover_text(url);
                        });
                        ui.end_row();

                        ui.horizontal(|ui| {
                            let url = "https://github.com/emilk/egui";
                            ui.label("Built with ");
                            ui.add(Hyperlink::from_label_and_url("egui", url))
                                .on_hover_text(url);
                        });
                        ui.end_row();
                    });
            });
    }
}

impl eframe::App for ParquetViewerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        // Open the command-line path once, on the first frame.
        if let Some(path) = self.startup_path.take() {
            self.open_path(&path, ctx);
        }

        // Apply any messages from the background loader; keep repainting while it runs.
        if self.state.poll_load() {
            ctx.request_repaint();
        }

        // Check and display any active notice (errors, warnings, information).
        self.check_notification(ctx);

        // Handle dropped files and folders.
        if let Some(dropped_file) = ctx.input(|i| i.raw.dropped_files.last().cloned())
            && let Some(path) = &dropped_file.path
            && !self.state.is_loading()
        {
            self.open_path(path, ctx);
        }

        //  | menu_bar        theme  |
        //  | toolbar buttons        |
        //  --------------------------
        //  |         |              |
        //  | Summary |     main     |
        //  | Schema  |     table    |
        //  |         |              |
        //  --------------------------
        //  | spinner + status       |

        TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    let loading = self.state.is_loading();
                    if ui.add_enabled(!loading, egui::Button::new("Open File")).clicked() {
                        ui.close();
                        self.dispatch(Action::OpenFile, ctx);
                    }
                    if ui.add_enabled(!loading, egui::Button::new("Open Folder")).clicked() {
                        ui.close();
                        self.dispatch(Action::OpenFolder, ctx);
                    }

                    ui.menu_button("About", Self::render_about);

                    if ui.button("Quit").clicked() {
                        ui.ctx().send_viewport_cmd(ViewportCommand::Close);
                    }
                });

                // Add spacing to align theme switch to the right.
                let delta = ui.available_width() - 15.0;
                if delta > 0.0 {
                    ui.add_space(delta);
                    widgets::global_theme_preference_switch(ui);
                }
            });

            self.render_toolbar(ui, ctx);
        });

        SidePanel::left("side_panel")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                ScrollArea::vertical().show(ui, |ui| {
                    egui::CollapsingHeader::new("Summary")
                        .default_open(true)
                        .show(ui, |ui| self.state.summary.render_summary(ui));

                    if !self.state.summary.is_empty() {
                        ui.collapsing("Schema", |ui| self.state.summary.render_schema(ui));
                    }
                });
            });

        TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.state.is_loading() {
                    ui.spinner(); // Indeterminate progress indicator.
                }
                ui.label(&self.state.status);
            });
        });

        // CentralPanel must be added after all other panels in your egui layout!
        CentralPanel::default().show(ctx, |ui| {
            // Display a warning message if the application is built in debug mode.
            warn_if_debug_build(ui);

            if self.state.current_table.is_some() {
                ScrollArea::horizontal()
                    .auto_shrink([false, false])
                    .show(ui, |ui| self.state.table_view.render(ui));
            } else if self.state.is_loading() {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
            } else {
                ui.centered_and_justified(|ui| {
                    ui.label("Open a Parquet file or folder, or drag and drop it here.");
                });
            }
        });
    }
}
