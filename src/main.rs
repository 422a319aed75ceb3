#![warn(clippy::all)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use parquet_viewer::{Arguments, ParquetViewerApp};
use tracing::error;

/*
cargo fmt
cargo test -- --nocapture
cargo run -- --help
cargo run -- data.parquet
cargo run -- exports/ --row-limit 0
cargo b -r && cargo install --path=.
*/

fn main() -> eframe::Result<()> {
    // Initialize the tracing subscriber for logging.
    // Use RUST_LOG environment variable to set logging level.  eg `export RUST_LOG=info`
    tracing_subscriber::fmt::init();

    // Parse command-line arguments.
    let args = Arguments::build();
    tracing::debug!("main()\nArguments: {args:#?}");

    // Configure the native options for the eframe application.
    let native_options = eframe::NativeOptions {
        centered: true,
        vsync: true,
        viewport: egui::ViewportBuilder::default()
            .with_title("Parquet Viewer")
            .with_inner_size([800.0, 600.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    // Run the eframe application.
    eframe::run_native(
        "Parquet Viewer",
        native_options,
        Box::new(move |creation_context| {
            match ParquetViewerApp::new(creation_context, &args) {
                Ok(app) => Ok(Box::new(app)),
                Err(err) => {
                    error!("Failed to initialize ParquetViewerApp: {}", err);
                    Err(err.into())
                }
            }
        }),
    )
}
