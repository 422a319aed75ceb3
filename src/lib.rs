#![warn(clippy::all)]
#![doc = include_str!("../README.md")]

// Modules that make up the Parquet viewer library.
mod args;
mod error;
mod file_dialog;
mod file_extension;
mod layout;
mod loader;
mod reader;
mod state;
mod summary;
mod table;
mod table_view;
mod traits;

// Publicly expose the contents of these modules.
pub use self::{
    args::Arguments,
    error::*,
    file_dialog::*,
    file_extension::*,
    layout::*,
    loader::*,
    reader::{MergeEvent, MergeOutcome, TableMerger, read_and_merge, read_and_merge_with, read_table},
    state::*,
    summary::*,
    table::*,
    table_view::*,
    traits::*,
};
