use crate::{DEFAULT_ROW_LIMIT, ViewerError, ViewerResult};

use clap::Parser;
use std::path::PathBuf;

// https://stackoverflow.com/questions/74068168/clap-rs-not-printing-colors-during-help
fn get_styles() -> clap::builder::Styles {
    let cyan = anstyle::Color::Ansi(anstyle::AnsiColor::Cyan);
    let green = anstyle::Color::Ansi(anstyle::AnsiColor::Green);
    let yellow = anstyle::Color::Ansi(anstyle::AnsiColor::Yellow);

    clap::builder::Styles::styled()
        .placeholder(anstyle::Style::new().fg_color(Some(yellow)))
        .usage(anstyle::Style::new().fg_color(Some(cyan)).bold())
        .header(
            anstyle::Style::new()
                .fg_color(Some(cyan))
                .bold()
                .underline(),
        )
        .literal(anstyle::Style::new().fg_color(Some(green)))
}

// https://docs.rs/clap/latest/clap/struct.Command.html#method.help_template
const APPLET_TEMPLATE: &str = "\
{before-help}
{about-with-newline}
{usage-heading} {usage}

{all-args}
{after-help}";

const EX1: &str = r#" parquet-viewer"#;
const EX2: &str = r#" parquet-viewer data.parquet"#;
const EX3: &str = r#" parquet-viewer exports/2024/ --row-limit 0"#;

/// Command-line arguments for the Parquet viewer.
#[derive(Parser, Debug, Clone)]
#[command(
    // Read from `Cargo.toml`.
    version, about,
    long_about = None,
    next_line_help = true,
    help_template = APPLET_TEMPLATE,
    styles=get_styles(),
    after_help = format!("EXAMPLES:\n{EX1}\n{EX2}\n{EX3}")
)]
pub struct Arguments {
    /// Optional Parquet file or folder opened at startup.
    #[arg(
        value_name = "PATH",
        required = false,
        help = "Parquet file or folder to open [Optional]",
        long_help = "Path to a Parquet file, or to a folder whose Parquet files are merged.\n\
        If omitted, opens an empty window (use the buttons or drag and drop)."
    )]
    pub path: Option<PathBuf>,

    /// Maximum number of rows shown in the grid. [Default: 1000]
    #[arg(
        short = 'l',
        long,
        value_name = "ROWS",
        default_value_t = DEFAULT_ROW_LIMIT,
        help = "Maximum rows displayed in the grid (0 = all rows)",
        long_help = "Only the first ROWS rows are displayed; the summary still counts every row.\n\
        Use 0 to display the whole table.",
        value_parser = validate_row_limit
    )]
    pub row_limit: usize,
}

impl Arguments {
    /// Build `Arguments` struct.
    pub fn build() -> Arguments {
        Arguments::parse()
    }
}

/// clap validator for `--row-limit`: a non-negative integer.
fn validate_row_limit(s: &str) -> ViewerResult<usize> {
    s.trim()
        .parse::<usize>()
        .map_err(|err| ViewerError::InvalidArgument {
            arg_name: "--row-limit".to_string(),
            reason: err.to_string(),
        })
}

//----------------------------------------------------------------------------//
//                                   Tests                                    //
//----------------------------------------------------------------------------//
