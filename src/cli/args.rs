//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use super::session::SessionConfig;
use crate::pipeline::{default_temp_dir, FetchOptions};

/// xl2json - Convert Excel and CSV spreadsheets to JSON, one file per sheet.
///
/// Runs an interactive prompt: enter a file path or an http(s) URL, or q to exit.
#[derive(Parser, Debug)]
#[command(name = "xl2json")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory for the JSON files.
    /// Defaults to the input file's directory (the current directory for downloads).
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Number of records previewed after each conversion (0 disables the preview)
    #[arg(long, default_value = "3")]
    pub preview_rows: usize,

    /// Directory for downloaded files.
    /// Defaults to an `xl2json` folder inside the system temp directory.
    #[arg(long)]
    pub temp_dir: Option<PathBuf>,

    /// Timeout in seconds for downloads. Without it a download waits as long as
    /// the connection stays open.
    #[arg(long, value_parser = validate_download_timeout)]
    pub download_timeout: Option<u64>,

    /// Log level: off, error, warn, info, debug or trace (RUST_LOG overrides)
    #[arg(long, default_value = "error")]
    pub log_level: String,

    /// Write logs to rotating files in this directory instead of stderr
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Skip the start banner
    #[arg(long, default_value = "false")]
    pub no_banner: bool,
}

impl Cli {
    /// Build the session settings from the parsed flags
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            output_dir: self.output_dir.clone(),
            preview_rows: self.preview_rows,
            fetch: FetchOptions {
                temp_dir: self.temp_dir.clone().unwrap_or_else(default_temp_dir),
                timeout: self.download_timeout.map(Duration::from_secs),
            },
        }
    }
}

/// Validator for download_timeout parameter
fn validate_download_timeout(s: &str) -> Result<u64, String> {
    let value: u64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number of seconds", s))?;

    if value == 0 {
        Err("download_timeout must be at least 1 second".to_string())
    } else {
        Ok(value)
    }
}
