//! xl2json: Spreadsheet to JSON CLI Tool
//!
//! An interactive command-line tool that converts Excel and CSV files,
//! local or downloaded from a URL, into one JSON file per sheet.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::Parser;
use console::Term;

use xl2json::cli::{install_interrupt_handler, Cli, ReaderInput, Session, TerminalInput};
use xl2json::utils::{init_logging, print_banner};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the handle alive until exit so buffered log lines get flushed
    let _logger = init_logging(&cli.log_level, cli.log_dir.as_deref())?;
    install_interrupt_handler()?;

    if !cli.no_banner {
        print_banner(&mut io::stdout(), env!("CARGO_PKG_VERSION"))?;
    }

    let config = cli.session_config();
    let outcome = if io::stdin().is_terminal() && Term::stdout().is_term() {
        Session::new(TerminalInput::new(), io::stdout(), config).run()?
    } else {
        Session::new(ReaderInput::new(io::stdin().lock()), io::stdout(), config).run()?
    };

    log::info!("event=app_exit outcome={:?}", outcome);
    Ok(())
}
