//! Line sources for the interactive loop
//!
//! `TerminalInput` prompts through dialoguer when a user is at the keyboard.
//! `ReaderInput` reads plain lines from any reader, which covers piped stdin
//! and scripted sessions in tests.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use console::Term;
use dialoguer::Input;

use crate::pipeline::remove_active_downloads;
use crate::utils::print_farewell;

/// Prompt shown before every request
pub const PROMPT: &str = "enter file path or URL (q to exit)";

/// Farewell after an explicit quit or end of input
pub const QUIT_FAREWELL: &str = "Thanks for using xl2json, goodbye!";

/// Farewell after Ctrl+C
pub const INTERRUPT_FAREWELL: &str = "Cancelled. Thanks for using xl2json!";

/// Exit status used when the process is stopped by Ctrl+C
pub const INTERRUPT_EXIT_CODE: i32 = 130;

/// Result of asking for one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    Line(String),
    /// The user pressed Ctrl+C at the prompt
    Interrupted,
    /// The input stream ended
    Closed,
}

pub trait LineSource {
    /// Read one line, showing `prompt` if this source renders its own prompt
    fn read_line(&mut self, prompt: &str) -> Result<LineEvent>;

    /// Whether [`LineSource::read_line`] displays the prompt itself
    fn renders_prompt(&self) -> bool {
        false
    }
}

/// Interactive terminal input via dialoguer
pub struct TerminalInput {
    term: Term,
}

impl TerminalInput {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }
}

impl Default for TerminalInput {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for TerminalInput {
    fn read_line(&mut self, prompt: &str) -> Result<LineEvent> {
        let line = Input::<String>::new()
            .with_prompt(format!("\n{}", prompt))
            .allow_empty(true)
            .interact_text_on(&self.term);

        match line {
            Ok(line) => Ok(LineEvent::Line(line)),
            Err(dialoguer::Error::IO(e)) => match e.kind() {
                io::ErrorKind::Interrupted => Ok(LineEvent::Interrupted),
                io::ErrorKind::UnexpectedEof => Ok(LineEvent::Closed),
                _ => Err(e).context("failed to read from terminal"),
            },
            #[allow(unreachable_patterns)]
            Err(e) => Err(e).context("failed to read from terminal"),
        }
    }

    fn renders_prompt(&self) -> bool {
        true
    }
}

/// Line-by-line input from any reader
pub struct ReaderInput<R> {
    reader: R,
}

impl<R: BufRead> ReaderInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for ReaderInput<R> {
    fn read_line(&mut self, _prompt: &str) -> Result<LineEvent> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => Ok(LineEvent::Closed),
            Ok(_) => Ok(LineEvent::Line(
                line.trim_end_matches(['\n', '\r']).to_string(),
            )),
            Err(e) => Err(e).context("failed to read input line"),
        }
    }
}

/// Print the farewell and exit when Ctrl+C arrives outside the prompt
/// (while a workbook is being converted or downloaded). Downloads in
/// progress are removed first, since destructors do not run on exit.
pub fn install_interrupt_handler() -> Result<()> {
    ctrlc::set_handler(|| {
        remove_active_downloads();
        let _ = Term::stdout().show_cursor();
        let mut out = io::stdout();
        let _ = print_farewell(&mut out, INTERRUPT_FAREWELL);
        let _ = out.flush();
        log::info!("event=session_interrupted");
        log::logger().flush();
        std::process::exit(INTERRUPT_EXIT_CODE);
    })
    .context("failed to install Ctrl+C handler")
}
