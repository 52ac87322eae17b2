//! Interactive conversion session
//!
//! The session owns the line source and the output stream for the whole run.
//! It moves between two working states:
//!
//! - `AwaitingInput`: waiting for the next path, URL or `q`
//! - `Processing`: validating, downloading and converting one request
//!
//! and ends in `Closed` after a quit, an interrupt or the end of input.
//! Conversion failures are reported and never end the session.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};

use super::convert::{run_convert, ConversionOutcome};
use super::prompts::{LineEvent, LineSource, INTERRUPT_FAREWELL, PROMPT, QUIT_FAREWELL};
use crate::pipeline::{
    check_extension, fetch_to_temp, file_name_from_url, parse_request, parse_url, validate_source,
    ConvertError, FetchOptions, Request,
};
use crate::report::{print_preview, ConversionSummary};
use crate::utils::{
    print_completion, print_error, print_farewell, print_info, print_rule, print_source,
};

/// Settings that shape every request in a session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Where JSON files go. `None` writes next to local inputs and into the
    /// current directory for downloads.
    pub output_dir: Option<PathBuf>,
    /// Records shown after each conversion (0 disables the preview)
    pub preview_rows: usize,
    pub fetch: FetchOptions,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            preview_rows: 3,
            fetch: FetchOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingInput,
    Processing,
    Closed,
}

/// Why the session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Quit,
    Interrupted,
    EndOfInput,
}

/// What to do after handling one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Exit(SessionOutcome),
}

pub struct Session<I, W> {
    input: I,
    out: W,
    config: SessionConfig,
    state: SessionState,
    history: Vec<ConversionSummary>,
    failures: usize,
}

impl<I: LineSource, W: Write> Session<I, W> {
    pub fn new(input: I, out: W, config: SessionConfig) -> Self {
        Self {
            input,
            out,
            config,
            state: SessionState::AwaitingInput,
            history: Vec::new(),
            failures: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Successful conversions so far, oldest first
    pub fn history(&self) -> &[ConversionSummary] {
        &self.history
    }

    /// Number of requests that ended in an error
    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Consume the session and hand back its output stream
    pub fn into_output(self) -> W {
        self.out
    }

    /// Prompt and process requests until quit, interrupt or end of input
    pub fn run(&mut self) -> Result<SessionOutcome> {
        log::info!("event=session_start");

        while self.state != SessionState::Closed {
            if !self.input.renders_prompt() {
                write!(self.out, "\n{}: ", PROMPT)?;
                self.out.flush()?;
            }

            let step = match self.input.read_line(PROMPT)? {
                LineEvent::Line(line) => self.handle_line(&line)?,
                LineEvent::Interrupted => Step::Exit(SessionOutcome::Interrupted),
                LineEvent::Closed => Step::Exit(SessionOutcome::EndOfInput),
            };

            if let Step::Exit(outcome) = step {
                self.close(outcome)?;
                return Ok(outcome);
            }
        }

        Ok(SessionOutcome::Quit)
    }

    /// Handle one raw input line
    pub fn handle_line(&mut self, raw: &str) -> Result<Step> {
        match parse_request(raw) {
            Request::Quit => Ok(Step::Exit(SessionOutcome::Quit)),
            Request::Empty => Ok(Step::Continue),
            Request::Remote(url) => {
                self.process(&url, true)?;
                Ok(Step::Continue)
            }
            Request::Local(path) => {
                self.process(&path.display().to_string(), false)?;
                Ok(Step::Continue)
            }
        }
    }

    fn process(&mut self, source: &str, remote: bool) -> Result<()> {
        self.state = SessionState::Processing;
        log::info!("event=request source={} remote={}", source, remote);
        print_source(&mut self.out, source, remote)?;
        self.out.flush()?;

        let started = Instant::now();
        let converted = if remote {
            self.convert_remote(source)
        } else {
            self.convert_local(Path::new(source))
        };

        match converted {
            Ok(outcome) => {
                let summary = ConversionSummary::new(source, remote, outcome.results)
                    .with_elapsed(started.elapsed());
                summary.display(&mut self.out)?;
                if let Some(preview) = &outcome.preview {
                    print_preview(
                        &mut self.out,
                        &preview.sheet_name,
                        &preview.records,
                        self.config.preview_rows,
                    )?;
                }
                print_completion(&mut self.out, summary.sheet_count())?;
                self.history.push(summary);
            }
            Err(e) => {
                self.failures += 1;
                log::warn!("event=request_failed kind={} error={}", e.kind(), e);
                print_error(&mut self.out, &e.to_string())?;
            }
        }

        writeln!(self.out)?;
        print_rule(&mut self.out)?;
        self.out.flush()?;
        self.state = SessionState::AwaitingInput;
        Ok(())
    }

    fn convert_local(&self, path: &Path) -> Result<ConversionOutcome, ConvertError> {
        validate_source(path)?;
        run_convert(
            path,
            self.config.output_dir.as_deref(),
            self.config.preview_rows,
        )
    }

    // The download is removed when it goes out of scope, whether or not the
    // conversion succeeded
    fn convert_remote(&self, url: &str) -> Result<ConversionOutcome, ConvertError> {
        check_extension(Path::new(&file_name_from_url(&parse_url(url)?)))?;
        let download = fetch_to_temp(url, &self.config.fetch)?;
        validate_source(download.path())?;

        let output_dir = match &self.config.output_dir {
            Some(dir) => Some(dir.clone()),
            None => std::env::current_dir().ok(),
        };
        run_convert(
            download.path(),
            output_dir.as_deref(),
            self.config.preview_rows,
        )
    }

    fn close(&mut self, outcome: SessionOutcome) -> Result<()> {
        if !self.history.is_empty() {
            let files: usize = self.history.iter().map(|s| s.sheet_count()).sum();
            writeln!(self.out)?;
            print_info(
                &mut self.out,
                &format!(
                    "{} conversion(s) this session, {} JSON file(s) written",
                    self.history.len(),
                    files
                ),
            )?;
        }

        let farewell = match outcome {
            SessionOutcome::Interrupted => INTERRUPT_FAREWELL,
            SessionOutcome::Quit | SessionOutcome::EndOfInput => QUIT_FAREWELL,
        };
        print_farewell(&mut self.out, farewell)?;
        self.out.flush().context("failed to flush output")?;

        self.state = SessionState::Closed;
        log::info!(
            "event=session_end outcome={:?} conversions={} failures={}",
            outcome,
            self.history.len(),
            self.failures
        );
        Ok(())
    }
}
