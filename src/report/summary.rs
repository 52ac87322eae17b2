//! Conversion summary report

use std::io::{self, Write};
use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;
use serde::Serialize;

use crate::pipeline::ConversionResult;
use crate::utils::truncate_path;

const MAX_PATH_WIDTH: usize = 60;

/// Summary of one conversion request
#[derive(Debug, Clone, Serialize)]
pub struct ConversionSummary {
    /// Path or URL the user entered
    pub source: String,
    pub remote: bool,
    pub results: Vec<ConversionResult>,
    pub elapsed: Duration,
}

impl ConversionSummary {
    pub fn new(source: impl Into<String>, remote: bool, results: Vec<ConversionResult>) -> Self {
        Self {
            source: source.into(),
            remote,
            results,
            elapsed: Duration::ZERO,
        }
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    pub fn sheet_count(&self) -> usize {
        self.results.len()
    }

    pub fn total_rows(&self) -> usize {
        self.results.iter().map(|r| r.row_count).sum()
    }

    /// Render the per-sheet table
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Sheet").add_attribute(Attribute::Bold),
            Cell::new("Rows").add_attribute(Attribute::Bold),
            Cell::new("Output").add_attribute(Attribute::Bold),
        ]);

        for result in &self.results {
            table.add_row(vec![
                Cell::new(&result.sheet_name).fg(Color::Cyan),
                Cell::new(result.row_count)
                    .fg(if result.row_count == 0 {
                        Color::Yellow
                    } else {
                        Color::Green
                    })
                    .set_alignment(CellAlignment::Right),
                Cell::new(truncate_path(&result.output_path, MAX_PATH_WIDTH)),
            ]);
        }

        if self.results.len() > 1 {
            table.add_row(vec![
                Cell::new("Total").add_attribute(Attribute::Bold),
                Cell::new(self.total_rows())
                    .add_attribute(Attribute::Bold)
                    .set_alignment(CellAlignment::Right),
                Cell::new(format!("{} file(s)", self.sheet_count())),
            ]);
        }

        table
    }

    pub fn display(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out)?;
        writeln!(
            out,
            "    {} {}",
            style("📋").cyan(),
            style("CONVERSION SUMMARY").white().bold()
        )?;
        writeln!(out, "    {}", style("─".repeat(50)).dim())?;

        // Indent the table
        for line in self.to_table().to_string().lines() {
            writeln!(out, "    {}", line)?;
        }

        writeln!(
            out,
            "    {}",
            style(format!("Finished in {:.2}s", self.elapsed.as_secs_f64())).dim()
        )
    }
}
