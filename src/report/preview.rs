//! Data preview printed after a successful conversion

use std::io::{self, Write};

use console::style;

use crate::pipeline::{write_json, Record};

/// Print the first `rows` records as pretty JSON
pub fn print_preview(
    out: &mut impl Write,
    sheet_name: &str,
    records: &[Record],
    rows: usize,
) -> io::Result<()> {
    if rows == 0 || records.is_empty() {
        return Ok(());
    }

    let shown = rows.min(records.len());
    writeln!(out)?;
    writeln!(
        out,
        "    {} {}",
        style("✧").cyan(),
        style(format!("Preview of '{}' (first {} row(s)):", sheet_name, shown)).white()
    )?;

    let mut buf = Vec::new();
    write_json(&mut buf, &records[..shown])?;
    for line in String::from_utf8_lossy(&buf).lines() {
        writeln!(out, "      {}", style(line).dim())?;
    }
    Ok(())
}
