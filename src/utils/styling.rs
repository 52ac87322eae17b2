//! Terminal styling utilities for the interactive prompt loop
//!
//! Every printer takes the session's output stream so the same code serves the
//! real terminal and captured output in tests. `console` drops the colors on its
//! own when stdout is not a terminal.

use std::io::{self, Write};
use std::path::Path;

use console::{style, Emoji};

use crate::pipeline::SUPPORTED_EXTENSIONS;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static SPARKLES: Emoji<'_, '_> = Emoji("✨ ", ">> ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[x] ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static LINK: Emoji<'_, '_> = Emoji("🔗 ", "");
pub static WAVE: Emoji<'_, '_> = Emoji("👋 ", "");

/// Width of separator rules
pub const RULE_WIDTH: usize = 50;

/// Print the application banner
pub fn print_banner(out: &mut impl Write, version: &str) -> io::Result<()> {
    let banner = r#"
    ██╗  ██╗██╗     ██████╗      ██╗███████╗ ██████╗ ███╗   ██╗
    ╚██╗██╔╝██║     ╚════██╗     ██║██╔════╝██╔═══██╗████╗  ██║
     ╚███╔╝ ██║      █████╔╝     ██║███████╗██║   ██║██╔██╗ ██║
     ██╔██╗ ██║     ██╔═══╝ ██   ██║╚════██║██║   ██║██║╚██╗██║
    ██╔╝ ██╗███████╗███████╗╚█████╔╝███████║╚██████╔╝██║ ╚████║
    ╚═╝  ╚═╝╚══════╝╚══════╝ ╚════╝ ╚══════╝ ╚═════╝ ╚═╝  ╚═══╝
    "#;

    writeln!(out)?;
    writeln!(out, "{}", style(banner).cyan().bold())?;
    writeln!(
        out,
        "    {} {}",
        style("{ }").magenta().bold(),
        style("Spreadsheets to JSON, one file per sheet").dim()
    )?;
    writeln!(out, "    {}", style(format!("v{}", version)).dim())?;
    writeln!(
        out,
        "    Supported formats: {}",
        style(SUPPORTED_EXTENSIONS.join(", ")).yellow()
    )?;
    print_rule(out)?;
    Ok(())
}

/// Print a dim horizontal rule
pub fn print_rule(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "    {}", style("━".repeat(RULE_WIDTH)).dim())
}

/// Print the source being processed
pub fn print_source(out: &mut impl Write, source: &str, remote: bool) -> io::Result<()> {
    let icon = if remote { &LINK } else { &FOLDER };
    writeln!(out)?;
    writeln!(out, "    {}{}", icon, style(source).dim())
}

/// Print an error message
pub fn print_error(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "    {}{}", CROSS, style(format!("Error: {}", message)).red())
}

/// Print an info message
pub fn print_info(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "    {}{}", INFO, message)
}

/// Print the completion line after a successful conversion
pub fn print_completion(out: &mut impl Write, files: usize) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "    {}{}",
        SPARKLES,
        style(format!("Conversion complete! {} JSON file(s) written", files))
            .green()
            .bold()
    )
}

/// Print the goodbye line
pub fn print_farewell(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "    {}{}", WAVE, style(message).cyan())
}

/// Shorten a path for table display, keeping its tail
pub fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

/// Shorten a string to `max_len` characters, keeping its tail
pub fn truncate_string(s: &str, max_len: usize) -> String {
    let len = s.chars().count();
    if len <= max_len {
        s.to_string()
    } else {
        let keep = max_len.saturating_sub(3);
        let tail: String = s.chars().skip(len - keep).collect();
        format!("...{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string_keeps_tail() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("/very/long/path/file.json", 12), ".../file.json");
    }

    #[test]
    fn test_truncate_string_multibyte() {
        assert_eq!(truncate_string("数据数据数据.json", 10), "...数据.json");
    }

    #[test]
    fn test_print_error_contains_message() {
        let mut buf = Vec::new();
        print_error(&mut buf, "file not found").unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Error: file not found"));
    }
}
