//! Raw input classification and validation

use std::path::{Path, PathBuf};

use super::error::ValidationError;

/// Extensions accepted as conversion sources (compared case-insensitively)
pub const SUPPORTED_EXTENSIONS: [&str; 5] = [".xlsx", ".xls", ".xlsb", ".xlsm", ".csv"];

/// What a line of user input asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Leave the interactive loop
    Quit,
    /// Blank line, nothing to do
    Empty,
    /// Download and convert a remote file
    Remote(String),
    /// Convert a local file
    Local(PathBuf),
}

/// Strip surrounding whitespace and one pair of leading/trailing quote characters.
///
/// Paths dragged into a terminal often arrive wrapped in quotes.
pub fn normalize_input(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix(['"', '\''])
        .unwrap_or(trimmed);
    trimmed.strip_suffix(['"', '\'']).unwrap_or(trimmed)
}

/// Check whether the input looks like an http(s) URL
pub fn is_url(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Classify a raw input line
pub fn parse_request(raw: &str) -> Request {
    let input = normalize_input(raw);

    if input.eq_ignore_ascii_case("q") {
        Request::Quit
    } else if input.is_empty() {
        Request::Empty
    } else if is_url(input) {
        Request::Remote(input.to_string())
    } else {
        Request::Local(PathBuf::from(input))
    }
}

/// Lowercased extension including the leading dot, or an empty string
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// Check that the extension is one of [`SUPPORTED_EXTENSIONS`]
pub fn check_extension(path: &Path) -> Result<(), ValidationError> {
    let extension = extension_of(path);
    if SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(ValidationError::UnsupportedExtension { extension })
    }
}

/// Validate a local source: it must exist and carry a supported extension.
///
/// Nothing is read from the file here.
pub fn validate_source(path: &Path) -> Result<(), ValidationError> {
    if path.as_os_str().is_empty() {
        return Err(ValidationError::Empty);
    }
    if !path.exists() {
        return Err(ValidationError::NotFound(path.to_path_buf()));
    }
    check_extension(path)
}
