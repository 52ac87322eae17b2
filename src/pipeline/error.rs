//! Error types for spreadsheet conversion.
//!
//! `ConvertError` covers every failure a single conversion request can hit:
//! reading the source, converting a sheet, writing the JSON output, and
//! downloading a remote file. `ValidationError` covers rejections that happen
//! before any of that starts.

use std::path::PathBuf;

use thiserror::Error;

use super::input::SUPPORTED_EXTENSIONS;

/// Boxed source error from one of the spreadsheet readers.
pub type ReadSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while converting a spreadsheet to JSON.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The source file could not be opened or parsed.
    ///
    /// Missing files, unrecognized formats and corrupted workbooks all end up
    /// here, wrapping the underlying calamine / csv / io error.
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ReadSource,
    },

    /// A sheet could not be turned into records.
    #[error("failed to convert sheet '{sheet}': {message}")]
    Convert { sheet: String, message: String },

    /// The JSON output could not be written.
    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A remote file could not be fetched.
    #[error("failed to download {url}: {message}")]
    Download { url: String, message: String },

    /// The request was rejected before any work started.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Rejections for raw user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no file path or URL given")]
    Empty,

    #[error("file not found: '{}'", .0.display())]
    NotFound(PathBuf),

    #[error(
        "unsupported file format '{extension}'. Supported formats: {}",
        SUPPORTED_EXTENSIONS.join(", ")
    )]
    UnsupportedExtension { extension: String },

    #[error("not a valid URL: {0}")]
    InvalidUrl(String),
}

impl ConvertError {
    pub fn read(path: impl Into<PathBuf>, source: impl Into<ReadSource>) -> Self {
        ConvertError::Read {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Write {
            path: path.into(),
            source,
        }
    }

    pub fn download(url: impl Into<String>, message: impl std::fmt::Display) -> Self {
        ConvertError::Download {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Short label for the error category, used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            ConvertError::Read { .. } => "read",
            ConvertError::Convert { .. } => "convert",
            ConvertError::Write { .. } => "write",
            ConvertError::Download { .. } => "download",
            ConvertError::Validation(_) => "validation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_unsupported_extension_lists_supported_formats() {
        let err = ValidationError::UnsupportedExtension {
            extension: ".txt".to_string(),
        };
        let msg = err.to_string();

        assert!(msg.contains(".txt"));
        for ext in SUPPORTED_EXTENSIONS {
            assert!(msg.contains(ext), "message should list {ext}: {msg}");
        }
    }

    #[test]
    fn test_validation_converts_with_question_mark() {
        fn validate() -> Result<(), ConvertError> {
            Err(ValidationError::Empty)?;
            Ok(())
        }

        let err = validate().unwrap_err();
        assert!(matches!(err, ConvertError::Validation(ValidationError::Empty)));
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn test_read_error_keeps_source() {
        let err = ConvertError::read(
            "/tmp/book.xlsx",
            calamine::Error::Msg("Corrupted file"),
        );

        let msg = err.to_string();
        assert!(msg.contains("book.xlsx"));
        assert!(msg.contains("Corrupted file"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_write_error_display() {
        let err = ConvertError::write(
            "/readonly/out.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied"),
        );

        assert_eq!(err.kind(), "write");
        assert!(err.to_string().contains("Permission denied"));
    }
}
