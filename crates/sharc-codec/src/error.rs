//! Error types for shader archive operations.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::SchemaVersion;
use crate::validate::CrossReferenceWarning;

/// Errors that can occur when decoding or encoding shader archives.
#[derive(Debug, Error)]
pub enum SharcError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Archive header is not a supported SHARC header.
    #[error("malformed header: {message}")]
    MalformedHeader { message: String },

    /// A field read would run past the end of the buffer.
    #[error("truncated buffer: need {needed} bytes at offset {offset}, {available} available")]
    TruncatedBuffer {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A record declares a size that cannot hold its own header.
    #[error("malformed {record} record at offset {offset}: {message}")]
    MalformedRecord {
        record: &'static str,
        offset: usize,
        message: String,
    },

    /// A structural invariant of the archive does not hold.
    #[error("invariant violated in {location}: {message}")]
    InvariantViolation { location: String, message: String },

    /// Bytes are not valid in the expected text encoding.
    #[error("invalid {encoding} text at offset {offset}")]
    InvalidText {
        offset: usize,
        encoding: &'static str,
    },

    /// Text cannot be represented in the on-disk encoding.
    #[error("text of '{name}' cannot be encoded as {encoding}")]
    UnencodableText {
        name: String,
        encoding: &'static str,
    },

    /// A length does not fit the 32-bit on-disk fields.
    #[error("length {length} exceeds the 32-bit field limit")]
    LengthOverflow { length: usize },

    /// A program's variation layout does not match the archive version.
    #[error("program '{program}' carries {found} variations but the archive is {expected}")]
    SchemaMismatch {
        program: String,
        expected: SchemaVersion,
        found: SchemaVersion,
    },

    /// Cross-reference warnings promoted to an error in strict mode.
    #[error("{} cross-reference warning(s)", .0.len())]
    Validation(Vec<CrossReferenceWarning>),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, SharcError>;

impl SharcError {
    /// Create a MalformedHeader error.
    pub fn malformed_header(message: impl Into<String>) -> Self {
        Self::MalformedHeader {
            message: message.into(),
        }
    }

    /// Create a MalformedRecord error.
    pub fn malformed_record(record: &'static str, offset: usize, message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            record,
            offset,
            message: message.into(),
        }
    }

    /// Create an InvariantViolation error.
    pub fn invariant(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Whether this error reports a broken archive invariant.
    #[must_use]
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::InvariantViolation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SharcError::malformed_header("bad magic");
        assert_eq!(format!("{err}"), "malformed header: bad magic");

        let err = SharcError::TruncatedBuffer {
            offset: 12,
            needed: 4,
            available: 2,
        };
        assert_eq!(
            format!("{err}"),
            "truncated buffer: need 4 bytes at offset 12, 2 available"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: SharcError = io_err.into();
        assert!(matches!(err, SharcError::Io(_)));
    }

    #[test]
    fn test_schema_mismatch_mentions_versions() {
        let err = SharcError::SchemaMismatch {
            program: "p0".to_string(),
            expected: SchemaVersion::V11,
            found: SchemaVersion::V10,
        };
        let text = format!("{err}");
        assert!(text.contains("v10"));
        assert!(text.contains("v11"));
    }
}
