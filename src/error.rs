//! Error types for CON text parsing, binary encoding and decoding.
//!
//! Every operation in this crate returns [`Result`]. Nothing is printed; callers
//! decide how to present an error and which exit status to use.
//!
//! ## Error Categories
//!
//! - **Parse**: the text input violates the grammar (line/column, expected construct,
//!   offending character)
//! - **Decode**: the binary input is truncated, carries an unknown tag or an invalid
//!   length, or has trailing bytes (byte offset and field name)
//! - **Compression**: a compressed payload is corrupt or truncated
//! - **Encode**: the value tree is nested deeper than the configured limit
//! - **TypeMismatch**: a checked accessor was used against the wrong variant
//! - **Io**: a reader or writer failed
//!
//! ## Examples
//!
//! ```rust
//! use confile::{parse_text, ErrorCategory};
//!
//! let err = parse_text(r#"{"a": 1,}"#).unwrap_err();
//! assert_eq!(err.category(), ErrorCategory::Parse);
//! assert!(err.to_string().contains("line 1"));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised by this crate.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The text input does not match the grammar
    #[error("Syntax error at line {line}, column {col}: expected {expected}, found {found}")]
    Syntax {
        line: usize,
        col: usize,
        expected: String,
        found: String,
    },

    /// The text input ended in the middle of a value
    #[error("Unexpected end of input at line {line}, column {col}: expected {expected}")]
    UnexpectedEof {
        line: usize,
        col: usize,
        expected: String,
    },

    /// Text nesting deeper than `ConOptions::max_depth`
    #[error("Nesting too deep at line {line}, column {col}: limit is {limit}")]
    ParseDepthExceeded {
        line: usize,
        col: usize,
        limit: usize,
    },

    /// Binary input ends before a field is complete, or a length/count points past the end
    #[error("Truncated input at offset {offset}: {field} needs {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        field: &'static str,
        needed: u64,
        available: usize,
    },

    /// A tag byte outside the seven known variants
    #[error("Unknown tag byte {tag:#04x} at offset {offset}")]
    UnknownTag { offset: usize, tag: u8 },

    /// A flag or boolean byte other than 0 or 1
    #[error("Invalid {field} byte {byte:#04x} at offset {offset}")]
    InvalidByte {
        offset: usize,
        field: &'static str,
        byte: u8,
    },

    /// String or key bytes are not valid UTF-8
    #[error("Invalid UTF-8 in {field} at offset {offset}")]
    InvalidUtf8 { offset: usize, field: &'static str },

    /// Bytes left over after the root value (or after a compressed body)
    #[error("{count} trailing bytes at offset {offset}")]
    TrailingBytes { offset: usize, count: usize },

    /// Binary nesting deeper than `ConOptions::max_depth`
    #[error("Nesting too deep at offset {offset}: limit is {limit}")]
    DecodeDepthExceeded { offset: usize, limit: usize },

    /// A failure inside a decompressed body; `offset` locates the compressed
    /// payload in the enclosing buffer, the source carries the inner offset.
    #[error("In compressed body at offset {offset}: {source}")]
    InCompressedBody {
        offset: usize,
        #[source]
        source: Box<Error>,
    },

    /// DEFLATE stream failure
    #[error("Compression error: {0}")]
    Compression(String),

    /// Value tree nesting deeper than `ConOptions::max_depth`
    #[error("Cannot encode value nested deeper than {limit} levels")]
    EncodeDepthExceeded { limit: usize },

    /// Checked accessor used against the wrong variant
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error raised through the serde bridge
    #[error("Error: {0}")]
    Custom(String),
}

/// Coarse classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    Parse,
    Decode,
    Compression,
    Encode,
    TypeMismatch,
    Io,
    Data,
}

impl Error {
    /// Creates a syntax error for an unexpected character.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use confile::Error;
    ///
    /// let err = Error::syntax(3, 7, "':'", '=');
    /// assert!(err.to_string().contains("found '='"));
    /// ```
    pub fn syntax(line: usize, col: usize, expected: &str, found: char) -> Self {
        Error::Syntax {
            line,
            col,
            expected: expected.to_string(),
            found: format!("{:?}", found),
        }
    }

    /// Creates an end-of-input error for the text parser.
    pub fn unexpected_eof(line: usize, col: usize, expected: &str) -> Self {
        Error::UnexpectedEof {
            line,
            col,
            expected: expected.to_string(),
        }
    }

    /// Creates a truncation error for the binary decoder.
    pub fn truncated(offset: usize, field: &'static str, needed: u64, available: usize) -> Self {
        Error::Truncated {
            offset,
            field,
            needed,
            available,
        }
    }

    /// Creates a compression error.
    pub fn compression<T: fmt::Display>(msg: T) -> Self {
        Error::Compression(msg.to_string())
    }

    /// Creates a type mismatch error for checked accessors.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use confile::Error;
    ///
    /// let err = Error::type_mismatch("Integer", "String");
    /// assert!(err.to_string().contains("expected Integer"));
    /// ```
    pub fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        Error::TypeMismatch { expected, found }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reader/writer failures.
    pub fn io(err: &std::io::Error) -> Self {
        Error::Io(err.to_string())
    }

    /// Returns the category this error belongs to.
    ///
    /// Errors wrapped in [`Error::InCompressedBody`] report the category of
    /// the inner error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Syntax { .. }
            | Error::UnexpectedEof { .. }
            | Error::ParseDepthExceeded { .. } => ErrorCategory::Parse,
            Error::Truncated { .. }
            | Error::UnknownTag { .. }
            | Error::InvalidByte { .. }
            | Error::InvalidUtf8 { .. }
            | Error::TrailingBytes { .. }
            | Error::DecodeDepthExceeded { .. } => ErrorCategory::Decode,
            Error::InCompressedBody { source, .. } => source.category(),
            Error::Compression(_) => ErrorCategory::Compression,
            Error::EncodeDepthExceeded { .. } => ErrorCategory::Encode,
            Error::TypeMismatch { .. } => ErrorCategory::TypeMismatch,
            Error::Io(_) => ErrorCategory::Io,
            Error::Custom(_) => ErrorCategory::Data,
        }
    }

    /// Wraps an error raised while decoding a decompressed body.
    pub(crate) fn in_compressed_body(offset: usize, source: Error) -> Self {
        Error::InCompressedBody {
            offset,
            source: Box::new(source),
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_category() {
        let inner = Error::UnknownTag {
            offset: 9,
            tag: 0x42,
        };
        let err = Error::in_compressed_body(17, inner);
        assert_eq!(err.category(), ErrorCategory::Decode);
        let msg = err.to_string();
        assert!(msg.contains("offset 17"));
        assert!(msg.contains("0x42"));
    }

    #[test]
    fn test_syntax_message() {
        let err = Error::syntax(1, 9, "',' or '}'", ']');
        assert_eq!(err.category(), ErrorCategory::Parse);
        assert_eq!(
            err.to_string(),
            "Syntax error at line 1, column 9: expected ',' or '}', found ']'"
        );
    }
}
