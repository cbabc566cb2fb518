//! Error types and diagnostics.
//!
//! Fatal conditions are reported through [`XmlError`]. Conditions the parser
//! can step over (text with no open element, a malformed attribute, a second
//! processing instruction) are recorded as [`ParseDiagnostic`]s on the
//! [`Document`](crate::Document) instead, each carrying the line, column, and
//! byte offset where it was found.

use std::fmt;
use std::path::PathBuf;

use crate::encoding::EncodingError;
use crate::escape::InvalidEscape;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, XmlError>;

/// Severity level for a parse diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// A non-fatal issue; the offending input was skipped.
    Warning,
    /// Malformed input that was tolerated because recovery mode is on.
    Error,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source location within an XML buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number (in characters, not bytes).
    pub column: u32,
    /// 0-based byte offset from the start of the input.
    pub byte_offset: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A single non-fatal diagnostic emitted during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
    /// The severity of this diagnostic.
    pub severity: ErrorSeverity,
    /// Human-readable message.
    pub message: String,
    /// Where in the source this was found.
    pub location: SourceLocation,
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} at {}", self.severity, self.message, self.location)
    }
}

/// Errors returned by parsing, tree mutation, dumping, and persistence.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// A required argument was empty or missing.
    #[error("bad arguments: {0}")]
    BadArguments(String),

    /// An end tag was found while no element was open.
    #[error("unbalanced end tag at {location}")]
    UnbalancedTag {
        /// Position of the offending `</`.
        location: SourceLocation,
    },

    /// A name, attribute value, or text run contained an invalid escape.
    #[error("invalid characters at {location}: {source}")]
    InvalidCharacters {
        /// Position of the token that failed to unescape.
        location: SourceLocation,
        /// The underlying unescape failure.
        source: InvalidEscape,
    },

    /// Unterminated or unsupported markup.
    #[error("malformed markup at {location}: {message}")]
    MalformedMarkup {
        /// What was wrong.
        message: String,
        /// Where the construct started.
        location: SourceLocation,
    },

    /// A second root node was added while multiple roots are disabled.
    #[error("document already has a root node")]
    TooManyRoots,

    /// A mutation addressed a node, attribute, or branch that does not exist.
    #[error("not found")]
    NotFound,

    /// Transcoding failed or the charset is unsupported.
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// A file could not be opened, read, written, or locked.
    #[error("{}: {source}", path.display())]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The advisory lock on a file could not be obtained after retrying.
    #[error("{}: stuck lock, giving up", path.display())]
    StuckLock {
        /// The locked file.
        path: PathBuf,
    },
}

impl XmlError {
    /// Returns the source location for parse-time errors.
    #[must_use]
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            Self::UnbalancedTag { location }
            | Self::InvalidCharacters { location, .. }
            | Self::MalformedMarkup { location, .. } => Some(*location),
            _ => None,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
