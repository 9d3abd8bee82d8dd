/*!
 * Error types for the subshift library.
 *
 * Parsing and timing failures are typed with thiserror so callers can
 * match on them; the application layer wraps everything in `AppError`
 * or an `anyhow::Error` with context.
 */

use thiserror::Error;

use crate::formats::SubtitleFormat;

/// Errors that can occur while reading or resolving subtitle files
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The file name or extension maps to no known subtitle format
    #[error("File or extension {0} not supported")]
    UnsupportedFormat(String),

    /// A required time field could not be parsed
    #[error("Malformed timestamp '{value}' at line {line}")]
    MalformedTimestamp {
        /// 1-based line number in the input
        line: usize,
        /// The offending token or line
        value: String,
    },

    /// A required section header or marker is absent
    #[error("Missing required section: {0}")]
    MissingSection(&'static str),

    /// A dialogue line has fewer fields than the `Format:` line declares
    #[error("Dialogue at line {line} has {found} fields, expected {expected}")]
    MissingFields {
        line: usize,
        found: usize,
        expected: usize,
    },

    /// The input contained no subtitle cues at all
    #[error("No subtitle cues found")]
    NoCues,

    /// Parsing is not implemented for this format
    #[error("Parsing {0} subtitles is not supported")]
    ParseUnsupported(SubtitleFormat),

    /// Reading the input stream failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during timing transformations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimingError {
    /// Cue indices are out of bounds or inverted
    #[error("Invalid cue range {first}..={last} for {len} cues")]
    InvalidRange {
        first: usize,
        last: usize,
        len: usize,
    },

    /// The first and last cue of the range begin at the same instant
    #[error("Cannot rescale: cues {first} and {last} begin at the same time")]
    DegenerateRange { first: usize, last: usize },

    /// The reference document used for resync has no cues
    #[error("Reference subtitle has no cues to sync against")]
    EmptyReference,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle parsing or format resolution
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from a timing transformation
    #[error("Timing error: {0}")]
    Timing(#[from] TimingError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
