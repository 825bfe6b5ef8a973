/*!
 * Error types for the furisub application.
 *
 * Fatal conditions are modelled as `thiserror` enums and propagate to the
 * caller. Recoverable conditions never become errors: they are described by
 * [`Diagnostic`] values that the producing stage logs and then absorbs.
 */

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing whole artifacts
#[derive(Error, Debug)]
pub enum InputError {
    /// A file could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Offending path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A file could not be written
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Offending path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The outer document (e.g. the JSON content track) is malformed
    #[error("Malformed document {path}: {message}")]
    MalformedDocument {
        /// Offending path
        path: PathBuf,
        /// Parser message
        message: String,
    },
}

/// Errors raised by the format emitters
#[derive(Error, Debug)]
pub enum EmitError {
    /// The timeline needs exactly one raster artifact per aligned entry
    #[error("Artifact count mismatch: expected {expected} raster artifacts, found {actual}")]
    ArtifactCountMismatch {
        /// Number of aligned entries
        expected: usize,
        /// Number of raster artifacts supplied
        actual: usize,
    },

    /// XML serialization failed
    #[error("XML error: {0}")]
    Xml(String),

    /// Image encoding or saving failed
    #[error("Image error: {0}")]
    Image(String),

    /// A font could not be loaded or parsed
    #[error("Font error: {0}")]
    Font(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error loading an input artifact
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Error from an emitter
    #[error("Emit error: {0}")]
    Emit(#[from] EmitError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

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

/// Recoverable conditions absorbed by the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A tag outside the ruby pattern was stripped
    MalformedMarkup {
        /// The stripped tag text, including angle brackets
        tag: String,
    },

    /// Content and timing tracks differ in length; the longer one was truncated
    LengthMismatch {
        /// Number of content units supplied
        content_units: usize,
        /// Number of intervals supplied
        intervals: usize,
    },

    /// A character had no romanization and passed through unchanged
    UnsupportedCharacter(char),

    /// A ruby annotation had no reading and was skipped
    MissingReading {
        /// Base text of the skipped annotation
        base: String,
    },

    /// A ruby annotation had no base text and was skipped
    MissingBase {
        /// Reading of the skipped annotation
        reading: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedMarkup { tag } => write!(f, "stripped unrecognized tag {}", tag),
            Self::LengthMismatch { content_units, intervals } => write!(
                f,
                "{} content units but {} timing intervals, truncating to {}",
                content_units,
                intervals,
                (*content_units).min(*intervals)
            ),
            Self::UnsupportedCharacter(c) => write!(f, "no romanization for {:?}, kept as-is", c),
            Self::MissingReading { base } => write!(f, "ruby annotation '{}' has no reading, skipped", base),
            Self::MissingBase { reading } => write!(f, "ruby reading '{}' has no base text, skipped", reading),
        }
    }
}
