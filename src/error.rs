//! Error types for the annotation engine.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AnnotatorError>;

/// Errors that can occur while setting up or driving an annotation surface.
#[derive(Error, Debug)]
pub enum AnnotatorError {
    /// Invalid frame, option or color configuration.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem
        message: String,
    },

    /// Seed annotation data whose shape is not understood
    #[error("Unsupported input: {message}")]
    UnsupportedInput {
        /// Description of the rejected input
        message: String,
    },

    /// Polygon index outside the store
    #[error("Polygon index {index} out of range (store holds {len})")]
    OutOfRange {
        /// The requested index
        index: usize,
        /// Number of polygons at the time of the request
        len: usize,
    },

    /// Saving settings through the host failed
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// The image resource could not be decoded
    #[error("Image decode error: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnnotatorError {
    /// Create a configuration error with a message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an unsupported input error with a message.
    pub fn unsupported_input(message: impl Into<String>) -> Self {
        Self::UnsupportedInput {
            message: message.into(),
        }
    }

    /// Create an out-of-range error.
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::OutOfRange { index, len }
    }
}

/// Failure reported by the host when persisting settings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Persistence error: {message}")]
pub struct PersistenceError {
    /// Description reported by the host
    pub message: String,
}

impl PersistenceError {
    /// Create a persistence error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
