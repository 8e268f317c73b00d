/*!
 * Error types for the wordtalk application.
 *
 * This module contains custom error types for the catalog, the clip player and
 * the sequencer, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur while loading the vocabulary catalog
#[derive(Error, Debug)]
pub enum CatalogLoadError {
    /// The request for the catalog could not be sent or completed
    #[error("Failed to fetch vocabulary: {0}")]
    Fetch(String),

    /// The server answered with a non-success status
    #[error("Vocabulary request failed: {status_code} - {url}")]
    Status {
        /// HTTP status code
        status_code: u16,
        /// Requested URL
        url: String,
    },

    /// Reading a local catalog file failed
    #[error("Failed to read vocabulary file: {0}")]
    Io(#[from] std::io::Error),

    /// The payload was not valid vocabulary JSON
    #[error("Failed to parse vocabulary: {0}")]
    Parse(#[from] serde_json::Error),

    /// The dataset parsed but contains no parts
    #[error("Vocabulary contains no parts")]
    Empty,

    /// The catalog location could not be built from the configuration
    #[error("Invalid vocabulary location: {0}")]
    InvalidLocation(String),
}

/// Errors raised by a clip player
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    /// The clip could not be fetched or decoded
    #[error("Failed to load audio clip {url}: {reason}")]
    Load {
        /// Clip URL
        url: String,
        /// Underlying cause
        reason: String,
    },

    /// The audio device refused to play the clip
    #[error("Failed to play audio clip {url}: {reason}")]
    Device {
        /// Clip URL
        url: String,
        /// Underlying cause
        reason: String,
    },

    /// A clip reference could not be resolved to a URL
    #[error("Invalid audio reference '{0}'")]
    InvalidReference(String),
}

/// Errors raised by sequencer operations that take explicit coordinates
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SequencerError {
    /// A cursor outside the catalog bounds
    #[error("Position part {part}, word {word} is outside the catalog")]
    InvalidPosition {
        /// Part index
        part: usize,
        /// Word index
        word: usize,
    },

    /// A voice that no word in the catalog provides
    #[error("Unknown voice: {0}")]
    UnknownVoice(String),
}

impl From<reqwest::Error> for CatalogLoadError {
    fn from(error: reqwest::Error) -> Self {
        Self::Fetch(error.to_string())
    }
}
