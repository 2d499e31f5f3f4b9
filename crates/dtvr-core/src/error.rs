//! Error types for the DTVR destination
//!
//! None of these ever reach the host pipeline: the destination logs them
//! and degrades to "this event produced no sink call".

use thiserror::Error;

/// Result type alias for destination operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DTVR destination
#[derive(Error, Debug)]
pub enum Error {
    /// Destination settings are present but unusable
    #[error("Configuration error: {0}")]
    Config(String),

    /// The host settings blob could not be decoded for a destination
    #[error("Settings error ({destination}): {message}")]
    Settings {
        /// Destination key the settings were looked up under
        destination: String,
        /// Decoder message
        message: String,
    },

    /// The measurement sink could not be created
    #[error("Sink error ({sink}): {message}")]
    Sink {
        /// Sink name
        sink: String,
        /// Error message
        message: String,
    },

    /// A sink payload could not be built
    #[error("Payload error: {0}")]
    Payload(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a settings decoding error
    pub fn settings(destination: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Settings {
            destination: destination.into(),
            message: message.into(),
        }
    }

    /// Create a sink error
    pub fn sink(sink: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Sink {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Create a payload error
    pub fn payload(msg: impl Into<String>) -> Self {
        Self::Payload(msg.into())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
