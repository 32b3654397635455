//! Error handling and custom error types
//!
//! Every failure of an analysis call surfaces as one variant of [`Error`].
//! The `Display` text is the message shown to the user.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Gemini API key not found. Please add GEMINI_API_KEY to your environment or .env file.")]
    MissingCredential,

    #[error("Failed to read attachment '{name}': {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Gemini API error: {0}")]
    Upstream(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model response did not contain a valid JSON object: {reason}")]
    MalformedResponse { raw: String, reason: String },

    #[error("Analysis was cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),
}

impl Error {
    /// Raw model output preserved by a [`Error::MalformedResponse`].
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::MalformedResponse { raw, .. } => Some(raw),
            _ => None,
        }
    }

    /// True for transport and provider-side failures.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::Upstream(_) | Error::Http(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
