use thiserror::Error;

/// Every failure the extractor can surface for a single thread URL.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("URL is empty")]
    EmptyUrl,

    #[error("Request failed with status {status}: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Network error: {message}")]
    Network { message: String, timeout: bool },

    #[error("Failed to fetch thread after {attempts} attempts: {url} ({last_error})")]
    RetriesExhausted {
        attempts: u32,
        url: String,
        last_error: String,
    },

    #[error("Invalid JSON payload: {0}")]
    InvalidJson(String),

    #[error("Unexpected Reddit JSON shape: {details}")]
    MalformedShape { details: String },

    #[error("Post listing is empty")]
    EmptyPostListing,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ExtractionError {
    pub fn malformed(details: impl Into<String>) -> Self {
        Self::MalformedShape {
            details: details.into(),
        }
    }

    pub fn network(message: impl Into<String>, timeout: bool) -> Self {
        Self::Network {
            message: message.into(),
            timeout,
        }
    }

    /// Status code carried by the error, if it came from an HTTP response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ExtractionError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractionError>;
