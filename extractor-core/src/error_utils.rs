use crate::error::ExtractionError;
use tracing::{error, warn};

/// HTTP statuses that indicate rate limiting or a transient server failure.
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    fn is_retryable(&self) -> bool;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
}

impl ErrorExt for ExtractionError {
    fn log_error(&self) -> &Self {
        error!("ExtractionError: {}", self);
        match self {
            ExtractionError::RetriesExhausted { last_error, .. } => {
                error!("Last attempt failed with: {}", last_error);
            }
            ExtractionError::Io(e) => {
                error!("IO error details: {:?}", e);
            }
            _ => {}
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ExtractionError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        match self {
            ExtractionError::HttpStatus { status, .. } => RETRYABLE_STATUSES.contains(status),
            ExtractionError::Network { .. } => true,
            _ => false,
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ExtractionError::EmptyUrl => "No thread URL was given.".to_string(),
            ExtractionError::HttpStatus { status: 404, .. } => {
                "The thread could not be found. Please check the URL.".to_string()
            }
            ExtractionError::HttpStatus { status: 403, .. } => {
                "Access to the thread was denied. It may be private or quarantined.".to_string()
            }
            ExtractionError::HttpStatus { status, .. } => {
                format!("Reddit answered with HTTP {}.", status)
            }
            ExtractionError::Network { timeout: true, .. } => {
                "Request to Reddit timed out. Please try again.".to_string()
            }
            ExtractionError::Network { .. } => {
                "Network connection error. Please check your internet connection.".to_string()
            }
            ExtractionError::RetriesExhausted { attempts, .. } => format!(
                "Reddit kept failing after {} attempts. Please try again later.",
                attempts
            ),
            ExtractionError::InvalidJson(_) | ExtractionError::MalformedShape { .. } => {
                "Reddit returned data in an unexpected format.".to_string()
            }
            ExtractionError::EmptyPostListing => "The thread has no post.".to_string(),
            ExtractionError::Io(e) => format!("Could not write output: {}", e),
            ExtractionError::Serialization(_) => {
                "Could not serialize the extracted thread.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ExtractionError::EmptyUrl => "EMPTY_URL".to_string(),
            ExtractionError::HttpStatus { .. } => "HTTP_STATUS".to_string(),
            ExtractionError::Network { timeout: true, .. } => "TIMEOUT".to_string(),
            ExtractionError::Network { .. } => "NETWORK".to_string(),
            ExtractionError::RetriesExhausted { .. } => "RETRIES_EXHAUSTED".to_string(),
            ExtractionError::InvalidJson(_) => "INVALID_JSON".to_string(),
            ExtractionError::MalformedShape { .. } => "MALFORMED_SHAPE".to_string(),
            ExtractionError::EmptyPostListing => "EMPTY_POST_LISTING".to_string(),
            ExtractionError::Io(_) => "IO".to_string(),
            ExtractionError::Serialization(_) => "SERIALIZATION".to_string(),
        }
    }
}
