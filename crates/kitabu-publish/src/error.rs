//! Submission errors

use std::fmt;

/// Message shown when the request never produced a usable answer.
pub const GENERIC_FAILURE: &str = "Failed to create book. Please try again.";

/// Error raised while preparing or sending a book submission
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PublishError {
    /// A required form field is blank
    Invalid {
        /// Human name of the field, e.g. `title` or `text of page 2`.
        field: String,
    },
    /// Server answered with a non-success status
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Server `error` field, verbatim.
        message: String,
    },
    /// Request could not be sent or the answer could not be read
    Transport(String),
    /// Answer was not the expected JSON
    Decode(String),
    /// Local attachment could not be read
    Io(String),
    /// Draft file is not valid draft JSON
    Malformed(String),
}

impl PublishError {
    /// Text to show the author, in the words the web form used.
    pub fn user_message(&self) -> String {
        match self {
            PublishError::Invalid { field } => format!("Please fill in the {}.", field),
            PublishError::Rejected { message, .. } => format!("Error: {}", message),
            PublishError::Io(msg) => format!("Error: {}", msg),
            PublishError::Malformed(msg) => format!("Error: invalid draft file: {}", msg),
            PublishError::Transport(_) | PublishError::Decode(_) => GENERIC_FAILURE.to_string(),
        }
    }
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::Invalid { field } => write!(f, "missing required field: {}", field),
            PublishError::Rejected { status, message } => {
                write!(f, "server rejected book (HTTP {}): {}", status, message)
            }
            PublishError::Transport(msg) => write!(f, "request failed: {}", msg),
            PublishError::Decode(msg) => write!(f, "invalid response: {}", msg),
            PublishError::Io(msg) => write!(f, "I/O error: {}", msg),
            PublishError::Malformed(msg) => write!(f, "invalid draft file: {}", msg),
        }
    }
}

impl std::error::Error for PublishError {}

impl From<reqwest::Error> for PublishError {
    fn from(err: reqwest::Error) -> Self {
        PublishError::Transport(err.to_string())
    }
}

impl From<std::io::Error> for PublishError {
    fn from(err: std::io::Error) -> Self {
        PublishError::Io(err.to_string())
    }
}
