//! Unified error types for kitabu
//!
//! `KitabuError` covers content supply and runtime failures. `HostError` is
//! the rejection a host environment returns for a fullscreen request; the
//! viewer logs it and keeps going.

use std::fmt;

/// Top-level error type for kitabu operations
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum KitabuError {
    /// A book handed to the viewer has no pages
    EmptyBook {
        /// Title of the offending book.
        title: String,
    },
    /// Catalog has no book with this id
    BookNotFound {
        /// Requested book id.
        id: u64,
    },
    /// Catalog has no profile for the requested role
    ProfileNotFound {
        /// Role label (`parent`, `child`, `author`).
        role: String,
    },
    /// JSON document could not be decoded
    Parse(String),
    /// I/O error (description only, since `std::io::Error` is not `Clone`)
    Io(String),
    /// Mounted viewer task is gone or could not be reached
    Runtime(String),
}

impl fmt::Display for KitabuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KitabuError::EmptyBook { title } => write!(f, "Book '{}' has no pages", title),
            KitabuError::BookNotFound { id } => write!(f, "Book not found: {}", id),
            KitabuError::ProfileNotFound { role } => {
                write!(f, "No profile available for role '{}'", role)
            }
            KitabuError::Parse(msg) => write!(f, "Parse error: {}", msg),
            KitabuError::Io(msg) => write!(f, "I/O error: {}", msg),
            KitabuError::Runtime(msg) => write!(f, "Viewer runtime error: {}", msg),
        }
    }
}

impl std::error::Error for KitabuError {}

impl From<serde_json::Error> for KitabuError {
    fn from(err: serde_json::Error) -> Self {
        KitabuError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for KitabuError {
    fn from(err: std::io::Error) -> Self {
        KitabuError::Io(err.to_string())
    }
}

/// Rejection of a fullscreen request by the host environment
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HostError {
    /// Host refused the request (missing user gesture, policy, ...)
    Denied(String),
    /// Host has no fullscreen capability at all
    Unsupported,
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::Denied(reason) => write!(f, "fullscreen request denied: {}", reason),
            HostError::Unsupported => write!(f, "fullscreen is not supported by the host"),
        }
    }
}

impl std::error::Error for HostError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kitabu_error_display() {
        let err = KitabuError::BookNotFound { id: 7 };
        assert_eq!(format!("{}", err), "Book not found: 7");
    }

    #[test]
    fn test_parse_error_from_serde() {
        let err: KitabuError = serde_json::from_str::<u32>("nope")
            .expect_err("invalid json")
            .into();
        assert!(matches!(err, KitabuError::Parse(_)));
        assert!(format!("{}", err).starts_with("Parse error"));
    }

    #[test]
    fn test_host_error_display() {
        let err = HostError::Denied("no user gesture".into());
        assert_eq!(
            format!("{}", err),
            "fullscreen request denied: no user gesture"
        );
    }
}
