//! Blocking submission client for `POST /api/books`
//!
//! One attempt per call. No retry and no idempotency key: a timed-out
//! request may still have created the book on the server.

use std::time::Duration;

use kitabu::BookId;
use log::{error, info};
use serde::Deserialize;

use crate::draft::BookDraft;
use crate::error::PublishError;

/// Environment variable naming the server base URL.
pub const API_URL_ENV: &str = "KITABU_API_URL";

/// Server base used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Message shown after a successful submission.
pub const SUCCESS_MESSAGE: &str = "Book created successfully!";

/// Where and how long to talk to the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishOptions {
    /// Base URL without the `/api/books` suffix.
    pub base_url: String,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl PublishOptions {
    /// Defaults, with the base URL taken from `KITABU_API_URL` when set.
    pub fn from_env() -> Self {
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::default().with_base_url(url.trim()),
            _ => Self::default(),
        }
    }

    /// Override the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn is_local(&self) -> bool {
        self.base_url.starts_with("http://127.0.0.1") || self.base_url.starts_with("http://localhost")
    }
}

/// Server acknowledgement of a created book.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PublishAck {
    /// Server message, if any.
    #[serde(default)]
    pub message: Option<String>,
    /// Identifier of the new book, if the server returned one.
    #[serde(default)]
    pub book_id: Option<BookId>,
}

impl PublishAck {
    /// Text to show the author.
    pub fn user_message(&self) -> &'static str {
        SUCCESS_MESSAGE
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Sends book drafts to the server.
#[derive(Debug)]
pub struct PublishClient {
    http: reqwest::blocking::Client,
    endpoint: String,
}

impl PublishClient {
    /// Build a client; loopback servers bypass any configured proxy.
    pub fn new(options: &PublishOptions) -> Result<Self, PublishError> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(options.timeout)
            .user_agent("kitabu");
        if options.is_local() {
            builder = builder.no_proxy();
        }
        Ok(Self {
            http: builder.build()?,
            endpoint: format!("{}/api/books", options.base_url.trim_end_matches('/')),
        })
    }

    /// Full URL the form is posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Validate and submit `draft` once.
    pub fn submit(&self, draft: &BookDraft) -> Result<PublishAck, PublishError> {
        draft.validate()?;
        let form = draft.to_multipart()?;
        info!(
            "submitting '{}' ({} pages) to {}",
            draft.title,
            draft.pages.len(),
            self.endpoint
        );

        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .inspect_err(|err| error!("book submission failed: {}", err))?;
        let status = response.status().as_u16();
        let body = response.text()?;

        let result = interpret_response(status, &body);
        match &result {
            Ok(ack) => info!("book created (id {:?})", ack.book_id),
            Err(err) => error!("book submission failed: {}", err),
        }
        result
    }
}

/// Map a status code and body to the submission outcome.
pub fn interpret_response(status: u16, body: &str) -> Result<PublishAck, PublishError> {
    if (200..300).contains(&status) {
        return serde_json::from_str::<PublishAck>(body)
            .map_err(|err| PublishError::Decode(err.to_string()));
    }
    let parsed = serde_json::from_str::<ErrorBody>(body)
        .map_err(|err| PublishError::Decode(format!("HTTP {}: {}", status, err)))?;
    Err(PublishError::Rejected {
        status,
        message: parsed.error.unwrap_or_else(|| format!("HTTP {}", status)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_ack() {
        let ack = interpret_response(
            200,
            r#"{"message":"Book created successfully","book_id":42}"#,
        )
        .unwrap();
        assert_eq!(ack.book_id, Some(42));
        assert_eq!(ack.user_message(), "Book created successfully!");
    }

    #[test]
    fn test_success_without_id() {
        let ack = interpret_response(201, "{}").unwrap();
        assert_eq!(ack.book_id, None);
        assert_eq!(ack.message, None);
    }

    #[test]
    fn test_rejection_keeps_server_error() {
        let err = interpret_response(403, r#"{"error":"Not authorized to create books"}"#)
            .unwrap_err();
        assert_eq!(
            err,
            PublishError::Rejected {
                status: 403,
                message: "Not authorized to create books".into()
            }
        );
        assert_eq!(err.user_message(), "Error: Not authorized to create books");
    }

    #[test]
    fn test_rejection_without_error_field() {
        let err = interpret_response(500, "{}").unwrap_err();
        assert_eq!(err.user_message(), "Error: HTTP 500");
    }

    #[test]
    fn test_non_json_bodies_are_generic_failures() {
        let err = interpret_response(200, "<html>ok</html>").unwrap_err();
        assert!(matches!(err, PublishError::Decode(_)));
        let err = interpret_response(502, "Bad Gateway").unwrap_err();
        assert_eq!(err.user_message(), crate::error::GENERIC_FAILURE);
    }

    #[test]
    fn test_endpoint_joins_base() {
        let options = PublishOptions::default().with_base_url("http://localhost:8080/");
        let client = PublishClient::new(&options).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8080/api/books");
    }

    #[test]
    fn test_submit_validates_before_sending() {
        let client = PublishClient::new(&PublishOptions::default()).unwrap();
        let draft = BookDraft::new("", "maelezo");
        assert_eq!(
            client.submit(&draft),
            Err(PublishError::Invalid {
                field: "title".into()
            })
        );
    }
}
