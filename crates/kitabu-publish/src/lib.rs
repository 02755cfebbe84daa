//! Book-creation form and submission client for kitabu.
//!
//! Authors fill a [`BookDraft`], check it with [`BookDraft::validate`], and
//! send it with [`PublishClient::submit`] as a multipart `POST /api/books`.
//!
//! ```no_run
//! use kitabu_publish::{BookDraft, PublishClient, PublishOptions};
//!
//! let mut draft = BookDraft::new("Simba na Marafiki", "Hadithi ya urafiki.");
//! let page = draft.add_page();
//! draft.set_page_text(page, "Simba alikuwa mfalme wa msitu.");
//!
//! let client = PublishClient::new(&PublishOptions::from_env())?;
//! match client.submit(&draft) {
//!     Ok(ack) => println!("{}", ack.user_message()),
//!     Err(err) => println!("{}", err.user_message()),
//! }
//! # Ok::<(), kitabu_publish::PublishError>(())
//! ```

pub mod client;
pub mod draft;
pub mod error;

pub use client::{
    interpret_response, PublishAck, PublishClient, PublishOptions, API_URL_ENV, DEFAULT_BASE_URL,
    SUCCESS_MESSAGE,
};
pub use draft::{Attachment, BookDraft, FieldValue, PageDraft};
pub use error::{PublishError, GENERIC_FAILURE};
