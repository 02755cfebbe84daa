//! kitabu -- page-flipping reader core for a children's Swahili e-reading platform
//!
//! Presents a book one page at a time with guarded navigation, fullscreen
//! reconciled against the host, and a narration preference. Around the
//! viewer sit the catalog interface that supplies books and profiles, and
//! the role-based dashboards.
//!
//! # Features
//!
//! - `async` (default) -- `runtime::MountedViewer`, a tokio task that owns a
//!   viewer, its page-turn timer and its listeners
//! - `cli` -- the `kitabu` command-line reader
//!
//! # Navigation model
//!
//! A page turn takes a fixed window (300 ms by default). Requests arriving
//! inside the window are dropped, not queued, and the page index only
//! changes when the window closes. See [`viewer`] for the state machine.

#![warn(missing_docs)]
#![deny(clippy::large_enum_variant, clippy::redundant_clone)]
#![warn(
    clippy::needless_collect,
    clippy::map_clone,
    clippy::implicit_clone,
    clippy::inefficient_to_string
)]

pub mod catalog;
pub mod dashboard;
pub mod error;
pub mod host;
pub mod hub;
pub mod keyboard;
pub mod page;
pub mod profile;
pub mod viewer;

#[cfg(feature = "async")]
pub mod runtime;

// Re-export key types for convenience
pub use catalog::{BookFilter, CatalogProvider, StaticCatalog};
pub use dashboard::{Dashboard, Panel, Tab};
pub use error::{HostError, KitabuError};
pub use host::{FullscreenChange, FullscreenHost, SimulatedHost};
pub use hub::{EventHub, Subscription};
pub use keyboard::{Key, KeyBindings, KeyEvent, KeyboardHub};
pub use page::{Book, BookId, BookSummary, Level, Page};
pub use profile::{Profile, Role};
#[cfg(feature = "async")]
pub use runtime::MountedViewer;
pub use viewer::{
    Direction, NavigateOutcome, PageView, PaginatedViewer, TransitionPhase, ViewerOptions,
    ViewerState, DEFAULT_TRANSITION,
};
