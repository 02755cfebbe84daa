//! Paginated viewer state machine
//!
//! `PaginatedViewer` presents one page at a time from an immutable book and
//! guards navigation with a transition lock:
//!
//! ```text
//! Idle --navigate--> Transitioning{target}    (caller starts the timer)
//! Transitioning --navigate--> Transitioning   (request dropped)
//! Transitioning --complete_transition--> Idle (index committed)
//! Transitioning --cancel_transition--> Idle   (target discarded)
//! ```
//!
//! The machine is synchronous and clock-free. Whoever drives it owns the
//! timer: `runtime::MountedViewer` does so with tokio, tests call
//! `complete_transition` directly.

use std::time::Duration;

use log::{debug, error};

use crate::error::KitabuError;
use crate::host::FullscreenHost;
use crate::keyboard::KeyBindings;
use crate::page::{Book, Page};

/// Page-turn animation window observed in the reader.
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(300);

/// Navigation direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards the last page.
    Next,
    /// Towards the first page.
    Previous,
}

/// Transition lock phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransitionPhase {
    /// No page turn in flight.
    #[default]
    Idle,
    /// A page turn is in flight and will commit `target`.
    Transitioning {
        /// Index committed when the transition completes.
        target: usize,
    },
}

/// Result of a navigation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigateOutcome {
    /// Lock taken; the caller must complete the transition after the delay.
    Started {
        /// Clamped target index.
        target: usize,
    },
    /// A transition was already in flight; nothing changed.
    Dropped,
}

/// Snapshot of everything the viewer exposes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewerState {
    /// Index of the displayed page, `0 <= current_index < page_count`.
    pub current_index: usize,
    /// True only while a page turn is in flight.
    pub is_transitioning: bool,
    /// Last known fullscreen status; reconciled from host notifications.
    pub is_fullscreen: bool,
    /// Narration preference.
    pub is_audio_enabled: bool,
}

/// Viewer configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewerOptions {
    /// Length of the page-turn window.
    pub transition: Duration,
    /// Keys mapped to next/previous.
    pub key_bindings: KeyBindings,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            transition: DEFAULT_TRANSITION,
            key_bindings: KeyBindings::default(),
        }
    }
}

impl ViewerOptions {
    /// Override the transition window.
    pub fn with_transition(mut self, transition: Duration) -> Self {
        self.transition = transition;
        self
    }

    /// Override the navigation keys.
    pub fn with_key_bindings(mut self, key_bindings: KeyBindings) -> Self {
        self.key_bindings = key_bindings;
        self
    }
}

/// Render-ready view of the current page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageView<'a> {
    /// Book title for the header.
    pub title: &'a str,
    /// Current page content.
    pub page: &'a Page,
    /// Footer label, e.g. `Page 2 of 6`.
    pub position_label: String,
    /// Footer byline, e.g. `Maria Ngugi | Beginner Level`.
    pub byline: String,
    /// Whether the previous button is enabled.
    pub can_go_previous: bool,
    /// Whether the next button is enabled.
    pub can_go_next: bool,
    /// True while the page is animating out.
    pub dimmed: bool,
    /// Accessible label of the audio toggle.
    pub audio_label: &'static str,
    /// Accessible label of the fullscreen toggle.
    pub fullscreen_label: &'static str,
}

/// Page-flipping viewer over an immutable book.
#[derive(Clone, Debug)]
pub struct PaginatedViewer {
    book: Book,
    current: usize,
    phase: TransitionPhase,
    fullscreen: bool,
    audio: bool,
}

impl PaginatedViewer {
    /// Open a book at its first page. Fails for books without pages.
    pub fn new(book: Book) -> Result<Self, KitabuError> {
        book.ensure_readable()?;
        Ok(Self {
            book,
            current: 0,
            phase: TransitionPhase::Idle,
            fullscreen: false,
            audio: false,
        })
    }

    /// Book being displayed.
    pub fn book(&self) -> &Book {
        &self.book
    }

    /// Number of pages; always at least one.
    pub fn page_count(&self) -> usize {
        self.book.pages.len()
    }

    /// Page at the cursor.
    pub fn current_page(&self) -> &Page {
        &self.book.pages[self.current]
    }

    /// Transition lock phase.
    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    /// Current state snapshot.
    pub fn state(&self) -> ViewerState {
        ViewerState {
            current_index: self.current,
            is_transitioning: matches!(self.phase, TransitionPhase::Transitioning { .. }),
            is_fullscreen: self.fullscreen,
            is_audio_enabled: self.audio,
        }
    }

    /// Request a page turn.
    ///
    /// While a transition is in flight the request is dropped. Otherwise the
    /// lock is taken immediately, even when the clamped target equals the
    /// current index.
    pub fn navigate(&mut self, direction: Direction) -> NavigateOutcome {
        if let TransitionPhase::Transitioning { target } = self.phase {
            debug!(
                "dropping {:?} request, transition to page {} in flight",
                direction, target
            );
            return NavigateOutcome::Dropped;
        }

        let last = self.page_count() - 1;
        let target = match direction {
            Direction::Next => (self.current + 1).min(last),
            Direction::Previous => self.current.saturating_sub(1),
        };
        self.phase = TransitionPhase::Transitioning { target };
        NavigateOutcome::Started { target }
    }

    /// Commit the in-flight transition and release the lock.
    ///
    /// Returns the committed index, or `None` when idle.
    pub fn complete_transition(&mut self) -> Option<usize> {
        match self.phase {
            TransitionPhase::Idle => None,
            TransitionPhase::Transitioning { target } => {
                self.current = target;
                self.phase = TransitionPhase::Idle;
                debug!("committed page {}/{}", target + 1, self.page_count());
                Some(target)
            }
        }
    }

    /// Abandon the in-flight transition without committing its target.
    ///
    /// Returns the discarded target, or `None` when idle.
    pub fn cancel_transition(&mut self) -> Option<usize> {
        match std::mem::take(&mut self.phase) {
            TransitionPhase::Idle => None,
            TransitionPhase::Transitioning { target } => {
                debug!("cancelled transition to page {}", target + 1);
                Some(target)
            }
        }
    }

    /// Flip the narration preference and return the new value.
    pub fn toggle_audio(&mut self) -> bool {
        self.audio = !self.audio;
        self.audio
    }

    /// Ask the host to enter or leave fullscreen.
    ///
    /// The direction follows host truth, the local flag flips as intent.
    /// A rejected request is logged and the flag is left as is; the next
    /// host notification corrects it.
    pub fn toggle_fullscreen<H: FullscreenHost + ?Sized>(&mut self, host: &H) {
        if host.is_fullscreen() {
            if let Err(err) = host.request_exit() {
                error!("Error attempting to exit fullscreen: {}", err);
            }
        } else if let Err(err) = host.request_enter() {
            error!("Error attempting to enable fullscreen: {}", err);
        }
        self.fullscreen = !self.fullscreen;
    }

    /// Apply a host fullscreen-change notification.
    pub fn sync_fullscreen(&mut self, host_is_fullscreen: bool) {
        self.fullscreen = host_is_fullscreen;
    }

    /// View model for the current page.
    pub fn page_view(&self) -> PageView<'_> {
        let count = self.page_count();
        let byline = if self.book.author.is_empty() {
            self.book.level.label().to_string()
        } else {
            format!("{} | {}", self.book.author, self.book.level.label())
        };
        PageView {
            title: &self.book.title,
            page: self.current_page(),
            position_label: format!("Page {} of {}", self.current + 1, count),
            byline,
            can_go_previous: self.current > 0,
            can_go_next: self.current + 1 < count,
            dimmed: self.state().is_transitioning,
            audio_label: if self.audio {
                "Disable audio narration"
            } else {
                "Enable audio narration"
            },
            fullscreen_label: if self.fullscreen {
                "Exit fullscreen"
            } else {
                "Enter fullscreen"
            },
        }
    }
}
