//! Host display environment
//!
//! Fullscreen is modelled as two independent channels: an outbound request
//! (`request_enter` / `request_exit`) that the host may refuse, and an
//! inbound stream of change notifications that carries the truth. A viewer
//! never treats a successful request as proof that the state changed.

use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;

use crate::error::HostError;
use crate::hub::{EventHub, Subscription};

/// Notification that the host's fullscreen status changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FullscreenChange {
    /// Host status after the change.
    pub is_fullscreen: bool,
}

/// Windowing/display environment that owns fullscreen.
pub trait FullscreenHost: Send + Sync {
    /// Current host status (the equivalent of "is there a fullscreen element").
    fn is_fullscreen(&self) -> bool;

    /// Ask to enter fullscreen. Completion is observed via notifications.
    fn request_enter(&self) -> Result<(), HostError>;

    /// Ask to leave fullscreen. Completion is observed via notifications.
    fn request_exit(&self) -> Result<(), HostError>;

    /// Install a fullscreen-change listener.
    fn fullscreen_changes(&self) -> Subscription<FullscreenChange>;
}

/// In-memory host used by the CLI and tests.
///
/// Requests apply immediately and are followed by a notification, unless
/// the host is set to deny them. `external_exit` mimics the user leaving
/// fullscreen with a global key outside the viewer's control.
#[derive(Debug, Default)]
pub struct SimulatedHost {
    fullscreen: AtomicBool,
    deny: AtomicBool,
    changes: EventHub<FullscreenChange>,
}

impl SimulatedHost {
    /// Windowed host that grants requests.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent requests fail (or succeed again).
    pub fn deny_requests(&self, deny: bool) {
        self.deny.store(deny, Ordering::SeqCst);
    }

    /// Leave fullscreen from outside the viewer, e.g. the user pressed Escape.
    ///
    /// Returns false when the host was not fullscreen.
    pub fn external_exit(&self) -> bool {
        if self.fullscreen.swap(false, Ordering::SeqCst) {
            debug!("host left fullscreen externally");
            self.notify(false);
            true
        } else {
            false
        }
    }

    /// Number of installed fullscreen-change listeners.
    pub fn listener_count(&self) -> usize {
        self.changes.listener_count()
    }

    fn set(&self, value: bool) -> Result<(), HostError> {
        if self.deny.load(Ordering::SeqCst) {
            return Err(HostError::Denied("request not allowed by host".into()));
        }
        if self.fullscreen.swap(value, Ordering::SeqCst) != value {
            self.notify(value);
        }
        Ok(())
    }

    fn notify(&self, is_fullscreen: bool) {
        self.changes.dispatch(FullscreenChange { is_fullscreen });
    }
}

impl FullscreenHost for SimulatedHost {
    fn is_fullscreen(&self) -> bool {
        self.fullscreen.load(Ordering::SeqCst)
    }

    fn request_enter(&self) -> Result<(), HostError> {
        self.set(true)
    }

    fn request_exit(&self) -> Result<(), HostError> {
        self.set(false)
    }

    fn fullscreen_changes(&self) -> Subscription<FullscreenChange> {
        self.changes.subscribe()
    }
}
