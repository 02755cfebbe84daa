//! Scoped listener registration
//!
//! `EventHub` stands in for a global event target (window keyboard events,
//! document fullscreen changes). Subscribing hands back a `Subscription`
//! guard; dropping the guard removes the listener, so a listener can never
//! outlive its owner, including when the owner is torn down abnormally.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use log::trace;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

struct Registry<E> {
    next_id: u64,
    listeners: Vec<(u64, UnboundedSender<E>)>,
}

fn lock<E>(registry: &Mutex<Registry<E>>) -> MutexGuard<'_, Registry<E>> {
    // A panicking listener owner must not wedge dispatch for everyone else.
    registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Broadcast point for events of type `E`.
pub struct EventHub<E> {
    registry: Arc<Mutex<Registry<E>>>,
}

impl<E> Clone for EventHub<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<E: Clone> Default for EventHub<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for EventHub<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("listeners", &lock(&self.registry).listeners.len())
            .finish()
    }
}

impl<E: Clone> EventHub<E> {
    /// Create a hub with no listeners.
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Install a listener. It stays installed until the guard is dropped.
    pub fn subscribe(&self) -> Subscription<E> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, tx));
        trace!("listener {} installed", id);
        Subscription {
            id,
            receiver: rx,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Deliver `event` to every installed listener.
    ///
    /// Returns how many listeners received it.
    pub fn dispatch(&self, event: E) -> usize {
        let mut registry = lock(&self.registry);
        registry
            .listeners
            .retain(|(_, tx)| tx.send(event.clone()).is_ok());
        registry.listeners.len()
    }

    /// Number of installed listeners.
    pub fn listener_count(&self) -> usize {
        lock(&self.registry).listeners.len()
    }
}

/// Guard for an installed listener.
pub struct Subscription<E> {
    id: u64,
    receiver: UnboundedReceiver<E>,
    registry: Weak<Mutex<Registry<E>>>,
}

impl<E> std::fmt::Debug for Subscription<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl<E> Subscription<E> {
    /// Wait for the next event. `None` once the hub is gone.
    pub async fn recv(&mut self) -> Option<E> {
        self.receiver.recv().await
    }

    /// Take the next queued event without waiting.
    pub fn try_recv(&mut self) -> Option<E> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

impl<E> Drop for Subscription<E> {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = lock(&registry);
            registry.listeners.retain(|(id, _)| *id != self.id);
            trace!("listener {} removed", self.id);
        }
    }
}
