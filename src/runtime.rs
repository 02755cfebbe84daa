//! Mounted viewer driven by tokio
//!
//! Mounting moves a `PaginatedViewer` into a single task that owns it for
//! the rest of its life. The task multiplexes UI commands, keyboard events,
//! host fullscreen notifications and the page-turn timer, so every handler
//! sees the live state rather than a copy taken at mount time.
//!
//! The keyboard and fullscreen listeners are installed in `mount` and are
//! removed when the task ends: on `unmount`, when the handle is dropped, or
//! when the runtime shuts down. A pending page turn dies with the task.
//!
//! Available with the `async` feature.

use std::future;
use std::sync::Arc;

use log::{info, warn};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use crate::error::KitabuError;
use crate::host::{FullscreenChange, FullscreenHost};
use crate::hub::Subscription;
use crate::keyboard::{KeyEvent, KeyboardHub};
use crate::viewer::{
    Direction, NavigateOutcome, PaginatedViewer, TransitionPhase, ViewerOptions, ViewerState,
};

#[derive(Clone, Copy, Debug)]
enum Command {
    Navigate(Direction),
    ToggleFullscreen,
    ToggleAudio,
}

/// Handle to a viewer running inside a tokio task.
#[derive(Debug)]
pub struct MountedViewer {
    commands: mpsc::UnboundedSender<Command>,
    shutdown: Option<oneshot::Sender<()>>,
    state: watch::Receiver<ViewerState>,
    task: Option<JoinHandle<PaginatedViewer>>,
}

struct Driver {
    viewer: PaginatedViewer,
    host: Arc<dyn FullscreenHost>,
    options: ViewerOptions,
    keys: Subscription<KeyEvent>,
    fullscreen: Subscription<FullscreenChange>,
    commands: mpsc::UnboundedReceiver<Command>,
    shutdown: oneshot::Receiver<()>,
    state: watch::Sender<ViewerState>,
    deadline: Option<Instant>,
}

impl MountedViewer {
    /// Mount `viewer`: subscribe to the keyboard and host channels and spawn
    /// the driving task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(
        viewer: PaginatedViewer,
        host: Arc<dyn FullscreenHost>,
        keyboard: &KeyboardHub,
        options: ViewerOptions,
    ) -> Self {
        let keys = keyboard.subscribe();
        let fullscreen = host.fullscreen_changes();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let (state_tx, state_rx) = watch::channel(viewer.state());
        // a turn requested before mounting still gets its full window
        let deadline = match viewer.phase() {
            TransitionPhase::Idle => None,
            TransitionPhase::Transitioning { .. } => Some(Instant::now() + options.transition),
        };

        info!(
            "mounting viewer for '{}' ({} pages)",
            viewer.book().title,
            viewer.page_count()
        );

        let driver = Driver {
            viewer,
            host,
            options,
            keys,
            fullscreen,
            commands: command_rx,
            shutdown: shutdown_rx,
            state: state_tx,
            deadline,
        };
        let task = tokio::spawn(driver.run());

        Self {
            commands: command_tx,
            shutdown: Some(shutdown_tx),
            state: state_rx,
            task: Some(task),
        }
    }

    /// Request a page turn. Dropped by the viewer if one is in flight.
    pub fn navigate(&self, direction: Direction) -> Result<(), KitabuError> {
        self.send(Command::Navigate(direction))
    }

    /// Ask the host to toggle fullscreen.
    pub fn toggle_fullscreen(&self) -> Result<(), KitabuError> {
        self.send(Command::ToggleFullscreen)
    }

    /// Flip the narration preference.
    pub fn toggle_audio(&self) -> Result<(), KitabuError> {
        self.send(Command::ToggleAudio)
    }

    /// Latest published state.
    pub fn state(&self) -> ViewerState {
        *self.state.borrow()
    }

    /// Receiver for state changes. Closed once the viewer is unmounted.
    pub fn watch(&self) -> watch::Receiver<ViewerState> {
        self.state.clone()
    }

    /// Stop the task, release listeners and the pending timer, and hand the
    /// viewer back. An in-flight page turn is discarded, not committed.
    pub async fn unmount(mut self) -> Result<PaginatedViewer, KitabuError> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        let task = self
            .task
            .take()
            .ok_or_else(|| KitabuError::Runtime("viewer task already taken".into()))?;
        let viewer = task
            .await
            .map_err(|err| KitabuError::Runtime(err.to_string()))?;
        info!("unmounted viewer for '{}'", viewer.book().title);
        Ok(viewer)
    }

    fn send(&self, command: Command) -> Result<(), KitabuError> {
        self.commands
            .send(command)
            .map_err(|_| KitabuError::Runtime("viewer is not mounted".into()))
    }
}

impl Drop for MountedViewer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Driver {
    async fn run(mut self) -> PaginatedViewer {
        loop {
            let deadline = self.deadline;
            let timer = async move {
                match deadline {
                    Some(at) => sleep_until(at).await,
                    None => future::pending().await,
                }
            };

            tokio::select! {
                biased;
                _ = &mut self.shutdown => break,
                _ = timer => {
                    self.deadline = None;
                    self.viewer.complete_transition();
                }
                command = self.commands.recv() => match command {
                    Some(command) => self.apply(command),
                    None => break,
                },
                Some(event) = self.keys.recv() => {
                    if let Some(direction) = self.options.key_bindings.direction(event.key) {
                        self.navigate(direction);
                    }
                }
                Some(change) = self.fullscreen.recv() => {
                    let truth = self.host.is_fullscreen();
                    if truth != change.is_fullscreen {
                        warn!(
                            "fullscreen notification said {} but host reports {}",
                            change.is_fullscreen, truth
                        );
                    }
                    self.viewer.sync_fullscreen(truth);
                }
            }

            self.publish();
        }
        // the pending turn dies with the task; the viewer comes back unlocked
        self.viewer.cancel_transition();
        self.viewer
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Navigate(direction) => self.navigate(direction),
            Command::ToggleFullscreen => self.viewer.toggle_fullscreen(self.host.as_ref()),
            Command::ToggleAudio => {
                self.viewer.toggle_audio();
            }
        }
    }

    fn navigate(&mut self, direction: Direction) {
        if let NavigateOutcome::Started { .. } = self.viewer.navigate(direction) {
            self.deadline = Some(Instant::now() + self.options.transition);
        }
    }

    fn publish(&self) {
        let next = self.viewer.state();
        self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}
