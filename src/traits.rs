//! Core traits that decouple hyprtile from any specific compositor or
//! transport mechanism.
//!
//! Every concrete backend (Hyprland, a Unix-socket listener, a test
//! harness, …) implements one of these traits.  The
//! [`WindowTiler`](crate::tiler::WindowTiler) only depends on these
//! abstractions.

use crate::command::Command;
use crate::types::{Rect, WindowId, WindowInfo, WindowState};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Abstraction over a window system that can enumerate windows and change
/// their geometry.
///
/// An implementation might talk to Hyprland via IPC, or it might be a
/// recording stub used in tests. All calls are asynchronous: the backend
/// round-trips to the compositor.
#[async_trait]
pub trait WindowSystem: Send + Sync {
    /// The error type produced by this window system.
    type Error: std::error::Error + Send + 'static;

    /// Return the ordered list of windows the compositor knows about.
    ///
    /// `populate_contents` asks the backend to include per-window detail
    /// beyond identity, geometry, and state. The tiler always passes
    /// `false`; the flag exists for other consumers of the seam.
    async fn list_windows(&self, populate_contents: bool)
        -> Result<Vec<WindowInfo>, Self::Error>;

    /// Return the usable region of the primary monitor: its full area
    /// minus panels, bars, and other reserved strips.
    ///
    /// Read fresh on every call; some compositors report reserved areas
    /// inaccurately, and no compensation is attempted here.
    async fn work_area(&self) -> Result<Rect, Self::Error>;

    /// Move and resize the window `id` to `rect`, forcing it into `state`
    /// so the new geometry takes visible effect.
    ///
    /// Completion carries no payload beyond success or failure.
    async fn update_window(
        &self,
        id: &WindowId,
        rect: Rect,
        state: WindowState,
    ) -> Result<(), Self::Error>;
}

/// A channel for one-shot, user-facing warnings.
///
/// Kept separate from [`WindowSystem`] so a test harness can observe
/// notifications without faking a whole compositor.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// The error type produced by this notifier.
    type Error: std::error::Error + Send + 'static;

    /// Surface `message` to the user.
    async fn alert(&self, message: &str) -> Result<(), Self::Error>;
}

/// A source of [`Command`]s.
///
/// Implementations listen on some transport (a Unix socket, an in-memory
/// channel, …) and forward parsed commands into the provided sender.
///
/// # Contract
///
/// * [`run`](CommandSource::run) resolves only when the source is exhausted
///   or an unrecoverable error occurs.
/// * Each received command must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run as a spawned task.
#[async_trait]
pub trait CommandSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming [`Command`] into `sink`.
    async fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error>;
}
