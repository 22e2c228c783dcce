//! [`WindowSystem`] and [`Notifier`] implementations backed by Hyprland IPC.
//!
//! Communicates directly with Hyprland through its Unix socket at
//! `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket.sock`,
//! avoiding any shell command invocation or third-party crate for socket
//! discovery.

use crate::traits::{Notifier, WindowSystem};
use crate::types::{Rect, WindowId, WindowInfo, WindowState};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;

/// Hyprland-backed window system.
///
/// All communication happens over Hyprland's IPC socket
/// (`$XDG_RUNTIME_DIR/hypr/<instance>/.socket.sock`).  No child processes
/// are spawned; each method call opens a short-lived request.
pub struct HyprlandWm {
    /// How long the on-screen warning stays visible, in milliseconds.
    notify_timeout_ms: u64,
}

/// Errors that can occur when talking to Hyprland.
#[derive(Debug, thiserror::Error)]
#[error("hyprland IPC error: {0}")]
pub struct HyprlandError(String);

impl HyprlandWm {
    /// Create a new handle.
    ///
    /// No connection is opened eagerly.
    pub fn new(notify_timeout_ms: u64) -> Self {
        Self { notify_timeout_ms }
    }
}

//  Direct Hyprland IPC helpers

/// Resolve the Hyprland command socket path.
///
/// Hyprland ≥ 0.40 stores its sockets at
/// `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket.sock`.
fn socket_path() -> Result<PathBuf, HyprlandError> {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR")
        .map_err(|_| HyprlandError("XDG_RUNTIME_DIR not set".into()))?;
    let his = std::env::var("HYPRLAND_INSTANCE_SIGNATURE")
        .map_err(|_| HyprlandError("HYPRLAND_INSTANCE_SIGNATURE not set".into()))?;
    Ok(PathBuf::from(format!(
        "{}/hypr/{}/.socket.sock",
        runtime_dir, his
    )))
}

/// Send a raw command to the Hyprland command socket and return the
/// response as a string.
async fn ipc_request(command: &str) -> Result<String, HyprlandError> {
    let path = socket_path()?;
    let mut stream = UnixStream::connect(&path)
        .await
        .map_err(|e| HyprlandError(format!("connect to {}: {}", path.display(), e)))?;

    stream
        .write_all(command.as_bytes())
        .await
        .map_err(|e| HyprlandError(format!("write: {}", e)))?;

    let mut response = Vec::new();
    stream
        .read_to_end(&mut response)
        .await
        .map_err(|e| HyprlandError(format!("read: {}", e)))?;

    String::from_utf8(response).map_err(|e| HyprlandError(format!("utf-8: {}", e)))
}

/// Send a JSON data query (`j/<command>`) and return the raw JSON string.
async fn ipc_json(data_command: &str) -> Result<String, HyprlandError> {
    ipc_request(&format!("j/{}", data_command)).await
}

/// Send a dispatch command and check for `"ok"`.
async fn ipc_dispatch(args: &str) -> Result<(), HyprlandError> {
    let response = ipc_request(&format!("/dispatch {}", args)).await?;
    if response.trim() == "ok" {
        Ok(())
    } else {
        Err(HyprlandError(format!("dispatch error: {}", response)))
    }
}

//  Minimal serde structs for the JSON we care about

/// Subset of the JSON object returned by `j/clients`.
#[derive(Deserialize)]
struct ClientJson {
    address: String,
    at: [i32; 2],
    size: [i32; 2],
    #[serde(default)]
    mapped: bool,
    #[serde(default)]
    hidden: bool,
    /// 0 = none, 1 = maximized, 2 = fullscreen.
    #[serde(default)]
    fullscreen: i32,
    workspace: WorkspaceRef,
}

/// The workspace a client sits on.  Special workspaces (the scratchpad
/// family) have negative ids.
#[derive(Deserialize)]
struct WorkspaceRef {
    id: i64,
}

/// Subset of the JSON object returned by `j/monitors`.
#[derive(Deserialize)]
struct MonitorJson {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    /// Pixels reserved for bars and panels: `[left, top, right, bottom]`.
    #[serde(default)]
    reserved: [i32; 4],
    #[serde(default)]
    focused: bool,
}

/// Map a Hyprland client to the window vocabulary.
///
/// A client that is unmapped, hidden, or parked on a special workspace is
/// reported as minimized; it has no on-screen presence to tile.
fn client_to_window(c: ClientJson) -> WindowInfo {
    let state = if !c.mapped || c.hidden || c.workspace.id < 0 {
        WindowState::Minimized
    } else if c.fullscreen >= 2 {
        WindowState::Fullscreen
    } else if c.fullscreen == 1 {
        WindowState::Maximized
    } else {
        WindowState::Normal
    };
    WindowInfo {
        id: WindowId(c.address),
        rect: Rect::new(c.at[0], c.at[1], c.size[0], c.size[1]),
        state,
    }
}

/// Compute the usable work area of the primary monitor.
///
/// Hyprland has no "primary" concept; the focused monitor stands in for
/// it, falling back to the first one listed.  The reserved strips (bars,
/// panels) are subtracted from the monitor extent.  On scaled or
/// transformed monitors the reported extent may not match the logical
/// coordinate space; no compensation is attempted.
fn work_area_of(monitors: &[MonitorJson]) -> Option<Rect> {
    let m = monitors.iter().find(|m| m.focused).or_else(|| monitors.first())?;
    let [left, top, right, bottom] = m.reserved;
    Some(Rect::new(
        m.x + left,
        m.y + top,
        m.width - left - right,
        m.height - top - bottom,
    ))
}

//  WindowSystem implementation

#[async_trait]
impl WindowSystem for HyprlandWm {
    type Error = HyprlandError;

    /// `j/clients` always carries full detail, so `populate_contents` is
    /// accepted for interface compatibility and ignored.
    async fn list_windows(
        &self,
        _populate_contents: bool,
    ) -> Result<Vec<WindowInfo>, HyprlandError> {
        let json = ipc_json("clients").await?;
        let clients: Vec<ClientJson> =
            serde_json::from_str(&json).map_err(|e| HyprlandError(format!("parse: {}", e)))?;
        Ok(clients.into_iter().map(client_to_window).collect())
    }

    async fn work_area(&self) -> Result<Rect, HyprlandError> {
        let json = ipc_json("monitors").await?;
        let monitors: Vec<MonitorJson> =
            serde_json::from_str(&json).map_err(|e| HyprlandError(format!("parse: {}", e)))?;
        work_area_of(&monitors).ok_or_else(|| HyprlandError("no monitors reported".into()))
    }

    async fn update_window(
        &self,
        id: &WindowId,
        rect: Rect,
        _state: WindowState,
    ) -> Result<(), HyprlandError> {
        // Force the window back to a plain floating toplevel before moving
        // it; geometry dispatches have no effect on fullscreen or tiled
        // clients.
        ipc_dispatch(&format!("fullscreenstate 0 0,address:{}", id)).await?;
        ipc_dispatch(&format!("setfloating address:{}", id)).await?;
        ipc_dispatch(&format!(
            "movewindowpixel exact {} {},address:{}",
            rect.left, rect.top, id
        ))
        .await?;
        ipc_dispatch(&format!(
            "resizewindowpixel exact {} {},address:{}",
            rect.width, rect.height, id
        ))
        .await
    }
}

#[async_trait]
impl Notifier for HyprlandWm {
    type Error = HyprlandError;

    async fn alert(&self, message: &str) -> Result<(), HyprlandError> {
        // `notify <icon> <time_ms> <color> <message>`; icon 0 is the
        // warning sign, color 0 keeps the theme default.
        ipc_request(&format!("/notify 0 {} 0 {}", self.notify_timeout_ms, message))
            .await
            .map(|_| ())
    }
}

//  Tests
