//! Unix-socket [`CommandSource`] implementation.
//!
//! Binds a Unix stream socket and accepts one connection at a time.
//! Each line received is parsed as a JSON-encoded [`Command`].
//!
//! # Wire format
//!
//! Every message is a single line of JSON followed by `\n`:
//!
//! ```json
//! "Tile"
//! {"Tile":{"source":"keybind"}}
//! ```
//!
//! A Hyprland bind that triggers tiling looks like:
//!
//! ```text
//! bind = SUPER, T, exec, echo '{"Tile":{"source":"keybind"}}' | socat - UNIX-CONNECT:$XDG_RUNTIME_DIR/hyprtile.sock
//! ```

use crate::command::Command;
use crate::traits::CommandSource;
use async_trait::async_trait;
use log::{debug, error, info};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;
use tokio::sync::mpsc;

/// A [`CommandSource`] that listens on a Unix stream socket for
/// JSON-encoded commands.
///
/// Each accepted connection can send multiple newline-delimited JSON
/// commands.  When the connection closes, the listener waits for the
/// next one.
pub struct UnixSocketListener {
    path: PathBuf,
}

/// Errors produced by the Unix socket listener.
#[derive(Debug, thiserror::Error)]
pub enum SocketError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl UnixSocketListener {
    /// Create a new listener bound to `path`.
    ///
    /// The socket file is created when [`run`](CommandSource::run) is
    /// called; a stale file from a previous instance is removed first.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The filesystem path of the socket.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CommandSource for UnixSocketListener {
    type Error = SocketError;

    /// Bind the socket and start accepting connections.
    ///
    /// Resolves only when the sink closes or binding fails.
    async fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), SocketError> {
        // Remove stale socket if present.
        let _ = std::fs::remove_file(&self.path);

        let listener = UnixListener::bind(&self.path)?;
        info!("listening on {}", self.path.display());

        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    debug!("client connected");
                    let mut lines = BufReader::new(stream).lines();
                    loop {
                        match lines.next_line().await {
                            Ok(Some(ref text)) if text.trim().is_empty() => continue,
                            Ok(Some(text)) => match serde_json::from_str::<Command>(&text) {
                                Ok(cmd) => {
                                    debug!("received {:?}", cmd);
                                    if sink.send(cmd).await.is_err() {
                                        info!("sink closed, shutting down");
                                        return Ok(());
                                    }
                                }
                                Err(e) => {
                                    error!("bad command: {}: {}", text, e);
                                }
                            },
                            Ok(None) => break,
                            Err(e) => {
                                error!("read error: {}", e);
                                break;
                            }
                        }
                    }
                    debug!("client disconnected");
                }
                Err(e) => {
                    error!("accept error: {}", e);
                }
            }
        }
    }
}

//  Tests
