//! IPC listener that accepts commands over a Unix socket.
//!
//! External tools (key binds, scripts, panel buttons) can connect to the
//! socket and send newline-delimited JSON commands.

pub mod listener;
