//! Entry point for the **hyprtile** daemon.
//!
//! Spawns the configured [`CommandSource`](hyprtile::traits::CommandSource)
//! as a background task and processes incoming commands on a single-threaded
//! runtime.  Each `Tile` trigger starts a detached tiling run; a trigger
//! never waits for the retry pass of a previous one.

use hyprtile::command::Command;
use hyprtile::config::Config;
use hyprtile::hyprland::wm::HyprlandWm;
use hyprtile::ipc::listener::UnixSocketListener;
use hyprtile::tiler::WindowTiler;
use hyprtile::traits::CommandSource;
use log::{error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Default socket path for the command listener.
fn default_socket_path() -> String {
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
    format!("{}/hyprtile.sock", runtime)
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/hyprtile`).
fn config_dir() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    std::path::PathBuf::from(base).join("hyprtile")
}

/// Try to load the config from `$XDG_CONFIG_HOME/hyprtile/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    let config = load_config();

    let wm = Arc::new(HyprlandWm::new(config.notify.timeout_ms));
    let tiler = Arc::new(WindowTiler::new(
        Arc::clone(&wm),
        Arc::clone(&wm),
        Duration::from_millis(config.tiling.retry_delay_ms),
    ));

    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(16);
    spawn_command_sources(cmd_tx);

    info!("hyprtile running");
    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            Command::Tile(request) => {
                let tiler = Arc::clone(&tiler);
                tokio::spawn(async move {
                    if let Err(e) = tiler.run(request).await {
                        error!("tiling failed: {}", e);
                    }
                });
            }
        }
    }
    info!("all command sources closed, exiting");
}

//  Helpers

fn spawn_command_sources(tx: mpsc::Sender<Command>) {
    let path = default_socket_path();
    tokio::spawn(async move {
        let mut source = UnixSocketListener::new(&path);
        if let Err(e) = source.run(tx).await {
            error!("socket listener error: {}", e);
        }
    });
}
