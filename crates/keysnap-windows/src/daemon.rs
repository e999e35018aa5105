use keysnap_core::config::{self, Config};
use keysnap_core::{WindowResult, logging, pid};

use crate::monitor;

#[path = "daemon_ipc.rs"]
mod daemon_ipc;
#[path = "daemon_loop.rs"]
mod daemon_loop;
#[path = "daemon_loop_handlers.rs"]
mod daemon_loop_handlers;
#[path = "daemon_threads.rs"]
mod daemon_threads;
#[path = "daemon_types.rs"]
mod daemon_types;

/// Runs the keysnap daemon until a `Stop` command arrives or, when
/// `foreground` is set, until Ctrl+C.
///
/// The keyboard hook, the Explorer poll timer, the IPC listener and the
/// config watcher each get their own thread. Snapping happens on the
/// calling thread. In the foreground, log lines and status events are
/// also printed to the console.
pub fn run(foreground: bool) -> WindowResult<()> {
    monitor::enable_dpi_awareness();

    let (config, load_error) = match config::try_load() {
        Ok(config) => (config.unwrap_or_default(), None),
        Err(e) => (Config::default(), Some(e)),
    };
    logging::init(&config.logging, foreground);
    if let Some(e) = load_error {
        log::warn!("{e}; starting with defaults");
    }

    pid::write_pid_file()?;
    log::info!("daemon started (PID: {})", std::process::id());

    let result = daemon_loop::daemon_loop(&config, foreground);

    let _ = pid::remove_pid_file();
    log::info!("daemon stopped");
    result
}
