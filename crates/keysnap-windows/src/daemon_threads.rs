use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc;
use std::thread;

use keysnap_core::{Config, StatusEvent};

use super::daemon_ipc;
use super::daemon_types::DaemonMsg;

/// Forwards everything from `rx` into the daemon channel, wrapped with
/// `wrap`. Ends when either side hangs up.
pub(super) fn spawn_bridge<T: Send + 'static>(
    rx: mpsc::Receiver<T>,
    tx: mpsc::Sender<DaemonMsg>,
    wrap: fn(T) -> DaemonMsg,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for item in rx {
            if tx.send(wrap(item)).is_err() {
                break;
            }
        }
    })
}

pub(super) fn spawn_ipc_listener(tx: mpsc::Sender<DaemonMsg>) -> thread::JoinHandle<()> {
    thread::spawn(move || daemon_ipc::ipc_loop(tx))
}

/// Spawns the config watcher thread and a bridge into the daemon channel.
pub(super) fn spawn_config_watcher(
    tx: mpsc::Sender<DaemonMsg>,
) -> (
    Arc<AtomicBool>,
    thread::JoinHandle<()>,
    thread::JoinHandle<()>,
) {
    let (reload_tx, reload_rx) = mpsc::channel::<Config>();
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = stop.clone();
    let watcher = thread::spawn(move || crate::config_watcher::watch(reload_tx, stop_flag));
    let bridge = spawn_bridge(reload_rx, tx, |config| DaemonMsg::Reload(Box::new(config)));

    (stop, watcher, bridge)
}

/// Prints status events to stdout until every sender is gone.
pub(super) fn spawn_status_printer(rx: mpsc::Receiver<StatusEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for event in rx {
            // Tick summaries arrive every few seconds; only show work.
            if let StatusEvent::PollerTick(summary) = &event
                && summary.adjusted == 0
                && summary.failed == 0
            {
                continue;
            }
            println!("{event}");
        }
    })
}
