use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::sync::mpsc;

use keysnap_core::{Command, Config, Engine, StatusSink, WindowResult};

use crate::ctrl_c;
use crate::keyboard_hook::KeyboardHook;
use crate::poll_timer::PollTimer;

use super::daemon_loop_handlers;
use super::daemon_threads;
use super::daemon_types::DaemonMsg;

/// The inner daemon loop, separated so PID cleanup always runs in `run()`.
pub(super) fn daemon_loop(config: &Config, foreground: bool) -> WindowResult<()> {
    let settings = match config.validate() {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("invalid configuration, starting with defaults: {e}");
            Config::default().validate()?
        }
    };
    log::info!(
        "snap: enabled={} key=0x{:02X} presses={} interval={:?} size={}%x{}%",
        settings.snap.enabled,
        settings.snap.gesture.key,
        settings.snap.gesture.presses,
        settings.snap.gesture.interval,
        settings.snap.width_pct,
        settings.snap.height_pct
    );
    log::info!(
        "explorer: enabled={} mode={:?} every {:?}, match class {:?}",
        settings.explorer.enabled,
        settings.explorer.mode,
        settings.explorer.poll_interval,
        settings.explorer.window_match.class
    );

    let (tx, rx) = mpsc::channel::<DaemonMsg>();

    let (status, status_printer) = if foreground {
        let (status_tx, status_rx) = mpsc::channel();
        (
            StatusSink::new(status_tx),
            Some(daemon_threads::spawn_status_printer(status_rx)),
        )
    } else {
        (StatusSink::disconnected(), None)
    };
    let engine = Arc::new(Engine::new(settings, status));

    let (gesture_tx, gesture_rx) = mpsc::channel();
    let mut hook = KeyboardHook::new(engine.config().clone(), gesture_tx);
    let mut timer = PollTimer::new(engine.clone());
    daemon_loop_handlers::reconcile(&engine, &mut hook, &mut timer);

    let gesture_bridge = daemon_threads::spawn_bridge(gesture_rx, tx.clone(), DaemonMsg::Gesture);
    let ipc_thread = daemon_threads::spawn_ipc_listener(tx.clone());
    let (watcher_stop, watcher_thread, reload_bridge) =
        daemon_threads::spawn_config_watcher(tx.clone());

    if foreground {
        let ctrl_c_tx = tx.clone();
        ctrl_c::set_handler(move || {
            let _ = ctrl_c_tx.send(DaemonMsg::Shutdown);
        })?;
        println!("keysnap running, press Ctrl+C to stop.");
    }

    let mut stopped_by_command = false;
    while let Ok(msg) = rx.recv() {
        match msg {
            DaemonMsg::Gesture(signal) => daemon_loop_handlers::handle_gesture(&engine, signal),
            DaemonMsg::Reload(config) => {
                daemon_loop_handlers::handle_reload(&engine, &config, &mut hook, &mut timer);
            }
            DaemonMsg::Command(command, reply_tx) => {
                let _ = reply_tx.send(daemon_loop_handlers::handle_command(&command, &engine));
                if command == Command::Stop {
                    stopped_by_command = true;
                    break;
                }
            }
            DaemonMsg::Shutdown => {
                log::info!("Ctrl+C received, shutting down");
                break;
            }
        }
    }

    // Dropping the hook closes the gesture channel and ends its bridge.
    drop(hook);
    drop(timer);
    watcher_stop.store(true, Ordering::Relaxed);
    drop(tx);
    let _ = gesture_bridge.join();
    let _ = watcher_thread.join();
    let _ = reload_bridge.join();
    // The listener only returns after answering Stop; otherwise it is
    // blocked waiting for a client and ends with the process.
    if stopped_by_command {
        let _ = ipc_thread.join();
    }

    drop(engine);
    if let Some(printer) = status_printer {
        let _ = printer.join();
    }

    Ok(())
}
