use keysnap_core::geometry::RestorePlacement;
use keysnap_core::{Command, Config, Engine, Response};

use crate::desktop::Win32Desktop;
use crate::keyboard_hook::{GestureSignal, KeyboardHook};
use crate::poll_timer::PollTimer;

/// Brings the hook and the poll timer in line with the enabled flags of
/// the active configuration.
pub(super) fn reconcile(engine: &Engine, hook: &mut KeyboardHook, timer: &mut PollTimer) {
    let settings = engine.settings();

    if settings.snap.enabled {
        if let Err(e) = hook.install() {
            log::error!("snap gesture unavailable: {e}");
        }
    } else {
        hook.uninstall();
    }

    if settings.explorer.enabled {
        timer.start();
        timer.reschedule();
    } else {
        timer.stop();
    }
}

pub(super) fn handle_gesture(engine: &Engine, signal: GestureSignal) {
    let placement = if signal.centered {
        RestorePlacement::Centered
    } else {
        RestorePlacement::Original
    };
    // Failures are logged and reported by the engine.
    let _ = engine.on_gesture(&Win32Desktop, placement);
}

pub(super) fn handle_reload(
    engine: &Engine,
    config: &Config,
    hook: &mut KeyboardHook,
    timer: &mut PollTimer,
) {
    match engine.apply_config(config) {
        Ok(()) => reconcile(engine, hook, timer),
        Err(e) => log::warn!("configuration rejected, keeping current settings: {e}"),
    }
}

pub(super) fn handle_command(command: &Command, engine: &Engine) -> Response {
    match command {
        Command::Stop => {
            log::info!("stop command received, shutting down");
            Response::ok_with_message("daemon stopping")
        }
        Command::Status => Response::with_report(engine.report()),
        Command::ResetMarks => {
            let dropped = engine.reset_marks();
            Response::ok_with_message(format!("{dropped} Explorer windows will be adjusted again"))
        }
    }
}
