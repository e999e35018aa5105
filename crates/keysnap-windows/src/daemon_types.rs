use std::sync::mpsc;

use keysnap_core::{Command, Config, Response};

use crate::keyboard_hook::GestureSignal;

/// Everything the daemon thread reacts to.
pub(super) enum DaemonMsg {
    /// The hook thread recognised the snap gesture.
    Gesture(GestureSignal),
    /// The config file changed and parsed.
    Reload(Box<Config>),
    /// A CLI command with the channel its response goes back on.
    Command(Command, ResponseSender),
    /// Ctrl+C in foreground mode.
    Shutdown,
}

/// Sends a response back to the IPC thread for the connected client.
pub(super) type ResponseSender = mpsc::Sender<Response>;
