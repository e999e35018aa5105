use std::fmt;
use std::sync::mpsc::Sender;

use serde::{Deserialize, Serialize};

use crate::{Rect, WindowError, WindowHandle};

/// Something the engine did, published for display.
///
/// Status events are advisory. Nothing in the engine waits for them
/// to be read.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusEvent {
    /// The snap gesture was recognised.
    GestureFired,
    /// A window was snapped to `rect`.
    SnapApplied { handle: WindowHandle, rect: Rect },
    /// A snapped window was moved back to `rect`.
    RestoreApplied { handle: WindowHandle, rect: Rect },
    /// One poller cycle finished.
    PollerTick(TickSummary),
    /// An operation on one window failed and was skipped.
    WindowFailed(WindowError),
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GestureFired => write!(f, "gesture fired"),
            Self::SnapApplied { handle, rect } => write!(
                f,
                "snapped {handle} to {}x{} at ({}, {})",
                rect.width, rect.height, rect.x, rect.y
            ),
            Self::RestoreApplied { handle, rect } => write!(
                f,
                "restored {handle} to {}x{} at ({}, {})",
                rect.width, rect.height, rect.x, rect.y
            ),
            Self::PollerTick(s) => write!(
                f,
                "poll: {} matched, {} adjusted, {} failed",
                s.matched, s.adjusted, s.failed
            ),
            Self::WindowFailed(err) => write!(f, "skipped: {err}"),
        }
    }
}

/// Outcome counters of one poller cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickSummary {
    /// Windows that matched the predicate.
    pub matched: usize,
    /// Windows that received the hotkey sequence.
    pub adjusted: usize,
    /// Windows whose delivery failed.
    pub failed: usize,
}

/// Publishes status events to an optional listener.
#[derive(Debug, Clone, Default)]
pub struct StatusSink {
    tx: Option<Sender<StatusEvent>>,
}

impl StatusSink {
    pub fn new(tx: Sender<StatusEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A sink that drops every event.
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Sends the event. A gone listener is not an error.
    pub fn emit(&self, event: StatusEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }
}
