pub mod config;
pub mod directory;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod ipc;
pub mod keys;
pub mod logging;
pub mod pid;
pub mod poller;
pub mod rect;
pub mod snap;
pub mod status;

mod sync;

#[cfg(test)]
mod fake;

pub use config::{Config, Settings};
pub use directory::{
    HotkeyRequest, WindowControl, WindowDirectory, WindowHandle, WindowInfo, WindowMatch,
};
pub use engine::{ConfigCell, Engine, Snapshot};
pub use error::{ConfigError, WindowError, WindowResult};
pub use geometry::RestorePlacement;
pub use gesture::{GestureConfig, GestureDetector, GestureFired, KeyEvent, KeyState};
pub use ipc::{Command, PIPE_NAME, Response, ResponseStatus, StatusReport};
pub use poller::{PollMode, TickOutcome};
pub use rect::Rect;
pub use snap::{SnapOutcome, SnapState};
pub use status::{StatusEvent, StatusSink, TickSummary};
