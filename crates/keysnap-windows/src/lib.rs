#![cfg(windows)]

/// Config file change notifications.
pub mod config_watcher;

/// Console Ctrl+C handling for the foreground daemon.
pub mod ctrl_c;

/// Daemon main loop.
pub mod daemon;

/// `WindowDirectory` and `WindowControl` backed by Win32.
pub mod desktop;

/// Win32 window enumeration.
pub mod enumerate;

/// Keyboard input synthesis.
pub mod input;

/// IPC via Named Pipes.
pub mod ipc;

/// Low-level keyboard hook feeding the gesture detector.
pub mod keyboard_hook;

/// Monitor work areas and DPI awareness.
pub mod monitor;

/// Background thread driving the Explorer poller.
pub mod poll_timer;

/// Process utilities (alive check, kill).
pub mod process;

/// Window type wrapping a Win32 `HWND`.
pub mod window;

mod frame;

pub use desktop::Win32Desktop;
pub use enumerate::enumerate_windows;
pub use window::Window;
