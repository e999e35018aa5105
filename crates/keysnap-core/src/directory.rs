use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::keys::KeyCombo;
use crate::{Rect, WindowError};

/// An opaque OS window identifier, stable until the window closes.
///
/// On Windows this is the `HWND` value. Handles are never dereferenced
/// by the core, only compared and passed back to the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowHandle(pub usize);

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

/// Attributes of a window resolved at query time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    pub handle: WindowHandle,
    pub class: String,
    pub title: String,
    pub pid: u32,
    pub rect: Rect,
}

/// Selects windows by class name and, optionally, a title substring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowMatch {
    /// Exact class name (case-insensitive).
    pub class: String,
    /// Substring the title must contain (case-insensitive).
    pub title: Option<String>,
}

impl WindowMatch {
    pub fn matches(&self, class: &str, title: &str) -> bool {
        if !class.eq_ignore_ascii_case(&self.class) {
            return false;
        }
        match &self.title {
            Some(needle) => title
                .to_ascii_lowercase()
                .contains(&needle.to_ascii_lowercase()),
            None => true,
        }
    }
}

/// A synthesized hotkey delivery.
#[derive(Debug, Clone, Copy)]
pub struct HotkeyRequest<'a> {
    /// Combinations sent in order, once per repetition.
    pub sequence: &'a [KeyCombo],
    /// How many times the whole sequence is sent.
    pub repeat: u32,
    /// Pause between repetitions.
    pub delay: Duration,
    /// Give focus back to the previously active window afterwards.
    pub restore_focus: bool,
}

/// Read-only queries against the desktop.
///
/// Every answer is a snapshot valid only at call time. Per-handle
/// queries on a window that vanished return `None`/`false`.
pub trait WindowDirectory {
    /// Top-level, visible, non-minimized windows matching `filter`,
    /// in enumeration order.
    fn find_windows(&self, filter: &WindowMatch) -> Vec<WindowHandle>;

    /// The window that currently receives keyboard input.
    fn foreground_window(&self) -> Option<WindowHandle>;

    /// The visible bounds of the window.
    fn rect(&self, handle: WindowHandle) -> Option<Rect>;

    /// Whether the handle still names an existing window.
    fn is_alive(&self, handle: WindowHandle) -> bool;

    /// Class, title, owning process and bounds in one query.
    fn info(&self, handle: WindowHandle) -> Option<WindowInfo>;

    /// Work area of the monitor that contains (most of) the window.
    fn work_area(&self, handle: WindowHandle) -> Option<Rect>;

    /// Work areas of every connected monitor.
    fn work_areas(&self) -> Vec<Rect>;
}

/// Mutating operations on windows.
pub trait WindowControl {
    /// Moves and resizes the window so its visible bounds equal `rect`.
    fn set_rect(&self, handle: WindowHandle, rect: &Rect) -> Result<(), WindowError>;

    /// Leaves the maximized state. Does nothing for a normal window.
    fn unmaximize(&self, handle: WindowHandle) -> Result<(), WindowError>;

    /// Activates the window and synthesizes the requested key presses.
    fn send_hotkey(
        &self,
        handle: WindowHandle,
        request: &HotkeyRequest<'_>,
    ) -> Result<(), WindowError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn explorer() -> WindowMatch {
        WindowMatch {
            class: "CabinetWClass".into(),
            title: None,
        }
    }

    #[test]
    fn class_match_is_case_insensitive() {
        // Act / Assert
        assert!(explorer().matches("cabinetwclass", "Downloads"));
        assert!(!explorer().matches("Notepad", "Downloads"));
    }

    #[test]
    fn title_filter_is_a_substring() {
        // Arrange
        let filter = WindowMatch {
            title: Some("project".into()),
            ..explorer()
        };

        // Act / Assert
        assert!(filter.matches("CabinetWClass", "My Projects"));
        assert!(!filter.matches("CabinetWClass", "Downloads"));
    }

    #[test]
    fn handle_displays_as_hex() {
        // Assert
        assert_eq!(WindowHandle(0x1A2B).to_string(), "0x1A2B");
    }
}
