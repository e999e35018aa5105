use thiserror::Error;

use crate::WindowHandle;

/// A boxed error type for OS plumbing (pipes, PID files, hooks).
///
/// Window operations that callers need to tell apart use
/// [`WindowError`] instead.
pub type WindowResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Failure of a single window operation.
///
/// Both variants are recoverable: the caller skips the operation and
/// keeps running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// The handle no longer resolves (closed between enumeration and use).
    #[error("window {0} no longer exists")]
    Gone(WindowHandle),
    /// The OS refused a geometry change, focus change or input injection.
    #[error("window {handle}: {action} refused: {reason}")]
    Denied {
        handle: WindowHandle,
        action: &'static str,
        reason: String,
    },
}

impl WindowError {
    pub fn denied(handle: WindowHandle, action: &'static str, reason: impl ToString) -> Self {
        Self::Denied {
            handle,
            action,
            reason: reason.to_string(),
        }
    }

    /// The window this error is about.
    pub fn handle(&self) -> WindowHandle {
        match self {
            Self::Gone(handle) | Self::Denied { handle, .. } => *handle,
        }
    }
}

/// A configuration value that cannot be applied.
///
/// Rejected configurations never replace the active one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("snap.presses must be at least 2 (got {0})")]
    TooFewPresses(u32),
    #[error("snap.presses must be at most {max} (got {value})")]
    TooManyPresses { value: u32, max: u32 },
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
    #[error("snap.debounce_ms ({debounce_ms}) must be shorter than snap.interval_ms ({interval_ms})")]
    DebounceTooLong { debounce_ms: u64, interval_ms: u64 },
    #[error("{field} must be between 1 and 100 (got {value})")]
    Percentage { field: &'static str, value: u32 },
    #[error("unknown key name: {0:?}")]
    UnknownKey(String),
    #[error("invalid hotkey {hotkey:?}: {reason}")]
    InvalidHotkey {
        hotkey: String,
        reason: &'static str,
    },
    #[error("explorer.match_class must not be empty")]
    EmptyMatch,
    #[error("{0}")]
    Load(String),
}
