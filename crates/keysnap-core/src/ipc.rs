//! Wire types for the CLI <-> daemon named pipe.
//!
//! Each side writes one JSON object per line.

use serde::{Deserialize, Serialize};

use crate::poller::PollMode;
use crate::status::TickSummary;
use crate::WindowHandle;

/// The named pipe the daemon listens on.
pub const PIPE_NAME: &str = r"\\.\pipe\keysnap";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum Command {
    Stop,
    Status,
    /// Forget which Explorer windows were already adjusted.
    ResetMarks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<StatusReport>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Ok,
    Error,
}

/// Daemon state returned for [`Command::Status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub snap_enabled: bool,
    pub explorer_enabled: bool,
    pub mode: PollMode,
    /// Windows currently snapped.
    pub snapped: Vec<WindowHandle>,
    /// Explorer windows already adjusted in one-shot mode.
    pub marked: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_tick: Option<TickSummary>,
}

impl Response {
    pub fn ok() -> Self {
        Self {
            status: ResponseStatus::Ok,
            message: None,
            report: None,
        }
    }

    pub fn ok_with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::ok()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: Some(message.into()),
            report: None,
        }
    }

    pub fn with_report(report: StatusReport) -> Self {
        Self {
            report: Some(report),
            ..Self::ok()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ResponseStatus::Ok
    }
}
