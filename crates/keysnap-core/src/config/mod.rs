mod loader;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::gesture::GestureConfig;
use crate::keys::{self, KeyCombo};
use crate::logging::LogConfig;
use crate::poller::PollMode;
use crate::{ConfigError, HotkeyRequest, WindowMatch};

pub use loader::{config_dir, config_path, parse, try_load};

/// Top-level configuration for keysnap.
///
/// Loaded from `~/.config/keysnap/config.toml`. Missing sections
/// fall back to defaults thanks to `#[serde(default)]`. This is the
/// raw, user-facing form; [`Config::validate`] turns it into the
/// [`Settings`] the engine runs on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Repeated-press snap/restore gesture.
    pub snap: SnapConfig,
    /// File Explorer view poller.
    pub explorer: ExplorerConfig,
    /// File logging.
    pub logging: LogConfig,
}

/// Snap/restore gesture settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    pub enabled: bool,
    /// Key name (e.g. "lshift", "Right Ctrl", "shift" for either side).
    pub key: String,
    /// Presses needed to fire the gesture.
    pub presses: u32,
    /// Longest gap between two presses, in milliseconds.
    pub interval_ms: u64,
    /// Presses closer than this to the previous one are ignored.
    pub debounce_ms: u64,
    /// Snapped width as a percentage of the monitor work area.
    pub width_pct: u32,
    /// Snapped height as a percentage of the monitor work area.
    pub height_pct: u32,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            key: "lshift".into(),
            presses: 3,
            interval_ms: 1050,
            debounce_ms: 30,
            width_pct: 76,
            height_pct: 76,
        }
    }
}

/// Explorer view poller settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub enabled: bool,
    /// "repeated" sends every tick, "one-shot" once per window.
    pub mode: PollMode,
    pub poll_interval_ms: u64,
    /// Comma-separated key combinations, e.g. "ctrl+add".
    pub hotkey: String,
    /// How many times the hotkey sequence is sent per adjustment.
    pub repeat: u32,
    /// Pause between repetitions, in milliseconds.
    pub repeat_delay_ms: u64,
    /// Hand focus back to the previously active window afterwards.
    pub restore_focus: bool,
    /// Window class to target (case-insensitive).
    pub match_class: String,
    /// Optional title substring (case-insensitive).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_title: Option<String>,
    /// In one-shot mode, adjust a window again after it navigates to
    /// another folder (title change).
    pub reapply_on_navigate: bool,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: PollMode::OneShot,
            poll_interval_ms: 4000,
            hotkey: "ctrl+add".into(),
            repeat: 1,
            repeat_delay_ms: 100,
            restore_focus: true,
            match_class: "CabinetWClass".into(),
            match_title: None,
            reapply_on_navigate: false,
        }
    }
}

/// Validated runtime settings, swapped atomically on reload.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub snap: SnapSettings,
    pub explorer: ExplorerSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapSettings {
    pub enabled: bool,
    pub gesture: GestureConfig,
    pub width_pct: u8,
    pub height_pct: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerSettings {
    pub enabled: bool,
    pub mode: PollMode,
    pub poll_interval: Duration,
    pub hotkey: Vec<KeyCombo>,
    pub repeat: u32,
    pub repeat_delay: Duration,
    pub restore_focus: bool,
    pub window_match: WindowMatch,
    pub reapply_on_navigate: bool,
}

impl ExplorerSettings {
    /// The hotkey delivery every adjusted window receives.
    pub fn request(&self) -> HotkeyRequest<'_> {
        HotkeyRequest {
            sequence: &self.hotkey,
            repeat: self.repeat,
            delay: self.repeat_delay,
            restore_focus: self.restore_focus,
        }
    }
}

/// Longest accepted press run for the snap gesture.
pub const MAX_PRESSES: u32 = 10;

impl Config {
    /// Checks every value and builds the runtime settings.
    ///
    /// Both sections are validated even when disabled, so a bad value
    /// is reported when it is written rather than when it is enabled.
    pub fn validate(&self) -> Result<Settings, ConfigError> {
        Ok(Settings {
            snap: self.snap.validate()?,
            explorer: self.explorer.validate()?,
        })
    }
}

impl SnapConfig {
    fn validate(&self) -> Result<SnapSettings, ConfigError> {
        if self.presses < 2 {
            return Err(ConfigError::TooFewPresses(self.presses));
        }
        if self.presses > MAX_PRESSES {
            return Err(ConfigError::TooManyPresses {
                value: self.presses,
                max: MAX_PRESSES,
            });
        }
        if self.interval_ms == 0 {
            return Err(ConfigError::NotPositive("snap.interval_ms"));
        }
        if self.debounce_ms >= self.interval_ms {
            return Err(ConfigError::DebounceTooLong {
                debounce_ms: self.debounce_ms,
                interval_ms: self.interval_ms,
            });
        }
        let key =
            keys::vk_from_name(&self.key).ok_or_else(|| ConfigError::UnknownKey(self.key.clone()))?;

        Ok(SnapSettings {
            enabled: self.enabled,
            gesture: GestureConfig {
                key,
                presses: self.presses as usize,
                interval: Duration::from_millis(self.interval_ms),
                debounce: Duration::from_millis(self.debounce_ms),
            },
            width_pct: percentage("snap.width_pct", self.width_pct)?,
            height_pct: percentage("snap.height_pct", self.height_pct)?,
        })
    }
}

impl ExplorerConfig {
    fn validate(&self) -> Result<ExplorerSettings, ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::NotPositive("explorer.poll_interval_ms"));
        }
        if self.repeat == 0 {
            return Err(ConfigError::NotPositive("explorer.repeat"));
        }
        let class = self.match_class.trim();
        if class.is_empty() {
            return Err(ConfigError::EmptyMatch);
        }
        let title = self
            .match_title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from);

        Ok(ExplorerSettings {
            enabled: self.enabled,
            mode: self.mode,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            hotkey: keys::parse_sequence(&self.hotkey)?,
            repeat: self.repeat,
            repeat_delay: Duration::from_millis(self.repeat_delay_ms),
            restore_focus: self.restore_focus,
            window_match: WindowMatch {
                class: class.to_string(),
                title,
            },
            reapply_on_navigate: self.reapply_on_navigate,
        })
    }
}

fn percentage(field: &'static str, value: u32) -> Result<u8, ConfigError> {
    match u8::try_from(value) {
        Ok(pct @ 1..=100) => Ok(pct),
        _ => Err(ConfigError::Percentage { field, value }),
    }
}

#[cfg(test)]
mod tests;
