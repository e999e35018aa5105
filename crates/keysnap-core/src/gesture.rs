//! Repeated-press gesture detection.
//!
//! The detector follows one designated key and fires once that key has
//! been pressed `presses` times in a row, each press no later than
//! `interval` after the previous one. Gaps are measured between
//! consecutive presses, not across the whole run.

use std::time::{Duration, Instant};

use crate::keys;

/// Whether a key went down or came back up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Down,
    Up,
}

/// A raw key transition as reported by the input hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Virtual key code.
    pub key: u32,
    pub state: KeyState,
    pub at: Instant,
    /// Set for synthesized input (including our own hotkeys).
    pub injected: bool,
}

impl KeyEvent {
    pub fn down(key: u32, at: Instant) -> Self {
        Self {
            key,
            state: KeyState::Down,
            at,
            injected: false,
        }
    }

    pub fn up(key: u32, at: Instant) -> Self {
        Self {
            key,
            state: KeyState::Up,
            at,
            injected: false,
        }
    }
}

/// Validated gesture parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureConfig {
    /// Virtual key code of the designated key.
    pub key: u32,
    /// Presses needed to fire, at least 2.
    pub presses: usize,
    /// Longest allowed gap between two consecutive presses.
    pub interval: Duration,
    /// Presses closer than this to the previous accepted press are
    /// treated as switch bounce.
    pub debounce: Duration,
}

/// Emitted when a complete run of presses was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureFired {
    /// Time of the press that completed the run.
    pub at: Instant,
}

/// Tracks the current run of presses for one key.
#[derive(Debug)]
pub struct GestureDetector {
    config: GestureConfig,
    /// Press times of the current run; never longer than `config.presses`.
    run: Vec<Instant>,
    last_accepted: Option<Instant>,
    /// The key is physically down; auto-repeat downs are not presses.
    held: bool,
}

impl GestureDetector {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            run: Vec::new(),
            config,
            last_accepted: None,
            held: false,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Number of presses in the run so far.
    pub fn pending(&self) -> usize {
        self.run.len()
    }

    /// Switches to a new configuration.
    ///
    /// A run in progress is discarded when anything changed; it is
    /// never reinterpreted under the new parameters.
    pub fn reconfigure(&mut self, config: GestureConfig) {
        if config != self.config {
            self.config = config;
            self.run.clear();
            self.last_accepted = None;
        }
    }

    /// Drops the current run.
    pub fn reset(&mut self) {
        self.run.clear();
    }

    /// Feeds one key transition. Returns `Some` when it completes a run.
    pub fn observe(&mut self, event: &KeyEvent) -> Option<GestureFired> {
        if event.injected || !keys::key_matches(self.config.key, event.key) {
            return None;
        }

        if event.state == KeyState::Up {
            self.held = false;
            return None;
        }

        if self.held {
            return None;
        }
        self.held = true;

        if let Some(last) = self.last_accepted
            && event.at.saturating_duration_since(last) < self.config.debounce
        {
            return None;
        }
        self.last_accepted = Some(event.at);

        if let Some(&previous) = self.run.last()
            && event.at.saturating_duration_since(previous) > self.config.interval
        {
            self.run.clear();
        }
        self.run.push(event.at);

        if self.run.len() >= self.config.presses {
            self.run.clear();
            return Some(GestureFired { at: event.at });
        }
        None
    }
}
