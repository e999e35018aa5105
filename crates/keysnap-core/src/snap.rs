//! Snap/restore toggle for the foreground window.
//!
//! Each window identity alternates strictly between "snapped" and
//! "restored". The pre-snap rectangle is remembered per handle for the
//! lifetime of the process; entries for closed windows are dropped on
//! the next gesture.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::geometry::{self, RestorePlacement};
use crate::sync::lock;
use crate::{ConfigCell, Rect, WindowControl, WindowDirectory, WindowError, WindowHandle};

/// Per-window toggle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapState {
    pub snapped: bool,
    /// Visible bounds right before the last snap.
    pub saved: Rect,
}

/// What a gesture did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapOutcome {
    /// No window has keyboard focus.
    NoForeground,
    /// Snapping was disabled before the change could be committed.
    Disabled,
    Snapped { handle: WindowHandle, rect: Rect },
    Restored { handle: WindowHandle, rect: Rect },
}

#[derive(Debug, Default)]
pub struct SnapController {
    states: Mutex<HashMap<WindowHandle, SnapState>>,
}

impl SnapController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snaps the foreground window, or restores it if it is snapped.
    ///
    /// State is committed only after the OS accepted the new geometry
    /// and only while snapping is still enabled. On error the stored
    /// state for the window is left exactly as it was.
    pub fn toggle<D>(
        &self,
        desktop: &D,
        config: &ConfigCell,
        placement: RestorePlacement,
    ) -> Result<SnapOutcome, WindowError>
    where
        D: WindowDirectory + WindowControl,
    {
        let snapshot = config.load();
        let settings = &snapshot.settings.snap;
        if !settings.enabled {
            return Ok(SnapOutcome::Disabled);
        }

        let mut states = lock(&self.states);
        states.retain(|handle, _| desktop.is_alive(*handle));

        let Some(handle) = desktop.foreground_window() else {
            return Ok(SnapOutcome::NoForeground);
        };

        desktop.unmaximize(handle)?;
        let work_area = desktop.work_area(handle).ok_or(WindowError::Gone(handle))?;

        let (state, rect) = match states.get(&handle) {
            Some(state) if state.snapped => {
                let target = geometry::restore_rect(
                    &state.saved,
                    &work_area,
                    &desktop.work_areas(),
                    placement,
                );
                desktop.set_rect(handle, &target)?;
                (
                    SnapState {
                        snapped: false,
                        saved: state.saved,
                    },
                    target,
                )
            }
            _ => {
                let saved = desktop.rect(handle).ok_or(WindowError::Gone(handle))?;
                let target = geometry::snap_rect(&work_area, settings.width_pct, settings.height_pct);
                desktop.set_rect(handle, &target)?;
                (
                    SnapState {
                        snapped: true,
                        saved,
                    },
                    target,
                )
            }
        };

        if !config.load().settings.snap.enabled {
            return Ok(SnapOutcome::Disabled);
        }
        states.insert(handle, state);

        Ok(if state.snapped {
            SnapOutcome::Snapped { handle, rect }
        } else {
            SnapOutcome::Restored { handle, rect }
        })
    }

    /// The remembered state of `handle`, if any.
    pub fn state(&self, handle: WindowHandle) -> Option<SnapState> {
        lock(&self.states).get(&handle).copied()
    }

    /// All windows currently snapped, ordered by handle.
    pub fn snapped(&self) -> Vec<(WindowHandle, SnapState)> {
        let mut snapped: Vec<_> = lock(&self.states)
            .iter()
            .filter(|(_, s)| s.snapped)
            .map(|(h, s)| (*h, *s))
            .collect();
        snapped.sort_by_key(|(h, _)| *h);
        snapped
    }

    /// Number of remembered windows, snapped or not.
    pub fn tracked(&self) -> usize {
        lock(&self.states).len()
    }
}
