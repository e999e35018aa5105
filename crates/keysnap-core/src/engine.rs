//! Shared runtime state of the daemon.
//!
//! The [`Engine`] owns the snap controller, the Explorer poller and the
//! active configuration. The platform layer feeds it gestures and timer
//! ticks; it never touches the OS directly.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::geometry::RestorePlacement;
use crate::ipc::StatusReport;
use crate::poller::{ExplorerPoller, PollMode, TickOutcome};
use crate::snap::{SnapController, SnapOutcome};
use crate::status::{StatusEvent, StatusSink, TickSummary};
use crate::sync::lock;
use crate::{Config, ConfigError, Settings, WindowControl, WindowDirectory, WindowError};

/// One immutable configuration generation.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Bumped on every replace; lets readers notice a change cheaply.
    pub generation: u64,
    pub settings: Arc<Settings>,
}

/// The active configuration, replaced atomically as a whole.
#[derive(Debug)]
pub struct ConfigCell {
    current: RwLock<Snapshot>,
}

impl ConfigCell {
    pub fn new(settings: Settings) -> Self {
        Self {
            current: RwLock::new(Snapshot {
                generation: 0,
                settings: Arc::new(settings),
            }),
        }
    }

    pub fn load(&self) -> Snapshot {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Installs `settings` and returns the snapshot it replaced.
    pub fn replace(&self, settings: Settings) -> Snapshot {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let next = Snapshot {
            generation: current.generation + 1,
            settings: Arc::new(settings),
        };
        std::mem::replace(&mut *current, next)
    }
}

pub struct Engine {
    config: Arc<ConfigCell>,
    snap: SnapController,
    poller: ExplorerPoller,
    last_tick: Mutex<Option<TickSummary>>,
    status: StatusSink,
}

impl Engine {
    pub fn new(settings: Settings, status: StatusSink) -> Self {
        Self {
            config: Arc::new(ConfigCell::new(settings)),
            snap: SnapController::new(),
            poller: ExplorerPoller::new(),
            last_tick: Mutex::new(None),
            status,
        }
    }

    /// The configuration cell, shared with the hook and timer threads.
    pub fn config(&self) -> &Arc<ConfigCell> {
        &self.config
    }

    pub fn settings(&self) -> Arc<Settings> {
        self.config.load().settings
    }

    /// Validates `config` and makes it the active configuration.
    ///
    /// On error the previous configuration stays active. Switching the
    /// poller from one-shot to repeated drops all marks.
    pub fn apply_config(&self, config: &Config) -> Result<(), ConfigError> {
        let settings = config.validate()?;
        let switched_to_repeated = settings.explorer.mode == PollMode::Repeated;
        let previous = self.config.replace(settings);

        if switched_to_repeated && previous.settings.explorer.mode == PollMode::OneShot {
            let dropped = self.poller.reset_marks();
            log::info!("poller switched to repeated mode, dropped {dropped} marks");
        }
        log::info!(
            "configuration applied (generation {})",
            previous.generation + 1
        );
        Ok(())
    }

    /// Snaps or restores the foreground window after a fired gesture.
    pub fn on_gesture<D>(
        &self,
        desktop: &D,
        placement: RestorePlacement,
    ) -> Result<SnapOutcome, WindowError>
    where
        D: WindowDirectory + WindowControl,
    {
        self.status.emit(StatusEvent::GestureFired);

        match self.snap.toggle(desktop, &self.config, placement) {
            Ok(outcome) => {
                match outcome {
                    SnapOutcome::Snapped { handle, rect } => {
                        log::info!("snapped {handle} to {rect:?}");
                        self.status.emit(StatusEvent::SnapApplied { handle, rect });
                    }
                    SnapOutcome::Restored { handle, rect } => {
                        log::info!("restored {handle} to {rect:?}");
                        self.status.emit(StatusEvent::RestoreApplied { handle, rect });
                    }
                    SnapOutcome::NoForeground => log::debug!("gesture ignored, no foreground window"),
                    SnapOutcome::Disabled => log::debug!("gesture ignored, snapping disabled"),
                }
                Ok(outcome)
            }
            Err(err) => {
                log::warn!("snap abandoned: {err}");
                self.status.emit(StatusEvent::WindowFailed(err.clone()));
                Err(err)
            }
        }
    }

    /// Runs one Explorer poll cycle.
    pub fn tick<D>(&self, desktop: &D) -> TickOutcome
    where
        D: WindowDirectory + WindowControl,
    {
        let outcome = self.poller.tick(desktop, &self.config, &self.status);
        if let TickOutcome::Completed(summary) = outcome {
            *lock(&self.last_tick) = Some(summary);
        }
        outcome
    }

    /// Re-arms every window for one-shot mode. Returns how many marks
    /// were dropped.
    pub fn reset_marks(&self) -> usize {
        let dropped = self.poller.reset_marks();
        log::info!("reset {dropped} poll marks");
        dropped
    }

    pub fn report(&self) -> StatusReport {
        let settings = self.settings();
        StatusReport {
            snap_enabled: settings.snap.enabled,
            explorer_enabled: settings.explorer.enabled,
            mode: settings.explorer.mode,
            snapped: self.snap.snapped().into_iter().map(|(h, _)| h).collect(),
            marked: self.poller.marked_count(),
            last_tick: *lock(&self.last_tick),
        }
    }
}
