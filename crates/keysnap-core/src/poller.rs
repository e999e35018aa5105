//! Periodic hotkey delivery to File Explorer windows.
//!
//! One [`ExplorerPoller::tick`] enumerates the windows matching the
//! configured predicate and sends the hotkey sequence to each of them,
//! either every tick (`repeated`) or once per window (`one-shot`).

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::status::{StatusEvent, StatusSink, TickSummary};
use crate::sync::lock;
use crate::{ConfigCell, WindowControl, WindowDirectory, WindowHandle};

/// How often a matching window receives the hotkey.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PollMode {
    /// Once per window lifetime.
    #[default]
    OneShot,
    /// On every tick.
    Repeated,
}

/// Result of one [`ExplorerPoller::tick`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Another tick was still running.
    Skipped,
    /// The poller is disabled.
    Disabled,
    Completed(TickSummary),
}

/// Clears the running flag when a tick ends, even by panic.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug, Default)]
pub struct ExplorerPoller {
    /// Windows already adjusted in one-shot mode, with the title they
    /// had at that point.
    marks: Mutex<HashMap<WindowHandle, String>>,
    running: AtomicBool,
}

impl ExplorerPoller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one poll cycle.
    ///
    /// Failures on a single window are counted, logged and reported to
    /// `status`; the remaining windows are still processed.
    pub fn tick<D>(&self, desktop: &D, config: &ConfigCell, status: &StatusSink) -> TickOutcome
    where
        D: WindowDirectory + WindowControl,
    {
        if self.running.swap(true, Ordering::AcqRel) {
            log::debug!("poll tick skipped, previous tick still running");
            return TickOutcome::Skipped;
        }
        let _running = RunningGuard(&self.running);

        let snapshot = config.load();
        let settings = &snapshot.settings.explorer;
        if !settings.enabled {
            return TickOutcome::Disabled;
        }

        // The marks lock is never held across a delivery.
        let known = self.prune_marks(desktop);

        let request = settings.request();
        let one_shot = settings.mode == PollMode::OneShot;
        let mut summary = TickSummary::default();

        for handle in desktop.find_windows(&settings.window_match) {
            summary.matched += 1;
            let title = desktop.info(handle).map(|i| i.title).unwrap_or_default();

            if one_shot {
                match known.get(&handle) {
                    Some(seen) if *seen == title || !settings.reapply_on_navigate => continue,
                    Some(seen) => log::debug!("{handle} navigated from {seen:?} to {title:?}"),
                    None => {}
                }
            }

            // Disabling mid-tick stops further sends.
            if !config.load().settings.explorer.enabled {
                break;
            }

            match desktop.send_hotkey(handle, &request) {
                Ok(()) => {
                    summary.adjusted += 1;
                    log::debug!("sent hotkey to {handle} ({title:?})");
                    if !config.load().settings.explorer.enabled {
                        log::debug!("poller disabled during delivery, {handle} left unmarked");
                        break;
                    }
                    if one_shot {
                        lock(&self.marks).insert(handle, title);
                    }
                }
                Err(err) => {
                    summary.failed += 1;
                    log::warn!("hotkey delivery failed: {err}");
                    status.emit(StatusEvent::WindowFailed(err));
                }
            }
        }

        if summary.adjusted > 0 || summary.failed > 0 {
            log::info!(
                "poll tick: {} matched, {} adjusted, {} failed",
                summary.matched,
                summary.adjusted,
                summary.failed
            );
        }
        status.emit(StatusEvent::PollerTick(summary));
        TickOutcome::Completed(summary)
    }

    /// Drops marks of closed windows and returns a copy of the rest.
    /// Liveness is checked without holding the lock.
    fn prune_marks<D: WindowDirectory>(&self, desktop: &D) -> HashMap<WindowHandle, String> {
        let mut known = lock(&self.marks).clone();
        let dead: Vec<WindowHandle> = known
            .keys()
            .copied()
            .filter(|handle| !desktop.is_alive(*handle))
            .collect();
        if !dead.is_empty() {
            let mut marks = lock(&self.marks);
            for handle in &dead {
                marks.remove(handle);
                known.remove(handle);
            }
        }
        known
    }

    /// Forgets every mark so one-shot mode adjusts all windows again.
    /// Returns how many marks were dropped.
    pub fn reset_marks(&self) -> usize {
        let mut marks = lock(&self.marks);
        let count = marks.len();
        marks.clear();
        count
    }

    pub fn marked_count(&self) -> usize {
        lock(&self.marks).len()
    }

    pub fn is_marked(&self, handle: WindowHandle) -> bool {
        lock(&self.marks).contains_key(&handle)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, mpsc};

    use super::*;
    use crate::fake::FakeDesktop;
    use crate::{Config, Rect, WindowError};

    const SCREEN: Rect = Rect {
        x: 0,
        y: 0,
        width: 1920,
        height: 1080,
    };

    fn cell(mode: PollMode) -> ConfigCell {
        let mut config = Config::default();
        config.explorer.mode = mode;
        ConfigCell::new(config.validate().unwrap())
    }

    fn desktop_with_explorers(handles: &[usize]) -> FakeDesktop {
        let desktop = FakeDesktop::new(vec![SCREEN]);
        for &h in handles {
            desktop.add_window(h, "CabinetWClass", "Downloads", Rect::new(0, 0, 800, 600));
        }
        desktop.add_window(99, "Notepad", "notes", Rect::new(0, 0, 400, 300));
        desktop
    }

    fn completed(outcome: TickOutcome) -> TickSummary {
        match outcome {
            TickOutcome::Completed(summary) => summary,
            other => panic!("expected a completed tick, got {other:?}"),
        }
    }

    #[test]
    fn one_shot_sends_once_per_window() {
        // Arrange
        let desktop = desktop_with_explorers(&[1, 2]);
        let config = cell(PollMode::OneShot);
        let poller = ExplorerPoller::new();
        let status = StatusSink::disconnected();

        // Act
        for _ in 0..3 {
            poller.tick(&desktop, &config, &status);
        }

        // Assert
        assert_eq!(desktop.hotkeys_sent(1), 1);
        assert_eq!(desktop.hotkeys_sent(2), 1);
        assert_eq!(desktop.hotkeys_sent(99), 0);
        assert_eq!(poller.marked_count(), 2);
    }

    #[test]
    fn repeated_sends_every_tick() {
        // Arrange
        let desktop = desktop_with_explorers(&[1, 2]);
        let config = cell(PollMode::Repeated);
        let poller = ExplorerPoller::new();
        let status = StatusSink::disconnected();

        // Act
        for _ in 0..3 {
            poller.tick(&desktop, &config, &status);
        }

        // Assert
        assert_eq!(desktop.hotkeys_sent(1), 3);
        assert_eq!(desktop.hotkeys_sent(2), 3);
        assert_eq!(poller.marked_count(), 0);
    }

    #[test]
    fn new_window_is_adjusted_on_next_tick() {
        // Arrange
        let desktop = desktop_with_explorers(&[1]);
        let config = cell(PollMode::OneShot);
        let poller = ExplorerPoller::new();
        let status = StatusSink::disconnected();
        poller.tick(&desktop, &config, &status);

        // Act
        desktop.add_window(2, "CabinetWClass", "Music", Rect::new(0, 0, 800, 600));
        let summary = completed(poller.tick(&desktop, &config, &status));

        // Assert
        assert_eq!(summary.matched, 2);
        assert_eq!(summary.adjusted, 1);
        assert_eq!(desktop.hotkeys_sent(2), 1);
    }

    #[test]
    fn failure_on_one_window_does_not_stop_the_cycle() {
        // Arrange
        let desktop = desktop_with_explorers(&[1, 2, 3]);
        desktop.deny_hotkey(2);
        let config = cell(PollMode::OneShot);
        let poller = ExplorerPoller::new();
        let (tx, rx) = mpsc::channel();

        // Act
        let summary = completed(poller.tick(&desktop, &config, &StatusSink::new(tx)));

        // Assert
        assert_eq!(
            summary,
            TickSummary {
                matched: 3,
                adjusted: 2,
                failed: 1
            }
        );
        assert!(!poller.is_marked(WindowHandle(2)));
        let events: Vec<_> = rx.try_iter().collect();
        assert!(events.iter().any(|e| matches!(
            e,
            StatusEvent::WindowFailed(WindowError::Denied { .. })
        )));
        assert!(events.contains(&StatusEvent::PollerTick(summary)));
    }

    #[test]
    fn failed_window_is_retried_next_tick() {
        // Arrange
        let desktop = desktop_with_explorers(&[1]);
        desktop.deny_hotkey(1);
        let config = cell(PollMode::OneShot);
        let poller = ExplorerPoller::new();
        let status = StatusSink::disconnected();
        poller.tick(&desktop, &config, &status);

        // Act
        desktop.allow_hotkey(1);
        poller.tick(&desktop, &config, &status);

        // Assert
        assert_eq!(desktop.hotkeys_sent(1), 1);
        assert!(poller.is_marked(WindowHandle(1)));
    }

    #[test]
    fn disabled_poller_sends_nothing() {
        // Arrange
        let desktop = desktop_with_explorers(&[1]);
        let mut raw = Config::default();
        raw.explorer.enabled = false;
        let config = ConfigCell::new(raw.validate().unwrap());
        let poller = ExplorerPoller::new();

        // Act
        let outcome = poller.tick(&desktop, &config, &StatusSink::disconnected());

        // Assert
        assert_eq!(outcome, TickOutcome::Disabled);
        assert_eq!(desktop.hotkeys_sent(1), 0);
    }

    #[test]
    fn concurrent_tick_is_skipped() {
        // Arrange
        let desktop = desktop_with_explorers(&[1]);
        let config = cell(PollMode::Repeated);
        let poller = ExplorerPoller::new();
        poller.running.store(true, Ordering::Release);

        // Act
        let outcome = poller.tick(&desktop, &config, &StatusSink::disconnected());

        // Assert
        assert_eq!(outcome, TickOutcome::Skipped);
        assert_eq!(desktop.hotkeys_sent(1), 0);
        assert!(poller.running.load(Ordering::Acquire));
    }

    #[test]
    fn closed_windows_lose_their_mark() {
        // Arrange
        let desktop = desktop_with_explorers(&[1, 2]);
        let config = cell(PollMode::OneShot);
        let poller = ExplorerPoller::new();
        let status = StatusSink::disconnected();
        poller.tick(&desktop, &config, &status);

        // Act
        desktop.close(1);
        poller.tick(&desktop, &config, &status);

        // Assert
        assert!(!poller.is_marked(WindowHandle(1)));
        assert_eq!(poller.marked_count(), 1);
    }

    #[test]
    fn reset_marks_rearms_every_window() {
        // Arrange
        let desktop = desktop_with_explorers(&[1, 2]);
        let config = cell(PollMode::OneShot);
        let poller = ExplorerPoller::new();
        let status = StatusSink::disconnected();
        poller.tick(&desktop, &config, &status);

        // Act
        let dropped = poller.reset_marks();
        poller.tick(&desktop, &config, &status);

        // Assert
        assert_eq!(dropped, 2);
        assert_eq!(desktop.hotkeys_sent(1), 2);
    }

    #[test]
    fn navigation_rearms_only_when_enabled() {
        // Arrange
        let desktop = desktop_with_explorers(&[1]);
        let plain = cell(PollMode::OneShot);
        let mut raw = Config::default();
        raw.explorer.reapply_on_navigate = true;
        let rearming = ConfigCell::new(raw.validate().unwrap());
        let poller = ExplorerPoller::new();
        let status = StatusSink::disconnected();
        poller.tick(&desktop, &plain, &status);
        desktop.set_title(1, "Documents");

        // Act
        poller.tick(&desktop, &plain, &status);
        let before = desktop.hotkeys_sent(1);
        poller.tick(&desktop, &rearming, &status);
        poller.tick(&desktop, &rearming, &status);

        // Assert
        assert_eq!(before, 1);
        assert_eq!(desktop.hotkeys_sent(1), 2);
    }

    #[test]
    fn windows_are_processed_in_enumeration_order() {
        // Arrange
        let desktop = desktop_with_explorers(&[3, 1, 2]);
        let config = cell(PollMode::Repeated);
        let poller = ExplorerPoller::new();

        // Act
        poller.tick(&desktop, &config, &StatusSink::disconnected());

        // Assert
        assert_eq!(
            desktop.delivery_order(),
            vec![WindowHandle(3), WindowHandle(1), WindowHandle(2)]
        );
    }

    #[test]
    fn disabling_during_delivery_leaves_window_unmarked() {
        // Arrange
        let desktop = desktop_with_explorers(&[1, 2]);
        let config = Arc::new(cell(PollMode::OneShot));
        let mut raw = Config::default();
        raw.explorer.enabled = false;
        let disabled = raw.validate().unwrap();
        let switch = Arc::clone(&config);
        desktop.on_send(move |_| {
            switch.replace(disabled.clone());
        });
        let poller = ExplorerPoller::new();

        // Act
        let summary = completed(poller.tick(&desktop, &config, &StatusSink::disconnected()));

        // Assert
        assert_eq!(summary.adjusted, 1);
        assert_eq!(desktop.hotkeys_sent(1), 1);
        assert_eq!(desktop.hotkeys_sent(2), 0);
        assert!(!poller.is_marked(WindowHandle(1)));
        assert_eq!(poller.marked_count(), 0);
    }
}
