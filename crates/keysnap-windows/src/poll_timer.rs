use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use keysnap_core::{Engine, TickOutcome};

use crate::desktop::Win32Desktop;

enum TimerSignal {
    /// Abandon the current wait and start a new one with the current interval.
    Reschedule,
    Stop,
}

struct TimerThread {
    signal_tx: Sender<TimerSignal>,
    handle: thread::JoinHandle<()>,
    /// Interval the thread was last told about.
    interval: Duration,
}

/// Drives [`Engine::tick`] from a background thread.
///
/// The next wait starts only after a tick returns, so a slow tick
/// delays the schedule instead of queueing extra ticks. The interval
/// is re-read from the active configuration before every wait.
pub struct PollTimer {
    engine: Arc<Engine>,
    thread: Option<TimerThread>,
}

impl PollTimer {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self {
            engine,
            thread: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.thread.is_some()
    }

    /// Starts the timer thread unless it is already running.
    pub fn start(&mut self) {
        if self.thread.is_some() {
            return;
        }
        let (signal_tx, signal_rx) = mpsc::channel();
        let engine = self.engine.clone();
        let interval = engine.settings().explorer.poll_interval;
        let handle = thread::spawn(move || {
            run(
                || engine.settings().explorer.poll_interval,
                || {
                    if engine.tick(&Win32Desktop) == TickOutcome::Skipped {
                        log::debug!("poll tick overlapped a running one");
                    }
                },
                &signal_rx,
            );
        });
        self.thread = Some(TimerThread {
            signal_tx,
            handle,
            interval,
        });
        log::info!("explorer poll timer started");
    }

    /// Restarts the pending wait when the configured interval differs
    /// from the one the thread is sleeping on.
    pub fn reschedule(&mut self) {
        let interval = self.engine.settings().explorer.poll_interval;
        if let Some(thread) = self.thread.as_mut()
            && thread.interval != interval
        {
            thread.interval = interval;
            let _ = thread.signal_tx.send(TimerSignal::Reschedule);
            log::debug!("poll interval changed to {interval:?}");
        }
    }

    /// Stops the timer thread if it is running. A tick in progress is
    /// allowed to finish.
    pub fn stop(&mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.signal_tx.send(TimerSignal::Stop);
            let _ = thread.handle.join();
            log::info!("explorer poll timer stopped");
        }
    }
}

impl Drop for PollTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run(
    interval: impl Fn() -> Duration,
    mut tick: impl FnMut(),
    signal_rx: &Receiver<TimerSignal>,
) {
    loop {
        match signal_rx.recv_timeout(interval()) {
            Err(RecvTimeoutError::Timeout) => tick(),
            Ok(TimerSignal::Reschedule) => {}
            Ok(TimerSignal::Stop) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}
