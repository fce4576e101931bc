//! Periodic scan timer.
//!
//! A background thread emits a tick every interval over a channel. The
//! owning [`ScanTimer`] handle stops the thread when cancelled or dropped,
//! so no tick can reach a torn-down controller.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

/// Default interval between automatic scan steps.
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(3);

/// Owned, cancelable repeating tick source.
#[derive(Debug)]
pub struct ScanTimer {
    ticks: Receiver<()>,
    stop: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
    interval: Duration,
}

impl ScanTimer {
    /// Start ticking every `interval`.
    pub fn start(interval: Duration) -> Self {
        let (tick_tx, ticks) = mpsc::channel();
        let (stop, stop_rx) = mpsc::channel::<()>();

        let worker = thread::spawn(move || loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if tick_tx.send(()).is_err() {
                        break;
                    }
                }
                // Explicit stop or the handle went away
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });
        debug!(?interval, "Scan timer started");

        Self {
            ticks,
            stop: Some(stop),
            worker: Some(worker),
            interval,
        }
    }

    /// Time between ticks.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of ticks that fired since the last call. Never blocks.
    pub fn drain_ticks(&self) -> usize {
        let mut count = 0;
        loop {
            match self.ticks.try_recv() {
                Ok(()) => count += 1,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return count,
            }
        }
    }

    /// Block up to `timeout` for the next tick.
    pub fn wait_tick(&self, timeout: Duration) -> bool {
        self.ticks.recv_timeout(timeout).is_ok()
    }

    /// Whether the worker thread is still alive.
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Stop the worker thread and wait for it to exit. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
            debug!("Scan timer cancelled");
        }
    }
}

impl Drop for ScanTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
