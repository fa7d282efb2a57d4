//! Periodic tick source for hosts.
//!
//! A [`TickSource`] owns a background thread that sends one tick per period.
//! Stopping or dropping it disconnects the thread and joins it, so a tick
//! source can never outlive its owner.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, trace};

/// Default tick period: one second.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A running periodic tick.
pub struct TickSource {
    ticks: Receiver<()>,
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TickSource {
    /// Start ticking every `period`.
    #[must_use]
    pub fn start(period: Duration) -> Self {
        let (tick_tx, tick_rx) = mpsc::channel();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            let mut next = Instant::now() + period;
            loop {
                let wait = next.saturating_duration_since(Instant::now());
                match stop_rx.recv_timeout(wait) {
                    Err(RecvTimeoutError::Timeout) => {
                        if tick_tx.send(()).is_err() {
                            break;
                        }
                        trace!("tick");
                        next += period;
                    }
                    // Stop requested or owner gone
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        debug!(?period, "tick source started");
        Self {
            ticks: tick_rx,
            stop: Some(stop_tx),
            handle: Some(handle),
        }
    }

    /// Start a one-second tick source.
    #[must_use]
    pub fn every_second() -> Self {
        Self::start(TICK_PERIOD)
    }

    /// Drain ticks that have already arrived, returning how many.
    #[must_use]
    pub fn pending(&self) -> usize {
        let mut count = 0;
        loop {
            match self.ticks.try_recv() {
                Ok(()) => count += 1,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return count,
            }
        }
    }

    /// Block until the next tick or until `timeout` passes.
    ///
    /// Returns `true` if a tick arrived.
    #[must_use]
    pub fn wait(&self, timeout: Duration) -> bool {
        self.ticks.recv_timeout(timeout).is_ok()
    }

    /// Stop ticking and join the background thread.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Dropping the sender wakes the thread immediately
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                debug!("tick thread panicked");
            }
            debug!("tick source stopped");
        }
    }
}

impl Drop for TickSource {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for TickSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickSource")
            .field("running", &self.handle.is_some())
            .finish()
    }
}
