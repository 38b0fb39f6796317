//! Fixed-period scheduling
//!
//! - [`Updater`] runs a callback on its own thread at a fixed interval
//! - [`Cooldown`] gates work inside a callback to a slower interval
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use zzrust_core::timers::Updater;
//!
//! let mut updater = Updater::start("pulse", Duration::from_millis(50), || {
//!     println!("Tick!");
//! })?;
//!
//! updater.stop();
//! ```

mod timer;

use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{select, Sender, TryRecvError};

pub use timer::Cooldown;

/// Sleep between two pumps while waiting for an updater to exit
const PUMP_INTERVAL: Duration = Duration::from_millis(1);

/// Background thread calling a callback every `interval`
///
/// There is no catch-up: a callback that overruns its period is followed by at
/// most one immediate call, missed ticks are dropped. A callback that blocks stalls every
/// later tick.
pub struct Updater {
    name: String,
    interval: Duration,
    /// Dropping the sender tells the thread to exit
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Updater {
    /// Spawn the updater thread
    ///
    /// # Arguments
    /// * `name` - Thread name (for logs and debuggers)
    /// * `interval` - Time between the start of two callbacks
    /// * `callback` - Function to call on every tick
    pub fn start<F>(name: &str, interval: Duration, mut callback: F) -> std::io::Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let (stop, stopped) = crossbeam_channel::bounded::<()>(0);
        let ticker = crossbeam_channel::tick(interval);

        let handle = std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || loop {
                select! {
                    recv(stopped) -> _ => break,
                    recv(ticker) -> _ => {}
                }
                // A stop takes precedence over a ready tick
                if let Err(TryRecvError::Disconnected) = stopped.try_recv() {
                    break;
                }
                callback();
            })?;

        tracing::debug!("Updater '{}' started ({:?} interval)", name, interval);

        Ok(Self {
            name: name.to_string(),
            interval,
            stop: Some(stop),
            handle: Some(handle),
        })
    }

    /// Get the configured interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Check if the updater thread is still running
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Stop the thread and wait for it to exit
    ///
    /// A callback in flight finishes first.
    pub fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        drop(self.stop.take());

        if handle.thread().id() == std::thread::current().id() {
            // Stopped from inside its own callback; the loop exits on return
            return;
        }
        if handle.join().is_err() {
            tracing::error!("Updater '{}' panicked", self.name);
        } else {
            tracing::debug!("Updater '{}' stopped", self.name);
        }
    }

    /// Stop the thread, calling `pump` until it has exited
    ///
    /// Needed when the callback may be blocked on work only the calling thread
    /// can run (e.g. the owner thread stopping an updater that invokes on it).
    pub fn stop_pumping<F: FnMut()>(&mut self, mut pump: F) {
        let Some(handle) = self.handle.as_ref() else {
            return;
        };
        drop(self.stop.take());

        if handle.thread().id() != std::thread::current().id() {
            while !handle.is_finished() {
                pump();
                std::thread::sleep(PUMP_INTERVAL);
            }
        }
        self.stop();
    }
}

impl Drop for Updater {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    #[test]
    fn test_updater_ticks() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);

        let mut updater = Updater::start("tick-test", Duration::from_millis(5), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        std::thread::sleep(Duration::from_millis(100));
        updater.stop();

        let seen = ticks.load(Ordering::SeqCst);
        assert!(seen >= 2, "expected several ticks, got {}", seen);
        assert!(!updater.is_running());

        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(ticks.load(Ordering::SeqCst), seen);
    }

    #[test]
    fn test_stop_pumping_runs_blocked_work() {
        let (tx, rx) = crossbeam_channel::bounded::<crossbeam_channel::Sender<()>>(1);

        // The callback waits for the stopping thread to answer
        let mut updater = Updater::start("pump-test", Duration::from_millis(1), move || {
            let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);
            if tx.send(reply_tx).is_ok() {
                let _ = reply_rx.recv();
            }
        })
        .unwrap();

        std::thread::sleep(Duration::from_millis(20));
        let mut pumped = 0;
        updater.stop_pumping(|| {
            while let Ok(reply) = rx.try_recv() {
                let _ = reply.send(());
                pumped += 1;
            }
        });

        assert!(!updater.is_running());
        assert!(pumped >= 1);
    }

    #[test]
    fn test_overrun_drops_missed_ticks() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut updater = Updater::start("overrun-test", Duration::from_millis(1), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(20));
        })
        .unwrap();

        std::thread::sleep(Duration::from_millis(100));
        updater.stop();

        // One call per 20ms plus at most one pending tick, not one per 1ms
        let seen = calls.load(Ordering::SeqCst);
        assert!((1..=8).contains(&seen), "unexpected call count {}", seen);
    }

    #[test]
    fn test_stop_is_prompt() {
        let mut updater = Updater::start("slow-test", Duration::from_secs(60), || {}).unwrap();
        let start = Instant::now();
        updater.stop();
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
