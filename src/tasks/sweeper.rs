//! Periodic Sweeper
//!
//! Owned background thread that runs a sweep closure on a fixed interval
//! until it is stopped.

use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

/// Handle to a running sweeper thread.
///
/// Dropping the handle stops the thread and waits for it to exit. A sweep
/// that is already running is allowed to finish.
#[derive(Debug)]
pub struct Sweeper {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Sweeper {
    /// Spawns a named thread that calls `sweep` every `interval`.
    ///
    /// The closure returns `false` to end the loop on its own, e.g. when the
    /// state it sweeps is gone.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use memocache::tasks::Sweeper;
    ///
    /// let sweeper = Sweeper::spawn("demo-sweeper", Duration::from_millis(10), || true).unwrap();
    /// sweeper.stop();
    /// ```
    pub fn spawn<F>(name: &str, interval: Duration, mut sweep: F) -> io::Result<Self>
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let thread_name = name.to_string();

        let handle = thread::Builder::new().name(thread_name.clone()).spawn(move || {
            info!(
                "Starting {} with interval of {} ms",
                thread_name,
                interval.as_millis()
            );

            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if !sweep() {
                            debug!("{}: swept state dropped, exiting", thread_name);
                            break;
                        }
                    }
                    // Explicit stop or the handle was dropped
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }

            debug!("{} stopped", thread_name);
        })?;

        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Signals the thread and waits for it to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    /// Returns true once the thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    fn shutdown(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            // A send error means the thread already exited
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Sweeper thread panicked before shutdown");
            }
        }
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.shutdown();
    }
}
