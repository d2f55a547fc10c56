//! Fixed-interval background tasks.

use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// A background thread that runs a task once per interval until stopped.
///
/// The first run happens one interval after spawning.
pub(crate) struct Schedule {
    stop_tx: Sender<()>,
    handle: Option<JoinHandle<usize>>,
}

impl Schedule {
    pub(crate) fn spawn<F>(name: &str, interval: Duration, mut task: F) -> std::io::Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let (stop_tx, stop_rx) = channel();
        let dispatch = tracing::dispatcher::get_default(|current| current.clone());

        let handle = thread::Builder::new()
            .name(format!("schedule-{}", name))
            .spawn(move || {
                tracing::dispatcher::with_default(&dispatch, || {
                    let mut runs = 0usize;
                    loop {
                        match stop_rx.recv_timeout(interval) {
                            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                            Err(RecvTimeoutError::Timeout) => {
                                task();
                                runs += 1;
                            }
                        }
                    }
                    runs
                })
            })?;

        Ok(Self {
            stop_tx,
            handle: Some(handle),
        })
    }

    /// Signal the thread to stop and wait for it. Returns how many times the task ran.
    pub(crate) fn stop(mut self) -> usize {
        let _ = self.stop_tx.send(());
        self.handle
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default()
    }
}

impl Drop for Schedule {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
    }
}
