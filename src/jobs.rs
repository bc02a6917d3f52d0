use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;

/// Runs one kind of long operation (publish, decode) on worker threads and
/// guards against stale completions.
///
/// Every spawn gets a monotonically increasing run id. When a completion
/// arrives for anything but the latest issued run — a newer user action
/// superseded it — the result is discarded, not surfaced.
pub struct JobRunner<T> {
    next_run: u64,
    latest: u64,
    pending: bool,
    tx: Sender<(u64, T)>,
    rx: Receiver<(u64, T)>,
}

impl<T: Send + 'static> Default for JobRunner<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> JobRunner<T> {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self {
            next_run: 0,
            latest: 0,
            pending: false,
            tx,
            rx,
        }
    }

    /// Start `work` on a fresh worker thread, superseding any in-flight run.
    /// Returns the new run id.
    pub fn spawn<F>(&mut self, work: F) -> u64
    where
        F: FnOnce() -> T + Send + 'static,
    {
        self.next_run += 1;
        let run = self.next_run;
        self.latest = run;
        self.pending = true;

        let tx = self.tx.clone();
        thread::spawn(move || {
            // The receiver may be gone during shutdown; nothing to do then.
            let _ = tx.send((run, work()));
        });
        run
    }

    /// Drain finished runs. Only the latest issued run's result is returned;
    /// anything older is logged and dropped.
    pub fn poll(&mut self) -> Option<T> {
        let mut fresh = None;
        while let Ok((run, value)) = self.rx.try_recv() {
            if run == self.latest {
                self.pending = false;
                fresh = Some(value);
            } else {
                log::debug!("Discarding stale completion: run {run}, latest {}", self.latest);
            }
        }
        fresh
    }

    /// True while the latest run hasn't reported back yet.
    pub fn in_flight(&self) -> bool {
        self.pending
    }
}
