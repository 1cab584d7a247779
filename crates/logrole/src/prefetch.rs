//! Detached best-effort background fetches.
//!
//! A list view that has a next page starts fetching it right away so the
//! provider's cache is warm when the user clicks through. Nothing waits on
//! the result. The scope lives as long as the client: `shutdown()` (or
//! dropping the scope) cancels everything still in flight, and each task is
//! also bounded by its own timeout.

use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

/// Counts one running task; released when the task's future is dropped,
/// however that happens.
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn enter(count: &Arc<AtomicUsize>) -> Self {
        count.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(count))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Debug)]
pub struct PrefetchScope {
    shutdown_tx: watch::Sender<bool>,
    in_flight: Arc<AtomicUsize>,
    timeout: Duration,
}

impl PrefetchScope {
    pub fn new(timeout: Duration) -> Self {
        let (shutdown_tx, _shutdown_rx) = watch::channel(false);
        Self {
            shutdown_tx,
            in_flight: Arc::new(AtomicUsize::new(0)),
            timeout,
        }
    }

    /// Run `fut` in the background. Errors and timeouts are logged and
    /// dropped. After shutdown this does nothing.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<F, T, E>(&self, label: &'static str, fut: F)
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: 'static,
        E: Display + 'static,
    {
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        if *shutdown_rx.borrow() {
            debug!(label, "prefetch skipped after shutdown");
            return;
        }

        let guard = InFlight::enter(&self.in_flight);
        let timeout = self.timeout;

        tokio::spawn(async move {
            let _guard = guard;
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    debug!(label, "prefetch cancelled");
                }
                res = tokio::time::timeout(timeout, fut) => match res {
                    Ok(Ok(_)) => debug!(label, "prefetch done"),
                    Ok(Err(e)) => debug!(label, error = %e, "prefetch failed"),
                    Err(_) => debug!(label, ?timeout, "prefetch timed out"),
                },
            }
        });
    }

    /// Cancel every in-flight prefetch and refuse new ones.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    pub fn is_shut_down(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    /// Number of prefetches still running.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

impl Drop for PrefetchScope {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}
