//! Shutdown coordination.

use std::future::Future;
use std::time::Duration;

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// The probe server and any background task subscribe; a single trigger
/// tells all of them to stop taking new work.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Number of tasks still listening for the signal.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves once the subscribed shutdown fires (or its sender is gone).
pub async fn recv_shutdown(mut rx: broadcast::Receiver<()>) {
    let _ = rx.recv().await;
}

/// Wait for `drain` to finish, giving up after `deadline`.
///
/// Returns `false` when the deadline passed with work still in flight.
pub async fn drain_with_deadline<F: Future>(drain: F, deadline: Duration) -> bool {
    match tokio::time::timeout(deadline, drain).await {
        Ok(_) => true,
        Err(_) => {
            tracing::warn!(deadline_secs = deadline.as_secs(), "Drain deadline exceeded");
            false
        }
    }
}
