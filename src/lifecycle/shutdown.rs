//! Shutdown coordination for the edge emulator.

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// Tests and the binary hold a `Shutdown`; the server holds a receiver and
/// stops accepting once `trigger` is called or the OS asks it to stop.
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

    /// Signal every subscriber. A no-op when nobody listens.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve when `rx` fires, its sender is dropped, or an OS signal arrives.
pub async fn wait_for_shutdown(mut rx: broadcast::Receiver<()>) {
    tokio::select! {
        _ = rx.recv() => tracing::info!("Shutdown requested"),
        _ = crate::lifecycle::signals::terminate() => tracing::info!("Shutdown signal received"),
    }
}
