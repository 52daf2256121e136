//! Fetch driver
//!
//! Background task bridging query changes to fetches: on every revision
//! bump it cancels the in-flight fetch and starts a fresh one with its
//! own cancellation token, so results from superseded requests are
//! discarded no matter when they arrive.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::engine::CatalogEngine;

/// Handle to the spawned fetch loop.
pub struct FetchDriver {
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
}

impl FetchDriver {
    /// Spawn the fetch loop. Performs an initial load immediately, then
    /// re-fetches on every engine revision change.
    pub fn spawn(engine: Arc<CatalogEngine>) -> Self {
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();
        let handle = tokio::spawn(async move {
            run(engine, token).await;
        });

        Self { shutdown, handle }
    }

    /// Stop the loop and cancel any in-flight fetch.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        let _ = self.handle.await;
    }
}

async fn run(engine: Arc<CatalogEngine>, shutdown: CancellationToken) {
    let mut revision = engine.subscribe();
    let mut in_flight = start_fetch(&engine);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                in_flight.cancel();
                tracing::debug!("Fetch driver stopped");
                return;
            }
            changed = revision.changed() => {
                if changed.is_err() {
                    in_flight.cancel();
                    return;
                }
                in_flight.cancel();
                in_flight = start_fetch(&engine);
            }
        }
    }
}

/// Launch one fetch cycle and hand back the token that supersedes it.
fn start_fetch(engine: &Arc<CatalogEngine>) -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let engine = Arc::clone(engine);
    tokio::spawn(async move {
        engine.load_products(&token).await;
    });
    cancel
}
