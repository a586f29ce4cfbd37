//! Timed-expiry loop.
//!
//! Ages the conversation state on a fixed period for the lifetime of a
//! session and fires initiations whose countdown ended. Runs independently
//! of, and concurrently with, the interactive input path.

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::engine::Engine;
use crate::error::EngineError;

/// Spawn the expiry loop on the current tokio runtime.
///
/// The loop stops when `shutdown_rx` changes (or its sender is dropped). The
/// stop signal is observed between ticks; a tick in progress runs to
/// completion. A fatal error while firing initiations also stops the loop
/// and is returned through the handle. Either way `stopped_tx` is set to
/// `true` on exit. Await the returned handle before tearing the session down.
pub fn spawn_expiry_loop(
    engine: Arc<Engine>,
    mut shutdown_rx: watch::Receiver<bool>,
    stopped_tx: watch::Sender<bool>,
) -> JoinHandle<Result<(), EngineError>> {
    tokio::spawn(async move {
        let period = engine.config().tick_interval();
        info!(period_ms = period.as_millis() as u64, "Expiry loop starting");

        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let outcome = loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Expiry loop received shutdown signal");
                    break Ok(());
                }
                _ = interval.tick() => {
                    let engine = Arc::clone(&engine);
                    // Firing an initiation queries the store synchronously
                    let mut report = match tokio::task::spawn_blocking(move || engine.tick()).await {
                        Ok(report) => report,
                        Err(err) => {
                            error!(%err, "Expiry tick panicked");
                            break Err(EngineError::from(err));
                        }
                    };

                    if !report.expired.is_empty() || !report.fired.is_empty() {
                        debug!(
                            expired = report.expired.len(),
                            fired = report.fired.len(),
                            errors = report.errors.len(),
                            "Tick complete"
                        );
                    }

                    if let Some(index) = report.errors.iter().position(EngineError::is_fatal) {
                        let err = report.errors.swap_remove(index);
                        error!(%err, "Expiry loop stopping on fatal error");
                        break Err(err);
                    }
                }
            }
        };

        let _ = stopped_tx.send(true);
        info!("Expiry loop stopped");
        outcome
    })
}
