//! Continuous drain loop.
//!
//! Repeats: check cancellation, drain everything queued, then wait for a
//! new submission, cancellation or the idle tick, whichever comes first.
//!
//! The drain takes a blocking lock and runs synchronously for as long as
//! the queue has orders, so each pass runs on the blocking pool rather
//! than on a runtime worker.

use std::sync::Arc;

use engine_core::MatchObserver;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::intake_queue::Shared;
use crate::types::DrainStats;

pub(crate) async fn run_continuous<O: MatchObserver + 'static>(
    shared: Arc<Shared<O>>,
    cancel: CancellationToken,
) -> DrainStats {
    let mut total = DrainStats::default();
    info!("continuous intake worker started");

    loop {
        if cancel.is_cancelled() {
            break;
        }

        let pass = Arc::clone(&shared);
        let stats = match tokio::task::spawn_blocking(move || {
            let mut state = pass.drain.lock();
            pass.drain_locked(&mut state)
        })
        .await
        {
            Ok(stats) => stats,
            Err(e) => {
                error!(error = %e, "drain pass failed, stopping continuous worker");
                break;
            }
        };
        if stats.processed > 0 {
            debug!(processed = stats.processed, "continuous drain pass");
        }
        total.merge(stats);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = shared.wakeup.notified() => {}
            _ = tokio::time::sleep(shared.idle_wait) => {}
        }
    }

    info!(processed = total.processed, "continuous intake worker stopped");
    total
}
