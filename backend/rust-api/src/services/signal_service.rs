use std::sync::Arc;

use chrono::Utc;

use crate::error::ApiError;
use crate::metrics::STUCK_EVALUATIONS_TOTAL;
use crate::models::signal::{HintDecision, RecordSignalRequest, StuckReason, StuckSignal};

use super::storage::Store;
use super::SessionRuntimes;

pub struct SignalService {
    store: Arc<dyn Store>,
    runtimes: Arc<SessionRuntimes>,
}

impl SignalService {
    pub fn new(store: Arc<dyn Store>, runtimes: Arc<SessionRuntimes>) -> Self {
        Self { store, runtimes }
    }

    /// Feeds one collector observation into the session's rolling window.
    pub async fn record_signal(
        &self,
        session_id: &str,
        req: &RecordSignalRequest,
    ) -> Result<(), ApiError> {
        // reject signals for sessions that were never created
        self.store.get_session(session_id).await?;

        let lock = self.runtimes.entry(session_id);
        let mut runtime = lock.lock().await;

        // the default timestamp is taken under the lock so it can never
        // predate the window's own creation time
        runtime.window.push(StuckSignal {
            kind: req.kind,
            magnitude: req.magnitude,
            timestamp: req.timestamp.unwrap_or_else(Utc::now),
        });

        tracing::debug!(
            "Signal recorded: session={}, kind={:?}, magnitude={}",
            session_id,
            req.kind,
            req.magnitude
        );
        Ok(())
    }

    /// One detector tick. Overlapping ticks for the same session are
    /// dropped, not queued: whoever holds the session lock is already
    /// evaluating or mutating it.
    pub async fn evaluate(&self, session_id: &str) -> Result<HintDecision, ApiError> {
        self.store.get_session(session_id).await?;

        let lock = self.runtimes.entry(session_id);
        let mut runtime = match lock.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                STUCK_EVALUATIONS_TOTAL
                    .with_label_values(&["dropped"])
                    .inc();
                tracing::debug!("Evaluation dropped, session busy: {}", session_id);
                return Ok(HintDecision::none());
            }
        };

        let now = Utc::now();
        let decision = runtime.window.evaluate(now);

        if decision.reason == Some(StuckReason::FrequentDeletions) {
            // firing consumes the deletion evidence
            runtime.window.clear_deletions();
        }

        let outcome = if decision.should_hint { "hint" } else { "quiet" };
        STUCK_EVALUATIONS_TOTAL.with_label_values(&[outcome]).inc();

        if decision.should_hint {
            tracing::info!(
                "Learner looks stuck: session={}, severity={:?}, reason={:?}",
                session_id,
                decision.severity,
                decision.reason
            );
        }

        Ok(decision)
    }
}
