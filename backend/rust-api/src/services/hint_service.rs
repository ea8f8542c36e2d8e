use std::sync::Arc;

use chrono::Utc;

use crate::engine::level;
use crate::error::ApiError;
use crate::metrics::{GENERATIVE_FALLBACKS_TOTAL, HINTS_SERVED_TOTAL};
use crate::models::hint::{HintSource, RequestHintRequest, RequestHintResponse};
use crate::models::Problem;

use super::hint_backend::{GenerateHintsRequest, GenerativeBackend};
use super::storage::Store;
use super::SessionRuntimes;

pub struct HintService {
    store: Arc<dyn Store>,
    backend: Option<Arc<dyn GenerativeBackend>>,
    runtimes: Arc<SessionRuntimes>,
}

impl HintService {
    pub fn new(
        store: Arc<dyn Store>,
        backend: Option<Arc<dyn GenerativeBackend>>,
        runtimes: Arc<SessionRuntimes>,
    ) -> Self {
        Self {
            store,
            backend,
            runtimes,
        }
    }

    /// Serves one hint: validates the level transition, resolves content
    /// (generative with static fallback), then appends the ledger event and
    /// starts the cooldown under the session lock. The backend call runs
    /// outside the lock.
    pub async fn request_hint(
        &self,
        session_id: &str,
        req: &RequestHintRequest,
    ) -> Result<RequestHintResponse, ApiError> {
        let session = self.store.get_session(session_id).await?;

        // early rejection before any backend work; the authoritative check
        // runs again inside the store under the session lock
        level::classify(session.current_hint_level, req.level)?;

        let problem = self.store.get_problem(&session.problem_id).await?;
        let (hint, source) = self.resolve(&problem, req).await?;

        let lock = self.runtimes.entry(session_id);
        let mut runtime = lock.lock().await;
        let session = self.store.append_hint_event(session_id, req.level).await?;
        runtime.window.note_hint(Utc::now());
        drop(runtime);

        HINTS_SERVED_TOTAL
            .with_label_values(&[&req.level.to_string(), source.as_str()])
            .inc();

        tracing::info!(
            "Hint served: session={}, level={}, source={}, unlocked={}",
            session_id,
            req.level,
            source.as_str(),
            session.current_hint_level
        );

        Ok(RequestHintResponse {
            session_id: session.id,
            level: req.level,
            hint,
            source,
            current_hint_level: session.current_hint_level,
            hints_used: session.hints_used.len() as u32,
        })
    }

    /// Resolver contract: generative backend first when configured and
    /// enabled, exposing only the requested level; static per-problem text
    /// as fallback; `HintUnavailable` when neither exists. The solution is
    /// never substituted.
    pub async fn resolve(
        &self,
        problem: &Problem,
        req: &RequestHintRequest,
    ) -> Result<(String, HintSource), ApiError> {
        if let Some(ref backend) = self.backend {
            if Self::generative_enabled() {
                let generate = GenerateHintsRequest {
                    code: req.code.clone().unwrap_or_default(),
                    topic: problem.category.clone(),
                    personality: req.personality,
                    hint_level: req.level,
                };

                match backend.generate(&generate).await {
                    Ok(hints) => {
                        if let Some(h) = hints.into_iter().find(|h| h.level == req.level) {
                            return Ok((h.hint, HintSource::Generative));
                        }
                        tracing::warn!(
                            "Generative backend returned no level {} hint for problem={}",
                            req.level,
                            problem.id
                        );
                    }
                    Err(ApiError::BackendTimeout) => {
                        tracing::warn!(
                            "Generative backend timed out for problem={}, falling back to static",
                            problem.id
                        );
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Generative backend failed for problem={}: {}",
                            problem.id,
                            e
                        );
                    }
                }
                GENERATIVE_FALLBACKS_TOTAL.inc();
            } else {
                tracing::debug!(
                    "Generative backend disabled via env; static hint for problem={}",
                    problem.id
                );
            }
        }

        let text = problem.hints.for_level(req.level);
        if text.trim().is_empty() {
            return Err(ApiError::HintUnavailable { level: req.level });
        }
        Ok((text.to_string(), HintSource::Static))
    }

    fn generative_enabled() -> bool {
        std::env::var("HINTS_GENERATIVE_ENABLED").unwrap_or_else(|_| "1".to_string()) == "1"
    }
}
