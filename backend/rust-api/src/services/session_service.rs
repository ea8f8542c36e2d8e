use std::sync::Arc;

use chrono::Utc;

use crate::error::ApiError;
use crate::metrics::{SESSIONS_ACTIVE, SESSIONS_TOTAL, SUBMISSIONS_TOTAL};
use crate::models::hint::SolutionResponse;
use crate::models::signal::{SignalKind, StuckSignal};
use crate::models::{Session, SubmitAttemptRequest};

use super::storage::Store;
use super::SessionRuntimes;

pub struct SessionService {
    store: Arc<dyn Store>,
    runtimes: Arc<SessionRuntimes>,
}

impl SessionService {
    pub fn new(store: Arc<dyn Store>, runtimes: Arc<SessionRuntimes>) -> Self {
        Self { store, runtimes }
    }

    pub async fn create_session(&self, problem_id: &str) -> Result<Session, ApiError> {
        // the problem must exist before a session can reference it
        let problem = self.store.get_problem(problem_id).await?;
        let session = self.store.create_session(&problem.id).await?;

        SESSIONS_TOTAL.with_label_values(&["created"]).inc();
        SESSIONS_ACTIVE.inc();

        tracing::info!(
            "Session created: {} for problem: {}",
            session.id,
            problem.id
        );
        Ok(session)
    }

    pub async fn get_session(&self, session_id: &str) -> Result<Session, ApiError> {
        self.store.get_session(session_id).await
    }

    pub async fn submit_attempt(
        &self,
        session_id: &str,
        req: &SubmitAttemptRequest,
    ) -> Result<Session, ApiError> {
        // unknown ids must not leave a runtime entry behind
        self.store.get_session(session_id).await?;

        let lock = self.runtimes.entry(session_id);
        let mut runtime = lock.lock().await;

        let session = self
            .store
            .append_submission(session_id, &req.code, req.is_correct)
            .await?;

        // a submission is a code edit: feed the detector window so the
        // pause clock resets and progress can be measured
        runtime.window.push(StuckSignal {
            kind: SignalKind::CodeLength,
            magnitude: req.code.len() as f64,
            timestamp: Utc::now(),
        });

        SUBMISSIONS_TOTAL
            .with_label_values(&[if req.is_correct { "true" } else { "false" }])
            .inc();

        tracing::info!(
            "Submission recorded: session={}, correct={}, attempts={}",
            session_id,
            req.is_correct,
            session.attempts.len()
        );
        Ok(session)
    }

    /// Idempotent: a second completion is a no-op, not an error.
    pub async fn complete_session(&self, session_id: &str) -> Result<Session, ApiError> {
        // unknown ids must not leave a runtime entry behind
        self.store.get_session(session_id).await?;

        let lock = self.runtimes.entry(session_id);
        let _guard = lock.lock().await;

        let before = self.store.get_session(session_id).await?;
        let session = self.store.mark_completed(session_id).await?;

        if !before.completed {
            SESSIONS_TOTAL.with_label_values(&["completed"]).inc();
            SESSIONS_ACTIVE.dec();
            tracing::info!("Session completed: {}", session_id);
        }

        drop(_guard);
        // completed sessions are archived, their runtime window is dropped
        self.runtimes.remove(session_id);

        Ok(session)
    }

    /// One-way reveal of the full solution, only after the whole hint
    /// ladder is unlocked. Never served as a hint substitute.
    pub async fn reveal_solution(&self, session_id: &str) -> Result<SolutionResponse, ApiError> {
        // unknown ids must not leave a runtime entry behind
        self.store.get_session(session_id).await?;

        let lock = self.runtimes.entry(session_id);
        let _guard = lock.lock().await;

        let session = self.store.mark_solution_revealed(session_id).await?;
        let problem = self.store.get_problem(&session.problem_id).await?;

        let revealed_at = session
            .solution_revealed_at
            .ok_or_else(|| ApiError::Storage(anyhow::anyhow!("reveal timestamp missing")))?;

        tracing::info!("Solution revealed: session={}", session_id);

        Ok(SolutionResponse {
            session_id: session.id,
            solution: problem.solution,
            revealed_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    use crate::metrics::SESSIONS_ACTIVE;
    use crate::models::{CreateProblemRequest, Difficulty, HintTexts};
    use crate::services::memory_store::MemoryStore;
    use crate::services::storage::Store as _;

    async fn service_with_problem() -> (SessionService, Arc<SessionRuntimes>, String) {
        let store = Arc::new(MemoryStore::new());
        let problem = store
            .create_problem(CreateProblemRequest {
                title: "Palindrome check".into(),
                description: "Is the input the same reversed?".into(),
                difficulty: Difficulty::Beginner,
                language: "python".into(),
                category: "strings".into(),
                hints: HintTexts {
                    level1: "a".into(),
                    level2: "b".into(),
                    level3: "c".into(),
                },
                solution: "s == s[::-1]".into(),
                test_cases: vec![],
            })
            .await
            .unwrap();
        let runtimes = Arc::new(SessionRuntimes::default());
        let service = SessionService::new(store, runtimes.clone());
        (service, runtimes, problem.id)
    }

    #[tokio::test]
    async fn unknown_session_ids_leave_no_runtime_entry() {
        let (service, runtimes, _) = service_with_problem().await;

        let req = SubmitAttemptRequest {
            code: "pass".into(),
            is_correct: false,
        };
        assert!(matches!(
            service.submit_attempt("ghost", &req).await.unwrap_err(),
            ApiError::NotFound("session")
        ));
        assert!(matches!(
            service.complete_session("ghost").await.unwrap_err(),
            ApiError::NotFound("session")
        ));
        assert!(matches!(
            service.reveal_solution("ghost").await.unwrap_err(),
            ApiError::NotFound("session")
        ));

        // the registry only ever holds sessions that exist
        assert_eq!(runtimes.len(), 0);
    }

    #[tokio::test]
    async fn completed_sessions_release_their_runtime_entry() {
        let (service, runtimes, problem_id) = service_with_problem().await;
        let session = service.create_session(&problem_id).await.unwrap();

        let req = SubmitAttemptRequest {
            code: "s == s[::-1]".into(),
            is_correct: true,
        };
        service.submit_attempt(&session.id, &req).await.unwrap();
        assert_eq!(runtimes.len(), 1);

        service.complete_session(&session.id).await.unwrap();
        assert_eq!(runtimes.len(), 0);
    }

    #[tokio::test]
    #[serial]
    async fn active_gauge_is_created_minus_completed() {
        let (service, _, problem_id) = service_with_problem().await;
        let before = SESSIONS_ACTIVE.get();

        let session = service.create_session(&problem_id).await.unwrap();
        assert_eq!(SESSIONS_ACTIVE.get(), before + 1);

        // repeat completion must not decrement twice
        service.complete_session(&session.id).await.unwrap();
        service.complete_session(&session.id).await.unwrap();
        assert_eq!(SESSIONS_ACTIVE.get(), before);
    }
}
