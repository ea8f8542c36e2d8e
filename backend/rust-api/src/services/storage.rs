use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::{CreateProblemRequest, Difficulty, HintLevel, Problem, Session};

#[derive(Debug, Default, Clone)]
pub struct ProblemFilter {
    pub difficulty: Option<Difficulty>,
    pub language: Option<String>,
    pub category: Option<String>,
}

/// Narrow persistence interface for the problem catalog and session
/// ledger. Session mutations go through the per-session lock in the
/// service layer; implementations only need to uphold the ledger rules
/// (see `engine::ledger`), not cross-request ordering.
#[async_trait]
pub trait Store: Send + Sync {
    async fn create_problem(&self, req: CreateProblemRequest) -> Result<Problem, ApiError>;
    async fn get_problem(&self, id: &str) -> Result<Problem, ApiError>;
    async fn list_problems(&self, filter: &ProblemFilter) -> Result<Vec<Problem>, ApiError>;

    async fn create_session(&self, problem_id: &str) -> Result<Session, ApiError>;
    async fn get_session(&self, id: &str) -> Result<Session, ApiError>;
    async fn append_hint_event(
        &self,
        session_id: &str,
        level: HintLevel,
    ) -> Result<Session, ApiError>;
    async fn append_submission(
        &self,
        session_id: &str,
        code: &str,
        is_correct: bool,
    ) -> Result<Session, ApiError>;
    async fn mark_completed(&self, session_id: &str) -> Result<Session, ApiError>;
    async fn mark_solution_revealed(&self, session_id: &str) -> Result<Session, ApiError>;

    async fn ping(&self) -> Result<(), ApiError>;
}
