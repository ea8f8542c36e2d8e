use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::engine::ledger;
use crate::error::ApiError;
use crate::models::{CreateProblemRequest, HintLevel, Problem, Session};

use super::storage::{ProblemFilter, Store};

/// In-memory store backing the integration tests and local demos. Shares
/// the ledger code path with the Mongo store so both enforce the same
/// session rules.
#[derive(Default)]
pub struct MemoryStore {
    problems: RwLock<HashMap<String, Problem>>,
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_session<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut Session) -> Result<T, ApiError>,
    ) -> Result<(T, Session), ApiError> {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        let session = sessions
            .get_mut(id)
            .ok_or(ApiError::NotFound("session"))?;
        let out = f(session)?;
        Ok((out, session.clone()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_problem(&self, req: CreateProblemRequest) -> Result<Problem, ApiError> {
        let problem = Problem {
            id: Uuid::new_v4().to_string(),
            title: req.title,
            description: req.description,
            difficulty: req.difficulty,
            language: req.language,
            category: req.category,
            hints: req.hints,
            solution: req.solution,
            test_cases: req.test_cases,
            created_at: Utc::now(),
        };
        self.problems
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(problem.id.clone(), problem.clone());
        Ok(problem)
    }

    async fn get_problem(&self, id: &str) -> Result<Problem, ApiError> {
        self.problems
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
            .ok_or(ApiError::NotFound("problem"))
    }

    async fn list_problems(&self, filter: &ProblemFilter) -> Result<Vec<Problem>, ApiError> {
        let problems = self.problems.read().unwrap_or_else(|e| e.into_inner());
        let mut matched: Vec<Problem> = problems
            .values()
            .filter(|p| filter.difficulty.is_none_or(|d| p.difficulty == d))
            .filter(|p| filter.language.as_ref().is_none_or(|l| &p.language == l))
            .filter(|p| filter.category.as_ref().is_none_or(|c| &p.category == c))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(matched)
    }

    async fn create_session(&self, problem_id: &str) -> Result<Session, ApiError> {
        let session = Session::new(
            Uuid::new_v4().to_string(),
            problem_id.to_string(),
            Utc::now(),
        );
        self.sessions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(session.id.clone(), session.clone());
        Ok(session)
    }

    async fn get_session(&self, id: &str) -> Result<Session, ApiError> {
        self.sessions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
            .ok_or(ApiError::NotFound("session"))
    }

    async fn append_hint_event(
        &self,
        session_id: &str,
        level: HintLevel,
    ) -> Result<Session, ApiError> {
        let (_, session) = self.with_session(session_id, |s| {
            ledger::record_hint_used(s, level, Utc::now())
        })?;
        Ok(session)
    }

    async fn append_submission(
        &self,
        session_id: &str,
        code: &str,
        is_correct: bool,
    ) -> Result<Session, ApiError> {
        let (_, session) = self.with_session(session_id, |s| {
            ledger::record_submission(s, code, is_correct, Utc::now());
            Ok(())
        })?;
        Ok(session)
    }

    async fn mark_completed(&self, session_id: &str) -> Result<Session, ApiError> {
        let (_, session) = self.with_session(session_id, |s| {
            ledger::record_completion(s, Utc::now());
            Ok(())
        })?;
        Ok(session)
    }

    async fn mark_solution_revealed(&self, session_id: &str) -> Result<Session, ApiError> {
        let (_, session) = self.with_session(session_id, |s| {
            ledger::record_solution_reveal(s, Utc::now()).map(|_| ())
        })?;
        Ok(session)
    }

    async fn ping(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, HintTexts};

    fn problem_request() -> CreateProblemRequest {
        CreateProblemRequest {
            title: "Two Sum".into(),
            description: "Find two numbers adding to a target".into(),
            difficulty: Difficulty::Beginner,
            language: "python".into(),
            category: "arrays".into(),
            hints: HintTexts {
                level1: "What pairs exist?".into(),
                level2: "A lookup table avoids the inner loop.".into(),
                level3: "for i, x in enumerate(nums): check target - x".into(),
            },
            solution: "def two_sum(...): ...".into(),
            test_cases: vec![],
        }
    }

    #[tokio::test]
    async fn session_round_trip_with_ledger_rules() {
        let store = MemoryStore::new();
        let problem = store.create_problem(problem_request()).await.unwrap();
        let session = store.create_session(&problem.id).await.unwrap();
        assert_eq!(session.current_hint_level, HintLevel::One);

        let session = store
            .append_hint_event(&session.id, HintLevel::Two)
            .await
            .unwrap();
        assert_eq!(session.current_hint_level, HintLevel::Two);

        let session = store.mark_completed(&session.id).await.unwrap();
        let first_completed_at = session.completed_at;
        let session = store.mark_completed(&session.id).await.unwrap();
        assert_eq!(session.completed_at, first_completed_at);
    }

    #[tokio::test]
    async fn skip_ahead_is_refused_by_the_shared_ledger_path() {
        let store = MemoryStore::new();
        let problem = store.create_problem(problem_request()).await.unwrap();
        let session = store.create_session(&problem.id).await.unwrap();

        let err = store
            .append_hint_event(&session.id, HintLevel::Three)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidTransition { .. }));

        let session = store.get_session(&session.id).await.unwrap();
        assert_eq!(session.current_hint_level, HintLevel::One);
        assert!(session.hints_used.is_empty());
    }

    #[tokio::test]
    async fn list_problems_filters_by_language() {
        let store = MemoryStore::new();
        store.create_problem(problem_request()).await.unwrap();
        let mut other = problem_request();
        other.language = "rust".into();
        store.create_problem(other).await.unwrap();

        let filter = ProblemFilter {
            language: Some("rust".into()),
            ..Default::default()
        };
        let listed = store.list_problems(&filter).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].language, "rust");
    }

    #[tokio::test]
    async fn list_problems_is_ordered_by_creation_time() {
        let store = MemoryStore::new();
        let first = store.create_problem(problem_request()).await.unwrap();
        let mut later = problem_request();
        later.title = "Three Sum".into();
        let second = store.create_problem(later).await.unwrap();

        let listed = store
            .list_problems(&ProblemFilter::default())
            .await
            .unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, first.id);
        assert_eq!(listed[1].id, second.id);
    }

    #[tokio::test]
    async fn unknown_ids_surface_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.get_problem("missing").await.unwrap_err(),
            ApiError::NotFound("problem")
        ));
        assert!(matches!(
            store.get_session("missing").await.unwrap_err(),
            ApiError::NotFound("session")
        ));
    }
}
