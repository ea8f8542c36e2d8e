use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::{Collection, Database};
use uuid::Uuid;

use crate::engine::ledger;
use crate::error::ApiError;
use crate::metrics::track_db_operation;
use crate::models::{CreateProblemRequest, HintLevel, Problem, Session};
use crate::utils::retry::{retry_async_with_config, RetryConfig};

use super::storage::{ProblemFilter, Store};

const PROBLEMS_COLLECTION: &str = "problems";
const SESSIONS_COLLECTION: &str = "sessions";

/// MongoDB-backed store. Session writes go through `engine::ledger` on a
/// read copy and are persisted with a whole-document replace; the service
/// layer's per-session lock is the single mutation point, so no concurrent
/// replace races against another for the same id within this process.
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn problems(&self) -> Collection<Problem> {
        self.db.collection(PROBLEMS_COLLECTION)
    }

    fn sessions(&self) -> Collection<Session> {
        self.db.collection(SESSIONS_COLLECTION)
    }

    async fn replace_session(&self, session: &Session) -> Result<(), ApiError> {
        let collection = self.sessions();
        let filter = doc! { "_id": &session.id };

        track_db_operation("replace_one", SESSIONS_COLLECTION, async {
            retry_async_with_config(RetryConfig::default(), || async {
                collection
                    .replace_one(filter.clone(), session)
                    .await
                    .map(|_| ())
            })
            .await
            .context("Failed to persist session")
        })
        .await?;

        Ok(())
    }

    /// Applies one ledger mutation and persists the result.
    async fn mutate_session(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut Session) -> Result<(), ApiError>,
    ) -> Result<Session, ApiError> {
        let mut session = self.get_session(session_id).await?;
        f(&mut session)?;
        self.replace_session(&session).await?;
        Ok(session)
    }
}

#[async_trait]
impl Store for MongoStore {
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

        let collection = self.problems();
        track_db_operation("insert_one", PROBLEMS_COLLECTION, async {
            collection
                .insert_one(&problem)
                .await
                .map(|_| ())
                .context("Failed to insert problem")
        })
        .await?;

        tracing::info!("Problem created: id={}, title={}", problem.id, problem.title);
        Ok(problem)
    }

    async fn get_problem(&self, id: &str) -> Result<Problem, ApiError> {
        let collection = self.problems();
        let filter = doc! { "_id": id };

        let found = track_db_operation("find_one", PROBLEMS_COLLECTION, async {
            collection
                .find_one(filter)
                .await
                .context("Failed to query problem")
        })
        .await?;

        found.ok_or(ApiError::NotFound("problem"))
    }

    async fn list_problems(&self, filter: &ProblemFilter) -> Result<Vec<Problem>, ApiError> {
        let mut query = Document::new();
        if let Some(difficulty) = filter.difficulty {
            query.insert("difficulty", difficulty.as_str());
        }
        if let Some(ref language) = filter.language {
            query.insert("language", language);
        }
        if let Some(ref category) = filter.category {
            query.insert("category", category);
        }

        let collection = self.problems();
        let problems = track_db_operation("find", PROBLEMS_COLLECTION, async {
            // catalog order is creation order, same as the in-memory store
            let cursor = collection
                .find(query)
                .sort(doc! { "created_at": 1 })
                .await
                .context("Failed to query problems")?;
            cursor
                .try_collect::<Vec<Problem>>()
                .await
                .context("Failed to read problems cursor")
        })
        .await?;

        Ok(problems)
    }

    async fn create_session(&self, problem_id: &str) -> Result<Session, ApiError> {
        let session = Session::new(
            Uuid::new_v4().to_string(),
            problem_id.to_string(),
            Utc::now(),
        );

        let collection = self.sessions();
        track_db_operation("insert_one", SESSIONS_COLLECTION, async {
            collection
                .insert_one(&session)
                .await
                .map(|_| ())
                .context("Failed to insert session")
        })
        .await?;

        Ok(session)
    }

    async fn get_session(&self, id: &str) -> Result<Session, ApiError> {
        let collection = self.sessions();
        let filter = doc! { "_id": id };

        let found = track_db_operation("find_one", SESSIONS_COLLECTION, async {
            collection
                .find_one(filter)
                .await
                .context("Failed to query session")
        })
        .await?;

        found.ok_or(ApiError::NotFound("session"))
    }

    async fn append_hint_event(
        &self,
        session_id: &str,
        level: HintLevel,
    ) -> Result<Session, ApiError> {
        self.mutate_session(session_id, |s| {
            ledger::record_hint_used(s, level, Utc::now()).map(|_| ())
        })
        .await
    }

    async fn append_submission(
        &self,
        session_id: &str,
        code: &str,
        is_correct: bool,
    ) -> Result<Session, ApiError> {
        self.mutate_session(session_id, |s| {
            ledger::record_submission(s, code, is_correct, Utc::now());
            Ok(())
        })
        .await
    }

    async fn mark_completed(&self, session_id: &str) -> Result<Session, ApiError> {
        self.mutate_session(session_id, |s| {
            ledger::record_completion(s, Utc::now());
            Ok(())
        })
        .await
    }

    async fn mark_solution_revealed(&self, session_id: &str) -> Result<Session, ApiError> {
        self.mutate_session(session_id, |s| {
            ledger::record_solution_reveal(s, Utc::now()).map(|_| ())
        })
        .await
    }

    async fn ping(&self) -> Result<(), ApiError> {
        tokio::time::timeout(
            std::time::Duration::from_secs(1),
            self.db.run_command(doc! { "ping": 1 }),
        )
        .await
        .map_err(|_| ApiError::Storage(anyhow::anyhow!("MongoDB ping timeout after 1s")))?
        .context("MongoDB ping failed")?;

        Ok(())
    }
}
