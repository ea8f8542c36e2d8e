use std::sync::Arc;

use crate::error::ApiError;
use crate::models::{CreateProblemRequest, Problem};

use super::storage::{ProblemFilter, Store};

pub struct ProblemService {
    store: Arc<dyn Store>,
}

impl ProblemService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Administrative import. Publication invariant: a problem ships with
    /// all three hint texts and a solution, or not at all.
    pub async fn create_problem(&self, req: CreateProblemRequest) -> Result<Problem, ApiError> {
        if !req.hints.all_present() {
            return Err(ApiError::InvalidRequest(
                "all three hint levels must be provided".to_string(),
            ));
        }
        if req.solution.trim().is_empty() {
            return Err(ApiError::InvalidRequest(
                "a solution must be provided".to_string(),
            ));
        }

        let problem = self.store.create_problem(req).await?;
        tracing::info!(
            "Problem published: id={}, difficulty={}",
            problem.id,
            problem.difficulty.as_str()
        );
        Ok(problem)
    }

    pub async fn get_problem(&self, id: &str) -> Result<Problem, ApiError> {
        self.store.get_problem(id).await
    }

    pub async fn list_problems(&self, filter: &ProblemFilter) -> Result<Vec<Problem>, ApiError> {
        self.store.list_problems(filter).await
    }
}
