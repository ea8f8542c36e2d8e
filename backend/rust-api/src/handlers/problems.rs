use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::ApiError,
    models::{CreateProblemRequest, Difficulty, ProblemDetail, ProblemSummary},
    services::{problem_service::ProblemService, storage::ProblemFilter, AppState},
};

#[derive(Debug, Default, Deserialize)]
pub struct ListProblemsQuery {
    pub difficulty: Option<Difficulty>,
    pub language: Option<String>,
    pub category: Option<String>,
}

pub async fn list_problems(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListProblemsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let service = ProblemService::new(state.store.clone());

    let filter = ProblemFilter {
        difficulty: query.difficulty,
        language: query.language,
        category: query.category,
    };

    let problems = service.list_problems(&filter).await?;
    let summaries: Vec<ProblemSummary> = problems.iter().map(ProblemSummary::from).collect();

    Ok((StatusCode::OK, Json(summaries)))
}

pub async fn get_problem(
    State(state): State<Arc<AppState>>,
    Path(problem_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let service = ProblemService::new(state.store.clone());

    let problem = service.get_problem(&problem_id).await?;
    Ok((StatusCode::OK, Json(ProblemDetail::from(problem))))
}

pub async fn create_problem(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateProblemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!("Creating problem: {}", req.title);

    let service = ProblemService::new(state.store.clone());

    let problem = service.create_problem(req).await?;
    Ok((StatusCode::CREATED, Json(ProblemDetail::from(problem))))
}
