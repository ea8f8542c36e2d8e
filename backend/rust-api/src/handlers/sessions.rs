use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::{
    error::ApiError,
    models::{
        hint::RequestHintRequest, signal::RecordSignalRequest, CreateSessionRequest,
        SubmitAttemptRequest,
    },
    services::{
        hint_service::HintService, session_service::SessionService,
        signal_service::SignalService, AppState,
    },
};

pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!("Creating session for problem: {}", req.problem_id);

    let service = SessionService::new(state.store.clone(), state.runtimes.clone());

    let session = service.create_session(&req.problem_id).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let service = SessionService::new(state.store.clone(), state.runtimes.clone());

    let session = service.get_session(&session_id).await?;
    Ok((StatusCode::OK, Json(session)))
}

pub async fn request_hint(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<RequestHintRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!(
        "Requesting hint for session: {}, level: {}",
        session_id,
        req.level
    );

    let service = HintService::new(
        state.store.clone(),
        state.backend.clone(),
        state.runtimes.clone(),
    );

    let response = service.request_hint(&session_id, &req).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub async fn submit_attempt(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<SubmitAttemptRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!("Submitting attempt for session: {}", session_id);

    let service = SessionService::new(state.store.clone(), state.runtimes.clone());

    let session = service.submit_attempt(&session_id, &req).await?;
    Ok((StatusCode::OK, Json(session)))
}

pub async fn record_signal(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<RecordSignalRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let service = SignalService::new(state.store.clone(), state.runtimes.clone());

    service.record_signal(&session_id, &req).await?;
    Ok(StatusCode::ACCEPTED)
}

pub async fn evaluate_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let service = SignalService::new(state.store.clone(), state.runtimes.clone());

    let decision = service.evaluate(&session_id).await?;
    Ok((StatusCode::OK, Json(decision)))
}

pub async fn reveal_solution(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!("Solution requested for session: {}", session_id);

    let service = SessionService::new(state.store.clone(), state.runtimes.clone());

    let response = service.reveal_solution(&session_id).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub async fn complete_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!("Completing session: {}", session_id);

    let service = SessionService::new(state.store.clone(), state.runtimes.clone());

    let session = service.complete_session(&session_id).await?;
    Ok((StatusCode::OK, Json(session)))
}
