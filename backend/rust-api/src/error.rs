use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::HintLevel;

/// Error taxonomy for the hint engine. Nothing here is fatal to the
/// process: every variant resolves to a typed HTTP response.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Skip-ahead attempted; state is left unchanged. A client error, not
    /// transient.
    #[error("invalid hint level transition: level {requested} requested while at level {current}")]
    InvalidTransition {
        current: HintLevel,
        requested: HintLevel,
    },

    /// Neither a generative nor a static hint could be obtained. The
    /// solution is never substituted for a hint.
    #[error("no hint available for level {level}")]
    HintUnavailable { level: HintLevel },

    /// Generative backend exceeded its call bound. Recovered locally by
    /// falling back to static hint text; only surfaced when that is also
    /// absent.
    #[error("generative hint backend timed out")]
    BackendTimeout,

    #[error("solution is locked until hint level 3 is unlocked")]
    SolutionLocked,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidTransition { .. } => StatusCode::CONFLICT,
            ApiError::HintUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::BackendTimeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::SolutionLocked => StatusCode::FORBIDDEN,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Storage details stay in the logs, not in the response body
        let message = match &self {
            ApiError::Storage(e) => {
                tracing::error!("storage error: {:#}", e);
                "internal error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
