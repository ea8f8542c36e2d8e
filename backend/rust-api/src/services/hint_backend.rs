use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::models::hint::{Personality, ProgressiveHint};
use crate::models::HintLevel;

/// Call bound for one generative request. Exceeding it degrades to static
/// hint text, it never fails the hint request on its own.
pub const BACKEND_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Serialize)]
pub struct GenerateHintsRequest {
    pub code: String,
    pub topic: String,
    pub personality: Personality,
    pub hint_level: HintLevel,
}

#[derive(Debug, Deserialize)]
struct GenerateHintsResponse {
    #[serde(default)]
    progressive_hints: Vec<ProgressiveHint>,
}

/// Boundary to the generative hint composer. Returns the ranked sequence
/// of progressive hints; the resolver decides which single level to
/// expose.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate(&self, req: &GenerateHintsRequest) -> Result<Vec<ProgressiveHint>, ApiError>;
}

pub struct HttpGenerativeBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGenerativeBackend {
    pub fn new(base_url: String) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(BACKEND_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::Storage(anyhow::anyhow!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl GenerativeBackend for HttpGenerativeBackend {
    async fn generate(&self, req: &GenerateHintsRequest) -> Result<Vec<ProgressiveHint>, ApiError> {
        let url = format!("{}/api/hints/generate", self.base_url);

        let response = self.client.post(&url).json(req).send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::BackendTimeout
            } else {
                ApiError::Storage(anyhow::anyhow!("Generative backend unreachable: {e}"))
            }
        })?;

        if !response.status().is_success() {
            return Err(ApiError::Storage(anyhow::anyhow!(
                "Generative backend returned status {}",
                response.status()
            )));
        }

        let body: GenerateHintsResponse = response.json().await.map_err(|e| {
            ApiError::Storage(anyhow::anyhow!("Invalid generative backend response: {e}"))
        })?;

        Ok(body.progressive_hints)
    }
}
