use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::HintLevel;

/// Tutor voice used when the generative backend composes hints. Static hint
/// texts are returned verbatim regardless of the personality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Personality {
    Mentor,
    Sarcastic,
    Fun,
    GradeLevel,
}

impl Default for Personality {
    fn default() -> Self {
        Personality::Mentor
    }
}

#[derive(Debug, Deserialize)]
pub struct RequestHintRequest {
    pub level: HintLevel,
    #[serde(default)]
    pub personality: Personality,
    /// Current code snapshot, forwarded to the generative backend only.
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RequestHintResponse {
    pub session_id: String,
    pub level: HintLevel,
    pub hint: String,
    pub source: HintSource,
    pub current_hint_level: HintLevel,
    pub hints_used: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintSource {
    Static,
    Generative,
}

impl HintSource {
    pub fn as_str(self) -> &'static str {
        match self {
            HintSource::Static => "static",
            HintSource::Generative => "generative",
        }
    }
}

/// One entry of the ranked hint sequence a generative backend returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressiveHint {
    pub level: HintLevel,
    pub hint: String,
    #[serde(default)]
    pub revealed: bool,
}

#[derive(Debug, Serialize)]
pub struct SolutionResponse {
    pub session_id: String,
    pub solution: String,
    pub revealed_at: DateTime<Utc>,
}
