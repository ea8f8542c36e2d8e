use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One behavioral observation from the signal collector. Ephemeral: lives in
/// a session's rolling window and is never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StuckSignal {
    pub kind: SignalKind,
    /// Kind-specific magnitude: pause duration in seconds for `pause`,
    /// code length in characters for `code_length`, unused otherwise.
    pub magnitude: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    /// Typing pause observed by the collector.
    Pause,
    /// Backspace burst; also counts as a code edit.
    DeletionBurst,
    /// Periodic code-length sample; counts as a code edit.
    CodeLength,
    /// Learner pressed "give me a hint". Served by the hints endpoint
    /// directly; the detector does not score it.
    ExplicitRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StuckSeverity {
    Gentle,
    Moderate,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StuckReason {
    LongPause,
    FrequentDeletions,
    NoProgress,
}

/// Output of one detector evaluation. Consumed immediately by the caller,
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HintDecision {
    pub should_hint: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<StuckSeverity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<StuckReason>,
}

impl HintDecision {
    pub fn none() -> Self {
        Self {
            should_hint: false,
            severity: None,
            reason: None,
        }
    }

    pub fn hint(severity: StuckSeverity, reason: StuckReason) -> Self {
        Self {
            should_hint: true,
            severity: Some(severity),
            reason: Some(reason),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RecordSignalRequest {
    pub kind: SignalKind,
    #[serde(default)]
    pub magnitude: f64,
    /// Observation time; defaults to the server clock when omitted.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}
