use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One of the three escalating hint tiers: conceptual, algorithmic,
/// pseudocode. Ordering follows the tier number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HintLevel {
    One = 1,
    Two = 2,
    Three = 3,
}

impl HintLevel {
    pub fn next(self) -> Option<HintLevel> {
        match self {
            HintLevel::One => Some(HintLevel::Two),
            HintLevel::Two => Some(HintLevel::Three),
            HintLevel::Three => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for HintLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(HintLevel::One),
            2 => Ok(HintLevel::Two),
            3 => Ok(HintLevel::Three),
            other => Err(format!("invalid hint level {}, must be 1, 2 or 3", other)),
        }
    }
}

impl From<HintLevel> for u8 {
    fn from(level: HintLevel) -> u8 {
        level as u8
    }
}

impl std::fmt::Display for HintLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

/// Immutable catalog entry. Created by an administrative import, never
/// mutated afterwards. All three hint texts and the solution are present
/// once a problem is published.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub language: String,
    pub category: String,
    pub hints: HintTexts,
    pub solution: String,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintTexts {
    pub level1: String,
    pub level2: String,
    pub level3: String,
}

impl HintTexts {
    pub fn for_level(&self, level: HintLevel) -> &str {
        match level {
            HintLevel::One => &self.level1,
            HintLevel::Two => &self.level2,
            HintLevel::Three => &self.level3,
        }
    }

    pub fn all_present(&self) -> bool {
        !self.level1.trim().is_empty()
            && !self.level2.trim().is_empty()
            && !self.level3.trim().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Catalog listing view: solution and hint texts are never exposed here,
/// hints are only reachable through the gated session flow.
#[derive(Debug, Serialize)]
pub struct ProblemSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub language: String,
    pub category: String,
}

impl From<&Problem> for ProblemSummary {
    fn from(p: &Problem) -> Self {
        Self {
            id: p.id.clone(),
            title: p.title.clone(),
            description: p.description.clone(),
            difficulty: p.difficulty,
            language: p.language.clone(),
            category: p.category.clone(),
        }
    }
}

/// Single-problem view: everything except the solution and hint texts.
#[derive(Debug, Serialize)]
pub struct ProblemDetail {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub language: String,
    pub category: String,
    pub test_cases: Vec<TestCase>,
    pub created_at: DateTime<Utc>,
}

impl From<Problem> for ProblemDetail {
    fn from(p: Problem) -> Self {
        Self {
            id: p.id,
            title: p.title,
            description: p.description,
            difficulty: p.difficulty,
            language: p.language,
            category: p.category,
            test_cases: p.test_cases,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateProblemRequest {
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub language: String,
    pub category: String,
    pub hints: HintTexts,
    pub solution: String,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

/// One learner's attempt at one problem. The hint level only moves through
/// the state machine in `engine::level`; the ledger vectors are append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "_id")]
    pub id: String,
    pub problem_id: String,
    pub current_hint_level: HintLevel,
    #[serde(default)]
    pub hints_used: Vec<HintUsage>,
    #[serde(default)]
    pub attempts: Vec<Attempt>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution_revealed_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(id: String, problem_id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            problem_id,
            current_hint_level: HintLevel::One,
            hints_used: Vec::new(),
            attempts: Vec::new(),
            completed: false,
            created_at: now,
            completed_at: None,
            solution_revealed_at: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintUsage {
    pub level: HintLevel,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
    pub code: String,
    pub is_correct: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub problem_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAttemptRequest {
    pub code: String,
    pub is_correct: bool,
}

pub mod hint;
pub mod signal;
