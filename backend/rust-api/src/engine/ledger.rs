//! Append-only mutations of a session's event history. Both storage
//! backends route their writes through these functions so that the ledger
//! guarantees hold regardless of where the session lives.

use chrono::{DateTime, Utc};

use super::level::{self, Transition};
use crate::error::ApiError;
use crate::models::{Attempt, HintLevel, HintUsage, Session};

/// Records one hint-usage event. Advances `current_hint_level` only for a
/// strict `+1` transition; replays and rereads append the event without
/// touching the level. Skip-ahead fails and leaves the session unchanged.
pub fn record_hint_used(
    session: &mut Session,
    level: HintLevel,
    now: DateTime<Utc>,
) -> Result<Transition, ApiError> {
    let transition = level::classify(session.current_hint_level, level)?;

    if transition == Transition::Advance {
        session.current_hint_level = level;
    }
    session.hints_used.push(HintUsage {
        level,
        timestamp: now,
    });

    Ok(transition)
}

pub fn record_submission(session: &mut Session, code: &str, is_correct: bool, now: DateTime<Utc>) {
    session.attempts.push(Attempt {
        code: code.to_string(),
        is_correct,
        timestamp: now,
    });
}

/// `completed` transitions false -> true exactly once; repeated calls are
/// no-ops and keep the original `completed_at`.
pub fn record_completion(session: &mut Session, now: DateTime<Utc>) -> bool {
    if session.completed {
        return false;
    }
    session.completed = true;
    session.completed_at = Some(now);
    true
}

/// One-way solution reveal, gated on the full hint ladder being unlocked.
/// Not a state-machine transition. Idempotent once revealed.
pub fn record_solution_reveal(session: &mut Session, now: DateTime<Utc>) -> Result<bool, ApiError> {
    if session.current_hint_level != HintLevel::Three {
        return Err(ApiError::SolutionLocked);
    }
    if session.solution_revealed_at.is_some() {
        return Ok(false);
    }
    session.solution_revealed_at = Some(now);
    Ok(true)
}
