use crate::error::ApiError;
use crate::models::HintLevel;

/// How a requested level relates to the currently unlocked one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// `requested == current + 1`: unlocks the next tier.
    Advance,
    /// `requested == current`: the current tier is surfaced again.
    Replay,
    /// `requested < current`: a past tier is read back; not a transition.
    Reread,
}

/// Canonical transition rule. Levels never decrease and never skip ahead:
/// anything above `current + 1` is rejected and leaves state untouched.
pub fn classify(current: HintLevel, requested: HintLevel) -> Result<Transition, ApiError> {
    if requested == current {
        return Ok(Transition::Replay);
    }
    if Some(requested) == current.next() {
        return Ok(Transition::Advance);
    }
    if requested < current {
        return Ok(Transition::Reread);
    }
    Err(ApiError::InvalidTransition { current, requested })
}
