//! Deterministic stuck detection over a per-session rolling signal window.
//! A fixed-priority rule table, highest severity first, plus a cooldown so
//! the learner is never flooded.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};

use crate::models::signal::{
    HintDecision, SignalKind, StuckReason, StuckSeverity, StuckSignal,
};

pub const PAUSE_MODERATE_SECS: i64 = 15;
pub const PAUSE_URGENT_SECS: i64 = 30;
pub const DELETION_BURST_THRESHOLD: usize = 3;
pub const NO_PROGRESS_SAMPLES: usize = 5;
pub const NO_PROGRESS_VARIANCE: f64 = 10.0;
pub const WINDOW_MAX_SIGNALS: usize = 20;
pub const WINDOW_MAX_AGE_SECS: i64 = 300;
pub const HINT_COOLDOWN_SECS: i64 = 60;

/// Rolling window of the last 20 signals or last 5 minutes, whichever is
/// smaller, plus the pause and cooldown reference points.
#[derive(Debug)]
pub struct SignalWindow {
    signals: VecDeque<StuckSignal>,
    last_change_at: DateTime<Utc>,
    last_hint_at: Option<DateTime<Utc>>,
}

impl SignalWindow {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            signals: VecDeque::new(),
            last_change_at: now,
            last_hint_at: None,
        }
    }

    pub fn push(&mut self, signal: StuckSignal) {
        // code edits move the pause reference point; pauses and explicit
        // requests do not
        match signal.kind {
            SignalKind::CodeLength | SignalKind::DeletionBurst => {
                if signal.timestamp > self.last_change_at {
                    self.last_change_at = signal.timestamp;
                }
            }
            SignalKind::Pause | SignalKind::ExplicitRequest => {}
        }

        let newest = signal.timestamp;
        self.signals.push_back(signal);
        self.evict(newest);
    }

    fn evict(&mut self, now: DateTime<Utc>) {
        let horizon = now - Duration::seconds(WINDOW_MAX_AGE_SECS);
        while self.signals.len() > WINDOW_MAX_SIGNALS
            || self
                .signals
                .front()
                .is_some_and(|s| s.timestamp < horizon)
        {
            self.signals.pop_front();
        }
    }

    /// Any surfaced hint, manual or automatic, starts the cooldown.
    pub fn note_hint(&mut self, now: DateTime<Utc>) {
        self.last_hint_at = Some(now);
    }

    pub fn in_cooldown(&self, now: DateTime<Utc>) -> bool {
        self.last_hint_at
            .is_some_and(|t| (now - t).num_seconds() < HINT_COOLDOWN_SECS)
    }

    /// One detector tick. Pure given the window state and `now`: no I/O,
    /// no mutation. Rules in fixed priority order, first match wins.
    pub fn evaluate(&self, now: DateTime<Utc>) -> HintDecision {
        if self.in_cooldown(now) {
            return HintDecision::none();
        }

        let pause = self.pause_secs(now);
        if pause >= PAUSE_URGENT_SECS {
            return HintDecision::hint(StuckSeverity::Urgent, StuckReason::LongPause);
        }
        if pause >= PAUSE_MODERATE_SECS {
            return HintDecision::hint(StuckSeverity::Moderate, StuckReason::LongPause);
        }

        if self.deletion_count(now) >= DELETION_BURST_THRESHOLD {
            return HintDecision::hint(StuckSeverity::Moderate, StuckReason::FrequentDeletions);
        }

        if let Some(variance) = self.recent_length_variance(now) {
            if variance < NO_PROGRESS_VARIANCE {
                return HintDecision::hint(StuckSeverity::Gentle, StuckReason::NoProgress);
            }
        }

        HintDecision::none()
    }

    /// Gap since the last observed code edit. Collector-reported pauses
    /// newer than that edit can lengthen the gap but a resumed edit always
    /// resets it.
    fn pause_secs(&self, now: DateTime<Utc>) -> i64 {
        let gap = (now - self.last_change_at).num_seconds();
        let reported = self
            .fresh(now)
            .filter(|s| s.kind == SignalKind::Pause && s.timestamp >= self.last_change_at)
            .map(|s| s.magnitude as i64)
            .max()
            .unwrap_or(0);
        gap.max(reported)
    }

    fn deletion_count(&self, now: DateTime<Utc>) -> usize {
        self.fresh(now)
            .filter(|s| s.kind == SignalKind::DeletionBurst)
            .count()
    }

    /// Fired `frequent_deletions` rules consume their evidence so the same
    /// bursts cannot trigger twice.
    pub fn clear_deletions(&mut self) {
        self.signals.retain(|s| s.kind != SignalKind::DeletionBurst);
    }

    /// Variance of the last 5 code-length samples, when at least 5 exist.
    fn recent_length_variance(&self, now: DateTime<Utc>) -> Option<f64> {
        let lengths: Vec<f64> = self
            .fresh(now)
            .filter(|s| s.kind == SignalKind::CodeLength)
            .map(|s| s.magnitude)
            .collect();
        if lengths.len() < NO_PROGRESS_SAMPLES {
            return None;
        }

        let tail = &lengths[lengths.len() - NO_PROGRESS_SAMPLES..];
        let mean = tail.iter().sum::<f64>() / tail.len() as f64;
        let variance = tail.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / tail.len() as f64;
        Some(variance)
    }

    fn fresh(&self, now: DateTime<Utc>) -> impl Iterator<Item = &StuckSignal> {
        let horizon = now - Duration::seconds(WINDOW_MAX_AGE_SECS);
        self.signals.iter().filter(move |s| s.timestamp >= horizon)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.signals.len()
    }
}
