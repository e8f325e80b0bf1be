//! Per-game player state
//!
//! This module defines the mutable state tracked for each participant of a
//! game instance: score, round answer, response latency, and the reference
//! to the previous submission's external message so the host can retract
//! stale reaction feedback.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::constants::latency::{FAST_RESPONSE_SECS, STEADY_RESPONSE_SECS};

/// A player's standing within a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerState {
    /// Still competing
    Active,
    /// Held the top score when the game completed
    Winner,
}

/// How quickly a submission arrived relative to the grading thresholds
///
/// The host uses this to pick reaction feedback on the submitting message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSpeed {
    /// Within the fast threshold
    Fast,
    /// Within the steady threshold
    Steady,
    /// Slower than both thresholds
    Slow,
}

impl ResponseSpeed {
    /// Grades an elapsed response time against the latency thresholds
    pub fn grade(elapsed: Duration) -> Self {
        if elapsed <= Duration::from_secs(FAST_RESPONSE_SECS) {
            Self::Fast
        } else if elapsed <= Duration::from_secs(STEADY_RESPONSE_SECS) {
            Self::Steady
        } else {
            Self::Slow
        }
    }
}

/// The mutable per-game state of one participant
///
/// Created when a player joins an instance and mutated every round. Scores
/// only ever increase; per-round fields are cleared when a round starts.
#[serde_with::serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Stable external identity of the participant
    pub user_id: String,
    /// Current standing
    pub state: PlayerState,
    /// Total points earned so far
    pub score: u32,
    /// The most recent answer submitted this round, if any
    pub current_answer: Option<String>,
    /// Elapsed time between round start and submission; only recorded
    /// for speed-based rounds
    #[serde_as(as = "Option<serde_with::DurationSecondsWithFrac<f64>>")]
    pub response_time: Option<Duration>,
    /// Opaque reference to the previous submission's external message,
    /// used by the host to retract reaction feedback
    pub previous_message_ref: Option<String>,
}

impl Player {
    /// Creates a new active player with no score
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            state: PlayerState::Active,
            score: 0,
            current_answer: None,
            response_time: None,
            previous_message_ref: None,
        }
    }

    /// Whether the player is still competing
    pub fn is_active(&self) -> bool {
        matches!(self.state, PlayerState::Active)
    }

    /// Clears the per-round fields at the start of a new round
    pub fn reset_round(&mut self) {
        self.current_answer = None;
        self.response_time = None;
        self.previous_message_ref = None;
    }

    /// Records a submitted answer, overwriting any earlier one this round
    ///
    /// Returns the previous submission's message reference so the caller
    /// can clean up stale reaction state.
    pub fn record_answer(
        &mut self,
        answer: impl Into<String>,
        message_ref: Option<String>,
    ) -> Option<String> {
        self.current_answer = Some(answer.into());
        std::mem::replace(&mut self.previous_message_ref, message_ref)
    }

    /// Adds points to the player's score
    pub fn award_points(&mut self, points: u32) {
        self.score += points;
    }
}
