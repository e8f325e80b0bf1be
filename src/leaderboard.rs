//! Standings and end-game aggregation
//!
//! This module computes score orderings over a game's roster: the live
//! standings view shown between rounds, the current leader (used to
//! announce lead changes), and the final results produced when a game
//! ends. All orderings are deterministic: score descending, then user id
//! ascending, so ties always resolve the same way.

use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{constants::leaderboard::DISPLAY_LIMIT, player::Player};

/// One row of the standings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// The player's external identity
    pub user_id: String,
    /// The player's total score
    pub score: u32,
}

/// A deterministic ordering of the roster by score
///
/// Entries are sorted by score descending and user id ascending. The full
/// ordering is kept; [`Standings::display`] truncates it for rendering
/// while [`Standings::exact_count`] still reports the real roster size.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Standings {
    entries: Vec<ScoreEntry>,
}

impl Standings {
    /// Computes the standings of a roster
    pub fn of(players: &HashMap<String, Player>) -> Self {
        let entries = players
            .values()
            .map(|player| ScoreEntry {
                user_id: player.user_id.clone(),
                score: player.score,
            })
            .sorted_by(|a, b| {
                b.score
                    .cmp(&a.score)
                    .then_with(|| a.user_id.cmp(&b.user_id))
            })
            .collect_vec();

        Self { entries }
    }

    /// The full ordered standings
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// The top entries, truncated to the display limit
    pub fn display(&self) -> &[ScoreEntry] {
        &self.entries[..self.entries.len().min(DISPLAY_LIMIT)]
    }

    /// The exact roster size behind the (possibly truncated) display
    pub fn exact_count(&self) -> usize {
        self.entries.len()
    }

    /// The current leader, if anyone has scored
    ///
    /// A roster where the top score is still zero has no leader; ties at
    /// the top resolve to the lowest user id.
    pub fn leader(&self) -> Option<&ScoreEntry> {
        self.entries.first().filter(|entry| entry.score > 0)
    }
}

/// Aggregated outcome of a completed game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalResults {
    /// Every player holding the maximum score, id ascending
    pub winners: Vec<String>,
    /// Final score of every player
    pub scores: BTreeMap<String, u32>,
    /// How many main rounds were played
    pub rounds_played: u32,
    /// Wall-clock game duration in seconds
    pub duration_secs: f64,
}

/// Returns the ids of every player holding the maximum score, id ascending
///
/// An empty roster has no winners. Ties are all included, so multiple
/// winners are possible.
pub fn winners_of(players: &HashMap<String, Player>) -> Vec<String> {
    let Some(top_score) = players.values().map(|player| player.score).max() else {
        return Vec::new();
    };

    players
        .values()
        .filter(|player| player.score == top_score)
        .map(|player| player.user_id.clone())
        .sorted()
        .collect_vec()
}
