//! Per-game configuration
//!
//! This module derives a game's tunable parameters from the roster size at
//! start time: how many main rounds will be played and which challenge
//! kinds are eligible for random selection. Once a game starts the
//! configuration is fixed for its duration.

use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::{
    challenge::GameType,
    constants::{
        lobby::COLLABORATIVE_MIN_PLAYERS,
        rounds::{
            DEFAULT_GAME_ROUNDS, LARGE_LOBBY_MIN, LONG_GAME_ROUNDS, MAX_MAIN_ROUNDS,
            MIN_MAIN_ROUNDS, SHORT_GAME_ROUNDS, SMALL_LOBBY_MAX,
        },
    },
};

/// Tunable parameters for one game, fixed at start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct GameConfig {
    /// Roster size snapshot taken when the configuration was created
    #[garde(skip)]
    pub player_count: usize,
    /// Total number of main rounds to play
    #[garde(range(min = MIN_MAIN_ROUNDS, max = MAX_MAIN_ROUNDS))]
    pub main_rounds: u32,
    /// The challenge kinds eligible for random selection this game
    #[garde(length(min = 1))]
    pub available_game_types: Vec<GameType>,
}

impl GameConfig {
    /// Builds the configuration for a roster of the given size
    ///
    /// Small lobbies play a short game, large lobbies a long one, and
    /// everything in between the default round count. Collaborative rounds
    /// only enter the pool once the roster is big enough for an
    /// everyone-must-answer challenge to be meaningful.
    pub fn for_player_count(player_count: usize) -> Self {
        let main_rounds = if player_count <= SMALL_LOBBY_MAX {
            SHORT_GAME_ROUNDS
        } else if player_count >= LARGE_LOBBY_MIN {
            LONG_GAME_ROUNDS
        } else {
            DEFAULT_GAME_ROUNDS
        };

        Self {
            player_count,
            main_rounds,
            available_game_types: Self::selectable_pool(player_count),
        }
    }

    /// The challenge kinds random selection may draw from for this roster
    fn selectable_pool(player_count: usize) -> Vec<GameType> {
        GameType::all()
            .filter(|game_type| game_type.is_auto_selectable())
            .filter(|game_type| {
                *game_type != GameType::Collaborative || player_count >= COLLABORATIVE_MIN_PLAYERS
            })
            .collect()
    }
}
