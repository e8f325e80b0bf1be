//! Configuration constants for the Voyager game system
//!
//! This module contains the tuning values and limits used throughout the
//! round lifecycle engine: scoring, round-count tiers, challenge-type
//! selection history, per-challenge timing, and display boundaries.

/// Scoring constants
pub mod scoring {
    /// Flat number of points awarded for a correct answer
    pub const CORRECT_ANSWER_POINTS: u32 = 10;
}

/// Round-count tiers selected from the roster size at game start
pub mod rounds {
    /// Rounds played in a small lobby (at most [`SMALL_LOBBY_MAX`] players)
    pub const SHORT_GAME_ROUNDS: u32 = 10;
    /// Rounds played in a mid-sized lobby
    pub const DEFAULT_GAME_ROUNDS: u32 = 15;
    /// Rounds played in a large lobby (at least [`LARGE_LOBBY_MIN`] players)
    pub const LONG_GAME_ROUNDS: u32 = 20;
    /// Largest roster still considered a small lobby
    pub const SMALL_LOBBY_MAX: usize = 2;
    /// Smallest roster considered a large lobby
    pub const LARGE_LOBBY_MIN: usize = 5;
    /// Minimum configurable rounds per game
    pub const MIN_MAIN_ROUNDS: u32 = 1;
    /// Maximum configurable rounds per game
    pub const MAX_MAIN_ROUNDS: u32 = 25;
}

/// Challenge-type selection history
pub mod selection {
    /// Maximum number of recently played challenge types remembered
    pub const RECENT_HISTORY_LIMIT: usize = 5;
    /// How many of the most recent types are excluded from random selection
    pub const REPEAT_EXCLUSION_WINDOW: usize = 2;
}

/// Lobby and roster constraints
pub mod lobby {
    /// Minimum roster size at which collaborative challenges are eligible
    pub const COLLABORATIVE_MIN_PLAYERS: usize = 3;
    /// Maximum number of concurrent game instances a registry will hold
    pub const MAX_INSTANCES: usize = 10;
}

/// Challenge content constraints
pub mod challenge {
    /// Minimum time limit in seconds for any challenge
    pub const MIN_TIME_LIMIT: u64 = 1;
    /// Maximum time limit in seconds for any challenge
    pub const MAX_TIME_LIMIT: u64 = 240;
    /// Maximum length of a challenge question in characters
    pub const MAX_QUESTION_LENGTH: usize = 500;
}

/// Submission latency grading thresholds
pub mod latency {
    /// Submissions at or under this many seconds count as fast
    pub const FAST_RESPONSE_SECS: u64 = 3;
    /// Submissions at or under this many seconds count as steady
    pub const STEADY_RESPONSE_SECS: u64 = 8;
}

/// Leaderboard display boundaries
pub mod leaderboard {
    /// Number of entries shown in the live standings view
    pub const DISPLAY_LIMIT: usize = 5;
}

/// Quick math challenge timing and operand ranges
pub mod quick_math {
    /// Time limit in seconds for addition and subtraction rounds
    pub const ADD_SUB_TIME_LIMIT: u64 = 8;
    /// Time limit in seconds for multiplication and division rounds
    pub const MUL_DIV_TIME_LIMIT: u64 = 12;
    /// Smallest operand used for addition and subtraction
    pub const ADD_SUB_MIN_OPERAND: i64 = 10;
    /// Largest operand used for addition and subtraction
    pub const ADD_SUB_MAX_OPERAND: i64 = 99;
    /// Smallest factor used for multiplication
    pub const MUL_MIN_FACTOR: i64 = 2;
    /// Largest factor used for multiplication
    pub const MUL_MAX_FACTOR: i64 = 15;
    /// Smallest quotient produced by a division round
    pub const DIV_MIN_QUOTIENT: i64 = 2;
    /// Largest quotient produced by a division round
    pub const DIV_MAX_QUOTIENT: i64 = 12;
    /// Smallest divisor used for division
    pub const DIV_MIN_DIVISOR: i64 = 2;
    /// Largest divisor used for division
    pub const DIV_MAX_DIVISOR: i64 = 20;
}

/// Speed challenge timing
pub mod speed_challenge {
    /// Time limit in seconds for speed rounds
    pub const TIME_LIMIT: u64 = 6;
}

/// Text modification challenge timing
pub mod text_modification {
    /// Time limit in seconds for text modification rounds
    pub const TIME_LIMIT: u64 = 15;
}

/// Memory challenge sequence parameters
pub mod memory {
    /// Shortest generated digit sequence
    pub const MIN_SEQUENCE_LEN: u64 = 3;
    /// Longest generated digit sequence
    pub const MAX_SEQUENCE_LEN: u64 = 6;
    /// Seconds of answer time granted per digit in the sequence
    pub const SECS_PER_DIGIT: u64 = 3;
    /// Base seconds of answer time regardless of sequence length
    pub const BASE_SECS: u64 = 4;
}

/// Emoji challenge parameters
pub mod emoji {
    /// Time limit in seconds for emoji rounds
    pub const TIME_LIMIT: u64 = 25;
    /// Maximum number of emojis a round asks for
    pub const MAX_SET_SIZE: usize = 5;
    /// Minimum candidate pool size before padding with generic emojis
    pub const MIN_POOL_SIZE: usize = 3;
}

/// Trivia challenge timing
pub mod trivia {
    /// Time limit in seconds for trivia rounds
    pub const TIME_LIMIT: u64 = 20;
}

/// Riddle challenge timing
pub mod riddle {
    /// Time limit in seconds for riddle rounds
    pub const TIME_LIMIT: u64 = 30;
}

/// Collaborative challenge timing
pub mod collaborative {
    /// Time limit in seconds for collaborative rounds
    pub const TIME_LIMIT: u64 = 30;
}
