//! # Voyager Game Library
//!
//! This library provides the core game logic for the Voyager party-game
//! system: a multiplayer trivia/puzzle orchestrator embedded in a chat
//! platform bot. It tracks each game's players, phase, round counter,
//! active challenge, answer submissions, scoring, and end conditions,
//! independent of any chat platform.
//!
//! The host process owns all I/O and timing: it displays challenges,
//! collects messages as answer submissions, waits out each round's time
//! limit, then asks the engine to evaluate. Content generation and
//! semantic answer judgment are injected collaborators, so the engine
//! runs identically under Slack, Discord, or a test harness.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::doc_markdown)]

use serde::Serialize;

pub mod challenge;
pub mod config;
pub mod constants;
pub mod generator;
pub mod instance;
pub mod leaderboard;
pub mod names;
pub mod player;
pub mod registry;
pub mod verify;

/// Host-facing notifications produced over a game's lifetime
///
/// Each variant wraps the data the host renders into its platform's
/// message format (embeds, blocks, plain text). The engine itself never
/// sends anything; it hands these back from its operations.
#[derive(Debug, Clone, Serialize, derive_more::From)]
pub enum GameEvent {
    /// A snapshot of an instance's current state
    Status(instance::GameStatus),
    /// The outcome of an evaluated round
    Round(instance::RoundResults),
    /// A new score leader took over
    LeaderChange(String),
    /// The aggregated outcome of a completed game
    Final(leaderboard::FinalResults),
}

impl GameEvent {
    /// Converts the event to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}
