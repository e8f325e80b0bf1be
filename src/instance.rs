//! Game instance state machine and round lifecycle
//!
//! This module contains the core engine of the system: one [`GameInstance`]
//! owns a single game's roster, phase, round counter, active challenge,
//! answer submissions, scoring, and end conditions. It is platform-agnostic
//! and synchronous: the host owns all timers and I/O, serializes calls into
//! an instance, and decides when to evaluate a round and whether to advance
//! or end the game.

use std::{
    collections::{BTreeMap, HashMap, HashSet, VecDeque},
    fmt::Debug,
    time::Duration,
};

use itertools::Itertools;
use once_cell_serde::sync::OnceCell;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use thiserror::Error;
use tracing::{debug, info};
use web_time::SystemTime;

use crate::{
    challenge::{Challenge, Evaluation, GameType},
    config::GameConfig,
    constants::{
        scoring::CORRECT_ANSWER_POINTS,
        selection::{RECENT_HISTORY_LIMIT, REPEAT_EXCLUSION_WINDOW},
    },
    generator::{ChallengeGenerator, GeneratorError},
    leaderboard::{FinalResults, Standings, winners_of},
    player::{Player, PlayerState, ResponseSpeed},
    verify::{AnswerVerifier, VerifyError},
};

/// The lifecycle state of a game instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    /// Accepting players, not yet started
    Waiting,
    /// Rounds are being played
    InProgress,
    /// Ended successfully
    Completed,
    /// Ended unsuccessfully
    Failed,
}

/// The presentation phase within a running game
///
/// Informational for the host's narration; it does not gate transitions
/// beyond round starts requiring a started game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Pre-round introduction
    Intro,
    /// A main round is the current activity
    MainRound,
    /// Post-game wrap-up
    Outro,
}

/// Failures surfaced by instance operations
///
/// Precondition violations are the host's bug to message about; collaborator
/// failures pass through untouched so the host can decide on fallback.
#[derive(Debug, Error)]
pub enum Error {
    /// A game cannot start with an empty roster
    #[error("not enough players to start")]
    NotEnoughPlayers,
    /// A round was started before the game itself
    #[error("game has not been started")]
    NotStarted,
    /// No challenge generator has been registered
    #[error("no challenge generator registered")]
    NoGenerator,
    /// Evaluation was requested but no challenge is active; an expected
    /// transient when a timer and a manual command race
    #[error("no active challenge to evaluate")]
    NoActiveChallenge,
    /// The challenge generator failed to produce content
    #[error("challenge generation failed: {0}")]
    Generator(GeneratorError),
    /// The answer verifier failed to reach a verdict
    #[error(transparent)]
    Verifier(#[from] VerifyError),
}

/// Snapshot of an instance's externally visible state
///
/// Pure read, safe to request at any time.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatus {
    /// Lifecycle state
    pub state: GameState,
    /// Presentation phase
    pub phase: GamePhase,
    /// Rounds started so far
    pub round: u32,
    /// Total roster size
    pub player_count: usize,
    /// Players still competing
    pub active_players: usize,
    /// Kind of the active challenge, if one is running
    pub challenge_type: Option<GameType>,
    /// Elapsed wall-clock time since the game started, one decimal place
    pub time_elapsed: String,
}

/// Outcome of evaluating one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResults {
    /// The kind of challenge that was evaluated
    pub game_type: GameType,
    /// Players scored as correct, id ascending
    pub correct_players: Vec<String>,
    /// Players scored as failed, id ascending
    pub failed_players: Vec<String>,
}

/// Acknowledgement returned for a recorded answer submission
#[serde_with::serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// Message reference of the player's previous submission this round,
    /// for the host to retract stale reaction feedback
    pub previous_message_ref: Option<String>,
    /// Time elapsed since the round opened, when a round is timing
    #[serde_as(as = "Option<serde_with::DurationSecondsWithFrac<f64>>")]
    pub response_time: Option<Duration>,
    /// Latency grade of this submission, when a round is timing
    pub speed: Option<ResponseSpeed>,
}

/// One game's full lifecycle: roster, phase, rounds, scoring, termination
///
/// Not internally synchronized; a single logical owner must serialize all
/// mutating calls into an instance. Independent instances share nothing.
pub struct GameInstance {
    channel_id: String,
    name: String,
    players: HashMap<String, Player>,
    state: GameState,
    current_phase: GamePhase,
    config: Option<GameConfig>,
    current_round: u32,
    current_challenge: Option<Challenge>,
    round_start_time: Option<SystemTime>,
    recent_game_types: VecDeque<GameType>,
    previous_leader: Option<String>,
    start_time: Option<SystemTime>,
    end_time: Option<SystemTime>,
    final_results: OnceCell<FinalResults>,
    generator: Option<Box<dyn ChallengeGenerator + Send + Sync>>,
}

impl Debug for GameInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameInstance")
            .field("channel_id", &self.channel_id)
            .field("name", &self.name)
            .field("state", &self.state)
            .field("round", &self.current_round)
            .finish_non_exhaustive()
    }
}

impl GameInstance {
    /// Creates a new waiting instance bound to an external channel
    pub fn new(channel_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            name: name.into(),
            players: HashMap::new(),
            state: GameState::Waiting,
            current_phase: GamePhase::Intro,
            config: None,
            current_round: 0,
            current_challenge: None,
            round_start_time: None,
            recent_game_types: VecDeque::new(),
            previous_leader: None,
            start_time: None,
            end_time: None,
            final_results: OnceCell::new(),
            generator: None,
        }
    }

    /// The external channel this instance is bound to
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// The instance's display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The lifecycle state
    pub fn state(&self) -> GameState {
        self.state
    }

    /// The presentation phase
    pub fn phase(&self) -> GamePhase {
        self.current_phase
    }

    /// Rounds started so far
    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    /// The active challenge, if a round is running or awaiting evaluation
    pub fn current_challenge(&self) -> Option<&Challenge> {
        self.current_challenge.as_ref()
    }

    /// The configuration fixed at game start, if any
    pub fn config(&self) -> Option<&GameConfig> {
        self.config.as_ref()
    }

    /// The full roster
    pub fn players(&self) -> &HashMap<String, Player> {
        &self.players
    }

    /// Looks up a single player
    pub fn player(&self, user_id: &str) -> Option<&Player> {
        self.players.get(user_id)
    }

    /// Registers the collaborator that produces round content
    ///
    /// Must be called before any round starts.
    pub fn set_challenge_generator(
        &mut self,
        generator: impl ChallengeGenerator + Send + Sync + 'static,
    ) {
        self.generator = Some(Box::new(generator));
    }

    /// Adds a player to the roster; a no-op if already present
    pub fn add_player(&mut self, user_id: impl Into<String>) {
        let user_id = user_id.into();
        self.players
            .entry(user_id.clone())
            .or_insert_with(|| Player::new(user_id));
    }

    /// Removes a player from the roster; a no-op if absent
    pub fn remove_player(&mut self, user_id: &str) {
        self.players.remove(user_id);
    }

    /// Starts the game
    ///
    /// Uses the supplied configuration, or a previously set one, or
    /// synthesizes a default from the current roster size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotEnoughPlayers`] when the roster is empty.
    pub fn start_game(&mut self, config: Option<GameConfig>) -> Result<GameStatus, Error> {
        if self.players.is_empty() {
            return Err(Error::NotEnoughPlayers);
        }

        let config = config
            .or_else(|| self.config.take())
            .unwrap_or_else(|| GameConfig::for_player_count(self.players.len()));

        info!(
            channel = %self.channel_id,
            players = self.players.len(),
            rounds = config.main_rounds,
            "game started"
        );

        self.config = Some(config);
        self.state = GameState::InProgress;
        self.start_time = Some(SystemTime::now());

        Ok(self.get_game_state())
    }

    /// Starts the next main round and returns its challenge
    ///
    /// Picks a challenge type at random when none is given, avoiding the
    /// last few types played, then asks the registered generator for
    /// content, resets every player's per-round fields, and opens the
    /// answer window. The caller displays the challenge and schedules
    /// evaluation after its time limit; the engine never self-limits the
    /// round counter against the configured total.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotStarted`] before [`Self::start_game`],
    /// [`Error::NoGenerator`] when no generator is registered, and
    /// [`Error::Generator`] when content production fails.
    pub fn start_main_round(&mut self, game_type: Option<GameType>) -> Result<&Challenge, Error> {
        let pool = match &self.config {
            Some(config) => config.available_game_types.clone(),
            None => return Err(Error::NotStarted),
        };
        let Some(generator) = self.generator.as_deref() else {
            return Err(Error::NoGenerator);
        };

        self.current_phase = GamePhase::MainRound;
        self.current_round += 1;

        let kind = game_type.unwrap_or_else(|| {
            let excluded: Vec<GameType> = self
                .recent_game_types
                .iter()
                .rev()
                .take(REPEAT_EXCLUSION_WINDOW)
                .copied()
                .collect();
            let fresh = pool
                .iter()
                .copied()
                .filter(|kind| !excluded.contains(kind))
                .collect_vec();
            let candidates = if fresh.is_empty() { &pool } else { &fresh };
            fastrand::choice(candidates)
                .copied()
                .unwrap_or(GameType::Trivia)
        });

        self.recent_game_types.push_back(kind);
        while self.recent_game_types.len() > RECENT_HISTORY_LIMIT {
            self.recent_game_types.pop_front();
        }

        let challenge = generator.generate(kind).map_err(Error::Generator)?;

        self.round_start_time = Some(SystemTime::now());
        for player in self.players.values_mut() {
            player.reset_round();
        }

        debug!(
            channel = %self.channel_id,
            round = self.current_round,
            kind = kind.tag(),
            "main round started"
        );

        Ok(self.current_challenge.insert(challenge))
    }

    /// Records an answer submission from a player
    ///
    /// Last write wins: resubmitting within the same round silently
    /// overwrites the earlier answer. The engine accepts late submissions;
    /// deadline enforcement belongs to the host. Unknown players are a
    /// silent no-op, returning `None`.
    pub fn submit_answer(
        &mut self,
        user_id: &str,
        answer: &str,
        message_ref: Option<String>,
    ) -> Option<SubmissionReceipt> {
        let speed_round = self
            .current_challenge
            .as_ref()
            .is_some_and(|challenge| challenge.evaluation.is_speed_based());
        let elapsed = self
            .round_start_time
            .map(|start| start.elapsed().unwrap_or_default());

        let player = self.players.get_mut(user_id)?;
        let previous_message_ref = player.record_answer(answer, message_ref);
        if speed_round {
            player.response_time = elapsed;
        }

        Some(SubmissionReceipt {
            previous_message_ref,
            response_time: elapsed,
            speed: elapsed.map(ResponseSpeed::grade),
        })
    }

    /// Evaluates the active challenge and applies scoring
    ///
    /// Every active player is scored as correct or failed according to the
    /// challenge's evaluation rule; each correct player earns the flat
    /// per-answer point value. The active challenge is left in place so the
    /// host can still display its answer; it is replaced by the next round
    /// start.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActiveChallenge`] when there is nothing to
    /// evaluate (e.g. a racing timer already evaluated), and
    /// [`Error::Verifier`] when the verifier cannot reach a verdict.
    pub fn evaluate_current_challenge<V>(&mut self, verifier: &V) -> Result<RoundResults, Error>
    where
        V: AnswerVerifier + ?Sized,
    {
        let challenge = self
            .current_challenge
            .as_ref()
            .ok_or(Error::NoActiveChallenge)?;

        let eligible: Vec<&Player> = self
            .players
            .values()
            .filter(|player| player.is_active())
            .collect();

        let mut correct: Vec<String> = Vec::new();
        let mut failed: Vec<String> = Vec::new();

        match &challenge.evaluation {
            Evaluation::FirstResponder => {
                let winner = eligible
                    .iter()
                    .filter(|player| player.current_answer.is_some())
                    .filter_map(|player| {
                        player
                            .response_time
                            .map(|elapsed| (elapsed, player.user_id.as_str()))
                    })
                    .sorted()
                    .map(|(_, user_id)| user_id.to_owned())
                    .next();

                for player in &eligible {
                    if Some(player.user_id.as_str()) != winner.as_deref() {
                        failed.push(player.user_id.clone());
                    }
                }
                correct.extend(winner);
            }
            Evaluation::TokenSet { expected } => {
                for player in &eligible {
                    let matched = player.current_answer.as_deref().is_some_and(|answer| {
                        let tokens: HashSet<&str> = answer.split_whitespace().collect();
                        expected.iter().all(|token| tokens.contains(token.as_str()))
                    });
                    if matched {
                        correct.push(player.user_id.clone());
                    } else {
                        failed.push(player.user_id.clone());
                    }
                }
            }
            Evaluation::TextMatch { accepted } => {
                for player in &eligible {
                    let matched = match player.current_answer.as_deref() {
                        None => false,
                        Some(answer) => {
                            let mut matched = false;
                            for expected in accepted.iter() {
                                if verifier.verify(answer, expected)? {
                                    matched = true;
                                    break;
                                }
                            }
                            matched
                        }
                    };
                    if matched {
                        correct.push(player.user_id.clone());
                    } else {
                        failed.push(player.user_id.clone());
                    }
                }
            }
        }

        correct.sort();
        failed.sort();
        let game_type = challenge.kind;

        for user_id in &correct {
            if let Some(player) = self.players.get_mut(user_id) {
                player.award_points(CORRECT_ANSWER_POINTS);
            }
        }

        debug!(
            channel = %self.channel_id,
            round = self.current_round,
            correct = correct.len(),
            failed = failed.len(),
            "round evaluated"
        );

        Ok(RoundResults {
            game_type,
            correct_players: correct,
            failed_players: failed,
        })
    }

    /// Reports a change of score leader, at most once per transition
    ///
    /// Returns the new leader's id when the lead changed hands since the
    /// last check. The very first leader is recorded silently: taking the
    /// lead from nobody is not a change. Nobody leads an empty or scoreless
    /// roster.
    pub fn check_leader_change(&mut self) -> Option<String> {
        let standings = Standings::of(&self.players);
        let leader = standings.leader()?.user_id.clone();

        if self.previous_leader.as_deref() == Some(leader.as_str()) {
            return None;
        }

        let had_previous = self.previous_leader.is_some();
        self.previous_leader = Some(leader.clone());
        had_previous.then_some(leader)
    }

    /// The current standings, score descending
    pub fn standings(&self) -> Standings {
        Standings::of(&self.players)
    }

    /// Renders a textual progress bar over the configured rounds
    ///
    /// `None` until the game has a configuration.
    pub fn round_progress(&self) -> Option<String> {
        let total = self.config.as_ref()?.main_rounds;
        let current = self.current_round;
        let filled = "▓".repeat(current as usize);
        let empty = "░".repeat(total.saturating_sub(current) as usize);
        Some(format!("[{filled}{empty}] Round {current}/{total}"))
    }

    /// Ends the game and aggregates the final results
    ///
    /// On success every player holding the maximum score is marked a
    /// winner; ties produce multiple winners. The results are computed once
    /// and cached.
    pub fn end_game(&mut self, success: bool) -> FinalResults {
        self.state = if success {
            GameState::Completed
        } else {
            GameState::Failed
        };
        self.current_phase = GamePhase::Outro;
        self.end_time = Some(SystemTime::now());

        let winners = if success {
            winners_of(&self.players)
        } else {
            Vec::new()
        };
        for user_id in &winners {
            if let Some(player) = self.players.get_mut(user_id) {
                player.state = PlayerState::Winner;
            }
        }

        let scores: BTreeMap<String, u32> = self
            .players
            .values()
            .map(|player| (player.user_id.clone(), player.score))
            .collect();

        let duration_secs = match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => {
                end.duration_since(start).unwrap_or_default().as_secs_f64()
            }
            _ => 0.0,
        };

        info!(
            channel = %self.channel_id,
            success,
            winners = winners.len(),
            rounds = self.current_round,
            "game ended"
        );

        let results = FinalResults {
            winners,
            scores,
            rounds_played: self.current_round,
            duration_secs,
        };

        self.final_results.get_or_init(|| results).clone()
    }

    /// The cached final results, once the game has ended
    pub fn get_final_results(&self) -> Option<&FinalResults> {
        self.final_results.get()
    }

    /// Reports the externally visible state of the instance
    ///
    /// Side-effect free; safe to call at any time.
    pub fn get_game_state(&self) -> GameStatus {
        GameStatus {
            state: self.state,
            phase: self.current_phase,
            round: self.current_round,
            player_count: self.players.len(),
            active_players: self
                .players
                .values()
                .filter(|player| player.is_active())
                .count(),
            challenge_type: self.current_challenge.as_ref().map(|challenge| challenge.kind),
            time_elapsed: match self.start_time {
                Some(start) => {
                    format!("{:.1}s", start.elapsed().unwrap_or_default().as_secs_f64())
                }
                None => "0s".to_owned(),
            },
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::verify::HeuristicVerifier;
    use std::sync::{Arc, Mutex};

    fn fixed_challenge(kind: GameType, evaluation: Evaluation) -> Challenge {
        Challenge::new(kind, "test question", Duration::from_secs(10), evaluation)
    }

    fn fixed_generator(
        challenge: Challenge,
    ) -> impl Fn(GameType) -> Result<Challenge, GeneratorError> {
        move |_| Ok(challenge.clone())
    }

    fn trivia_instance(players: &[&str]) -> GameInstance {
        let mut instance = GameInstance::new("C001", "Epic Quest");
        instance.set_challenge_generator(fixed_generator(fixed_challenge(
            GameType::Trivia,
            Evaluation::TextMatch {
                accepted: "Paris".into(),
            },
        )));
        for user_id in players {
            instance.add_player(*user_id);
        }
        instance
    }

    #[test]
    fn test_add_player_idempotent() {
        let mut instance = GameInstance::new("C001", "Epic Quest");
        instance.add_player("A");
        instance.add_player("A");

        assert_eq!(instance.players().len(), 1);
        assert_eq!(instance.player("A").unwrap().score, 0);
    }

    #[test]
    fn test_remove_player_on_non_member_is_noop() {
        let mut instance = GameInstance::new("C001", "Epic Quest");
        instance.add_player("A");
        instance.remove_player("B");
        assert_eq!(instance.players().len(), 1);
    }

    #[test]
    fn test_start_game_requires_players() {
        let mut instance = GameInstance::new("C001", "Epic Quest");
        assert!(matches!(
            instance.start_game(None),
            Err(Error::NotEnoughPlayers)
        ));
    }

    #[test]
    fn test_start_game_synthesizes_config_from_roster() {
        let mut instance = trivia_instance(&["A", "B"]);
        let status = instance.start_game(None).unwrap();

        assert_eq!(status.state, GameState::InProgress);
        assert_eq!(status.player_count, 2);
        assert_eq!(instance.config().unwrap().player_count, 2);
    }

    #[test]
    fn test_start_main_round_before_start_game() {
        let mut instance = trivia_instance(&["A"]);
        assert!(matches!(
            instance.start_main_round(None),
            Err(Error::NotStarted)
        ));
    }

    #[test]
    fn test_start_main_round_without_generator() {
        let mut instance = GameInstance::new("C001", "Epic Quest");
        instance.add_player("A");
        instance.start_game(None).unwrap();
        assert!(matches!(
            instance.start_main_round(None),
            Err(Error::NoGenerator)
        ));
    }

    #[test]
    fn test_round_counter_not_self_limited() {
        let mut instance = trivia_instance(&["A", "B"]);
        let mut config = GameConfig::for_player_count(2);
        config.main_rounds = 2;
        instance.start_game(Some(config)).unwrap();

        for expected in 1..=3u32 {
            instance.start_main_round(Some(GameType::Trivia)).unwrap();
            assert_eq!(instance.current_round(), expected);
        }
    }

    #[test]
    fn test_round_start_resets_player_round_fields() {
        let mut instance = trivia_instance(&["A"]);
        instance.start_game(None).unwrap();
        instance.start_main_round(None).unwrap();
        instance.submit_answer("A", "Paris", Some("ts-1".to_string()));

        instance.start_main_round(None).unwrap();
        let player = instance.player("A").unwrap();
        assert!(player.current_answer.is_none());
        assert!(player.response_time.is_none());
        assert!(player.previous_message_ref.is_none());
    }

    #[test]
    fn test_auto_selection_avoids_recent_types() {
        let mut instance = GameInstance::new("C001", "Epic Quest");
        let requested = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requested);
        instance.set_challenge_generator(
            move |kind: GameType| -> Result<Challenge, GeneratorError> {
                log.lock().unwrap().push(kind);
                Ok(fixed_challenge(kind, Evaluation::FirstResponder))
            },
        );
        for user_id in ["A", "B", "C"] {
            instance.add_player(user_id);
        }
        instance.start_game(None).unwrap();

        for _ in 0..30 {
            instance.start_main_round(None).unwrap();
        }

        let kinds = requested.lock().unwrap();
        for window in kinds.windows(REPEAT_EXCLUSION_WINDOW + 1) {
            let current = window[REPEAT_EXCLUSION_WINDOW];
            for previous in &window[..REPEAT_EXCLUSION_WINDOW] {
                assert_ne!(current, *previous, "repeated {current:?} within window");
            }
        }
    }

    #[test]
    fn test_generator_failure_propagates() {
        let mut instance = GameInstance::new("C001", "Epic Quest");
        instance.set_challenge_generator(
            |_: GameType| -> Result<Challenge, GeneratorError> {
                Err("content source unreachable".into())
            },
        );
        instance.add_player("A");
        instance.start_game(None).unwrap();

        assert!(matches!(
            instance.start_main_round(None),
            Err(Error::Generator(_))
        ));
    }

    #[test]
    fn test_submit_answer_unknown_player_is_noop() {
        let mut instance = trivia_instance(&["A"]);
        instance.start_game(None).unwrap();
        instance.start_main_round(None).unwrap();

        assert!(instance.submit_answer("ghost", "Paris", None).is_none());
    }

    #[test]
    fn test_answer_overwrite_returns_first_reference() {
        let mut instance = trivia_instance(&["A"]);
        instance.start_game(None).unwrap();
        instance.start_main_round(None).unwrap();

        let first = instance
            .submit_answer("A", "London", Some("ts-1".to_string()))
            .unwrap();
        assert!(first.previous_message_ref.is_none());

        let second = instance
            .submit_answer("A", "Paris", Some("ts-2".to_string()))
            .unwrap();
        assert_eq!(second.previous_message_ref.as_deref(), Some("ts-1"));
        assert_eq!(
            instance.player("A").unwrap().current_answer.as_deref(),
            Some("Paris")
        );
    }

    #[test]
    fn test_submission_receipt_grades_latency() {
        let mut instance = trivia_instance(&["A"]);
        instance.start_game(None).unwrap();
        instance.start_main_round(None).unwrap();

        let receipt = instance.submit_answer("A", "Paris", None).unwrap();
        assert_eq!(receipt.speed, Some(ResponseSpeed::Fast));
        assert!(receipt.response_time.is_some());
    }

    #[test]
    fn test_evaluate_without_challenge() {
        let mut instance = trivia_instance(&["A"]);
        instance.start_game(None).unwrap();

        assert!(matches!(
            instance.evaluate_current_challenge(&HeuristicVerifier::new()),
            Err(Error::NoActiveChallenge)
        ));
    }

    #[test]
    fn test_speed_round_earliest_responder_wins() {
        let mut instance = GameInstance::new("C001", "Epic Quest");
        instance.set_challenge_generator(fixed_generator(fixed_challenge(
            GameType::SpeedChallenge,
            Evaluation::FirstResponder,
        )));
        for user_id in ["A", "B", "C"] {
            instance.add_player(user_id);
        }
        instance.start_game(None).unwrap();
        instance.start_main_round(None).unwrap();

        instance.submit_answer("A", "speed", None);
        instance.submit_answer("B", "speed", None);
        instance.players.get_mut("A").unwrap().response_time =
            Some(Duration::from_millis(1200));
        instance.players.get_mut("B").unwrap().response_time = Some(Duration::from_millis(800));
        // C never answers

        let results = instance
            .evaluate_current_challenge(&HeuristicVerifier::new())
            .unwrap();
        assert_eq!(results.correct_players, vec!["B"]);
        assert_eq!(results.failed_players, vec!["A", "C"]);
        assert_eq!(instance.player("B").unwrap().score, CORRECT_ANSWER_POINTS);
        assert_eq!(instance.player("A").unwrap().score, 0);
    }

    #[test]
    fn test_speed_round_records_response_time_on_submit() {
        let mut instance = GameInstance::new("C001", "Epic Quest");
        instance.set_challenge_generator(fixed_generator(fixed_challenge(
            GameType::SpeedChallenge,
            Evaluation::FirstResponder,
        )));
        instance.add_player("A");
        instance.start_game(None).unwrap();
        instance.start_main_round(None).unwrap();

        instance.submit_answer("A", "speed", None);
        assert!(instance.player("A").unwrap().response_time.is_some());
    }

    #[test]
    fn test_text_round_does_not_record_response_time() {
        let mut instance = trivia_instance(&["A"]);
        instance.start_game(None).unwrap();
        instance.start_main_round(None).unwrap();

        instance.submit_answer("A", "Paris", None);
        assert!(instance.player("A").unwrap().response_time.is_none());
    }

    #[test]
    fn test_emoji_superset_matching() {
        let mut instance = GameInstance::new("C001", "Epic Quest");
        instance.set_challenge_generator(fixed_generator(fixed_challenge(
            GameType::EmojiChallenge,
            Evaluation::TokenSet {
                expected: ["🍎".to_string(), "🐝".to_string()].into_iter().collect(),
            },
        )));
        instance.add_player("A");
        instance.add_player("B");
        instance.start_game(None).unwrap();
        instance.start_main_round(None).unwrap();

        instance.submit_answer("A", "🍎 🐝 😀", None);
        instance.submit_answer("B", "🍎", None);

        let results = instance
            .evaluate_current_challenge(&HeuristicVerifier::new())
            .unwrap();
        assert_eq!(results.correct_players, vec!["A"]);
        assert_eq!(results.failed_players, vec!["B"]);
    }

    #[test]
    fn test_full_two_player_game_round() {
        let mut instance = trivia_instance(&["A", "B"]);
        instance.start_game(None).unwrap();

        let challenge = instance.start_main_round(None).unwrap();
        assert_eq!(challenge.time_limit, Duration::from_secs(10));

        instance.submit_answer("A", "Paris", None);
        // B submits nothing

        let results = instance
            .evaluate_current_challenge(&HeuristicVerifier::new())
            .unwrap();
        assert_eq!(results.correct_players, vec!["A"]);
        assert_eq!(results.failed_players, vec!["B"]);
        assert_eq!(instance.player("A").unwrap().score, CORRECT_ANSWER_POINTS);
        assert_eq!(instance.player("B").unwrap().score, 0);

        // The challenge stays referenceable after evaluation
        assert!(instance.current_challenge().is_some());
    }

    #[test]
    fn test_text_match_accepts_any_listed_answer() {
        let mut instance = GameInstance::new("C001", "Epic Quest");
        instance.set_challenge_generator(fixed_generator(fixed_challenge(
            GameType::Trivia,
            Evaluation::TextMatch {
                accepted: vec!["7".to_string(), "seven".to_string()].into(),
            },
        )));
        instance.add_player("A");
        instance.add_player("B");
        instance.start_game(None).unwrap();
        instance.start_main_round(None).unwrap();

        instance.submit_answer("A", "seven", None);
        instance.submit_answer("B", "eight", None);

        let results = instance
            .evaluate_current_challenge(&HeuristicVerifier::new())
            .unwrap();
        assert_eq!(results.correct_players, vec!["A"]);
        assert_eq!(results.failed_players, vec!["B"]);
    }

    struct OutageVerifier;

    impl AnswerVerifier for OutageVerifier {
        fn verify(&self, _submitted: &str, _expected: &str) -> Result<bool, VerifyError> {
            Err(VerifyError::new("judge timed out"))
        }
    }

    #[test]
    fn test_verifier_failure_propagates() {
        let mut instance = trivia_instance(&["A"]);
        instance.start_game(None).unwrap();
        instance.start_main_round(None).unwrap();
        instance.submit_answer("A", "Paris", None);

        assert!(matches!(
            instance.evaluate_current_challenge(&OutageVerifier),
            Err(Error::Verifier(_))
        ));
    }

    #[test]
    fn test_leader_change_suppressed_on_first_leader() {
        let mut instance = trivia_instance(&["A", "B"]);
        instance.start_game(None).unwrap();

        // Nobody has scored yet
        assert!(instance.check_leader_change().is_none());

        instance.players.get_mut("A").unwrap().award_points(10);
        // First leader is recorded silently
        assert!(instance.check_leader_change().is_none());

        instance.players.get_mut("B").unwrap().award_points(20);
        // The takeover is announced exactly once
        assert_eq!(instance.check_leader_change().as_deref(), Some("B"));
        assert!(instance.check_leader_change().is_none());
    }

    #[test]
    fn test_end_game_marks_tied_winners() {
        let mut instance = trivia_instance(&["A", "B", "C"]);
        instance.start_game(None).unwrap();
        instance.players.get_mut("A").unwrap().award_points(20);
        instance.players.get_mut("B").unwrap().award_points(20);
        instance.players.get_mut("C").unwrap().award_points(10);

        let results = instance.end_game(true);

        assert_eq!(results.winners, vec!["A", "B"]);
        assert_eq!(instance.player("A").unwrap().state, PlayerState::Winner);
        assert_eq!(instance.player("B").unwrap().state, PlayerState::Winner);
        assert_eq!(instance.player("C").unwrap().state, PlayerState::Active);
        assert_eq!(results.scores["C"], 10);
        assert_eq!(instance.state(), GameState::Completed);

        let cached = instance.get_final_results().unwrap();
        assert_eq!(cached.winners, vec!["A", "B"]);
    }

    #[test]
    fn test_end_game_failure_has_no_winners() {
        let mut instance = trivia_instance(&["A"]);
        instance.start_game(None).unwrap();
        instance.players.get_mut("A").unwrap().award_points(10);

        let results = instance.end_game(false);

        assert!(results.winners.is_empty());
        assert_eq!(instance.state(), GameState::Failed);
        assert_eq!(instance.player("A").unwrap().state, PlayerState::Active);
    }

    #[test]
    fn test_game_state_snapshot() {
        let mut instance = trivia_instance(&["A", "B"]);

        let waiting = instance.get_game_state();
        assert_eq!(waiting.state, GameState::Waiting);
        assert_eq!(waiting.phase, GamePhase::Intro);
        assert_eq!(waiting.time_elapsed, "0s");
        assert!(waiting.challenge_type.is_none());

        instance.start_game(None).unwrap();
        instance.start_main_round(None).unwrap();

        let running = instance.get_game_state();
        assert_eq!(running.state, GameState::InProgress);
        assert_eq!(running.phase, GamePhase::MainRound);
        assert_eq!(running.round, 1);
        assert_eq!(running.player_count, 2);
        assert_eq!(running.active_players, 2);
        assert_eq!(running.challenge_type, Some(GameType::Trivia));
        assert!(running.time_elapsed.ends_with('s'));
    }

    #[test]
    fn test_phase_transitions() {
        let mut instance = trivia_instance(&["A"]);
        assert_eq!(instance.phase(), GamePhase::Intro);

        instance.start_game(None).unwrap();
        assert_eq!(instance.phase(), GamePhase::Intro);

        instance.start_main_round(None).unwrap();
        assert_eq!(instance.phase(), GamePhase::MainRound);

        instance.end_game(true);
        assert_eq!(instance.phase(), GamePhase::Outro);
    }

    #[test]
    fn test_round_progress_bar() {
        let mut instance = trivia_instance(&["A", "B"]);
        assert!(instance.round_progress().is_none());

        let mut config = GameConfig::for_player_count(2);
        config.main_rounds = 4;
        instance.start_game(Some(config)).unwrap();
        instance.start_main_round(None).unwrap();

        assert_eq!(instance.round_progress().unwrap(), "[▓░░░] Round 1/4");
    }
}
