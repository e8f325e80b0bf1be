//! Challenge generation
//!
//! This module defines the collaborator contract for producing a fresh
//! [`Challenge`] from a challenge kind, plus [`LocalGenerator`], an offline
//! implementation covering every built-in kind. Hosts backed by remote
//! content sources (trivia APIs, riddle files) supply their own
//! implementation; the engine only sees the trait.

use std::time::Duration;

use crate::{
    challenge::{Challenge, Evaluation, GameType},
    constants::{
        collaborative, emoji, memory, quick_math, riddle, speed_challenge, text_modification,
        trivia,
    },
};

/// Failure raised by a generator implementation
///
/// The engine never interprets these; they propagate out of a round start
/// so the host can decide whether to retry or abort the round.
pub type GeneratorError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Produces a fresh challenge of the requested kind
///
/// Implementations may use randomness internally but must not require
/// shared state across calls, and must never return a challenge with a
/// zero time limit.
pub trait ChallengeGenerator {
    /// Generates a challenge of the given kind
    ///
    /// # Errors
    ///
    /// Returns a [`GeneratorError`] when content cannot be produced,
    /// e.g. a remote trivia source is unreachable.
    fn generate(&self, game_type: GameType) -> Result<Challenge, GeneratorError>;
}

impl<F> ChallengeGenerator for F
where
    F: Fn(GameType) -> Result<Challenge, GeneratorError>,
{
    fn generate(&self, game_type: GameType) -> Result<Challenge, GeneratorError> {
        self(game_type)
    }
}

/// Prompts shown for speed rounds; correctness is latency-only so the
/// prompted word is flavor, not an answer key
const SPEED_PROMPTS: &[&str] = &[
    "Type: SPEED",
    "Type: SECOND",
    "Type: DASH",
    "Type: ZOOM",
    "Type 'I LOSE' to win this round!",
    "Type: TURBO",
];

/// Words used by text modification rounds
const TEXT_MODIFICATION_WORDS: &[&str] = &[
    "hello",
    "voyager",
    "gaming",
    "challenge",
    "quizzer",
    "puzzle",
    "rocket",
];

/// Offline trivia bank used when no remote source is wired in
const TRIVIA_BANK: &[(&str, &[&str])] = &[
    ("What is the capital of France?", &["Paris"]),
    ("What planet is known as the Red Planet?", &["Mars"]),
    ("How many continents are there?", &["7", "seven"]),
    (
        "What is the largest ocean on Earth?",
        &["Pacific", "the Pacific Ocean"],
    ),
    ("Which element has the chemical symbol O?", &["Oxygen"]),
];

/// Offline riddle bank
const RIDDLE_BANK: &[(&str, &str)] = &[
    (
        "What has keys but no locks, space but no room, and you can enter but not go inside?",
        "A keyboard",
    ),
    ("What gets wetter as it dries?", "A towel"),
    ("What has hands but cannot clap?", "A clock"),
    ("What has to be broken before you can use it?", "An egg"),
];

/// Emojis grouped by a letter appearing in their common name
const EMOJI_BANK: &[(char, &[&str])] = &[
    ('a', &["🍎", "🐜", "🅰️"]),
    ('b', &["🐝", "🍌", "🅱️"]),
    ('c', &["🐱", "🌜", "🌶️"]),
    ('d', &["🐶", "🎯", "💃"]),
];

/// Generic emojis used to pad a thin candidate pool
const EMOJI_PAD: &[&str] = &["😀", "😎", "😉"];

/// Offline challenge generator covering every built-in kind
///
/// Deterministic-enough for production use: all randomness is drawn per
/// call and no state is shared between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalGenerator;

impl LocalGenerator {
    /// Creates a local generator
    pub fn new() -> Self {
        Self
    }

    fn quick_math() -> Challenge {
        let (question, answer, time_limit) = match fastrand::usize(0..4) {
            0 => {
                let a = fastrand::i64(quick_math::ADD_SUB_MIN_OPERAND..=quick_math::ADD_SUB_MAX_OPERAND);
                let b = fastrand::i64(quick_math::ADD_SUB_MIN_OPERAND..=quick_math::ADD_SUB_MAX_OPERAND);
                (
                    format!("What's {a} + {b}?"),
                    a + b,
                    quick_math::ADD_SUB_TIME_LIMIT,
                )
            }
            1 => {
                let a = fastrand::i64(quick_math::ADD_SUB_MIN_OPERAND..=quick_math::ADD_SUB_MAX_OPERAND);
                let b = fastrand::i64(quick_math::ADD_SUB_MIN_OPERAND..=quick_math::ADD_SUB_MAX_OPERAND);
                (
                    format!("What's {a} - {b}?"),
                    a - b,
                    quick_math::ADD_SUB_TIME_LIMIT,
                )
            }
            2 => {
                let a = fastrand::i64(quick_math::MUL_MIN_FACTOR..=quick_math::MUL_MAX_FACTOR);
                let b = fastrand::i64(quick_math::MUL_MIN_FACTOR..=quick_math::MUL_MAX_FACTOR);
                (
                    format!("What's {a} × {b}?"),
                    a * b,
                    quick_math::MUL_DIV_TIME_LIMIT,
                )
            }
            _ => {
                // Build the dividend from the answer so division is exact
                let quotient =
                    fastrand::i64(quick_math::DIV_MIN_QUOTIENT..=quick_math::DIV_MAX_QUOTIENT);
                let divisor =
                    fastrand::i64(quick_math::DIV_MIN_DIVISOR..=quick_math::DIV_MAX_DIVISOR);
                let dividend = quotient * divisor;
                (
                    format!("What's {dividend} ÷ {divisor}?"),
                    quotient,
                    quick_math::MUL_DIV_TIME_LIMIT,
                )
            }
        };

        Challenge::new(
            GameType::QuickMath,
            question,
            Duration::from_secs(time_limit),
            Evaluation::TextMatch {
                accepted: answer.to_string().into(),
            },
        )
    }

    fn speed() -> Challenge {
        let prompt = SPEED_PROMPTS[fastrand::usize(0..SPEED_PROMPTS.len())];
        Challenge::new(
            GameType::SpeedChallenge,
            prompt,
            Duration::from_secs(speed_challenge::TIME_LIMIT),
            Evaluation::FirstResponder,
        )
    }

    fn text_modification() -> Challenge {
        let word = TEXT_MODIFICATION_WORDS[fastrand::usize(0..TEXT_MODIFICATION_WORDS.len())];

        let (question, answer) = if fastrand::bool() {
            (
                format!("Type '{word}' backwards"),
                word.chars().rev().collect::<String>(),
            )
        } else {
            let alternated: String = word
                .chars()
                .enumerate()
                .flat_map(|(index, c)| {
                    if index % 2 == 0 {
                        c.to_uppercase().collect::<Vec<_>>()
                    } else {
                        c.to_lowercase().collect::<Vec<_>>()
                    }
                })
                .collect();
            (
                format!("Type '{word}' with alternating UPPER/lower case (start with UPPER)"),
                alternated,
            )
        };

        Challenge::new(
            GameType::TextModification,
            question,
            Duration::from_secs(text_modification::TIME_LIMIT),
            Evaluation::TextMatch {
                accepted: answer.into(),
            },
        )
    }

    fn memory() -> Challenge {
        let length = fastrand::u64(memory::MIN_SEQUENCE_LEN..=memory::MAX_SEQUENCE_LEN);
        let sequence: Vec<String> = (0..length)
            .map(|_| fastrand::u32(1..=9).to_string())
            .collect();
        let display = sequence.join(" ");

        Challenge::new(
            GameType::Memory,
            format!("Remember this sequence: {display}"),
            Duration::from_secs(length * memory::SECS_PER_DIGIT + memory::BASE_SECS),
            Evaluation::TextMatch {
                accepted: display.into(),
            },
        )
    }

    fn emoji() -> Challenge {
        let (letter, pool) = EMOJI_BANK[fastrand::usize(0..EMOJI_BANK.len())];

        let mut candidates: Vec<&str> = pool.to_vec();
        if candidates.len() < emoji::MIN_POOL_SIZE {
            candidates.extend_from_slice(EMOJI_PAD);
        }
        fastrand::shuffle(&mut candidates);
        candidates.truncate(emoji::MAX_SET_SIZE);

        let shown = candidates.join(" ");
        let question = format!(
            "Type ALL of the following emojis in ANY order: {shown}\n\
             (They each contain the letter '{letter}' in their name)"
        );

        Challenge::new(
            GameType::EmojiChallenge,
            question,
            Duration::from_secs(emoji::TIME_LIMIT),
            Evaluation::TokenSet {
                expected: candidates.into_iter().map(str::to_owned).collect(),
            },
        )
    }

    fn trivia() -> Challenge {
        let (question, answers) = TRIVIA_BANK[fastrand::usize(0..TRIVIA_BANK.len())];
        Challenge::new(
            GameType::Trivia,
            question,
            Duration::from_secs(trivia::TIME_LIMIT),
            Evaluation::TextMatch {
                accepted: answers
                    .iter()
                    .map(|answer| (*answer).to_owned())
                    .collect::<Vec<_>>()
                    .into(),
            },
        )
    }

    fn riddle() -> Challenge {
        let (question, answer) = RIDDLE_BANK[fastrand::usize(0..RIDDLE_BANK.len())];
        Challenge::new(
            GameType::Riddle,
            question,
            Duration::from_secs(riddle::TIME_LIMIT),
            Evaluation::TextMatch {
                accepted: answer.into(),
            },
        )
    }

    fn collaborative() -> Challenge {
        Challenge::new(
            GameType::Collaborative,
            "Work together! Everyone must respond with 'ready' to continue!",
            Duration::from_secs(collaborative::TIME_LIMIT),
            Evaluation::TextMatch {
                accepted: "ready".into(),
            },
        )
    }
}

impl ChallengeGenerator for LocalGenerator {
    fn generate(&self, game_type: GameType) -> Result<Challenge, GeneratorError> {
        Ok(match game_type {
            GameType::QuickMath => Self::quick_math(),
            GameType::SpeedChallenge => Self::speed(),
            GameType::TextModification => Self::text_modification(),
            GameType::Memory => Self::memory(),
            GameType::EmojiChallenge => Self::emoji(),
            GameType::Trivia => Self::trivia(),
            GameType::Riddle => Self::riddle(),
            GameType::Collaborative => Self::collaborative(),
            // No local bank for host-defined rounds; hand back trivia
            GameType::Custom => Self::trivia(),
        })
    }
}
