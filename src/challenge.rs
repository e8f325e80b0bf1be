//! Challenge data model
//!
//! This module defines the immutable description of a single round: the
//! challenge kind, the question shown to players, the answer-time budget,
//! and the correctness rule used when the round is evaluated. Correctness
//! rules are a closed set of variants, each carrying exactly the data its
//! evaluation needs, so a speed round has no answer text at all and an
//! emoji round carries its expected token set directly.

use std::{collections::BTreeSet, time::Duration};

use enum_map::Enum;
use garde::Validate;
use heck::ToTitleCase;
use serde::{Deserialize, Serialize};

use crate::constants::challenge::{MAX_QUESTION_LENGTH, MAX_TIME_LIMIT, MIN_TIME_LIMIT};

/// The closed set of challenge kinds a round can be
///
/// Adding a new kind means extending this enum and the two match sites
/// that generate and evaluate it; there is no string-tag dispatch anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    /// Mental arithmetic with randomized operands
    QuickMath,
    /// General-knowledge question with one or more acceptable answers
    Trivia,
    /// First player to type the prompted word wins
    SpeedChallenge,
    /// A riddle with a single acceptable answer
    Riddle,
    /// Recall and retype a briefly shown digit sequence
    Memory,
    /// Transform a word (reverse it, alternate its case)
    TextModification,
    /// Type every emoji in a shown set, any order
    EmojiChallenge,
    /// Everyone must respond to succeed together
    Collaborative,
    /// Host-supplied content outside the built-in kinds
    Custom,
}

impl GameType {
    /// Returns the stable snake_case tag for this kind
    pub fn tag(self) -> &'static str {
        match self {
            Self::QuickMath => "quick_math",
            Self::Trivia => "trivia",
            Self::SpeedChallenge => "speed_challenge",
            Self::Riddle => "riddle",
            Self::Memory => "memory",
            Self::TextModification => "text_modification",
            Self::EmojiChallenge => "emoji_challenge",
            Self::Collaborative => "collaborative",
            Self::Custom => "custom",
        }
    }

    /// Returns a human-readable title-cased name, e.g. `Quick Math`
    pub fn display_name(self) -> String {
        self.tag().to_title_case()
    }

    /// Whether this kind may be picked by random round-type selection
    ///
    /// Custom rounds only happen when the host asks for one explicitly.
    pub fn is_auto_selectable(self) -> bool {
        !matches!(self, Self::Custom)
    }

    /// Iterates over every challenge kind
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::LENGTH).map(Self::from_usize)
    }
}

/// One or more acceptable answer strings for a text-matched challenge
///
/// Content providers sometimes return a single canonical answer and
/// sometimes a list of equally acceptable spellings; both convert into
/// this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::From)]
#[serde(transparent)]
pub struct AnswerSet(Vec<String>);

impl From<String> for AnswerSet {
    fn from(answer: String) -> Self {
        Self(vec![answer])
    }
}

impl From<&str> for AnswerSet {
    fn from(answer: &str) -> Self {
        Self(vec![answer.to_owned()])
    }
}

impl AnswerSet {
    /// Iterates over the acceptable answers
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns the number of acceptable answers
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set contains no answers
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders the acceptable answers joined for display, e.g. `Paris / paris`
    pub fn display(&self) -> String {
        self.0.join(" / ")
    }
}

/// The correctness rule applied when a round is evaluated
///
/// Each variant carries exactly the data its rule needs; there is no
/// metadata bag and no flag checking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Evaluation {
    /// Only response latency matters; the earliest responder wins the round
    FirstResponder,
    /// A submission is correct iff its whitespace-split tokens are a
    /// superset of the expected tokens, in any order
    TokenSet {
        /// The tokens every correct submission must contain
        expected: BTreeSet<String>,
    },
    /// A submission is correct iff it matches any acceptable answer
    /// according to the registered answer verifier
    TextMatch {
        /// The acceptable answers
        accepted: AnswerSet,
    },
}

impl Evaluation {
    /// Whether this rule scores by response latency rather than content
    pub fn is_speed_based(&self) -> bool {
        matches!(self, Self::FirstResponder)
    }

    /// The acceptable answers, when the rule matches against text
    pub fn accepted_answers(&self) -> Option<&AnswerSet> {
        match self {
            Self::TextMatch { accepted } => Some(accepted),
            Self::FirstResponder | Self::TokenSet { .. } => None,
        }
    }
}

/// Validates that a duration falls within the inclusive seconds range
/// defined by `MIN_SECONDS` and `MAX_SECONDS`.
///
/// # Errors
///
/// Returns a `garde::Error` if the duration is outside the bounds.
pub fn validate_duration<const MIN_SECONDS: u64, const MAX_SECONDS: u64>(
    val: &Duration,
    _ctx: &(),
) -> garde::Result {
    if (MIN_SECONDS..=MAX_SECONDS).contains(&val.as_secs()) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "outside of bounds [{MIN_SECONDS},{MAX_SECONDS}]",
        )))
    }
}

/// An immutable description of one round
///
/// Created fresh for every round by a [`crate::generator::ChallengeGenerator`]
/// and held by the instance as the current challenge until replaced.
#[serde_with::serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Challenge {
    /// The kind of challenge this round is
    #[garde(skip)]
    pub kind: GameType,
    /// The question text shown to players
    #[garde(length(chars, min = 1, max = MAX_QUESTION_LENGTH))]
    pub question: String,
    /// How long players have to answer
    #[garde(custom(validate_duration::<MIN_TIME_LIMIT, MAX_TIME_LIMIT>))]
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub time_limit: Duration,
    /// The correctness rule applied at evaluation
    #[garde(skip)]
    pub evaluation: Evaluation,
}

impl Challenge {
    /// Creates a new challenge description
    pub fn new(
        kind: GameType,
        question: impl Into<String>,
        time_limit: Duration,
        evaluation: Evaluation,
    ) -> Self {
        Self {
            kind,
            question: question.into(),
            time_limit,
            evaluation,
        }
    }

    /// Renders the expected answer for post-round display, when one exists
    ///
    /// Speed rounds have no answer text; token-set rounds show their
    /// expected tokens; text-matched rounds show the acceptable answers.
    pub fn answer_display(&self) -> Option<String> {
        match &self.evaluation {
            Evaluation::FirstResponder => None,
            Evaluation::TokenSet { expected } => {
                Some(expected.iter().cloned().collect::<Vec<_>>().join(" "))
            }
            Evaluation::TextMatch { accepted } => Some(accepted.display()),
        }
    }
}
