//! Answer verification
//!
//! This module defines the collaborator contract for judging whether a
//! submitted answer matches an expected one, plus a built-in heuristic
//! implementation. Hosts that want semantic judgment (e.g. a remote
//! model deciding that "the eiffel tower city" means Paris) implement
//! [`AnswerVerifier`] over their own transport and pass it to evaluation.

use thiserror::Error;

/// Failure raised by a verifier implementation
///
/// The engine never interprets these; they propagate out of evaluation so
/// the host can decide whether to retry, fall back, or abort the round.
#[derive(Debug, Error)]
#[error("answer verification failed: {reason}")]
pub struct VerifyError {
    /// Human-readable description of what went wrong
    pub reason: String,
}

impl VerifyError {
    /// Creates a verification error with the given reason
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Judges whether a submitted answer matches an expected answer
///
/// Implementations must be case-insensitive and punctuation-tolerant, and
/// must resolve within bounded time; a slow or failing remote judge should
/// surface as an error rather than a silent wrong verdict.
pub trait AnswerVerifier {
    /// Returns whether `submitted` is an acceptable match for `expected`
    ///
    /// # Errors
    ///
    /// Returns a [`VerifyError`] when the judgment itself cannot be made,
    /// e.g. a remote judging service timed out.
    fn verify(&self, submitted: &str, expected: &str) -> Result<bool, VerifyError>;
}

/// Comparison that ignores case and every non-alphanumeric character
///
/// `"It's a Keyboard!"` matches `"a keyboard"`. Digits are significant so
/// arithmetic answers compare exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicVerifier;

impl HeuristicVerifier {
    /// Creates a heuristic verifier
    pub fn new() -> Self {
        Self
    }
}

fn significant_chars(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

impl AnswerVerifier for HeuristicVerifier {
    fn verify(&self, submitted: &str, expected: &str) -> Result<bool, VerifyError> {
        Ok(significant_chars(submitted) == significant_chars(expected))
    }
}
