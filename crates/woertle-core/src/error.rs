// Error taxonomy for the game engine.

use chrono::NaiveDate;
use thiserror::Error;

/// Why a guess was turned away before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidGuessReason {
    /// The guess does not have the configured number of letters.
    WrongLength { expected: usize, actual: usize },
    /// The guess has the right length but is not in the vocabulary.
    UnknownWord,
}

/// A rejected guess. Rejections never consume an attempt and never touch
/// storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid guess `{guess}`: {}", describe(.reason))]
pub struct InvalidGuess {
    pub guess: String,
    pub reason: InvalidGuessReason,
}

fn describe(reason: &InvalidGuessReason) -> String {
    match reason {
        InvalidGuessReason::WrongLength { expected, actual } => {
            format!("expected {expected} letters, got {actual}")
        }
        InvalidGuessReason::UnknownWord => "not in the word list".to_string(),
    }
}

#[derive(Debug, Error)]
pub enum GameError {
    /// Every word in the store has already been a daily word, so no word can
    /// be assigned to `date`.
    #[error("no more available words to choose from for {date}")]
    VocabularyExhausted { date: NaiveDate },

    #[error(transparent)]
    InvalidGuess(#[from] InvalidGuess),

    /// Storage I/O failure, propagated unchanged.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl GameError {
    /// `true` for errors caused by the caller's input rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self, GameError::InvalidGuess(_))
    }
}
