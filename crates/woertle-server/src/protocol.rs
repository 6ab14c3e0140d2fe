// Wire messages exchanged with game clients.

use serde::{Deserialize, Serialize};
use woertle_core::GuessResult;

/// Rejection text for guesses of the wrong length or outside the word list.
pub const INVALID_WORD: &str = "Invalid word.";

pub const MALFORMED_REQUEST: &str = "Malformed request.";

pub const VOCABULARY_EXHAUSTED: &str = "No more available words to choose from.";

pub const INTERNAL_ERROR: &str = "Internal server error.";

/// A guess submission. The client reports how many attempts it has used so
/// far; a missing field counts as zero.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GuessRequest {
    #[serde(default)]
    pub guess: String,
    #[serde(default)]
    pub attempts: u32,
}

/// Error body. `status` follows HTTP semantics: 4xx for bad input, 5xx for
/// server-side failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReply {
    pub status: u16,
    pub error: String,
}

impl ErrorReply {
    pub fn new(status: u16, error: &str) -> Self {
        Self {
            status,
            error: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GuessReply {
    Scored(GuessResult),
    Rejected(ErrorReply),
}

impl GuessReply {
    pub fn status(&self) -> u16 {
        match self {
            GuessReply::Scored(_) => 200,
            GuessReply::Rejected(e) => e.status,
        }
    }
}
