// Maps guess requests onto the game engine and engine errors onto replies.

use chrono::NaiveDate;
use tracing::{debug, error, warn};
use woertle_core::{Game, GameError, WordRepository};

use crate::protocol::{
    ErrorReply, GuessReply, GuessRequest, INTERNAL_ERROR, INVALID_WORD, MALFORMED_REQUEST,
    VOCABULARY_EXHAUSTED,
};

/// Today's date in the server's local time zone.
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Request handler shared by all connections.
pub struct GuessService<R> {
    game: Game<R>,
    clock: fn() -> NaiveDate,
}

impl<R: WordRepository> GuessService<R> {
    pub fn new(game: Game<R>) -> Self {
        Self::with_clock(game, local_today)
    }

    /// Use `clock` instead of the local date to decide which day's word is
    /// played.
    pub fn with_clock(game: Game<R>, clock: fn() -> NaiveDate) -> Self {
        Self { game, clock }
    }

    pub fn game(&self) -> &Game<R> {
        &self.game
    }

    /// Handle one raw JSON request.
    pub fn handle_text(&self, text: &str) -> GuessReply {
        match serde_json::from_str::<GuessRequest>(text) {
            Ok(request) => self.handle(&request),
            Err(e) => {
                debug!("Malformed guess request: {e}");
                GuessReply::Rejected(ErrorReply::new(400, MALFORMED_REQUEST))
            }
        }
    }

    pub fn handle(&self, request: &GuessRequest) -> GuessReply {
        let today = (self.clock)();
        match self.game.submit(&request.guess, request.attempts, today) {
            Ok(result) => GuessReply::Scored(result),
            Err(GameError::InvalidGuess(e)) => {
                debug!("Rejected guess: {e}");
                GuessReply::Rejected(ErrorReply::new(400, INVALID_WORD))
            }
            Err(GameError::VocabularyExhausted { date }) => {
                warn!("Refusing guess for {date}: vocabulary exhausted");
                GuessReply::Rejected(ErrorReply::new(503, VOCABULARY_EXHAUSTED))
            }
            Err(GameError::Storage(e)) => {
                error!("Storage failure while scoring guess: {e:#}");
                GuessReply::Rejected(ErrorReply::new(500, INTERNAL_ERROR))
            }
        }
    }
}
