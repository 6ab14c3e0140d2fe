// Library root for the daily word game engine: word store, daily word
// selection, guess evaluation and the session policy.

pub mod db;
pub mod error;
pub mod evaluate;
pub mod game;
pub mod selector;
pub mod session;
pub mod store;
pub mod word;

pub use db::Database;
pub use error::{GameError, InvalidGuess, InvalidGuessReason};
pub use evaluate::{Evaluation, Feedback, GuessEvaluator};
pub use game::{Game, GuessResult};
pub use selector::DailyWordSelector;
pub use session::{GameState, Outcome, Progress, SessionPolicy};
pub use store::{Assignment, DailyAssignment, Vocabulary, WordRepository};
pub use word::Rules;
