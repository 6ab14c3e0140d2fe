// Guess submission: validation, daily word lookup, scoring and the session
// decision, wired together over one word store.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::GameError;
use crate::evaluate::{CharCounts, Feedback, GuessEvaluator};
use crate::selector::DailyWordSelector;
use crate::session::{GameState, Outcome, SessionPolicy};
use crate::store::{Vocabulary, WordRepository};
use crate::word::Rules;

/// Response to an accepted guess. Serializes to the client payload:
/// `game_over` and `target_word` only appear on a loss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuessResult {
    pub feedback: Vec<Feedback>,
    pub win: bool,
    #[serde(rename = "targetCount")]
    pub target_count: CharCounts,
    #[serde(rename = "correctCount")]
    pub correct_count: CharCounts,
    #[serde(skip_serializing_if = "is_false")]
    pub game_over: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_word: Option<String>,
    /// Attempt count after this guess.
    #[serde(skip)]
    pub attempts: u32,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl GuessResult {
    pub fn state(&self) -> GameState {
        if self.win {
            GameState::Won
        } else if self.game_over {
            GameState::Lost
        } else {
            GameState::AwaitingGuess
        }
    }
}

/// One deployment's game: a word store, its vocabulary snapshot and the
/// rules it is played with.
pub struct Game<R> {
    selector: DailyWordSelector<R>,
    vocabulary: Vocabulary,
    evaluator: GuessEvaluator,
    policy: SessionPolicy,
    rules: Rules,
}

impl<R: WordRepository> Game<R> {
    /// Build a game over `repo`, snapshotting its vocabulary.
    pub fn new(repo: R, rules: Rules) -> Result<Self, GameError> {
        let vocabulary = Vocabulary::load(&repo)?;
        info!(
            "Game ready: {} words of length {}, {} attempts",
            vocabulary.len(),
            rules.word_length,
            rules.max_attempts
        );
        Ok(Self {
            selector: DailyWordSelector::new(repo),
            vocabulary,
            evaluator: GuessEvaluator::new(),
            policy: SessionPolicy::new(rules.max_attempts),
            rules,
        })
    }

    pub fn rules(&self) -> Rules {
        self.rules
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn selector(&self) -> &DailyWordSelector<R> {
        &self.selector
    }

    /// Score `guess` for the game of `date`, given the client's attempt count
    /// before this guess.
    ///
    /// Invalid guesses are rejected before the store is touched, so they
    /// neither consume an attempt nor create the day's assignment.
    pub fn submit(
        &self,
        guess: &str,
        attempts: u32,
        date: NaiveDate,
    ) -> Result<GuessResult, GameError> {
        let guess = guess.to_lowercase();
        self.evaluator
            .validate(&guess, &self.vocabulary, self.rules.word_length)?;

        let target = self.selector.word_for_date(date)?;
        let evaluation = self.evaluator.evaluate(&guess, &target);
        let progress = self.policy.advance(attempts, &guess, &target);
        debug!(
            "Guess {guess} scored on attempt {} for {date}: {:?}",
            progress.attempts, progress.outcome
        );

        let lost = progress.outcome == Outcome::Loss;
        Ok(GuessResult {
            feedback: evaluation.feedback,
            win: progress.outcome == Outcome::Win,
            target_count: (*evaluation.target_count).clone(),
            correct_count: evaluation.correct_count,
            game_over: lost,
            target_word: lost.then_some(target),
            attempts: progress.attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::error::InvalidGuessReason;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Helper: a game whose only word is `target`, plus extra guessable
    /// words that are already used up.
    fn single_word_game(target: &str, extra: &[&str]) -> Game<Database> {
        let db = Database::open(":memory:").expect("in-memory database should open");
        let mut words = vec![target.to_string()];
        words.extend(extra.iter().map(|w| w.to_string()));
        db.insert_words(&words).unwrap();
        for w in extra {
            db.mark_used(w).unwrap();
        }
        Game::new(db, Rules::default()).unwrap()
    }

    #[test]
    fn correct_guess_wins() {
        let game = single_word_game("hallo", &[]);
        let result = game.submit("hallo", 0, date(2024, 1, 1)).unwrap();
        assert!(result.win);
        assert!(!result.game_over);
        assert_eq!(result.feedback, vec![Feedback::Correct; 5]);
        assert_eq!(result.attempts, 1);
        assert_eq!(result.state(), GameState::Won);
    }

    #[test]
    fn guess_is_lowercased() {
        let game = single_word_game("hallo", &[]);
        assert!(game.submit("HaLLo", 0, date(2024, 1, 1)).unwrap().win);
    }

    #[test]
    fn wrong_guess_continues_until_limit() {
        let game = single_word_game("hallo", &["apfel"]);
        let d = date(2024, 1, 1);

        let result = game.submit("apfel", 4, d).unwrap();
        assert!(!result.win);
        assert!(!result.game_over);
        assert_eq!(result.target_word, None);
        assert_eq!(result.attempts, 5);

        let result = game.submit("apfel", 5, d).unwrap();
        assert!(result.game_over);
        assert_eq!(result.target_word.as_deref(), Some("hallo"));
        assert_eq!(result.state(), GameState::Lost);
    }

    #[test]
    fn invalid_guess_does_not_create_assignment() {
        let game = single_word_game("hallo", &[]);
        let err = game.submit("zebra", 0, date(2024, 1, 1)).unwrap_err();
        match err {
            GameError::InvalidGuess(inv) => assert_eq!(inv.reason, InvalidGuessReason::UnknownWord),
            other => panic!("expected InvalidGuess, got: {other}"),
        }
        assert_eq!(game.selector().repository().assignment_count().unwrap(), 0);

        let err = game.submit("hal", 0, date(2024, 1, 1)).unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn exhaustion_surfaces_from_submit() {
        let game = single_word_game("hallo", &[]);
        game.submit("hallo", 0, date(2024, 1, 1)).unwrap();
        let err = game.submit("hallo", 0, date(2024, 1, 2)).unwrap_err();
        assert!(matches!(err, GameError::VocabularyExhausted { .. }));
    }

    #[test]
    fn continue_payload_omits_loss_fields() {
        let game = single_word_game("hallo", &["hello"]);
        let result = game.submit("hello", 0, date(2024, 1, 1)).unwrap();
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "feedback": ["correct", "absent", "correct", "correct", "correct"],
                "win": false,
                "targetCount": {"a": 1, "h": 1, "l": 2, "o": 1},
                "correctCount": {"h": 1, "l": 2, "o": 1},
            })
        );
    }

    #[test]
    fn loss_payload_reveals_target() {
        let game = single_word_game("hallo", &["fjord"]);
        let result = game.submit("fjord", 5, date(2024, 1, 1)).unwrap();
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["game_over"], json!(true));
        assert_eq!(value["target_word"], json!("hallo"));
        assert_eq!(value["win"], json!(false));
        assert_eq!(value["correctCount"], json!({}));
        assert!(value.get("attempts").is_none());
    }
}
