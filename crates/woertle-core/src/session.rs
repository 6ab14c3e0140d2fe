// Game session policy: attempt counting and win/loss decisions.
//
// The attempt count is supplied by the client on every request and is not
// persisted server-side. Refusing guesses after a terminal outcome is left to
// the caller.

use crate::word::DEFAULT_MAX_ATTEMPTS;

/// Where a game stands after a scored guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    AwaitingGuess,
    Won,
    Lost,
}

impl GameState {
    pub fn is_terminal(self) -> bool {
        matches!(self, GameState::Won | GameState::Lost)
    }
}

/// Decision for a single scored guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    /// Out of attempts; the target word is revealed.
    Loss,
    Continue,
}

impl Outcome {
    pub fn state(self) -> GameState {
        match self {
            Outcome::Win => GameState::Won,
            Outcome::Loss => GameState::Lost,
            Outcome::Continue => GameState::AwaitingGuess,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Attempt count including the guess just scored.
    pub attempts: u32,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    max_attempts: u32,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl SessionPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Count a valid guess and decide the outcome. A correct guess wins even
    /// on the last attempt.
    pub fn advance(&self, attempts: u32, guess: &str, target: &str) -> Progress {
        let attempts = attempts.saturating_add(1);
        let outcome = if guess == target {
            Outcome::Win
        } else if attempts >= self.max_attempts {
            Outcome::Loss
        } else {
            Outcome::Continue
        };
        Progress { attempts, outcome }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_wrong_guess_continues() {
        let p = SessionPolicy::default().advance(0, "apfel", "hallo");
        assert_eq!(p.attempts, 1);
        assert_eq!(p.outcome, Outcome::Continue);
        assert_eq!(p.outcome.state(), GameState::AwaitingGuess);
    }

    #[test]
    fn fifth_wrong_guess_still_continues() {
        let p = SessionPolicy::default().advance(4, "apfel", "hallo");
        assert_eq!(p.attempts, 5);
        assert_eq!(p.outcome, Outcome::Continue);
    }

    #[test]
    fn sixth_wrong_guess_loses() {
        let p = SessionPolicy::default().advance(5, "apfel", "hallo");
        assert_eq!(p.attempts, 6);
        assert_eq!(p.outcome, Outcome::Loss);
        assert!(p.outcome.state().is_terminal());
    }

    #[test]
    fn win_beats_attempt_limit() {
        let p = SessionPolicy::default().advance(5, "hallo", "hallo");
        assert_eq!(p.attempts, 6);
        assert_eq!(p.outcome, Outcome::Win);
    }

    #[test]
    fn client_count_past_limit_still_loses() {
        let p = SessionPolicy::default().advance(9, "apfel", "hallo");
        assert_eq!(p.attempts, 10);
        assert_eq!(p.outcome, Outcome::Loss);
    }

    #[test]
    fn custom_limit() {
        let policy = SessionPolicy::new(3);
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.advance(1, "a", "b").outcome, Outcome::Continue);
        assert_eq!(policy.advance(2, "a", "b").outcome, Outcome::Loss);
    }

    #[test]
    fn saturates_instead_of_overflowing() {
        let p = SessionPolicy::default().advance(u32::MAX, "apfel", "hallo");
        assert_eq!(p.attempts, u32::MAX);
        assert_eq!(p.outcome, Outcome::Loss);
    }

    #[test]
    fn terminal_states() {
        assert!(!GameState::AwaitingGuess.is_terminal());
        assert!(GameState::Won.is_terminal());
        assert!(GameState::Lost.is_terminal());
    }
}
