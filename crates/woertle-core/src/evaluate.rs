// Guess evaluation: per-position feedback and character-count summaries.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use crate::error::{InvalidGuess, InvalidGuessReason};
use crate::store::Vocabulary;
use crate::word::letter_count;

/// Character frequency map of a word.
pub type CharCounts = BTreeMap<char, u32>;

/// Classification of one guessed letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    /// Same letter at the same position in the target.
    Correct,
    /// Letter occurs somewhere else in the target.
    Present,
    Absent,
}

/// Scored guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub feedback: Vec<Feedback>,
    /// Frequency of every letter in the target, independent of the guess.
    pub target_count: Arc<CharCounts>,
    /// Frequency of letters that matched at their exact position.
    pub correct_count: CharCounts,
}

impl Evaluation {
    pub fn is_solved(&self) -> bool {
        self.feedback.iter().all(|f| *f == Feedback::Correct)
    }
}

/// Frequency map of the characters in `word`.
pub fn char_counts(word: &str) -> CharCounts {
    let mut counts = CharCounts::new();
    for ch in word.chars() {
        *counts.entry(ch).or_insert(0) += 1;
    }
    counts
}

/// Memoized [`char_counts`]. Entries are never evicted; the key space is
/// bounded by the vocabulary.
#[derive(Debug, Default)]
pub struct CharCountCache {
    entries: Mutex<HashMap<String, Arc<CharCounts>>>,
}

impl CharCountCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, word: &str) -> Arc<CharCounts> {
        // A poisoned cache still holds valid entries: values are immutable.
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(counts) = entries.get(word) {
            return Arc::clone(counts);
        }
        let counts = Arc::new(char_counts(word));
        entries.insert(word.to_string(), Arc::clone(&counts));
        counts
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Scores guesses against a target word.
///
/// Feedback is single-pass and positional: a letter that is not at its exact
/// position is `Present` whenever the target contains it at all, regardless
/// of how many times it already matched. A guess with a repeated letter can
/// therefore show more `Present` marks than the target has copies of it.
#[derive(Debug, Default)]
pub struct GuessEvaluator {
    cache: CharCountCache,
}

impl GuessEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check a (lowercased) guess against the word length and vocabulary.
    pub fn validate(
        &self,
        guess: &str,
        vocabulary: &Vocabulary,
        word_length: usize,
    ) -> Result<(), InvalidGuess> {
        let actual = letter_count(guess);
        let reason = if actual != word_length {
            InvalidGuessReason::WrongLength {
                expected: word_length,
                actual,
            }
        } else if !vocabulary.contains(guess) {
            InvalidGuessReason::UnknownWord
        } else {
            return Ok(());
        };
        Err(InvalidGuess {
            guess: guess.to_string(),
            reason,
        })
    }

    /// Score `guess` against `target`. Both must have the same letter count;
    /// [`GuessEvaluator::validate`] establishes that for guesses.
    pub fn evaluate(&self, guess: &str, target: &str) -> Evaluation {
        let target_chars: Vec<char> = target.chars().collect();
        let mut feedback = Vec::with_capacity(target_chars.len());
        let mut correct_count = CharCounts::new();

        for (i, ch) in guess.chars().enumerate() {
            if target_chars.get(i) == Some(&ch) {
                feedback.push(Feedback::Correct);
                *correct_count.entry(ch).or_insert(0) += 1;
            } else if target_chars.contains(&ch) {
                feedback.push(Feedback::Present);
            } else {
                feedback.push(Feedback::Absent);
            }
        }

        Evaluation {
            feedback,
            target_count: self.cache.get(target),
            correct_count,
        }
    }

    pub fn cache(&self) -> &CharCountCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::Feedback::{Absent, Correct, Present};

    fn counts(pairs: &[(char, u32)]) -> CharCounts {
        pairs.iter().copied().collect()
    }

    fn vocab(list: &[&str]) -> Vocabulary {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn exact_guess_is_all_correct() {
        let eval = GuessEvaluator::new().evaluate("hallo", "hallo");
        assert_eq!(eval.feedback, vec![Correct; 5]);
        assert!(eval.is_solved());
        assert_eq!(eval.correct_count, counts(&[('a', 1), ('h', 1), ('l', 2), ('o', 1)]));
    }

    #[test]
    fn disjoint_letters_are_all_absent() {
        let eval = GuessEvaluator::new().evaluate("fjord", "hallx");
        assert_eq!(eval.feedback, vec![Absent; 5]);
        assert!(eval.correct_count.is_empty());
        assert!(!eval.is_solved());
    }

    #[test]
    fn rotation_is_all_present() {
        let eval = GuessEvaluator::new().evaluate("eabcd", "abcde");
        assert_eq!(eval.feedback, vec![Present; 5]);
        assert!(eval.correct_count.is_empty());
    }

    #[test]
    fn mixed_feedback_six_letters() {
        // target g e w e b e / guess b e g i n n
        let eval = GuessEvaluator::new().evaluate("beginn", "gewebe");
        assert_eq!(
            eval.feedback,
            vec![Present, Correct, Present, Absent, Absent, Absent]
        );
        assert_eq!(eval.correct_count, counts(&[('e', 1)]));
        assert_eq!(
            *eval.target_count,
            counts(&[('b', 1), ('e', 3), ('g', 1), ('w', 1)])
        );
    }

    #[test]
    fn repeated_letters_are_not_used_up() {
        // Target has a single `e`, already matched at position 4. The other
        // two `e`s in the guess still count as present.
        let eval = GuessEvaluator::new().evaluate("eerie", "stare");
        assert_eq!(
            eval.feedback,
            vec![Present, Present, Present, Absent, Correct]
        );
        assert_eq!(eval.correct_count, counts(&[('e', 1)]));
        assert_eq!(eval.target_count.get(&'e'), Some(&1));
    }

    #[test]
    fn umlauts_compare_by_character() {
        let eval = GuessEvaluator::new().evaluate("größe", "grüße");
        assert_eq!(
            eval.feedback,
            vec![Correct, Correct, Absent, Correct, Correct]
        );
    }

    #[test]
    fn target_count_is_independent_of_guess() {
        let evaluator = GuessEvaluator::new();
        let a = evaluator.evaluate("apfel", "hallo");
        let b = evaluator.evaluate("zebra", "hallo");
        assert_eq!(a.target_count, b.target_count);
        assert_eq!(*a.target_count, char_counts("hallo"));
    }

    #[test]
    fn cache_memoizes_per_word() {
        let evaluator = GuessEvaluator::new();
        assert!(evaluator.cache().is_empty());

        let first = evaluator.evaluate("apfel", "hallo").target_count;
        let second = evaluator.evaluate("zebra", "hallo").target_count;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(evaluator.cache().len(), 1);

        evaluator.evaluate("hallo", "apfel");
        assert_eq!(evaluator.cache().len(), 2);
    }

    #[test]
    fn validate_accepts_known_word() {
        let evaluator = GuessEvaluator::new();
        assert!(evaluator.validate("hallo", &vocab(&["hallo"]), 5).is_ok());
    }

    #[test]
    fn validate_rejects_wrong_length() {
        let err = GuessEvaluator::new()
            .validate("hal", &vocab(&["hallo"]), 5)
            .unwrap_err();
        assert_eq!(
            err.reason,
            InvalidGuessReason::WrongLength {
                expected: 5,
                actual: 3
            }
        );
    }

    #[test]
    fn validate_rejects_unknown_word() {
        let err = GuessEvaluator::new()
            .validate("zzzzz", &vocab(&["hallo"]), 5)
            .unwrap_err();
        assert_eq!(err.reason, InvalidGuessReason::UnknownWord);
        assert_eq!(err.guess, "zzzzz");
    }

    #[test]
    fn feedback_serializes_lowercase() {
        let json = serde_json::to_string(&vec![Correct, Present, Absent]).unwrap();
        assert_eq!(json, r#"["correct","present","absent"]"#);
    }
}
