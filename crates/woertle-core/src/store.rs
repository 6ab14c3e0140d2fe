// Word store contract: the vocabulary, its used/unused ledger and the
// per-date daily assignments.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use tracing::info;

use crate::word::{load_word_list, parse_word_list};

/// The word chosen for one calendar date. Created at most once per date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyAssignment {
    pub date: NaiveDate,
    pub word: String,
}

/// Result of [`WordRepository::assign_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    /// An assignment for the date was already committed.
    Existing(DailyAssignment),
    /// A new assignment was committed by this call.
    Created(DailyAssignment),
    /// No unused word was left, nothing was written.
    Exhausted,
}

impl Assignment {
    pub fn word(&self) -> Option<&str> {
        match self {
            Assignment::Existing(a) | Assignment::Created(a) => Some(&a.word),
            Assignment::Exhausted => None,
        }
    }
}

/// Storage access for words and daily assignments.
///
/// Word lists returned by this trait are sorted by word so callers that pick
/// by index get the same result for the same store contents.
pub trait WordRepository {
    /// Insert words that are not stored yet. Existing rows, including their
    /// `used` flag, are left untouched. Returns how many rows were added.
    fn insert_words(&self, words: &[String]) -> Result<usize>;

    fn all_words(&self) -> Result<Vec<String>>;

    fn unused_words(&self) -> Result<Vec<String>>;

    /// Flag `word` as used. Flagging an already-used word is a no-op.
    fn mark_used(&self, word: &str) -> Result<()>;

    fn assignment(&self, date: NaiveDate) -> Result<Option<DailyAssignment>>;

    /// Return the assignment for `date`, creating it if needed.
    ///
    /// Runs as one exclusive unit: if no assignment exists, `choose` receives
    /// the unused words and its pick is stored together with the word's used
    /// flag. Either both writes land or neither does. Returning `None` from
    /// `choose` yields [`Assignment::Exhausted`].
    fn assign_with(
        &self,
        date: NaiveDate,
        choose: &mut dyn FnMut(&[String]) -> Option<String>,
    ) -> Result<Assignment>;
}

/// Normalize a raw word list and persist it. First load wins: words already
/// in the store keep their used flag. Returns the number of newly stored
/// words.
pub fn load_vocabulary<R: WordRepository + ?Sized>(
    repo: &R,
    raw: &str,
    word_length: usize,
) -> Result<usize> {
    store_words(repo, &parse_word_list(raw, word_length))
}

/// [`load_vocabulary`] for a word-list file on disk.
pub fn load_vocabulary_file<R: WordRepository + ?Sized>(
    repo: &R,
    path: impl AsRef<Path>,
    word_length: usize,
) -> Result<usize> {
    store_words(repo, &load_word_list(path, word_length)?)
}

fn store_words<R: WordRepository + ?Sized>(repo: &R, words: &[String]) -> Result<usize> {
    let inserted = repo.insert_words(words)?;
    info!(
        "Word list normalized to {} words, {} new",
        words.len(),
        inserted
    );
    Ok(inserted)
}

/// In-memory snapshot of every known word, used to validate guesses without
/// a storage round trip.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    words: HashSet<String>,
}

impl Vocabulary {
    pub fn load<R: WordRepository + ?Sized>(repo: &R) -> Result<Self> {
        Ok(repo.all_words()?.into_iter().collect())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl FromIterator<String> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Vocabulary {
            words: iter.into_iter().collect(),
        }
    }
}
