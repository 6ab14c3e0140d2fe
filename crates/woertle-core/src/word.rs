// Word normalization, word-list parsing and game rules.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};

/// Attempts a player gets before the daily word is revealed.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 6;

/// Letters per word in the default deployment.
pub const DEFAULT_WORD_LENGTH: usize = 5;

/// Deployment-level game constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    pub word_length: usize,
    pub max_attempts: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            word_length: DEFAULT_WORD_LENGTH,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Length of a word in letters. Umlauts and `ß` count as one letter each,
/// so this is a character count, not a byte count.
pub fn letter_count(word: &str) -> usize {
    word.chars().count()
}

/// Normalize one raw word-list entry: trim, lowercase, and keep it only if it
/// is exactly `word_length` alphabetic characters.
pub fn normalize_entry(raw: &str, word_length: usize) -> Option<String> {
    let word = raw.trim().to_lowercase();
    if letter_count(&word) != word_length {
        return None;
    }
    if !word.chars().all(char::is_alphabetic) {
        return None;
    }
    Some(word)
}

/// Parse a newline-delimited word list into a deduplicated, sorted list of
/// normalized words.
pub fn parse_word_list(text: &str, word_length: usize) -> Vec<String> {
    text.lines()
        .filter_map(|line| normalize_entry(line, word_length))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Read and parse a word-list file.
pub fn load_word_list(path: impl AsRef<Path>, word_length: usize) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read word list at {}", path.display()))?;
    Ok(parse_word_list(&text, word_length))
}
