// Daily word selection: one word per calendar date, fixed once chosen.

use chrono::NaiveDate;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, info};

use crate::error::GameError;
use crate::store::{Assignment, WordRepository};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Stable RNG seed for a date, derived from its ISO form (`YYYY-MM-DD`) with
/// 64-bit FNV-1a. The same date yields the same seed in every process.
pub fn date_seed(date: NaiveDate) -> u64 {
    date.format("%Y-%m-%d")
        .to_string()
        .bytes()
        .fold(FNV_OFFSET_BASIS, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
        })
}

/// Pick one word uniformly from `candidates` using an RNG seeded by `date`.
/// Returns `None` when there is nothing to pick from.
pub fn seeded_pick(candidates: &[String], date: NaiveDate) -> Option<String> {
    let mut rng = ChaCha8Rng::seed_from_u64(date_seed(date));
    candidates.choose(&mut rng).cloned()
}

/// Chooses and persists the daily word, backed by a [`WordRepository`].
pub struct DailyWordSelector<R> {
    repo: R,
}

impl<R: WordRepository> DailyWordSelector<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// The word for `date`.
    ///
    /// Returns the persisted assignment if one exists. Otherwise picks from
    /// the unused words with a date-seeded RNG and commits the assignment and
    /// the used flag together. Fails with [`GameError::VocabularyExhausted`]
    /// when no unused word is left.
    pub fn word_for_date(&self, date: NaiveDate) -> Result<String, GameError> {
        let assignment = self
            .repo
            .assign_with(date, &mut |unused| seeded_pick(unused, date))?;

        match assignment {
            Assignment::Existing(a) => {
                debug!("Daily word for {date}: {} (existing)", a.word);
                Ok(a.word)
            }
            Assignment::Created(a) => {
                info!("Assigned new daily word for {date}");
                debug!("Daily word for {date}: {}", a.word);
                Ok(a.word)
            }
            Assignment::Exhausted => {
                error!("Vocabulary exhausted: no unused word left for {date}");
                Err(GameError::VocabularyExhausted { date })
            }
        }
    }
}
