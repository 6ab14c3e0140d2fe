// SQLite persistence layer for the word store and daily assignments.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use crate::store::{Assignment, DailyAssignment, WordRepository};

/// SQLite-backed word store. Holds the vocabulary with its used flags
/// (`words`) and one row per calendar date naming that day's word
/// (`used_words`).
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure both tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS words (
                word TEXT PRIMARY KEY,
                used INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS used_words (
                date TEXT PRIMARY KEY,
                word TEXT NOT NULL
            );
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Number of dates that already have a daily word.
    pub fn assignment_count(&self) -> Result<usize> {
        let conn = self.conn();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM used_words", [], |row| row.get(0))
            .context("failed to count daily assignments")?;
        Ok(count as usize)
    }
}

fn query_words(conn: &Connection, sql: &str) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare(sql)
        .with_context(|| format!("failed to prepare query: {sql}"))?;
    let words = stmt
        .query_map([], |row| row.get(0))
        .context("failed to query words")?
        .collect::<std::result::Result<Vec<String>, _>>()
        .context("failed to map word rows")?;
    Ok(words)
}

fn lookup_assignment(conn: &Connection, date: NaiveDate) -> Result<Option<DailyAssignment>> {
    let word: Option<String> = conn
        .query_row(
            "SELECT word FROM used_words WHERE date = ?1",
            params![date.to_string()],
            |row| row.get(0),
        )
        .optional()
        .context("failed to look up daily assignment")?;
    Ok(word.map(|word| DailyAssignment { date, word }))
}

impl WordRepository for Database {
    /// Batch insert in a single transaction. Uses INSERT OR IGNORE so a word
    /// that already exists keeps its `used` flag.
    fn insert_words(&self, words: &[String]) -> Result<usize> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin insert transaction")?;
        let mut inserted = 0;
        {
            let mut stmt = tx
                .prepare("INSERT OR IGNORE INTO words (word, used) VALUES (?1, 0)")
                .context("failed to prepare word insert")?;
            for word in words {
                inserted += stmt
                    .execute(params![word])
                    .with_context(|| format!("failed to insert word {word}"))?;
            }
        }
        tx.commit().context("failed to commit word insert")?;
        Ok(inserted)
    }

    fn all_words(&self) -> Result<Vec<String>> {
        let conn = self.conn();
        query_words(&conn, "SELECT word FROM words ORDER BY word")
    }

    fn unused_words(&self) -> Result<Vec<String>> {
        let conn = self.conn();
        query_words(&conn, "SELECT word FROM words WHERE used = 0 ORDER BY word")
    }

    fn mark_used(&self, word: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute("UPDATE words SET used = 1 WHERE word = ?1", params![word])
            .context("failed to mark word as used")?;
        Ok(())
    }

    fn assignment(&self, date: NaiveDate) -> Result<Option<DailyAssignment>> {
        let conn = self.conn();
        lookup_assignment(&conn, date)
    }

    /// Uses an IMMEDIATE transaction so the write lock is taken before the
    /// existing-assignment lookup. A second writer (another connection or
    /// process) waits behind it and then sees the committed row.
    fn assign_with(
        &self,
        date: NaiveDate,
        choose: &mut dyn FnMut(&[String]) -> Option<String>,
    ) -> Result<Assignment> {
        let mut conn = self.conn();
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .context("failed to begin assignment transaction")?;

        if let Some(existing) = lookup_assignment(&tx, date)? {
            return Ok(Assignment::Existing(existing));
        }

        let unused = query_words(&tx, "SELECT word FROM words WHERE used = 0 ORDER BY word")?;
        let Some(word) = choose(unused.as_slice()) else {
            return Ok(Assignment::Exhausted);
        };

        tx.execute(
            "INSERT INTO used_words (date, word) VALUES (?1, ?2)",
            params![date.to_string(), word],
        )
        .context("failed to record daily assignment")?;
        tx.execute("UPDATE words SET used = 1 WHERE word = ?1", params![word])
            .context("failed to mark daily word as used")?;
        tx.commit().context("failed to commit daily assignment")?;

        Ok(Assignment::Created(DailyAssignment { date, word }))
    }
}
