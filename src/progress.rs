use crate::app_dirs::AppDirs;
use chrono::{DateTime, Local};
use itertools::Itertools;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("progress database error: {0}")]
    Db(#[from] rusqlite::Error),
    #[error("progress export error: {0}")]
    Export(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// External collaborator recording one row per answered prompt.
///
/// Delivery is best-effort at-most-once: the session invokes this exactly
/// once per typed-answer or timeout outcome and ignores the result. Failures
/// never roll back or stall the in-memory state machine.
pub trait ProgressSink: std::fmt::Debug {
    fn record_attempt(
        &mut self,
        prompt_id: &str,
        was_correct: bool,
        when: DateTime<Local>,
    ) -> Result<(), ProgressError>;
}

/// Sink that drops everything; used by tests and headless runs.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn record_attempt(
        &mut self,
        _prompt_id: &str,
        _was_correct: bool,
        _when: DateTime<Local>,
    ) -> Result<(), ProgressError> {
        Ok(())
    }
}

/// Aggregated history for one prompt, for the progress screen and export.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptSummary {
    pub prompt: String,
    pub attempts: i64,
    pub misses: i64,
    pub miss_rate: f64,
    pub last_seen: DateTime<Local>,
}

/// Database manager for practice history
#[derive(Debug)]
pub struct ProgressDb {
    conn: Connection,
}

impl ProgressDb {
    /// Open (or create) the progress database in the platform state dir.
    pub fn new() -> Result<Self, ProgressError> {
        let db_path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("kakitori_progress.db"));
        Self::open(&db_path)
    }

    /// Open a database at an explicit path; tests point this at a tempdir.
    pub fn with_path<P: AsRef<Path>>(path: P) -> Result<Self, ProgressError> {
        Self::open(path.as_ref())
    }

    fn open(db_path: &Path) -> Result<Self, ProgressError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS attempts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                prompt TEXT NOT NULL,
                was_correct BOOLEAN NOT NULL,
                timestamp TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_attempts_prompt ON attempts(prompt)",
            [],
        )?;

        Ok(ProgressDb { conn })
    }

    /// Per-prompt aggregates, hardest first.
    pub fn prompt_summaries(&self) -> Result<Vec<PromptSummary>, ProgressError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT prompt,
                   COUNT(*) AS attempts,
                   SUM(CASE WHEN was_correct THEN 0 ELSE 1 END) AS misses,
                   MAX(timestamp) AS last_seen
            FROM attempts
            GROUP BY prompt
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            let prompt: String = row.get(0)?;
            let attempts: i64 = row.get(1)?;
            let misses: i64 = row.get(2)?;
            let last_seen: String = row.get(3)?;
            Ok((prompt, attempts, misses, last_seen))
        })?;

        let summaries = rows
            .filter_map(|r| r.ok())
            .map(|(prompt, attempts, misses, last_seen)| {
                let miss_rate = if attempts > 0 {
                    (misses as f64 / attempts as f64) * 100.0
                } else {
                    0.0
                };
                let last_seen = DateTime::parse_from_rfc3339(&last_seen)
                    .map(|dt| dt.with_timezone(&Local))
                    .unwrap_or_else(|_| Local::now());
                PromptSummary {
                    prompt,
                    attempts,
                    misses,
                    miss_rate,
                    last_seen,
                }
            })
            .sorted_by(|a, b| {
                b.miss_rate
                    .partial_cmp(&a.miss_rate)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .collect();

        Ok(summaries)
    }

    /// Total attempts recorded across all prompts.
    pub fn total_attempts(&self) -> Result<i64, ProgressError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM attempts", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Write the per-prompt summary table as CSV.
    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> Result<usize, ProgressError> {
        let summaries = self.prompt_summaries()?;

        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["prompt", "attempts", "misses", "miss_rate", "last_seen"])?;
        for s in &summaries {
            writer.write_record(&[
                s.prompt.clone(),
                s.attempts.to_string(),
                s.misses.to_string(),
                format!("{:.1}", s.miss_rate),
                s.last_seen.to_rfc3339(),
            ])?;
        }
        writer.flush()?;

        Ok(summaries.len())
    }
}

impl ProgressSink for ProgressDb {
    fn record_attempt(
        &mut self,
        prompt_id: &str,
        was_correct: bool,
        when: DateTime<Local>,
    ) -> Result<(), ProgressError> {
        self.conn.execute(
            "INSERT INTO attempts (prompt, was_correct, timestamp) VALUES (?1, ?2, ?3)",
            params![prompt_id, was_correct, when.to_rfc3339()],
        )?;
        Ok(())
    }
}
