//! SQLite log of predictions.
//!
//! Every handler opens its own [`LogConnection`] and drops it when done.
//! Statements run in autocommit mode, so each inserted row is committed on its
//! own and concurrent writers are serialized by SQLite's file lock.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};

use crate::{error::StoreError, models::PredictionRecord, predict::ModelKind};

const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS sentiment_analysis_library (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT,
    sentiment TEXT,
    tipe TEXT
);
CREATE TABLE IF NOT EXISTS input_data (
    input_text TEXT,
    output_text TEXT
);
";

/// Handle to the database file; cheap to clone and share across workers.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a connection, creating both tables if they are missing.
    pub fn connect(&self) -> Result<LogConnection, StoreError> {
        let conn = Connection::open(&self.path).map_err(|source| StoreError::Open {
            path: self.path.clone(),
            source,
        })?;
        conn.execute_batch(CREATE_TABLES)?;
        Ok(LogConnection { conn })
    }
}

pub struct LogConnection {
    conn: Connection,
}

impl LogConnection {
    pub fn insert(&self, text: &str, sentiment: &str, tipe: ModelKind) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO sentiment_analysis_library (text, sentiment, tipe) VALUES (?1, ?2, ?3)",
            params![text, sentiment, tipe.as_str()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All logged predictions in insertion order.
    pub fn select_all(&self) -> Result<Vec<PredictionRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, text, sentiment, tipe FROM sentiment_analysis_library ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(PredictionRecord {
                id: row.get(0)?,
                text: row.get(1)?,
                sentiment: row.get(2)?,
                tipe: row.get(3)?,
            })
        })?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Remove every logged prediction; returns how many rows were deleted.
    pub fn delete_all(&self) -> Result<usize, StoreError> {
        Ok(self
            .conn
            .execute("DELETE FROM sentiment_analysis_library", [])?)
    }

    /// Append to the single-text input/output log.
    pub fn insert_input_log(&self, input: &str, output: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO input_data (input_text, output_text) VALUES (?1, ?2)",
            params![input, output],
        )?;
        Ok(())
    }

    pub fn input_log_len(&self) -> Result<i64, StoreError> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM input_data", [], |row| row.get(0))?)
    }
}
