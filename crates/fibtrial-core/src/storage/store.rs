use crate::errors::{PipelineError, Result};
use crate::model::{Candidate, FibEntry, Parity, ParityCounts, ResultFilter, TestResultRow};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use serde::Serialize;
use std::path::Path;

/// Owns the single SQLite connection of a run. Dropping the store releases it.
pub struct Store {
    conn: Connection,
}

/// Diagnostic counts; a field is `None` when its query failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub candidates: Option<u64>,
    pub results: Option<u64>,
    pub last_candidate_id: Option<i64>,
    pub last_registered_at: Option<String>,
    pub version: Option<String>,
}

/// Raw per-candidate aggregates as returned by SQLite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultAggregate {
    pub total: u64,
    pub even: u64,
    pub odd: u64,
    pub min_value: u64,
    pub max_value: u64,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "opened sqlite db");
        Self::with_connection(conn)
    }

    pub fn memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        Ok(Self { conn })
    }

    pub fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(crate::storage::schema::DDL)?;
        self.conn.pragma_update(
            None,
            "user_version",
            crate::storage::schema::SCHEMA_VERSION,
        )?;
        Ok(())
    }

    // --- Candidates ---

    pub fn register(&self, name: &str) -> Result<Candidate> {
        let candidate = insert_candidate(&self.conn, name)?;
        tracing::info!(candidate_id = candidate.id, name = %candidate.name, "candidate registered");
        Ok(candidate)
    }

    /// Registers a candidate and stores its sequence in a single transaction;
    /// a failure on any row leaves neither the candidate nor its results behind.
    pub fn register_with_results(
        &mut self,
        name: &str,
        sequence: &[FibEntry],
    ) -> Result<(Candidate, usize)> {
        check_sequence(sequence)?;

        let tx = self.conn.transaction()?;
        let candidate = insert_candidate(&tx, name)?;
        let saved = insert_results(&tx, candidate.id, sequence)?;
        tx.commit()?;

        tracing::info!(
            candidate_id = candidate.id,
            name = %candidate.name,
            rows = saved,
            "candidate registered with results"
        );
        Ok((candidate, saved))
    }

    pub fn get_candidate(&self, id: i64) -> Result<Candidate> {
        self.conn
            .query_row(
                "SELECT id, name, registered_at FROM candidates WHERE id = ?1",
                params![id],
                row_to_candidate,
            )
            .optional()?
            .ok_or_else(|| PipelineError::NotFound(format!("candidate {id}")))
    }

    pub fn list_candidates(&self) -> Result<Vec<Candidate>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, registered_at FROM candidates ORDER BY id ASC")?;
        let rows = stmt
            .query_map([], row_to_candidate)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // --- Results ---

    /// Inserts the whole sequence for a candidate in one transaction.
    pub fn save_results(&mut self, candidate_id: i64, sequence: &[FibEntry]) -> Result<usize> {
        check_sequence(sequence)?;

        let tx = self.conn.transaction()?;

        let known: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM candidates WHERE id = ?1)",
            params![candidate_id],
            |r| r.get(0),
        )?;
        if !known {
            return Err(PipelineError::Integrity(format!(
                "candidate {candidate_id} does not exist"
            )));
        }

        let existing: i64 = tx.query_row(
            "SELECT COUNT(*) FROM test_results WHERE candidate_id = ?1",
            params![candidate_id],
            |r| r.get(0),
        )?;
        if existing > 0 {
            return Err(PipelineError::Integrity(format!(
                "candidate {candidate_id} already has {existing} results"
            )));
        }

        let saved = insert_results(&tx, candidate_id, sequence)?;
        tx.commit()?;
        tracing::info!(candidate_id, rows = saved, "results saved");
        Ok(saved)
    }

    pub fn list(&self, filter: &ResultFilter) -> Result<Vec<TestResultRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, candidate_id, sequence_index, value, parity
             FROM test_results
             WHERE (?1 IS NULL OR candidate_id = ?1)
               AND (?2 IS NULL OR parity = ?2)
             ORDER BY candidate_id ASC, sequence_index ASC",
        )?;
        let rows = stmt
            .query_map(
                params![filter.candidate_id, filter.parity.map(|p| p.as_str())],
                row_to_result,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn count_by_parity(&self) -> Result<ParityCounts> {
        self.grouped_parity(None)
    }

    pub fn count_by_parity_for(&self, candidate_id: i64) -> Result<ParityCounts> {
        self.grouped_parity(Some(candidate_id))
    }

    fn grouped_parity(&self, candidate_id: Option<i64>) -> Result<ParityCounts> {
        let mut stmt = self.conn.prepare(
            "SELECT parity, COUNT(*) FROM test_results
             WHERE (?1 IS NULL OR candidate_id = ?1)
             GROUP BY parity",
        )?;
        let mut rows = stmt.query(params![candidate_id])?;
        let mut counts = ParityCounts::default();
        while let Some(row) = rows.next()? {
            let tag: String = row.get(0)?;
            let n: i64 = row.get(1)?;
            match Parity::parse(&tag) {
                Some(Parity::Even) => counts.even = n as u64,
                Some(Parity::Odd) => counts.odd = n as u64,
                None => tracing::warn!(parity = %tag, "unknown parity tag in store"),
            }
        }
        Ok(counts)
    }

    /// Count, parity split and value range for one candidate; `None` when it has no rows.
    pub fn aggregate_for(&self, candidate_id: i64) -> Result<Option<ResultAggregate>> {
        let (total, even, odd, min, max): (i64, i64, i64, Option<i64>, Option<i64>) =
            self.conn.query_row(
                "SELECT COUNT(*),
                        COALESCE(SUM(parity = 'even'), 0),
                        COALESCE(SUM(parity = 'odd'), 0),
                        MIN(value),
                        MAX(value)
                 FROM test_results WHERE candidate_id = ?1",
                params![candidate_id],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)),
            )?;

        match (total, min, max) {
            (0, _, _) | (_, None, _) | (_, _, None) => Ok(None),
            (total, Some(min), Some(max)) => Ok(Some(ResultAggregate {
                total: total as u64,
                even: even as u64,
                odd: odd as u64,
                min_value: min as u64,
                max_value: max as u64,
            })),
        }
    }

    /// Largest values for a candidate, descending.
    pub fn top_values(&self, candidate_id: i64, limit: u32) -> Result<Vec<u64>> {
        let mut stmt = self.conn.prepare(
            "SELECT value FROM test_results
             WHERE candidate_id = ?1
             ORDER BY value DESC, sequence_index DESC
             LIMIT ?2",
        )?;
        let values = stmt
            .query_map(params![candidate_id, limit], |r| {
                r.get::<_, i64>(0).map(|v| v as u64)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(values)
    }

    // --- Deletes ---

    /// Removes the candidate and its results atomically; returns the number of results removed.
    pub fn delete_candidate(&mut self, id: i64) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute(
            "DELETE FROM test_results WHERE candidate_id = ?1",
            params![id],
        )?;
        let deleted = tx.execute("DELETE FROM candidates WHERE id = ?1", params![id])?;
        if deleted == 0 {
            // tx drops here and rolls back
            return Err(PipelineError::NotFound(format!("candidate {id}")));
        }
        tx.commit()?;
        tracing::info!(candidate_id = id, results = removed, "candidate deleted");
        Ok(removed)
    }

    /// Drops results whose value exceeds `threshold`. Fibonacci values never decrease,
    /// so this trims a suffix and indices stay contiguous.
    pub fn prune_above(&mut self, threshold: u64) -> Result<usize> {
        let Ok(limit) = i64::try_from(threshold) else {
            return Ok(0);
        };
        let tx = self.conn.transaction()?;
        let removed = tx.execute(
            "DELETE FROM test_results WHERE value > ?1",
            params![limit],
        )?;
        tx.commit()?;
        tracing::info!(threshold, removed, "pruned results above threshold");
        Ok(removed)
    }

    pub fn stats_best_effort(&self) -> Result<StoreStats> {
        let conn = &self.conn;

        let candidates: Option<u64> = conn
            .query_row("SELECT COUNT(*) FROM candidates", [], |r| {
                r.get::<_, i64>(0).map(|x| x as u64)
            })
            .ok();
        let results: Option<u64> = conn
            .query_row("SELECT COUNT(*) FROM test_results", [], |r| {
                r.get::<_, i64>(0).map(|x| x as u64)
            })
            .ok();

        let last: Option<(i64, String)> = conn
            .query_row(
                "SELECT id, registered_at FROM candidates ORDER BY id DESC LIMIT 1",
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .ok();
        let (last_candidate_id, last_registered_at) = match last {
            Some((id, at)) => (Some(id), Some(at)),
            None => (None, None),
        };

        let version: Option<String> = conn
            .query_row("PRAGMA user_version", [], |r| r.get(0))
            .ok()
            .map(|v: i64| v.to_string());

        Ok(StoreStats {
            candidates,
            results,
            last_candidate_id,
            last_registered_at,
            version,
        })
    }
}

fn insert_candidate(conn: &Connection, name: &str) -> Result<Candidate> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PipelineError::Validation(
            "candidate name must not be empty".into(),
        ));
    }
    let registered_at = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO candidates(name, registered_at) VALUES (?1, ?2)",
        params![name, registered_at],
    )?;
    Ok(Candidate {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        registered_at,
    })
}

/// Rejects sequences that would break index contiguity or carry a wrong parity tag.
fn check_sequence(sequence: &[FibEntry]) -> Result<()> {
    if sequence.is_empty() {
        return Err(PipelineError::Validation(
            "cannot save an empty sequence".into(),
        ));
    }
    for (pos, entry) in sequence.iter().enumerate() {
        if entry.index as usize != pos {
            return Err(PipelineError::Integrity(format!(
                "sequence_index must be contiguous from 0: position {pos} has index {}",
                entry.index
            )));
        }
        if entry.parity != Parity::of(entry.value) {
            return Err(PipelineError::Validation(format!(
                "parity tag {} does not match value {}",
                entry.parity, entry.value
            )));
        }
    }
    Ok(())
}

// Caller owns the transaction; nothing here commits.
fn insert_results(
    tx: &Transaction<'_>,
    candidate_id: i64,
    sequence: &[FibEntry],
) -> Result<usize> {
    let mut stmt = tx.prepare(
        "INSERT INTO test_results(candidate_id, sequence_index, value, parity)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for entry in sequence {
        let value = i64::try_from(entry.value).map_err(|_| {
            PipelineError::Validation(format!(
                "value {} at index {} exceeds storage range",
                entry.value, entry.index
            ))
        })?;
        stmt.execute(params![
            candidate_id,
            entry.index,
            value,
            entry.parity.as_str()
        ])?;
    }
    Ok(sequence.len())
}

fn row_to_candidate(row: &Row<'_>) -> rusqlite::Result<Candidate> {
    Ok(Candidate {
        id: row.get(0)?,
        name: row.get(1)?,
        registered_at: row.get(2)?,
    })
}

fn row_to_result(row: &Row<'_>) -> rusqlite::Result<TestResultRow> {
    let tag: String = row.get(4)?;
    let parity = Parity::parse(&tag).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            format!("invalid parity tag '{tag}'").into(),
        )
    })?;
    Ok(TestResultRow {
        id: row.get(0)?,
        candidate_id: row.get(1)?,
        sequence_index: row.get(2)?,
        value: row.get::<_, i64>(3)? as u64,
        parity,
    })
}
