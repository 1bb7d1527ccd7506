//! SqlitePatternRepository: IPatternRepository over the `patterns` table.
//!
//! Updates run as one transaction on the single writer connection, so the
//! read-modify-write of a pattern is atomic.

use std::sync::Arc;

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{info, warn};

use upset_core::errors::{EngineError, EngineResult, StorageResult};
use upset_core::models::{InteractionType, PatternOutcomeDelta, ThirdKnowledgePattern};
use upset_core::traits::IPatternRepository;

use crate::errors::{corrupt, storage_err};
use crate::pool::ConnectionPool;

const SELECT_COLUMNS: &str = "name, factor_a_code, factor_b_code, interaction_type, multiplier, \
     threshold_value, confidence, sample_size, success_rate, validated, active";

/// Raw row; `interaction_type` is parsed separately so unknown values can be skipped.
struct PatternRow {
    pattern: ThirdKnowledgePattern,
    interaction_type: String,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<PatternRow> {
    let interaction_type: String = row.get(3)?;
    Ok(PatternRow {
        pattern: ThirdKnowledgePattern {
            name: row.get(0)?,
            factor_a_code: row.get(1)?,
            factor_b_code: row.get(2)?,
            // Replaced once the stored name is parsed.
            interaction_type: InteractionType::Multiplicative,
            multiplier: row.get(4)?,
            threshold_value: row.get(5)?,
            confidence: row.get(6)?,
            sample_size: row.get(7)?,
            success_rate: row.get(8)?,
            validated: row.get(9)?,
            active: row.get(10)?,
        },
        interaction_type,
    })
}

impl PatternRow {
    fn into_pattern(self) -> Result<ThirdKnowledgePattern, String> {
        let mut pattern = self.pattern;
        pattern.interaction_type = self.interaction_type.parse()?;
        Ok(pattern)
    }
}

fn load(conn: &Connection, name: &str) -> StorageResult<Option<ThirdKnowledgePattern>> {
    let row = conn
        .query_row(
            &format!("SELECT {SELECT_COLUMNS} FROM patterns WHERE name = ?1"),
            params![name],
            read_row,
        )
        .optional()
        .map_err(storage_err)?;
    row.map(|r| r.into_pattern().map_err(|e| corrupt(format!("pattern {name}: {e}"))))
        .transpose()
}

fn write(conn: &Connection, p: &ThirdKnowledgePattern) -> StorageResult<()> {
    conn.execute(
        "INSERT INTO patterns (name, factor_a_code, factor_b_code, interaction_type, multiplier,
             threshold_value, confidence, sample_size, success_rate, validated, active, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, unixepoch())
         ON CONFLICT(name) DO UPDATE SET
             factor_a_code = excluded.factor_a_code,
             factor_b_code = excluded.factor_b_code,
             interaction_type = excluded.interaction_type,
             multiplier = excluded.multiplier,
             threshold_value = excluded.threshold_value,
             confidence = excluded.confidence,
             sample_size = excluded.sample_size,
             success_rate = excluded.success_rate,
             validated = excluded.validated,
             active = excluded.active,
             updated_at = excluded.updated_at",
        params![
            p.name,
            p.factor_a_code,
            p.factor_b_code,
            p.interaction_type.as_str(),
            p.multiplier,
            p.threshold_value,
            p.confidence,
            p.sample_size,
            p.success_rate,
            p.validated,
            p.active,
        ],
    )
    .map_err(storage_err)?;
    Ok(())
}

pub struct SqlitePatternRepository {
    pool: Arc<ConnectionPool>,
}

impl SqlitePatternRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Insert `patterns` only when the table is empty. Returns how many were written.
    pub fn seed_if_empty(&self, patterns: &[ThirdKnowledgePattern]) -> StorageResult<usize> {
        self.pool.with_writer(|conn| {
            let existing: i64 = conn
                .query_row("SELECT COUNT(*) FROM patterns", [], |row| row.get(0))
                .map_err(storage_err)?;
            if existing > 0 {
                return Ok(0);
            }
            let tx = conn.unchecked_transaction().map_err(storage_err)?;
            for pattern in patterns {
                write(&tx, pattern)?;
            }
            tx.commit().map_err(storage_err)?;
            info!(patterns = patterns.len(), "Pattern table seeded");
            Ok(patterns.len())
        })
    }

    pub fn count(&self) -> StorageResult<usize> {
        self.pool.with_reader(|conn| {
            let n: i64 = conn
                .query_row("SELECT COUNT(*) FROM patterns", [], |row| row.get(0))
                .map_err(storage_err)?;
            Ok(n as usize)
        })
    }

    fn list_active(&self) -> StorageResult<Vec<ThirdKnowledgePattern>> {
        self.pool.with_reader(|conn| {
            let mut stmt = conn
                .prepare_cached(&format!(
                    "SELECT {SELECT_COLUMNS} FROM patterns WHERE active = 1 ORDER BY name"
                ))
                .map_err(storage_err)?;
            let rows = stmt.query_map([], read_row).map_err(storage_err)?;

            let mut patterns = Vec::new();
            for row in rows {
                let row = row.map_err(storage_err)?;
                let name = row.pattern.name.clone();
                match row.into_pattern() {
                    Ok(pattern) => patterns.push(pattern),
                    Err(reason) => {
                        warn!(pattern = %name, reason = %reason, "Skipping stored pattern");
                    }
                }
            }
            Ok(patterns)
        })
    }

    fn apply(
        &self,
        name: &str,
        delta: &PatternOutcomeDelta,
    ) -> StorageResult<Option<ThirdKnowledgePattern>> {
        self.pool.with_writer(|conn| {
            let tx = conn.unchecked_transaction().map_err(storage_err)?;
            let Some(mut pattern) = load(&tx, name)? else {
                return Ok(None);
            };
            pattern.apply_outcome(delta);
            write(&tx, &pattern)?;
            tx.commit().map_err(storage_err)?;
            Ok(Some(pattern))
        })
    }
}

impl IPatternRepository for SqlitePatternRepository {
    async fn list_active_patterns(&self) -> EngineResult<Vec<ThirdKnowledgePattern>> {
        Ok(self.list_active()?)
    }

    async fn get_pattern(&self, name: &str) -> EngineResult<Option<ThirdKnowledgePattern>> {
        Ok(self.pool.with_reader(|conn| load(conn, name))?)
    }

    async fn upsert_pattern(&self, pattern: ThirdKnowledgePattern) -> EngineResult<()> {
        Ok(self.pool.with_writer(|conn| write(conn, &pattern))?)
    }

    async fn update_pattern(
        &self,
        name: &str,
        delta: &PatternOutcomeDelta,
    ) -> EngineResult<ThirdKnowledgePattern> {
        self.apply(name, delta)?
            .ok_or_else(|| EngineError::PatternNotFound {
                name: name.to_string(),
            })
    }
}
