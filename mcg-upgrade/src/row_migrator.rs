//! Bulk row migration
//!
//! Three phases:
//! 1. probe one row to decide whether any work remains
//! 2. stream every row through a transform, collecting `(key, new value)`
//!    pairs and counting rows that fail to decode
//! 3. apply the collected pairs in one transaction
//!
//! Decoding failures are tolerated per row. Applying is all-or-nothing.
//! No transaction is held while decoding.

use crate::detect::{Format, FormatDetector, Sample};
use crate::error::{Result, UpgradeError};
use crate::report::BatchResult;
use mcg_common::db::{read_rows, read_string, update_batch};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::fmt::Display;
use tracing::{debug, warn};

/// Which table and columns a row migration works on
#[derive(Debug, Clone, Copy)]
pub struct ColumnProjection<'a> {
    pub table: &'a str,
    /// Integer row identifier
    pub key_column: &'a str,
    /// Text column being upgraded in place
    pub value_column: &'a str,
}

/// Output of the decode phase
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DecodedRows {
    /// `(key, new value)` in storage order
    pub updates: Vec<(i64, i64)>,
    pub batch: BatchResult,
    /// Rows already in current form; left untouched
    pub already_current: usize,
}

impl DecodedRows {
    pub fn total_rows(&self) -> usize {
        self.batch.seen() + self.already_current
    }
}

pub struct BulkRowMigrator<'a, D> {
    pool: &'a SqlitePool,
    projection: ColumnProjection<'a>,
    detector: D,
}

impl<'a, D: FormatDetector> BulkRowMigrator<'a, D> {
    pub fn new(pool: &'a SqlitePool, projection: ColumnProjection<'a>, detector: D) -> Self {
        Self {
            pool,
            projection,
            detector,
        }
    }

    /// Classify the store from a single probe row
    ///
    /// An empty table reports `Absent`: nothing to migrate.
    pub async fn probe(&self) -> Result<Format> {
        let value = read_string(
            self.pool,
            self.projection.table,
            self.projection.value_column,
            "LIMIT 1",
        )
        .await?;

        Ok(self.detector.detect(&Sample::from_value(value)))
    }

    /// Stream all rows through `transform`
    ///
    /// `transform` returns `Ok(None)` for a value already in current form.
    pub async fn decode<F, E>(&self, transform: F) -> Result<DecodedRows>
    where
        F: Fn(&str) -> std::result::Result<Option<i64>, E>,
        E: Display,
    {
        let mut decoded = DecodedRows::default();
        let columns = [self.projection.key_column, self.projection.value_column];

        read_rows(self.pool, self.projection.table, &columns, "", |row| {
            match self.decode_row(row, &transform) {
                Ok(Some(update)) => {
                    decoded.updates.push(update);
                    decoded.batch.record_success();
                }
                Ok(None) => decoded.already_current += 1,
                Err(e) => {
                    debug!("{}", e);
                    decoded.batch.record_failure();
                }
            }
        })
        .await?;

        Ok(decoded)
    }

    fn decode_row<F, E>(&self, row: &SqliteRow, transform: &F) -> Result<Option<(i64, i64)>>
    where
        F: Fn(&str) -> std::result::Result<Option<i64>, E>,
        E: Display,
    {
        let table = self.projection.table;
        let key: i64 = row
            .try_get(0)
            .map_err(|e| UpgradeError::malformed(format!("{} row", table), e))?;
        let unit = format!("{} row {}", table, key);

        let value: Option<String> = row
            .try_get(1)
            .map_err(|e| UpgradeError::malformed(unit.as_str(), e))?;
        let value = value.ok_or_else(|| UpgradeError::malformed(unit.as_str(), "NULL value"))?;

        let new_value = transform(&value).map_err(|e| UpgradeError::malformed(unit, e))?;
        Ok(new_value.map(|v| (key, v)))
    }

    /// Apply every decoded update in one transaction
    pub async fn apply(&self, decoded: &DecodedRows) -> Result<u64> {
        if decoded.updates.is_empty() {
            return Ok(0);
        }

        update_batch(
            self.pool,
            self.projection.table,
            self.projection.value_column,
            self.projection.key_column,
            &decoded.updates,
        )
        .await
        .map_err(|e| {
            warn!(
                "Rolled back {} updates to {}.{}",
                decoded.updates.len(),
                self.projection.table,
                self.projection.value_column
            );
            UpgradeError::Transaction(e)
        })
    }
}
