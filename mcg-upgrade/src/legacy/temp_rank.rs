//! Fixed-column temp-rank records
//!
//! Legacy line:
//! `name periodHours oldRank tempRank minute hour day month year [assigner] [periodMinutes]`
//!
//! Current line:
//! `name assigner assignedEpoch expiryEpoch oldRank tempRank`

use crate::detect::LEGACY_TEMP_RANK_COLUMNS;
use crate::error::{Result, UpgradeError};
use mcg_common::time::{add_period, compose_datetime, to_unix_time};
use std::fmt;
use std::str::FromStr;

/// One decoded legacy temp-rank line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTempRank {
    pub name: String,
    pub period_hours: i64,
    pub old_rank: String,
    pub temp_rank: String,
    pub minute: u32,
    pub hour: u32,
    pub day: u32,
    pub month: u32,
    pub year: i32,
    pub assigner: Option<String>,
    pub period_minutes: i64,
}

/// One temp-rank assignment in the current layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempRankEntry {
    pub name: String,
    pub assigner: String,
    pub assigned: i64,
    pub expiry: i64,
    pub old_rank: String,
    pub temp_rank: String,
}

impl fmt::Display for TempRankEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.name, self.assigner, self.assigned, self.expiry, self.old_rank, self.temp_rank
        )
    }
}

fn field<T: FromStr>(fields: &[&str], index: usize, what: &str, unit: &str) -> Result<T>
where
    T::Err: fmt::Display,
{
    let raw = fields[index];
    raw.parse::<T>()
        .map_err(|e| UpgradeError::malformed(unit, format!("{} {:?}: {}", what, raw, e)))
}

impl LegacyTempRank {
    /// Decode a legacy line; `Ok(None)` when the line is too narrow to be legacy
    pub fn parse(line: &str, unit: &str) -> Result<Option<Self>> {
        let fields: Vec<&str> = line.split(' ').collect();
        if fields.len() < LEGACY_TEMP_RANK_COLUMNS {
            return Ok(None);
        }

        let period_minutes = match fields.get(10) {
            Some(_) => field(&fields, 10, "period minutes", unit)?,
            None => 0,
        };

        Ok(Some(Self {
            name: fields[0].to_string(),
            period_hours: field(&fields, 1, "period hours", unit)?,
            old_rank: fields[2].to_string(),
            temp_rank: fields[3].to_string(),
            minute: field(&fields, 4, "minute", unit)?,
            hour: field(&fields, 5, "hour", unit)?,
            day: field(&fields, 6, "day", unit)?,
            month: field(&fields, 7, "month", unit)?,
            year: field(&fields, 8, "year", unit)?,
            assigner: fields.get(9).map(|s| s.to_string()),
            period_minutes,
        }))
    }

    /// Compute assignment and expiry epochs
    pub fn to_entry(&self, default_assigner: &str, unit: &str) -> Result<TempRankEntry> {
        let assigned = compose_datetime(self.year, self.month, self.day, self.hour, self.minute)
            .map_err(|e| UpgradeError::malformed(unit, e))?;
        let expiry = add_period(assigned, self.period_hours, self.period_minutes)
            .map_err(|e| UpgradeError::malformed(unit, e))?;

        Ok(TempRankEntry {
            name: self.name.clone(),
            assigner: self
                .assigner
                .clone()
                .unwrap_or_else(|| default_assigner.to_string()),
            assigned: to_unix_time(assigned),
            expiry: to_unix_time(expiry),
            old_rank: self.old_rank.clone(),
            temp_rank: self.temp_rank.clone(),
        })
    }
}

/// Upgrade one line; narrow (already current) lines come back unchanged
pub fn upgrade_temp_rank_line(line: &str, unit: &str, default_assigner: &str) -> Result<String> {
    match LegacyTempRank::parse(line, unit)? {
        Some(legacy) => Ok(legacy.to_entry(default_assigner, unit)?.to_string()),
        None => Ok(line.to_string()),
    }
}
