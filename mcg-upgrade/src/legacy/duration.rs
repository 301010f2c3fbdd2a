//! Informal duration text
//!
//! Accepted shapes:
//! - `D H M S` (four integers)
//! - `H:MM:SS`, `D H:MM:SS`, `D.H:MM:SS`
//! - `D day, H:MM:SS` / `D days H:MM:SS`

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationParseError {
    #[error("empty duration")]
    Empty,

    #[error("unrecognised duration {0:?}")]
    Unrecognised(String),

    #[error("invalid number {0:?}")]
    Number(String),

    #[error("{field} out of range in {text:?}")]
    OutOfRange { field: &'static str, text: String },

    #[error("duration {0:?} overflows")]
    Overflow(String),
}

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: i64 = 24 * SECS_PER_HOUR;

fn number(token: &str) -> Result<i64, DurationParseError> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DurationParseError::Number(token.to_string()));
    }
    token
        .parse::<i64>()
        .map_err(|_| DurationParseError::Number(token.to_string()))
}

fn total(text: &str, parts: [(i64, i64); 4]) -> Result<i64, DurationParseError> {
    parts
        .iter()
        .try_fold(0i64, |acc, (value, scale)| {
            value.checked_mul(*scale).and_then(|v| acc.checked_add(v))
        })
        .ok_or_else(|| DurationParseError::Overflow(text.to_string()))
}

/// Parse `H:MM:SS`, optionally prefixed with `D.`; returns (days, h, m, s)
fn clock(token: &str, text: &str) -> Result<(i64, i64, i64, i64), DurationParseError> {
    let (days, hms) = match token.split_once('.') {
        Some((d, rest)) => (number(d)?, rest),
        None => (0, token),
    };

    let parts: Vec<&str> = hms.split(':').collect();
    if parts.len() != 3 {
        return Err(DurationParseError::Unrecognised(text.to_string()));
    }

    let hours = number(parts[0])?;
    let minutes = number(parts[1])?;
    let seconds = number(parts[2])?;

    if minutes >= 60 {
        return Err(DurationParseError::OutOfRange {
            field: "minutes",
            text: text.to_string(),
        });
    }
    if seconds >= 60 {
        return Err(DurationParseError::OutOfRange {
            field: "seconds",
            text: text.to_string(),
        });
    }

    Ok((days, hours, minutes, seconds))
}

/// Parse legacy duration text into total seconds
pub fn parse_legacy_duration(text: &str) -> Result<i64, DurationParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DurationParseError::Empty);
    }

    let tokens: Vec<&str> = trimmed
        .split_whitespace()
        .map(|t| t.trim_end_matches(','))
        .filter(|t| !t.is_empty())
        .collect();

    // D H M S
    if tokens.len() == 4 && !tokens.iter().any(|t| t.contains(':')) {
        let d = number(tokens[0])?;
        let h = number(tokens[1])?;
        let m = number(tokens[2])?;
        let s = number(tokens[3])?;
        return total(
            trimmed,
            [(d, SECS_PER_DAY), (h, SECS_PER_HOUR), (m, SECS_PER_MINUTE), (s, 1)],
        );
    }

    let (clock_token, prefix) = match tokens.split_last() {
        Some((last, prefix)) if last.contains(':') => (*last, prefix),
        _ => return Err(DurationParseError::Unrecognised(trimmed.to_string())),
    };

    let extra_days = match prefix {
        [] => 0,
        [days] => number(days)?,
        [days, unit] if matches!(unit.to_ascii_lowercase().as_str(), "day" | "days" | "d") => {
            number(days)?
        }
        _ => return Err(DurationParseError::Unrecognised(trimmed.to_string())),
    };

    let (days, h, m, s) = clock(clock_token, trimmed)?;
    let days = days
        .checked_add(extra_days)
        .ok_or_else(|| DurationParseError::Overflow(trimmed.to_string()))?;

    total(
        trimmed,
        [(days, SECS_PER_DAY), (h, SECS_PER_HOUR), (m, SECS_PER_MINUTE), (s, 1)],
    )
}

/// Decode a stored time-spent value
///
/// `Ok(None)` when the value is already plain seconds.
pub fn upgrade_time_spent(text: &str) -> Result<Option<i64>, DurationParseError> {
    if let Ok(seconds) = text.trim().parse::<i64>() {
        if seconds >= 0 {
            return Ok(None);
        }
    }
    parse_legacy_duration(text).map(Some)
}
