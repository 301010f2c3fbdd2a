//! Upgrade error taxonomy
//!
//! A missing source is never an error; detectors report it as
//! [`Format::Absent`](crate::detect::Format::Absent) and steps skip.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for upgrade operations
pub type Result<T> = std::result::Result<T, UpgradeError>;

#[derive(Error, Debug)]
pub enum UpgradeError {
    /// One unit (line, row, file) could not be decoded; siblings continue
    #[error("Malformed record in {unit}: {reason}")]
    MalformedRecord { unit: String, reason: String },

    /// A serialized array could not be decoded at all
    #[error("Malformed JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Read/write/move/delete failed; the source is left in place for the next run
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The batch commit failed and was rolled back as a whole
    #[error("Transaction failed, batch rolled back: {0}")]
    Transaction(#[source] mcg_common::Error),

    /// Database read failure outside the commit phase
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Common(#[from] mcg_common::Error),
}

impl UpgradeError {
    pub fn malformed(unit: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedRecord {
            unit: unit.into(),
            reason: reason.to_string(),
        }
    }
}

/// Attach the offending path to an I/O error
pub(crate) trait IoContext<T> {
    fn at(self, path: &Path) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at(self, path: &Path) -> Result<T> {
        self.map_err(|source| UpgradeError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
