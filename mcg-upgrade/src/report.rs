//! Step outcomes and batch tallies

use crate::error::UpgradeError;
use std::fmt;

/// Per-unit tally for one batch (files or rows)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchResult {
    pub processed: usize,
    pub failed: usize,
}

impl BatchResult {
    pub fn record_success(&mut self) {
        self.processed += 1;
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Total units seen
    pub fn seen(&self) -> usize {
        self.processed + self.failed
    }
}

impl fmt::Display for BatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} processed, {} failed", self.processed, self.failed)
    }
}

/// Why a step did no work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    SourceAbsent,
    /// Precondition no longer holds
    AlreadyCurrent,
    Disabled,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::SourceAbsent => "source absent",
            SkipReason::AlreadyCurrent => "already current",
            SkipReason::Disabled => "disabled",
        };
        f.write_str(text)
    }
}

/// Result of running one step
#[derive(Debug)]
pub enum StepOutcome {
    Skipped(SkipReason),
    Completed(BatchResult),
    /// The step as a whole failed; its data stays unmigrated until the next run
    Failed(UpgradeError),
}

impl StepOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, StepOutcome::Skipped(_))
    }

    pub fn batch(&self) -> Option<BatchResult> {
        match self {
            StepOutcome::Completed(batch) => Some(*batch),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_tally() {
        let mut batch = BatchResult::default();
        batch.record_success();
        batch.record_success();
        batch.record_failure();

        assert_eq!(batch.processed, 2);
        assert_eq!(batch.failed, 1);
        assert_eq!(batch.seen(), 3);
        assert_eq!(batch.to_string(), "2 processed, 1 failed");
    }

    #[test]
    fn test_outcome_batch_accessor() {
        let outcome = StepOutcome::Completed(BatchResult { processed: 1, failed: 0 });
        assert_eq!(outcome.batch().map(|b| b.processed), Some(1));
        assert!(StepOutcome::Skipped(SkipReason::SourceAbsent).is_skipped());
        assert!(StepOutcome::Skipped(SkipReason::Disabled).batch().is_none());
    }
}
