//! Concrete upgrade steps
//!
//! Each step has a guard (cheap, bounded check of whether work remains) and an
//! apply. Steps never depend on one another having run.

pub mod agreed;
pub mod bots;
pub mod env_props;
pub mod prev_levels;
pub mod temp_ranks;
pub mod time_spent;

use crate::context::UpgradeContext;
use crate::error::Result;
use crate::report::{BatchResult, SkipReason, StepOutcome};
use std::fmt;
use tracing::{error, info};

/// Guard verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Pending,
    Skip(SkipReason),
}

/// Step descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MigrationStep {
    UpgradeOldAgreed,
    MovePreviousLevelFiles,
    CombineEnvFiles,
    UpgradeOldTempranks,
    UpgradeBots,
    UpgradeDbTimeSpent,
}

/// Default startup order; file-format merges run before dependent parses
pub const STARTUP_STEPS: [MigrationStep; 6] = [
    MigrationStep::UpgradeOldAgreed,
    MigrationStep::MovePreviousLevelFiles,
    MigrationStep::CombineEnvFiles,
    MigrationStep::UpgradeOldTempranks,
    MigrationStep::UpgradeBots,
    MigrationStep::UpgradeDbTimeSpent,
];

impl MigrationStep {
    pub fn name(&self) -> &'static str {
        match self {
            MigrationStep::UpgradeOldAgreed => "upgrade_old_agreed",
            MigrationStep::MovePreviousLevelFiles => "move_previous_level_files",
            MigrationStep::CombineEnvFiles => "combine_env_files",
            MigrationStep::UpgradeOldTempranks => "upgrade_old_tempranks",
            MigrationStep::UpgradeBots => "upgrade_bots",
            MigrationStep::UpgradeDbTimeSpent => "upgrade_db_time_spent",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        STARTUP_STEPS.into_iter().find(|step| step.name() == name)
    }

    /// Whether the step still has work to do
    pub async fn guard(&self, ctx: &UpgradeContext) -> Result<Guard> {
        match self {
            MigrationStep::UpgradeOldAgreed => agreed::guard(ctx),
            MigrationStep::MovePreviousLevelFiles => prev_levels::guard(ctx),
            MigrationStep::CombineEnvFiles => env_props::guard(ctx),
            MigrationStep::UpgradeOldTempranks => temp_ranks::guard(ctx),
            MigrationStep::UpgradeBots => bots::guard(ctx),
            MigrationStep::UpgradeDbTimeSpent => time_spent::guard(ctx).await,
        }
    }

    pub async fn apply(&self, ctx: &UpgradeContext) -> Result<BatchResult> {
        match self {
            MigrationStep::UpgradeOldAgreed => agreed::apply(ctx),
            MigrationStep::MovePreviousLevelFiles => prev_levels::apply(ctx),
            MigrationStep::CombineEnvFiles => env_props::apply(ctx),
            MigrationStep::UpgradeOldTempranks => temp_ranks::apply(ctx),
            MigrationStep::UpgradeBots => bots::apply(ctx),
            MigrationStep::UpgradeDbTimeSpent => time_spent::apply(ctx).await,
        }
    }

    /// Guard then apply; every error is caught and reported as the outcome
    pub async fn run(&self, ctx: &UpgradeContext) -> StepOutcome {
        if ctx.is_disabled(self.name()) {
            info!("{}: disabled by configuration", self.name());
            return StepOutcome::Skipped(SkipReason::Disabled);
        }

        let outcome = match self.guard(ctx).await {
            Ok(Guard::Skip(reason)) => StepOutcome::Skipped(reason),
            Ok(Guard::Pending) => match self.apply(ctx).await {
                Ok(batch) => StepOutcome::Completed(batch),
                Err(e) => StepOutcome::Failed(e),
            },
            Err(e) => StepOutcome::Failed(e),
        };

        match &outcome {
            StepOutcome::Skipped(reason) => info!("{}: skipped ({})", self.name(), reason),
            StepOutcome::Completed(batch) => info!("{}: completed ({})", self.name(), batch),
            StepOutcome::Failed(e) => error!("Error in {}: {}", self.name(), e),
        }
        outcome
    }
}

impl fmt::Display for MigrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_names_round_trip() {
        for step in STARTUP_STEPS {
            assert_eq!(MigrationStep::from_name(step.name()), Some(step));
        }
        assert_eq!(MigrationStep::from_name("summon"), None);
    }

    #[test]
    fn test_startup_order() {
        let names: Vec<&str> = STARTUP_STEPS.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec![
                "upgrade_old_agreed",
                "move_previous_level_files",
                "combine_env_files",
                "upgrade_old_tempranks",
                "upgrade_bots",
                "upgrade_db_time_spent",
            ]
        );
    }
}
