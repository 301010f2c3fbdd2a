//! Ordered startup pass
//!
//! Runs each step once, in order, on the calling task. A failing step is
//! logged and the pass moves on; nothing here terminates the host.

use crate::context::UpgradeContext;
use crate::report::StepOutcome;
use crate::steps::{MigrationStep, STARTUP_STEPS};
use tracing::{info, warn};

/// Outcome of every step in one pass, in run order
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<(MigrationStep, StepOutcome)>,
}

impl RunSummary {
    pub fn outcome(&self, step: MigrationStep) -> Option<&StepOutcome> {
        self.outcomes
            .iter()
            .find(|(s, _)| *s == step)
            .map(|(_, outcome)| outcome)
    }

    pub fn failed(&self) -> impl Iterator<Item = MigrationStep> + '_ {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, StepOutcome::Failed(_)))
            .map(|(step, _)| *step)
    }

    pub fn completed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, StepOutcome::Completed(_)))
            .count()
    }
}

#[derive(Debug, Clone)]
pub struct Orchestrator {
    steps: Vec<MigrationStep>,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::startup()
    }
}

impl Orchestrator {
    /// Every known step in default order
    pub fn startup() -> Self {
        Self {
            steps: STARTUP_STEPS.to_vec(),
        }
    }

    /// A subset, still run in default order
    pub fn only(selected: &[MigrationStep]) -> Self {
        Self {
            steps: STARTUP_STEPS
                .into_iter()
                .filter(|step| selected.contains(step))
                .collect(),
        }
    }

    pub fn steps(&self) -> &[MigrationStep] {
        &self.steps
    }

    pub async fn run(&self, ctx: &UpgradeContext) -> RunSummary {
        for name in ctx.settings.unknown_skip_steps() {
            warn!("skip_steps names unknown step {:?}; nothing disabled", name);
        }
        info!("Running {} upgrade steps", self.steps.len());

        let mut summary = RunSummary::default();
        for step in &self.steps {
            let outcome = step.run(ctx).await;
            summary.outcomes.push((*step, outcome));
        }

        info!(
            "Upgrade pass finished: {} completed, {} failed, {} skipped",
            summary.completed(),
            summary.failed().count(),
            summary.outcomes.iter().filter(|(_, o)| o.is_skipped()).count()
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_keeps_default_order() {
        let orchestrator = Orchestrator::only(&[
            MigrationStep::UpgradeDbTimeSpent,
            MigrationStep::UpgradeOldAgreed,
        ]);
        assert_eq!(
            orchestrator.steps(),
            &[MigrationStep::UpgradeOldAgreed, MigrationStep::UpgradeDbTimeSpent]
        );
    }
}
