//! Everything a step may touch

use crate::steps::MigrationStep;
use mcg_common::config::UpgradeConfig;
use mcg_common::ServerLayout;
use sqlx::SqlitePool;

/// Operator-tunable step behaviour
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpgradeSettings {
    /// Assigner written when a legacy temp-rank line has none
    pub default_assigner: String,
    pub skip_steps: Vec<String>,
}

impl UpgradeSettings {
    /// `skip_steps` entries that name no known step
    pub fn unknown_skip_steps(&self) -> impl Iterator<Item = &str> + '_ {
        self.skip_steps
            .iter()
            .map(String::as_str)
            .filter(|name| MigrationStep::from_name(name).is_none())
    }
}

impl From<&UpgradeConfig> for UpgradeSettings {
    fn from(config: &UpgradeConfig) -> Self {
        Self {
            default_assigner: config.default_assigner.clone(),
            skip_steps: config.skip_steps.clone(),
        }
    }
}

/// Shared handle passed to every step
#[derive(Debug, Clone)]
pub struct UpgradeContext {
    pub layout: ServerLayout,
    /// Database steps skip when no pool is available
    pub db: Option<SqlitePool>,
    pub settings: UpgradeSettings,
}

impl UpgradeContext {
    pub fn new(layout: ServerLayout) -> Self {
        Self {
            layout,
            db: None,
            settings: UpgradeSettings::default(),
        }
    }

    pub fn with_database(mut self, pool: SqlitePool) -> Self {
        self.db = Some(pool);
        self
    }

    pub fn with_settings(mut self, settings: UpgradeSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn is_disabled(&self, step_name: &str) -> bool {
        self.settings.skip_steps.iter().any(|s| s == step_name)
    }
}
