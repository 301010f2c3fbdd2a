//! # MCGalaxy Upgrade Tasks
//!
//! Idempotent routines that bring persisted server state from older formats
//! to the current one. Run once at startup; each step checks its own guard,
//! so re-running the whole pass is always safe.
//!
//! Layers, leaf-first:
//! - [`detect`]: bounded format sniffing
//! - [`legacy`]: pure decoders for each legacy layout
//! - [`file_migrator`] / [`row_migrator`]: per-file and bulk-row drivers
//! - [`steps`]: the concrete upgrades
//! - [`orchestrator`]: the ordered startup pass

pub mod context;
pub mod detect;
pub mod error;
pub mod file_migrator;
pub mod legacy;
pub mod logging;
pub mod orchestrator;
pub mod report;
pub mod row_migrator;
pub mod steps;

pub use context::{UpgradeContext, UpgradeSettings};
pub use error::{Result, UpgradeError};
pub use orchestrator::{Orchestrator, RunSummary};
pub use report::{BatchResult, SkipReason, StepOutcome};
pub use steps::{MigrationStep, STARTUP_STEPS};
