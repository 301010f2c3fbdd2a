//! Tracing setup for the binary
//!
//! The subscriber is installed before configuration is loaded so that config
//! warnings are visible. The level from the config file is applied afterwards
//! through a reload handle, unless `RUST_LOG` is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

/// Handle used to swap the global filter once the config is known
pub type FilterHandle = reload::Handle<EnvFilter, Registry>;

const DEFAULT_LEVEL: &str = "info";

fn initial_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Install the global subscriber; call first thing in `main`
pub fn init_tracing() -> FilterHandle {
    let (filter, handle) = reload::Layer::new(initial_filter());
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
    handle
}

/// Replace the active filter with `level` (an `EnvFilter` directive)
pub fn set_level(handle: &FilterHandle, level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level)?;
    handle.reload(filter)?;
    Ok(())
}

/// Apply the configured level unless `RUST_LOG` already chose one
pub fn apply_config_level(handle: &FilterHandle, level: &str) -> anyhow::Result<()> {
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        return Ok(());
    }
    set_level(handle, level)
}
