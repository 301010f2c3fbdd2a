//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable consulted for the server root folder
pub const ROOT_FOLDER_ENV: &str = "MCG_ROOT_FOLDER";

/// Default database file name, relative to the root folder
pub const DEFAULT_DATABASE_FILE: &str = "MCGalaxy.db";

/// Logging section of the TOML config
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing directive (overridden by RUST_LOG)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Upgrade section of the TOML config
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct UpgradeConfig {
    /// Assigner written for legacy temp-rank lines that carry none
    pub default_assigner: String,
    /// Step names the operator has disabled
    pub skip_steps: Vec<String>,
}

/// Top-level TOML configuration
///
/// Every field is optional; a missing or partial file falls back to defaults.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    /// Database file, relative to the root folder unless absolute
    pub database: Option<PathBuf>,
    pub logging: LoggingConfig,
    pub upgrade: UpgradeConfig,
}

impl TomlConfig {
    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration with graceful degradation
    ///
    /// An explicit path must exist and parse. Without one, the platform
    /// locations are searched; a missing file yields defaults with a warning.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            info!("Loading config file: {}", path.display());
            return Self::from_file(path);
        }

        match find_config_file() {
            Ok(path) => {
                info!("Loading config file: {}", path.display());
                Self::from_file(&path)
            }
            Err(e) => {
                warn!("{} - using default configuration", e);
                Ok(Self::default())
            }
        }
    }
}

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. Current directory (fallback)
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    config: &TomlConfig,
) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(root) = &config.root_folder {
        return root.clone();
    }

    // Priority 4: the server runs from its own directory
    PathBuf::from(".")
}

/// Get configuration file path for the platform
fn find_config_file() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("mcgalaxy").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/mcgalaxy/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// Logical server file layout under a root folder
#[derive(Debug, Clone)]
pub struct ServerLayout {
    root: PathBuf,
}

impl ServerLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Players who accepted the rules, one name per line
    pub fn agreed_file(&self) -> PathBuf {
        self.root.join("ranks").join("agreed.txt")
    }

    pub fn levels_dir(&self) -> PathBuf {
        self.root.join("levels")
    }

    /// Destination for level backups
    pub fn prev_levels_dir(&self) -> PathBuf {
        self.levels_dir().join("prev")
    }

    pub fn level_properties_dir(&self) -> PathBuf {
        self.levels_dir().join("level properties")
    }

    /// Canonical properties file for a map
    pub fn level_properties_file(&self, map: &str) -> PathBuf {
        self.level_properties_dir().join(format!("{}.properties", map))
    }

    pub fn temp_ranks_file(&self) -> PathBuf {
        self.root.join("text").join("tempranks.txt")
    }

    /// Legacy global bots file
    pub fn bots_file(&self) -> PathBuf {
        self.root.join("extra").join("bots.json")
    }

    pub fn bots_backup_file(&self) -> PathBuf {
        self.root.join("extra").join("bots.json.bak")
    }

    pub fn bots_dir(&self) -> PathBuf {
        self.root.join("extra").join("bots")
    }

    /// Per-level bots file
    pub fn level_bots_file(&self, level: &str) -> PathBuf {
        self.bots_dir().join(format!("{}.json", level))
    }

    /// Database path, honouring an override (relative overrides hang off the root)
    pub fn database_path(&self, configured: Option<&Path>) -> PathBuf {
        match configured {
            Some(path) if path.is_absolute() => path.to_path_buf(),
            Some(path) => self.root.join(path),
            None => self.root.join(DEFAULT_DATABASE_FILE),
        }
    }
}
