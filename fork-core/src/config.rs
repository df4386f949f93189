//! Fork rule configuration
//!
//! Sources, lowest precedence first: compiled defaults, an optional TOML file,
//! `FORK_` environment variables (`FORK_PARAMS__FORK_TIME=...`).

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::consensus::activation::ForkParams;
use crate::consensus::poison::{install_poison_pattern, PoisonPattern, DEFAULT_POISON_PATTERN};
use crate::error::ForkRuleError;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ForkConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ForkRuleError),

    #[error("Failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Replay-protection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Marker bytes as hex
    pub marker_hex: String,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            marker_hex: hex::encode(DEFAULT_POISON_PATTERN),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `fork_core=debug`
    pub level: String,
    /// Append log output to this file instead of stdout
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForkConfig {
    pub params: ForkParams,
    pub replay: ReplayConfig,
    pub logging: LoggingConfig,
}

impl ForkConfig {
    /// Load defaults, then `path` if given, then the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ForkConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = path {
            info!("Loading configuration from: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        // No `try_parsing`: `replay.marker_hex` must reach serde as the exact string
        builder = builder.add_source(
            Environment::with_prefix("FORK")
                .prefix_separator("_")
                .separator("__"),
        );

        let config: ForkConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        info!(
            fork_time = config.params.fork_time,
            min_fork_block_size = config.params.min_fork_block_size,
            fork_excessive_block = config.params.fork_excessive_block,
            "Fork configuration loaded"
        );
        Ok(config)
    }

    /// Parse configuration from TOML text (defaults fill missing keys)
    pub fn from_toml_str(text: &str) -> Result<Self, ForkConfigError> {
        let config: ForkConfig = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::from_str(text, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check parameters and the marker decode
    pub fn validate(&self) -> Result<(), ForkRuleError> {
        self.params.validate()?;
        self.poison_pattern()?;
        Ok(())
    }

    /// Marker described by this configuration
    pub fn poison_pattern(&self) -> Result<PoisonPattern, ForkRuleError> {
        PoisonPattern::from_hex(&self.replay.marker_hex)
    }

    /// Install the configured marker as the process-wide one
    pub fn install_poison_pattern(&self) -> Result<(), ForkRuleError> {
        install_poison_pattern(self.poison_pattern()?)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, ForkConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the defaults to `path`, creating parent directories
    pub fn write_default(path: &Path) -> Result<(), ForkConfigError> {
        let text = Self::default().to_toml()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, text)?;
        info!("Created default configuration file at {:?}", path);
        Ok(())
    }
}
