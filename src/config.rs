//! Configuration for the board CLI, read from `portal-board.toml`.
//!
//! Layered file → environment → CLI. Every field has a default, so a missing
//! file or a partial file is fine.
//!
//! # Configuration File Format
//!
//! ```toml
//! [logging]
//! level = "info"
//! format = "pretty"
//!
//! [persistence]
//! rollback_on_failure = false
//! cards_path = "cards.json"
//! ```
//!
//! Board semantics (the three columns and the status table) are fixed and
//! not configurable.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::board::RollbackPolicy;

pub const CONFIG_FILE: &str = "portal-board.toml";
pub const ENV_LOG_LEVEL: &str = "PORTAL_BOARD_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "PORTAL_BOARD_LOG_FORMAT";

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!("Invalid log format '{}'. Valid values: pretty, json", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Move a card back when its status change fails to persist
    #[serde(default)]
    pub rollback_on_failure: bool,
    /// Card file used when `--cards` is not given
    #[serde(default = "default_cards_path")]
    pub cards_path: PathBuf,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            rollback_on_failure: false,
            cards_path: default_cards_path(),
        }
    }
}

fn default_cards_path() -> PathBuf {
    PathBuf::from("cards.json")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

impl PortalConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse portal-board.toml")
    }

    /// Load `path`, or defaults if the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).context("Failed to serialize portal-board.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Apply `PORTAL_BOARD_*` environment overrides.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.is_empty()) {
            self.logging.level = level;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT).filter(|v| !v.is_empty()) {
            self.logging.format = format
                .parse()
                .with_context(|| format!("Invalid {}", ENV_LOG_FORMAT))?;
        }
        Ok(())
    }

    pub fn rollback_policy(&self) -> RollbackPolicy {
        if self.persistence.rollback_on_failure {
            RollbackPolicy::Revert
        } else {
            RollbackPolicy::Keep
        }
    }
}
