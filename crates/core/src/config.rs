//! TOML-based configuration system for Gantry.

use crate::error::{GantryError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level Gantry configuration, deserialized from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GantryConfig {
    pub gantry: GantrySection,
}

/// Core Gantry instance settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GantrySection {
    pub instance_name: String,
    pub data_dir: String,
    #[serde(default)]
    pub usage_stats: UsageStatsConfig,
}

/// Anonymous usage-statistics reporting configuration.
///
/// Enabled by default; operators opt out by setting `enabled = false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageStatsConfig {
    #[serde(default = "default_usage_stats_enabled")]
    pub enabled: bool,
}

impl Default for UsageStatsConfig {
    fn default() -> Self {
        Self {
            enabled: default_usage_stats_enabled(),
        }
    }
}

fn default_usage_stats_enabled() -> bool {
    true
}

impl GantryConfig {
    /// Load configuration from a TOML file at the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| GantryError::Config(format!("failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Validate the configuration, returning an error for invalid combinations.
    pub fn validate(&self) -> Result<()> {
        if self.gantry.instance_name.is_empty() {
            return Err(GantryError::Config(
                "gantry.instance_name must not be empty".into(),
            ));
        }

        if self.gantry.data_dir.is_empty() {
            return Err(GantryError::Config(
                "gantry.data_dir must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Generate a sensible default configuration.
    pub fn generate_default() -> Self {
        Self {
            gantry: GantrySection {
                instance_name: "My Build Farm".into(),
                data_dir: "/var/lib/gantry".into(),
                usage_stats: UsageStatsConfig::default(),
            },
        }
    }
}
