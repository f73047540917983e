//! TOML configuration: a `[simulation]` table (with `[simulation.layout]`)
//! and a `[reading]` table. Missing keys fall back to the core defaults.

use std::path::{Path, PathBuf};
use std::{env, fs};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tfviz_core::{ReadingConfig, SimConfig};

pub const CONFIG_ENV: &str = "TFVIZ_CONFIG";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub simulation: SimConfig,
    pub reading: ReadingConfig,
}

impl AppConfig {
    /// Pin both RNGs to `seed`.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        if let Some(seed) = seed {
            self.simulation.seed = Some(seed);
            self.reading.seed = Some(seed);
        }
        self
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config")
    }
}

/// Config file location. Priority: explicit flag > TFVIZ_CONFIG env > none.
pub fn resolve_path(flag: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = flag {
        return Some(path.to_path_buf());
    }
    env::var(CONFIG_ENV)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    toml::from_str(content).context("failed to parse config")
}

/// Load the config at the resolved path, or the defaults when there is none.
pub fn load(flag: Option<&Path>) -> Result<AppConfig> {
    let Some(path) = resolve_path(flag) else {
        tracing::debug!("no config file, using defaults");
        return Ok(AppConfig::default());
    };
    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = parse(&content).with_context(|| format!("in {}", path.display()))?;
    tracing::info!("loaded config from {}", path.display());
    Ok(config)
}
