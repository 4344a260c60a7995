use std::path::Path;

use anyhow::{Context, Result};
use mm_core::EngineConfig;
use serde::Deserialize;

/// Contents of `mm.toml`. Every section and key is optional.
#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub analysis: EngineConfig,
}

impl FileConfig {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("invalid config")
    }

    /// Load the config at `explicit`, which must exist, or else
    /// `<data_dir>/config.toml` if that exists, or else defaults.
    pub fn load(explicit: Option<&Path>, data_dir: &Path) -> Result<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let candidate = data_dir.join(mm_store::CONFIG_FILE);
                if !candidate.exists() {
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config =
            Self::parse(&content).with_context(|| format!("in {}", path.display()))?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }
}
