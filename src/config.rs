// src/config.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{FormatTag, SourceDescriptor};

pub const ENV_DATASETS_DIR: &str = "FITPRO_DATASETS_DIR";
pub const DEFAULT_CONFIG_PATH: &str = "config/pipeline.toml";
const DEFAULT_DATASETS_DIR: &str = "datasets";

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    pub datasets_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            datasets_dir: PathBuf::from(DEFAULT_DATASETS_DIR),
        }
    }
}

impl PipelineConfig {
    /// Resolution order:
    /// 1) $FITPRO_DATASETS_DIR
    /// 2) config/pipeline.toml
    /// 3) ./datasets
    pub fn load() -> Result<Self> {
        if let Ok(dir) = std::env::var(ENV_DATASETS_DIR) {
            return Ok(Self {
                datasets_dir: PathBuf::from(dir),
            });
        }
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            return Self::from_toml(path);
        }
        Ok(Self::default())
    }

    pub fn from_toml(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading pipeline config from {}", path.display()))?;
        let config: PipelineConfig = toml::from_str(&content)
            .with_context(|| format!("parsing pipeline config {}", path.display()))?;
        Ok(config)
    }

    /// The four fixed sources, one per format, resolved against the
    /// configured datasets directory.
    pub fn sources(&self) -> Vec<SourceDescriptor> {
        vec![
            SourceDescriptor::new(FormatTag::Json, self.datasets_dir.join("dataset1.json")),
            SourceDescriptor::new(FormatTag::Csv, self.datasets_dir.join("dataset2.csv")),
            SourceDescriptor::new(FormatTag::Pdf, self.datasets_dir.join("dataset3.pdf")),
            SourceDescriptor::new(FormatTag::Pptx, self.datasets_dir.join("dataset4.pptx")),
        ]
    }
}
