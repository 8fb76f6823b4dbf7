// src/ingest/json.rs
use std::fs;
use std::path::Path;

use anyhow::Context;

use crate::error::PipelineError;
use crate::ingest::DataIngestor;
use crate::process::json::JsonProcessor;
use crate::process::DataProcessor;
use crate::types::FormatTag;

#[derive(Default)]
pub struct JsonIngestor {
    data: Option<serde_json::Value>,
}

impl DataIngestor for JsonIngestor {
    fn tag(&self) -> FormatTag {
        FormatTag::Json
    }

    fn load(&mut self, location: &Path) -> Result<(), PipelineError> {
        let load = || -> anyhow::Result<serde_json::Value> {
            let content = fs::read_to_string(location)
                .with_context(|| format!("reading {}", location.display()))?;
            serde_json::from_str(&content).context("parsing json document")
        };
        self.data = Some(load().map_err(|e| PipelineError::ingestion(location, e))?);
        Ok(())
    }

    fn create_processor(&self) -> Result<Box<dyn DataProcessor>, PipelineError> {
        let data = self
            .data
            .clone()
            .ok_or_else(|| PipelineError::state("json ingestor has no loaded document"))?;
        Ok(Box::new(JsonProcessor::new(data)))
    }
}
