// src/ingest/csv.rs
use std::path::Path;

use anyhow::Context;

use crate::error::PipelineError;
use crate::ingest::DataIngestor;
use crate::process::csv::CsvProcessor;
use crate::process::DataProcessor;
use crate::types::{FormatTag, RawTable};

#[derive(Default)]
pub struct CsvIngestor {
    data: Option<RawTable>,
}

impl DataIngestor for CsvIngestor {
    fn tag(&self) -> FormatTag {
        FormatTag::Csv
    }

    fn load(&mut self, location: &Path) -> Result<(), PipelineError> {
        let load = || -> anyhow::Result<RawTable> {
            let mut reader = csv::Reader::from_path(location)
                .with_context(|| format!("opening {}", location.display()))?;
            let headers: Vec<String> = reader
                .headers()
                .context("reading csv headers")?
                .iter()
                .map(str::to_string)
                .collect();
            let mut rows = Vec::new();
            for record in reader.records() {
                let record = record.context("reading csv record")?;
                rows.push(record.iter().map(str::to_string).collect());
            }
            Ok(RawTable { headers, rows })
        };
        self.data = Some(load().map_err(|e| PipelineError::ingestion(location, e))?);
        Ok(())
    }

    fn create_processor(&self) -> Result<Box<dyn DataProcessor>, PipelineError> {
        let data = self
            .data
            .clone()
            .ok_or_else(|| PipelineError::state("csv ingestor has no loaded document"))?;
        Ok(Box::new(CsvProcessor::new(data)))
    }
}
