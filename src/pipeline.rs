// src/pipeline.rs
//
// Orchestrator: owns the fixed source list and drives ingest→process for
// each source, collecting results keyed by format tag. Strictly
// all-or-nothing: the first source failure aborts the run.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::ingest::{self, DataIngestor};
use crate::record::ResultsMap;
use crate::types::SourceDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Created,
    Ingested,
    Processed,
}

pub struct DataPipeline {
    sources: Vec<SourceDescriptor>,
    ingestors: Vec<Box<dyn DataIngestor>>,
    results: ResultsMap,
    state: PipelineState,
}

impl DataPipeline {
    pub fn new(config: &PipelineConfig) -> Self {
        Self::with_sources(config.sources())
    }

    pub fn with_sources(sources: Vec<SourceDescriptor>) -> Self {
        Self {
            sources,
            ingestors: Vec::new(),
            results: ResultsMap::default(),
            state: PipelineState::Created,
        }
    }

    /// Loads every source via the factory. Callable exactly once; a repeat
    /// call would append duplicate ingestors, so the lifecycle guard rejects
    /// anything but the `Created` state.
    pub fn ingest(&mut self) -> Result<(), PipelineError> {
        if self.state != PipelineState::Created {
            return Err(PipelineError::state(format!(
                "ingest called in {:?} state",
                self.state
            )));
        }

        let mut ingestors = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            let mut ingestor = ingest::create_ingestor(source.tag);
            ingestor.load(&source.location)?;
            tracing::info!(
                tag = %source.tag,
                location = %source.location.display(),
                "ingested source"
            );
            ingestors.push(ingestor);
        }

        self.ingestors = ingestors;
        self.state = PipelineState::Ingested;
        Ok(())
    }

    /// Derives a processor from each ingestor and collects results keyed by
    /// the processor's format tag. Requires a completed `ingest()`.
    pub fn process(&mut self) -> Result<(), PipelineError> {
        if self.state != PipelineState::Ingested {
            return Err(PipelineError::state(format!(
                "process called in {:?} state; ingest must complete first",
                self.state
            )));
        }

        for ingestor in &self.ingestors {
            let processor = ingestor.create_processor()?;
            let record = processor.process()?;
            let tag = processor.tag();
            if self.results.insert(tag, record).is_some() {
                // Should not occur with the fixed source list; keep the
                // later result rather than failing.
                tracing::warn!(%tag, "duplicate source tag, last write wins");
            }
            tracing::info!(%tag, "processed source");
        }

        self.state = PipelineState::Processed;
        Ok(())
    }

    pub fn run(&mut self) -> Result<(), PipelineError> {
        self.ingest()?;
        self.process()
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn results(&self) -> &ResultsMap {
        &self.results
    }

    pub fn into_results(self) -> ResultsMap {
        self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_before_ingest_is_a_state_error() {
        let mut pipeline = DataPipeline::with_sources(vec![]);
        let err = pipeline.process().unwrap_err();
        assert!(matches!(err, PipelineError::State(_)));
        assert_eq!(pipeline.state(), PipelineState::Created);
    }

    #[test]
    fn ingest_twice_is_rejected() {
        let mut pipeline = DataPipeline::with_sources(vec![]);
        pipeline.ingest().unwrap();
        assert_eq!(pipeline.state(), PipelineState::Ingested);
        let err = pipeline.ingest().unwrap_err();
        assert!(matches!(err, PipelineError::State(_)));
    }

    #[test]
    fn empty_source_list_runs_to_processed() {
        let mut pipeline = DataPipeline::with_sources(vec![]);
        pipeline.run().unwrap();
        assert_eq!(pipeline.state(), PipelineState::Processed);
        assert!(pipeline.results().is_empty());
    }
}
