// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Error taxonomy for the ingest→process→visualize pipeline.
///
/// Factories fail fast with `UnsupportedFormat`; the orchestrator propagates
/// everything else unchanged — a failure in any one source aborts the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("unsupported data type: {0}")]
    UnsupportedFormat(String),

    #[error("ingestion failed for {path}: {source}")]
    Ingestion {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("processing failed: {0}")]
    Processing(String),

    #[error("pipeline state error: {0}")]
    State(String),
}

impl PipelineError {
    pub fn ingestion(path: impl Into<PathBuf>, source: impl Into<anyhow::Error>) -> Self {
        Self::Ingestion {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn processing(msg: impl Into<String>) -> Self {
        Self::Processing(msg.into())
    }

    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }
}
