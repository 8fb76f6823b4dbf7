// src/lib.rs
//
// FitPro Insights: a document ETL pipeline that ingests the club's four
// dataset formats (json, csv, pdf, pptx), cleans each one into a typed
// record, and serves the results and their chart data over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod process;
pub mod record;
pub mod stats;
pub mod types;
pub mod viz;

pub use api::{create_router, AppState};
pub use config::PipelineConfig;
pub use error::PipelineError;
pub use pipeline::DataPipeline;
pub use types::{FormatTag, SourceDescriptor};
