// src/process/mod.rs
pub mod csv;
pub mod json;
pub mod pdf;
pub mod pptx;

use chrono::NaiveDate;

use crate::error::PipelineError;
use crate::record::ProcessedRecord;
use crate::types::FormatTag;

/// Transforms a raw document into the cleaned, renamed, and joined record
/// set for its format.
pub trait DataProcessor {
    fn tag(&self) -> FormatTag;
    fn process(&self) -> Result<ProcessedRecord, PipelineError>;
}

impl std::fmt::Debug for dyn DataProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataProcessor").field("tag", &self.tag()).finish()
    }
}

/// Best-effort numeric coercion: strips thousands separators, returns `None`
/// for empty or non-numeric cells.
pub(crate) fn parse_currency(cell: &str) -> Option<f64> {
    let cleaned = cell.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Dates arrive as `2023-01-05` or `01/05/2023` depending on the source.
pub(crate) fn parse_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    NaiveDate::parse_from_str(cell, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(cell, "%m/%d/%Y"))
        .ok()
}
