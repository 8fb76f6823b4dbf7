// src/ingest/mod.rs
pub mod csv;
pub mod json;
pub mod pdf;
pub mod pptx;

use std::path::Path;

use crate::error::PipelineError;
use crate::process::DataProcessor;
use crate::types::FormatTag;

/// Loads one document per instance; `load` must complete before a processor
/// can be derived. Instances are not reusable across loads.
pub trait DataIngestor {
    fn tag(&self) -> FormatTag;

    /// Reads and parses the source at `location` into the format's native
    /// raw structure. Malformed input or an unreadable path surfaces as
    /// `PipelineError::Ingestion` wrapping the cause — never an empty
    /// substitute.
    fn load(&mut self, location: &Path) -> Result<(), PipelineError>;

    /// Derives a processor bound to the loaded raw document.
    fn create_processor(&self) -> Result<Box<dyn DataProcessor>, PipelineError>;
}

impl std::fmt::Debug for dyn DataIngestor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataIngestor").field("tag", &self.tag()).finish()
    }
}

/// Static registry from format tag to ingestion strategy.
pub fn create_ingestor(tag: FormatTag) -> Box<dyn DataIngestor> {
    match tag {
        FormatTag::Json => Box::new(json::JsonIngestor::default()),
        FormatTag::Csv => Box::new(csv::CsvIngestor::default()),
        FormatTag::Pdf => Box::new(pdf::PdfIngestor::default()),
        FormatTag::Pptx => Box::new(pptx::PptxIngestor::default()),
    }
}

/// String-tag variant of the factory; unknown tags fail with
/// `UnsupportedFormat` naming the offending tag.
pub fn create_ingestor_for(tag: &str) -> Result<Box<dyn DataIngestor>, PipelineError> {
    Ok(create_ingestor(tag.parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_covers_every_tag() {
        for tag in FormatTag::ALL {
            assert_eq!(create_ingestor(tag).tag(), tag);
            assert_eq!(create_ingestor_for(tag.as_str()).unwrap().tag(), tag);
        }
    }

    #[test]
    fn factory_rejects_unknown_tag_by_name() {
        let err = create_ingestor_for("docx").unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFormat(ref t) if t == "docx"));
    }

    #[test]
    fn processor_before_load_is_a_state_error() {
        let ingestor = create_ingestor(FormatTag::Json);
        let err = ingestor.create_processor().unwrap_err();
        assert!(matches!(err, PipelineError::State(_)));
    }

    #[test]
    fn missing_file_surfaces_as_ingestion_error() {
        let mut ingestor = create_ingestor(FormatTag::Csv);
        let err = ingestor.load(Path::new("no/such/file.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::Ingestion { .. }));
    }
}
