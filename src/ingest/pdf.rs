// src/ingest/pdf.rs
use std::path::Path;

use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::PipelineError;
use crate::ingest::DataIngestor;
use crate::process::pdf::PdfProcessor;
use crate::process::DataProcessor;
use crate::types::{FormatTag, RawTable};

#[derive(Default)]
pub struct PdfIngestor {
    data: Option<RawTable>,
}

impl DataIngestor for PdfIngestor {
    fn tag(&self) -> FormatTag {
        FormatTag::Pdf
    }

    fn load(&mut self, location: &Path) -> Result<(), PipelineError> {
        let load = || -> anyhow::Result<RawTable> {
            let text = pdf_extract::extract_text(location)
                .with_context(|| format!("extracting text from {}", location.display()))?;
            if let Ok(doc) = lopdf::Document::load(location) {
                tracing::debug!(pages = doc.get_pages().len(), "loaded pdf");
            }
            parse_text_table(&text)
        };
        self.data = Some(load().map_err(|e| PipelineError::ingestion(location, e))?);
        Ok(())
    }

    fn create_processor(&self) -> Result<Box<dyn DataProcessor>, PipelineError> {
        let data = self
            .data
            .clone()
            .ok_or_else(|| PipelineError::state("pdf ingestor has no loaded document"))?;
        Ok(Box::new(PdfProcessor::new(data)))
    }
}

/// Reassembles the report table from extracted page text. Fixed-layout
/// contract: the first line that splits into 2+ cells on runs of spaces is
/// the header; data rows are whitespace-separated and must match the header
/// width. Mismatched lines (page furniture, footers) are skipped.
pub(crate) fn parse_text_table(text: &str) -> anyhow::Result<RawTable> {
    static RE_HEADER_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

    let mut headers: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if headers.is_empty() {
            let cells: Vec<String> = RE_HEADER_SPLIT
                .split(line)
                .map(str::to_string)
                .collect();
            if cells.len() >= 2 {
                headers = cells;
            }
            continue;
        }
        let cells: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        if cells.len() == headers.len() {
            rows.push(cells);
        } else {
            tracing::warn!(line, "skipping line not matching the table layout");
        }
    }

    anyhow::ensure!(
        !headers.is_empty(),
        "no table header found in extracted pdf text"
    );
    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_aligned_rows() {
        let text = "\
Quarterly Report

Year  Quarter  Revenue (in $)  Memberships Sold
2023 Q1 1,234.50 120
2023 Q2 2,000.00 140
Page 1
";
        let table = parse_text_table(text).unwrap();
        assert_eq!(
            table.headers,
            vec!["Year", "Quarter", "Revenue (in $)", "Memberships Sold"]
        );
        assert_eq!(table.rows.len(), 2, "the footer line is skipped");
        assert_eq!(table.rows[0], vec!["2023", "Q1", "1,234.50", "120"]);
    }

    #[test]
    fn fails_without_a_header() {
        assert!(parse_text_table("just prose\n").is_err());
        assert!(parse_text_table("").is_err());
    }
}
