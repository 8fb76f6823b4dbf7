// src/process/pptx.rs
//
// The slide deck carries its numbers in free text and in table shapes.
// Processing concatenates all extractable text into one blob and runs a
// fixed set of named patterns against it, then scans every table whose
// first header cell reads "Quarter" into the pre-seeded quarter buckets.
//
// The patterns and column positions are a versioned contract against the
// deck layout. Drift does not error: a field that stops matching stays
// `None` and is reported by name in the logs.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::PipelineError;
use crate::process::DataProcessor;
use crate::record::{DeckReport, ProcessedRecord};
use crate::types::{FormatTag, SlideDeck};

static REGEX_PATTERNS: Lazy<HashMap<&'static str, Regex>> = Lazy::new(|| {
    [
        ("total_revenue", r"Total Revenue:?\s*\$?([0-9,.]+)"),
        ("total_memberships", r"Total Memberships Sold:?\s*([0-9,.]+)"),
        ("top_location", r"Top Location:?\s*(\w+)"),
        ("gym_revenue", r"Gym:?\s*([0-9,.]+)%?"),
        ("pool_revenue", r"Pool:?\s*([0-9,.]+)%?"),
        ("tennis_revenue", r"Tennis Court:?\s*([0-9,.]+)%?"),
        ("training_revenue", r"Personal Training:?\s*([0-9,.]+)%?"),
    ]
    .into_iter()
    .map(|(name, pattern)| (name, Regex::new(pattern).unwrap()))
    .collect()
});

// Table column positions, after the quarter label in column 0.
const COL_REVENUE: usize = 1;
const COL_MEMBERSHIPS: usize = 2;
const COL_AVG_DURATION: usize = 3;

pub struct PptxProcessor {
    data: SlideDeck,
}

impl PptxProcessor {
    pub fn new(data: SlideDeck) -> Self {
        Self { data }
    }
}

fn extract_raw(text: &str, field: &'static str) -> Option<String> {
    match REGEX_PATTERNS[field].captures(text) {
        Some(captures) => Some(captures[1].trim().to_string()),
        None => {
            tracing::warn!(field, "pattern not found in slide text");
            None
        }
    }
}

/// Numeric match with `%` and thousands separators stripped.
fn extract_number(text: &str, field: &'static str) -> Option<f64> {
    extract_raw(text, field).and_then(|v| v.replace(['%', ','], "").parse().ok())
}

fn parse_cell_f64(cell: Option<&String>) -> Option<f64> {
    cell.and_then(|c| c.replace(',', "").trim().parse().ok())
}

fn parse_cell_i64(cell: Option<&String>) -> Option<i64> {
    cell.and_then(|c| c.replace(',', "").trim().parse().ok())
}

impl DataProcessor for PptxProcessor {
    fn tag(&self) -> FormatTag {
        FormatTag::Pptx
    }

    fn process(&self) -> Result<ProcessedRecord, PipelineError> {
        let text = self.data.combined_text();
        let mut report = DeckReport::with_quarter_buckets();

        let highlights = &mut report.annual_summary.key_highlights;
        highlights.total_revenue = extract_number(&text, "total_revenue");
        highlights.total_memberships =
            extract_number(&text, "total_memberships").map(|v| v as i64);
        highlights.top_location = extract_raw(&text, "top_location");

        let distribution = &mut report.revenue_breakdown.revenue_distribution;
        distribution.gym = extract_number(&text, "gym_revenue");
        distribution.pool = extract_number(&text, "pool_revenue");
        distribution.tennis_court = extract_number(&text, "tennis_revenue");
        distribution.personal_training = extract_number(&text, "training_revenue");

        for table in self.data.slides.iter().flat_map(|s| s.tables.iter()) {
            let is_quarter_table = table
                .cells
                .first()
                .and_then(|header| header.first())
                .is_some_and(|cell| cell.trim() == "Quarter");
            if !is_quarter_table {
                continue;
            }
            for row in table.cells.iter().skip(1) {
                let Some(label) = row.first().map(|c| c.trim().to_string()) else {
                    continue;
                };
                // Rows with labels outside the seeded buckets are ignored.
                let Some(bucket) = report.quarterly_metrics.get_mut(&label) else {
                    continue;
                };
                bucket.revenue = parse_cell_f64(row.get(COL_REVENUE));
                bucket.memberships_sold = parse_cell_i64(row.get(COL_MEMBERSHIPS));
                bucket.avg_duration_minutes = parse_cell_i64(row.get(COL_AVG_DURATION));
            }
        }

        Ok(ProcessedRecord::Pptx(report))
    }
}
