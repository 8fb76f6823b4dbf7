// src/process/pdf.rs
use std::collections::BTreeMap;

use crate::error::PipelineError;
use crate::process::{parse_currency, DataProcessor};
use crate::record::{ProcessedRecord, QuarterlyRow};
use crate::stats;
use crate::types::{FormatTag, RawTable};

const KNOWN_COLUMNS: [&str; 4] = ["Year", "Quarter", "Revenue (in $)", "Memberships Sold"];

/// Derives the composite `{Year}_{Quarter}` field, drops `Year`, coerces the
/// comma-grouped revenue string to a float, and median-imputes revenue cells
/// that failed to parse.
pub struct PdfProcessor {
    data: RawTable,
}

impl PdfProcessor {
    pub fn new(data: RawTable) -> Self {
        Self { data }
    }
}

impl DataProcessor for PdfProcessor {
    fn tag(&self) -> FormatTag {
        FormatTag::Pdf
    }

    fn process(&self) -> Result<ProcessedRecord, PipelineError> {
        let idx_year = self
            .data
            .column("Year")
            .ok_or_else(|| PipelineError::processing("pdf table missing 'Year' column"))?;
        let idx_quarter = self
            .data
            .column("Quarter")
            .ok_or_else(|| PipelineError::processing("pdf table missing 'Quarter' column"))?;
        let idx_revenue = self.data.column("Revenue (in $)").ok_or_else(|| {
            PipelineError::processing("pdf table missing 'Revenue (in $)' column")
        })?;
        let idx_memberships = self.data.column("Memberships Sold");

        let passthrough: Vec<usize> = (0..self.data.headers.len())
            .filter(|i| !KNOWN_COLUMNS.contains(&self.data.headers[*i].as_str()))
            .collect();

        let mut rows = Vec::with_capacity(self.data.rows.len());
        let mut revenue_column = Vec::with_capacity(self.data.rows.len());
        for cells in &self.data.rows {
            let year = cells.get(idx_year).map(String::as_str).unwrap_or_default();
            let quarter = cells
                .get(idx_quarter)
                .map(String::as_str)
                .unwrap_or_default();
            revenue_column.push(cells.get(idx_revenue).and_then(|c| parse_currency(c)));

            let mut extra = BTreeMap::new();
            for &i in &passthrough {
                let cell = cells.get(i).cloned().unwrap_or_default();
                extra.insert(self.data.headers[i].clone(), serde_json::Value::String(cell));
            }

            rows.push(QuarterlyRow {
                quarter: format!("{year}_{quarter}"),
                revenue: None,
                memberships_sold: idx_memberships
                    .and_then(|i| cells.get(i))
                    .and_then(|c| c.replace(',', "").parse().ok()),
                extra,
            });
        }

        let missing = revenue_column.iter().filter(|v| v.is_none()).count();
        if stats::impute_median(&mut revenue_column).is_none() && missing > 0 {
            tracing::warn!(column = "Revenue (in $)", "column is entirely missing; leaving values null");
        }
        for (row, revenue) in rows.iter_mut().zip(revenue_column) {
            row.revenue = revenue;
        }

        Ok(ProcessedRecord::Pdf(rows))
    }
}
