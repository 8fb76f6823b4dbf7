// src/process/csv.rs
use std::collections::BTreeMap;

use crate::error::PipelineError;
use crate::process::{parse_currency, parse_date, DataProcessor};
use crate::record::{MembershipRow, ProcessedRecord};
use crate::types::{FormatTag, RawTable};

const KNOWN_COLUMNS: [&str; 5] = ["Date", "Membership_Type", "Location", "Activity", "Revenue"];

/// Parses the date column and renames `Revenue` to its presentation name.
/// No imputation, no joins; unknown columns pass through untouched.
pub struct CsvProcessor {
    data: RawTable,
}

impl CsvProcessor {
    pub fn new(data: RawTable) -> Self {
        Self { data }
    }

    fn require_column(&self, name: &str) -> Result<usize, PipelineError> {
        self.data
            .column(name)
            .ok_or_else(|| PipelineError::processing(format!("csv missing '{name}' column")))
    }
}

impl DataProcessor for CsvProcessor {
    fn tag(&self) -> FormatTag {
        FormatTag::Csv
    }

    fn process(&self) -> Result<ProcessedRecord, PipelineError> {
        let idx_date = self.require_column("Date")?;
        let idx_type = self.require_column("Membership_Type")?;
        let idx_location = self.require_column("Location")?;
        let idx_activity = self.require_column("Activity")?;
        let idx_revenue = self.require_column("Revenue")?;

        let passthrough: Vec<usize> = (0..self.data.headers.len())
            .filter(|i| !KNOWN_COLUMNS.contains(&self.data.headers[*i].as_str()))
            .collect();

        let mut rows = Vec::with_capacity(self.data.rows.len());
        for (line, cells) in self.data.rows.iter().enumerate() {
            let date = cells
                .get(idx_date)
                .and_then(|c| parse_date(c))
                .ok_or_else(|| {
                    PipelineError::processing(format!("csv row {line}: unparseable date"))
                })?;
            let revenue = cells
                .get(idx_revenue)
                .and_then(|c| parse_currency(c))
                .ok_or_else(|| {
                    PipelineError::processing(format!("csv row {line}: unparseable revenue"))
                })?;

            let mut extra = BTreeMap::new();
            for &i in &passthrough {
                let cell = cells.get(i).map(String::as_str).unwrap_or_default();
                let value = match parse_currency(cell) {
                    Some(n) => serde_json::json!(n),
                    None => serde_json::Value::String(cell.to_string()),
                };
                extra.insert(self.data.headers[i].clone(), value);
            }

            rows.push(MembershipRow {
                date,
                membership_type: cells.get(idx_type).cloned().unwrap_or_default(),
                location: cells.get(idx_location).cloned().unwrap_or_default(),
                activity: cells.get(idx_activity).cloned().unwrap_or_default(),
                revenue,
                extra,
            });
        }

        Ok(ProcessedRecord::Csv(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn table() -> RawTable {
        RawTable {
            headers: ["Date", "Membership_Type", "Location", "Activity", "Revenue", "Member_Id"]
                .map(String::from)
                .to_vec(),
            rows: vec![
                ["2023-01-05", "Gold", "Downtown", "Gym", "120.5", "M-1"]
                    .map(String::from)
                    .to_vec(),
                ["2023-01-06", "Silver", "Uptown", "Pool", "80", "M-2"]
                    .map(String::from)
                    .to_vec(),
            ],
        }
    }

    #[test]
    fn date_parsed_and_revenue_renamed() {
        let record = CsvProcessor::new(table()).process().unwrap();
        let ProcessedRecord::Csv(rows) = record else {
            panic!("expected csv record")
        };
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2023, 1, 5).unwrap());
        assert_eq!(rows[0].revenue, 120.5);

        let value = serde_json::to_value(&rows[0]).unwrap();
        assert!(value.get("Revenue (in $)").is_some());
        assert!(value.get("Revenue").is_none(), "old name is gone");
        assert_eq!(value["Member_Id"], "M-1", "unknown columns pass through");
    }

    #[test]
    fn missing_column_is_named_in_the_error() {
        let mut table = table();
        table.headers[4] = "Income".into();
        let err = CsvProcessor::new(table).process().unwrap_err();
        assert!(err.to_string().contains("Revenue"));
    }

    #[test]
    fn garbage_date_fails_instead_of_substituting() {
        let mut table = table();
        table.rows[1][0] = "yesterday".into();
        assert!(CsvProcessor::new(table).process().is_err());
    }
}
