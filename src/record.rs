// src/record.rs
//
// Processed record shapes, one per format, in the presentation vocabulary the
// dashboard and read API consume, plus the results map the pipeline fills.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::types::FormatTag;

/// Employee record as embedded under its company. The `Company_Id`
/// back-reference is stripped before embedding; `Company_Name` stays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    #[serde(rename = "Employee_Id")]
    pub employee_id: i64,
    #[serde(rename = "Employee_Name")]
    pub employee_name: String,
    #[serde(rename = "Role")]
    pub role: String,
    #[serde(rename = "Cash_Money")]
    pub cash_money: Option<f64>,
    #[serde(rename = "Hired_Date")]
    pub hired_date: Option<NaiveDate>,
    #[serde(rename = "Company_Name")]
    pub company_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    #[serde(rename = "Quarter")]
    pub quarter: String,
    #[serde(rename = "Revenue (in $)")]
    pub revenue: Option<f64>,
    #[serde(rename = "Profit_Margin")]
    pub profit_margin: Option<f64>,
    #[serde(rename = "Company_Id")]
    pub company_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    #[serde(rename = "Company_Id")]
    pub company_id: i64,
    #[serde(rename = "Company_Name")]
    pub company_name: String,
    #[serde(rename = "Industry")]
    pub industry: String,
    #[serde(rename = "Revenue")]
    pub revenue: Option<f64>,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Employees")]
    pub employees: Vec<EmployeeRecord>,
    #[serde(rename = "Performance")]
    pub performance: Vec<PerformanceRecord>,
}

/// One CSV row after cleaning: parsed date, renamed revenue, everything else
/// passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Membership_Type")]
    pub membership_type: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Activity")]
    pub activity: String,
    #[serde(rename = "Revenue (in $)")]
    pub revenue: f64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// One PDF table row after cleaning: composite quarter, numeric revenue, no
/// `Year` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyRow {
    #[serde(rename = "Quarter")]
    pub quarter: String,
    #[serde(rename = "Revenue (in $)")]
    pub revenue: Option<f64>,
    #[serde(rename = "Memberships Sold")]
    pub memberships_sold: Option<i64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyHighlights {
    #[serde(rename = "Total Revenue (in $)")]
    pub total_revenue: Option<f64>,
    #[serde(rename = "Total Memberships Sold")]
    pub total_memberships: Option<i64>,
    #[serde(rename = "Top Location")]
    pub top_location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnualSummary {
    #[serde(rename = "Key Highlights")]
    pub key_highlights: KeyHighlights,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueDistribution {
    #[serde(rename = "Gym")]
    pub gym: Option<f64>,
    #[serde(rename = "Pool")]
    pub pool: Option<f64>,
    #[serde(rename = "Tennis Court")]
    pub tennis_court: Option<f64>,
    #[serde(rename = "Personal Training")]
    pub personal_training: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueBreakdown {
    #[serde(rename = "Revenue Distribution")]
    pub revenue_distribution: RevenueDistribution,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuarterMetrics {
    #[serde(rename = "Revenue")]
    pub revenue: Option<f64>,
    #[serde(rename = "Memberships Sold")]
    pub memberships_sold: Option<i64>,
    #[serde(rename = "Avg Duration (Minutes)")]
    pub avg_duration_minutes: Option<i64>,
}

/// Everything pulled out of the slide deck, serialized under the deck's own
/// section titles so the dashboard sees the layout it expects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckReport {
    #[serde(rename = "FitPro: Annual Summary 2023")]
    pub annual_summary: AnnualSummary,
    #[serde(rename = "Revenue Breakdown by Activity")]
    pub revenue_breakdown: RevenueBreakdown,
    #[serde(rename = "Quarterly Metrics")]
    pub quarterly_metrics: BTreeMap<String, QuarterMetrics>,
}

impl DeckReport {
    /// Pre-seeded quarter buckets; table rows with other labels are ignored.
    pub fn with_quarter_buckets() -> Self {
        let mut report = Self::default();
        for q in ["Q1", "Q2", "Q3", "Q4"] {
            report
                .quarterly_metrics
                .insert(q.to_string(), QuarterMetrics::default());
        }
        report
    }
}

/// Cleaned output of a processing strategy, keyed by format tag in the
/// results map.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessedRecord {
    Json(Vec<CompanyRecord>),
    Csv(Vec<MembershipRow>),
    Pdf(Vec<QuarterlyRow>),
    Pptx(DeckReport),
}

impl ProcessedRecord {
    pub fn tag(&self) -> FormatTag {
        match self {
            ProcessedRecord::Json(_) => FormatTag::Json,
            ProcessedRecord::Csv(_) => FormatTag::Csv,
            ProcessedRecord::Pdf(_) => FormatTag::Pdf,
            ProcessedRecord::Pptx(_) => FormatTag::Pptx,
        }
    }
}

impl Serialize for ProcessedRecord {
    /// Wire shape: the JSON record is wrapped as `{"json_data": [...]}`; the
    /// other formats serialize as-is.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ProcessedRecord::Json(companies) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("json_data", companies)?;
                map.end()
            }
            ProcessedRecord::Csv(rows) => rows.serialize(serializer),
            ProcessedRecord::Pdf(rows) => rows.serialize(serializer),
            ProcessedRecord::Pptx(report) => report.serialize(serializer),
        }
    }
}

/// Format tag → processed record. Append-only while the pipeline runs,
/// read-only for the rest of the process lifetime.
#[derive(Debug, Default)]
pub struct ResultsMap {
    inner: HashMap<FormatTag, ProcessedRecord>,
}

impl ResultsMap {
    /// Inserts a result, returning the previous record if the tag was
    /// already present (last write wins).
    pub fn insert(&mut self, tag: FormatTag, record: ProcessedRecord) -> Option<ProcessedRecord> {
        self.inner.insert(tag, record)
    }

    pub fn get(&self, tag: FormatTag) -> Option<&ProcessedRecord> {
        self.inner.get(&tag)
    }

    pub fn contains(&self, tag: FormatTag) -> bool {
        self.inner.contains_key(&tag)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_record_serializes_under_json_data_key() {
        let record = ProcessedRecord::Json(vec![]);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, serde_json::json!({ "json_data": [] }));
    }

    #[test]
    fn deck_report_serializes_presentation_keys() {
        let report = DeckReport::with_quarter_buckets();
        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("FitPro: Annual Summary 2023").is_some());
        assert!(value.get("Revenue Breakdown by Activity").is_some());
        let quarters = value.get("Quarterly Metrics").unwrap();
        assert!(quarters.get("Q1").is_some() && quarters.get("Q4").is_some());
        assert_eq!(
            quarters["Q2"]["Revenue"],
            serde_json::Value::Null,
            "unfilled buckets stay null"
        );
    }

    #[test]
    fn results_map_last_write_wins() {
        let mut map = ResultsMap::default();
        assert!(map.insert(FormatTag::Csv, ProcessedRecord::Csv(vec![])).is_none());
        let prev = map.insert(FormatTag::Csv, ProcessedRecord::Csv(vec![]));
        assert!(prev.is_some());
        assert_eq!(map.len(), 1);
    }
}
