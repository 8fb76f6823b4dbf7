// src/viz/mod.rs
//
// Chart-data strategies: each reshapes a processed record into the exact
// tabular layout its charts need and performs the selection/aggregation
// (group-by + mean/sum, sort + top-N, optional filter). Pixel rendering is
// the dashboard's job, not ours.

pub mod csv;
pub mod json;
pub mod pdf;
pub mod pptx;

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::PipelineError;
use crate::record::ProcessedRecord;
use crate::types::FormatTag;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub label: String,
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl DataPoint {
    pub fn num(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value: Some(value),
            text: None,
        }
    }

    pub fn missing(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: None,
            text: None,
        }
    }

    pub fn text(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: None,
            text: Some(text.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<DataPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Box,
    Table,
}

/// Chart data plus labels, deterministic given the same record and
/// parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub kind: ChartKind,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

pub trait Visualization {
    /// The default chart set the dashboard shows for this format.
    fn charts(&self) -> Result<Vec<ChartSpec>, PipelineError>;
}

impl std::fmt::Debug for dyn Visualization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Visualization")
    }
}

/// Maps a format tag and its processed record to the matching strategy.
/// The record shape must match the tag; a mismatch is a processing error.
pub fn create_visualization(
    tag: FormatTag,
    record: &ProcessedRecord,
) -> Result<Box<dyn Visualization>, PipelineError> {
    match (tag, record) {
        (FormatTag::Json, ProcessedRecord::Json(companies)) => {
            Ok(Box::new(json::JsonVisualization::new(companies)))
        }
        (FormatTag::Csv, ProcessedRecord::Csv(rows)) => {
            Ok(Box::new(csv::CsvVisualization::new(rows)))
        }
        (FormatTag::Pdf, ProcessedRecord::Pdf(rows)) => {
            Ok(Box::new(pdf::PdfVisualization::new(rows)))
        }
        (FormatTag::Pptx, ProcessedRecord::Pptx(report)) => {
            Ok(Box::new(pptx::PptxVisualization::new(report)))
        }
        (tag, record) => Err(PipelineError::processing(format!(
            "record of type {} does not match requested visualization {tag}",
            record.tag()
        ))),
    }
}

/// String-tag variant; unknown tags fail with `UnsupportedFormat`.
pub fn create_visualization_for(
    tag: &str,
    record: &ProcessedRecord,
) -> Result<Box<dyn Visualization>, PipelineError> {
    create_visualization(tag.parse()?, record)
}

/// Group-by + mean. Keys come back sorted, one point per group.
pub fn group_mean<'a, I>(pairs: I) -> Vec<DataPoint>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut groups: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for (key, value) in pairs {
        let entry = groups.entry(key.to_string()).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(key, (sum, count))| DataPoint::num(key, sum / count as f64))
        .collect()
}

/// Group-by + sum. Keys come back sorted, one point per group.
pub fn group_sum<'a, I>(pairs: I) -> Vec<DataPoint>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut groups: BTreeMap<String, f64> = BTreeMap::new();
    for (key, value) in pairs {
        *groups.entry(key.to_string()).or_insert(0.0) += value;
    }
    groups
        .into_iter()
        .map(|(key, sum)| DataPoint::num(key, sum))
        .collect()
}

/// Sort by value and truncate to the first `n` points. Points without a
/// value sort to the end.
pub fn top_n(mut points: Vec<DataPoint>, n: usize, ascending: bool) -> Vec<DataPoint> {
    points.sort_by(|a, b| match (a.value, b.value) {
        (Some(av), Some(bv)) => {
            let ord = av.partial_cmp(&bv).unwrap_or(Ordering::Equal);
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    points.truncate(n);
    points
}
