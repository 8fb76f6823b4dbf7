// src/viz/pdf.rs
use crate::error::PipelineError;
use crate::record::QuarterlyRow;
use crate::viz::{ChartKind, ChartSpec, DataPoint, Series, Visualization};

pub struct PdfVisualization {
    rows: Vec<QuarterlyRow>,
}

impl PdfVisualization {
    pub fn new(rows: &[QuarterlyRow]) -> Self {
        Self { rows: rows.to_vec() }
    }

    fn line(&self, title: &str, y_label: &str, value: impl Fn(&QuarterlyRow) -> Option<f64>) -> ChartSpec {
        let points = self
            .rows
            .iter()
            .map(|row| match value(row) {
                Some(v) => DataPoint::num(&row.quarter, v),
                None => DataPoint::missing(&row.quarter),
            })
            .collect();
        ChartSpec {
            title: title.into(),
            kind: ChartKind::Line,
            x_label: "Quarter".into(),
            y_label: y_label.into(),
            series: vec![Series {
                name: y_label.into(),
                points,
            }],
        }
    }

    pub fn quarterly_revenue(&self) -> ChartSpec {
        self.line("Quarterly Revenue Over Years", "Revenue (in $)", |r| r.revenue)
    }

    pub fn quarterly_memberships_sold(&self) -> ChartSpec {
        self.line("Quarterly Memberships Sold Over Years", "Memberships Sold", |r| {
            r.memberships_sold.map(|v| v as f64)
        })
    }
}

impl Visualization for PdfVisualization {
    fn charts(&self) -> Result<Vec<ChartSpec>, PipelineError> {
        Ok(vec![self.quarterly_revenue(), self.quarterly_memberships_sold()])
    }
}
