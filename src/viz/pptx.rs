// src/viz/pptx.rs
use crate::error::PipelineError;
use crate::record::DeckReport;
use crate::viz::{ChartKind, ChartSpec, DataPoint, Series, Visualization};

pub struct PptxVisualization {
    report: DeckReport,
}

impl PptxVisualization {
    pub fn new(report: &DeckReport) -> Self {
        Self {
            report: report.clone(),
        }
    }

    /// Key/value table of the deck's headline metrics.
    pub fn annual_summary(&self) -> ChartSpec {
        let highlights = &self.report.annual_summary.key_highlights;
        let mut points = Vec::new();
        points.push(match highlights.total_revenue {
            Some(v) => DataPoint::num("Total Revenue (in $)", v),
            None => DataPoint::missing("Total Revenue (in $)"),
        });
        points.push(match highlights.total_memberships {
            Some(v) => DataPoint::num("Total Memberships Sold", v as f64),
            None => DataPoint::missing("Total Memberships Sold"),
        });
        points.push(match &highlights.top_location {
            Some(location) => DataPoint::text("Top Location", location),
            None => DataPoint::missing("Top Location"),
        });
        ChartSpec {
            title: "FitPro: Annual Summary 2023 - Key Highlights".into(),
            kind: ChartKind::Table,
            x_label: "Metric".into(),
            y_label: "Value".into(),
            series: vec![Series {
                name: "Key Highlights".into(),
                points,
            }],
        }
    }

    fn quarterly_line(&self, title: &str, y_label: &str, value: impl Fn(&crate::record::QuarterMetrics) -> Option<f64>) -> ChartSpec {
        let points = self
            .report
            .quarterly_metrics
            .iter()
            .map(|(quarter, metrics)| match value(metrics) {
                Some(v) => DataPoint::num(quarter, v),
                None => DataPoint::missing(quarter),
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

    pub fn revenue_by_quarter(&self) -> ChartSpec {
        self.quarterly_line("Revenue by Quarter", "Revenue ($)", |m| m.revenue)
    }

    pub fn memberships_sold_by_quarter(&self) -> ChartSpec {
        self.quarterly_line("Memberships Sold by Quarter", "Memberships Sold", |m| {
            m.memberships_sold.map(|v| v as f64)
        })
    }

    pub fn avg_duration_by_quarter(&self) -> ChartSpec {
        self.quarterly_line(
            "Average Duration (Minutes) by Quarter",
            "Avg Duration (Minutes)",
            |m| m.avg_duration_minutes.map(|v| v as f64),
        )
    }

    /// Percentage shares per activity, pie-shaped.
    pub fn revenue_distribution(&self) -> ChartSpec {
        let distribution = &self.report.revenue_breakdown.revenue_distribution;
        let activities = [
            ("Gym", distribution.gym),
            ("Pool", distribution.pool),
            ("Tennis Court", distribution.tennis_court),
            ("Personal Training", distribution.personal_training),
        ];
        let points = activities
            .into_iter()
            .map(|(activity, share)| match share {
                Some(v) => DataPoint::num(activity, v),
                None => DataPoint::missing(activity),
            })
            .collect();
        ChartSpec {
            title: "Revenue Breakdown by Activity".into(),
            kind: ChartKind::Pie,
            x_label: "Activity".into(),
            y_label: "Revenue Percentage".into(),
            series: vec![Series {
                name: "Revenue Distribution".into(),
                points,
            }],
        }
    }
}

impl Visualization for PptxVisualization {
    fn charts(&self) -> Result<Vec<ChartSpec>, PipelineError> {
        Ok(vec![
            self.annual_summary(),
            self.avg_duration_by_quarter(),
            self.memberships_sold_by_quarter(),
            self.revenue_by_quarter(),
            self.revenue_distribution(),
        ])
    }
}
