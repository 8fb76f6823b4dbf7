// src/viz/csv.rs
use crate::error::PipelineError;
use crate::record::MembershipRow;
use crate::viz::{group_mean, group_sum, ChartKind, ChartSpec, Series, Visualization};

pub struct CsvVisualization {
    rows: Vec<MembershipRow>,
}

impl CsvVisualization {
    pub fn new(rows: &[MembershipRow]) -> Self {
        Self { rows: rows.to_vec() }
    }

    pub fn average_revenue_by_membership_type(&self) -> ChartSpec {
        let points = group_mean(
            self.rows
                .iter()
                .map(|r| (r.membership_type.as_str(), r.revenue)),
        );
        ChartSpec {
            title: "Average Revenue by Membership Type".into(),
            kind: ChartKind::Bar,
            x_label: "Membership Type".into(),
            y_label: "Average Revenue (in $)".into(),
            series: vec![Series {
                name: "Revenue (in $)".into(),
                points,
            }],
        }
    }

    pub fn total_revenue_by_location(&self) -> ChartSpec {
        let points = group_sum(self.rows.iter().map(|r| (r.location.as_str(), r.revenue)));
        ChartSpec {
            title: "Total Revenue by Location".into(),
            kind: ChartKind::Bar,
            x_label: "Location".into(),
            y_label: "Total Revenue (in $)".into(),
            series: vec![Series {
                name: "Revenue (in $)".into(),
                points,
            }],
        }
    }

    pub fn total_revenue_by_activity(&self) -> ChartSpec {
        let points = group_sum(self.rows.iter().map(|r| (r.activity.as_str(), r.revenue)));
        ChartSpec {
            title: "Total Revenue by Activity".into(),
            kind: ChartKind::Bar,
            x_label: "Activity".into(),
            y_label: "Total Revenue (in $)".into(),
            series: vec![Series {
                name: "Revenue (in $)".into(),
                points,
            }],
        }
    }
}

impl Visualization for CsvVisualization {
    fn charts(&self) -> Result<Vec<ChartSpec>, PipelineError> {
        Ok(vec![
            self.average_revenue_by_membership_type(),
            self.total_revenue_by_location(),
            self.total_revenue_by_activity(),
        ])
    }
}
