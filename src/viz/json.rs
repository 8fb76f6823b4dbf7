// src/viz/json.rs
//
// Re-flattens the nested company record into companies and employees tables,
// re-attaching the employee→company foreign key the processor stripped. This
// is the chart-side reshaping, independent of the processing flatten.

use crate::error::PipelineError;
use crate::record::CompanyRecord;
use crate::viz::{group_mean, top_n, ChartKind, ChartSpec, DataPoint, Series, Visualization};

#[derive(Debug, Clone)]
pub struct FlatEmployee {
    pub company_id: i64,
    pub company_name: String,
    pub employee_name: String,
    pub role: String,
    pub cash_money: Option<f64>,
}

pub struct JsonVisualization {
    companies: Vec<(i64, String)>,
    employees: Vec<FlatEmployee>,
}

impl JsonVisualization {
    pub fn new(companies: &[CompanyRecord]) -> Self {
        let index = companies
            .iter()
            .map(|c| (c.company_id, c.company_name.clone()))
            .collect();
        let employees = companies
            .iter()
            .flat_map(|company| {
                company.employees.iter().map(|e| FlatEmployee {
                    company_id: company.company_id,
                    company_name: company.company_name.clone(),
                    employee_name: e.employee_name.clone(),
                    role: e.role.clone(),
                    cash_money: e.cash_money,
                })
            })
            .collect();
        Self {
            companies: index,
            employees,
        }
    }

    /// One series per company id; each point is one employee's salary. The
    /// filter name resolves to company ids first, so two companies sharing a
    /// name both match and still chart as separate series.
    pub fn salary_distribution_by_company(&self, company_filter: Option<&str>) -> ChartSpec {
        let selected: Option<Vec<i64>> = company_filter.map(|name| {
            self.companies
                .iter()
                .filter(|(_, n)| n == name)
                .map(|(id, _)| *id)
                .collect()
        });
        let mut series: Vec<(i64, Series)> = Vec::new();
        for employee in &self.employees {
            if let Some(ids) = &selected {
                if !ids.contains(&employee.company_id) {
                    continue;
                }
            }
            let point = match employee.cash_money {
                Some(salary) => DataPoint::num(&employee.employee_name, salary),
                None => DataPoint::missing(&employee.employee_name),
            };
            match series.iter_mut().find(|(id, _)| *id == employee.company_id) {
                Some((_, existing)) => existing.points.push(point),
                None => series.push((
                    employee.company_id,
                    Series {
                        name: employee.company_name.clone(),
                        points: vec![point],
                    },
                )),
            }
        }
        ChartSpec {
            title: "Salary Distribution by Company".into(),
            kind: ChartKind::Box,
            x_label: "Company".into(),
            y_label: "Salary (in $)".into(),
            series: series.into_iter().map(|(_, s)| s).collect(),
        }
    }

    /// Mean salary per role, sorted by value and truncated to the top `n`.
    pub fn roles_by_average_salary(&self, ascending: bool, n: usize) -> ChartSpec {
        let points = group_mean(
            self.employees
                .iter()
                .filter_map(|e| e.cash_money.map(|salary| (e.role.as_str(), salary))),
        );
        ChartSpec {
            title: "Top Roles by Average Salary".into(),
            kind: ChartKind::Bar,
            x_label: "Average Salary (in $)".into(),
            y_label: "Role".into(),
            series: vec![Series {
                name: "Cash_Money".into(),
                points: top_n(points, n, ascending),
            }],
        }
    }
}

impl Visualization for JsonVisualization {
    fn charts(&self) -> Result<Vec<ChartSpec>, PipelineError> {
        Ok(vec![
            self.salary_distribution_by_company(None),
            self.roles_by_average_salary(false, 10),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::EmployeeRecord;

    fn company(id: i64, name: &str, salaries: &[(&str, &str, f64)]) -> CompanyRecord {
        CompanyRecord {
            company_id: id,
            company_name: name.into(),
            industry: "Fitness".into(),
            revenue: Some(1.0),
            location: "Here".into(),
            employees: salaries
                .iter()
                .enumerate()
                .map(|(i, (employee, role, salary))| EmployeeRecord {
                    employee_id: i as i64,
                    employee_name: (*employee).into(),
                    role: (*role).into(),
                    cash_money: Some(*salary),
                    hired_date: None,
                    company_name: name.into(),
                })
                .collect(),
            performance: vec![],
        }
    }

    fn viz() -> JsonVisualization {
        JsonVisualization::new(&[
            company(1, "IronWorks", &[("Ana", "A", 10.0), ("Ben", "B", 30.0)]),
            company(2, "AquaFit", &[("Cleo", "C", 20.0)]),
        ])
    }

    #[test]
    fn reflattening_reattaches_the_company_key() {
        let viz = viz();
        assert_eq!(viz.employees.len(), 3);
        assert!(viz.employees.iter().any(|e| e.company_id == 2 && e.employee_name == "Cleo"));
    }

    #[test]
    fn top_two_roles_descending_then_ascending() {
        let viz = viz();
        let desc = viz.roles_by_average_salary(false, 2);
        let labels: Vec<&str> = desc.series[0].points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["B", "A"]);

        let asc = viz.roles_by_average_salary(true, 2);
        let labels: Vec<&str> = asc.series[0].points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "C"]);
    }

    #[test]
    fn company_filter_limits_the_distribution() {
        let viz = viz();
        let all = viz.salary_distribution_by_company(None);
        assert_eq!(all.series.len(), 2);

        let filtered = viz.salary_distribution_by_company(Some("AquaFit"));
        assert_eq!(filtered.series.len(), 1);
        assert_eq!(filtered.series[0].name, "AquaFit");
        assert_eq!(filtered.series[0].points.len(), 1);
    }

    #[test]
    fn same_named_companies_filter_by_id_and_chart_separately() {
        // Two distinct franchises sharing a name: the filter resolves to
        // both ids, and each keeps its own series.
        let viz = JsonVisualization::new(&[
            company(1, "FitPro", &[("Ana", "A", 10.0)]),
            company(2, "FitPro", &[("Ben", "B", 20.0)]),
            company(3, "AquaFit", &[("Cleo", "C", 30.0)]),
        ]);
        let filtered = viz.salary_distribution_by_company(Some("FitPro"));
        assert_eq!(filtered.series.len(), 2);
        assert_eq!(filtered.series[0].points[0].label, "Ana");
        assert_eq!(filtered.series[1].points[0].label, "Ben");
    }
}
