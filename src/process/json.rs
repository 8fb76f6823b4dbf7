// src/process/json.rs
//
// The company dataset arrives as one nested JSON tree. Processing flattens
// it into companies / employees / performance tables, cleans each (renames
// to the presentation vocabulary, median-imputes missing values), then
// re-nests employees and performance under their owning company by id.

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::PipelineError;
use crate::process::{parse_date, DataProcessor};
use crate::record::{CompanyRecord, EmployeeRecord, PerformanceRecord, ProcessedRecord};
use crate::stats;
use crate::types::FormatTag;

pub struct JsonProcessor {
    data: Value,
}

// Flattened intermediate rows, pre-imputation. The company id stays on every
// row until re-nesting — it is the join key.
struct CompanyRow {
    id: i64,
    name: String,
    industry: String,
    revenue: Option<f64>,
    location: String,
}

struct EmployeeRow {
    company_id: i64,
    company_name: String,
    id: i64,
    name: String,
    role: String,
    cash_money: Option<f64>,
    hired_date: Option<NaiveDate>,
}

struct PerformanceRow {
    company_id: i64,
    quarter: String,
    revenue: Option<f64>,
    profit_margin: Option<f64>,
}

impl JsonProcessor {
    pub fn new(data: Value) -> Self {
        Self { data }
    }

    fn flatten(&self) -> Result<(Vec<CompanyRow>, Vec<EmployeeRow>, Vec<PerformanceRow>), PipelineError> {
        let companies_raw = self
            .data
            .get("companies")
            .and_then(Value::as_array)
            .ok_or_else(|| PipelineError::processing("json document missing 'companies' list"))?;

        let mut companies = Vec::with_capacity(companies_raw.len());
        let mut employees = Vec::new();
        let mut performance = Vec::new();

        for company in companies_raw {
            let id = company
                .get("id")
                .and_then(Value::as_i64)
                .ok_or_else(|| PipelineError::processing("company record missing numeric 'id'"))?;
            let name = str_field(company, "name");

            companies.push(CompanyRow {
                id,
                name: name.clone(),
                industry: str_field(company, "industry"),
                revenue: company.get("revenue").and_then(Value::as_f64),
                location: str_field(company, "location"),
            });

            for employee in company
                .get("employees")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
            {
                employees.push(EmployeeRow {
                    company_id: id,
                    company_name: name.clone(),
                    id: employee.get("id").and_then(Value::as_i64).ok_or_else(|| {
                        PipelineError::processing("employee record missing numeric 'id'")
                    })?,
                    name: str_field(employee, "name"),
                    role: str_field(employee, "role"),
                    cash_money: employee.get("cashmoneh").and_then(Value::as_f64),
                    hired_date: employee
                        .get("hired_date")
                        .and_then(Value::as_str)
                        .and_then(parse_date),
                });
            }

            for (quarter, metrics) in company
                .get("performance")
                .and_then(Value::as_object)
                .into_iter()
                .flatten()
            {
                performance.push(PerformanceRow {
                    company_id: id,
                    quarter: quarter.clone(),
                    revenue: metrics.get("revenue").and_then(Value::as_f64),
                    profit_margin: metrics.get("profit_margin").and_then(Value::as_f64),
                });
            }
        }

        Ok((companies, employees, performance))
    }
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn impute_f64_column<T>(rows: &mut [T], column: &str, get: impl Fn(&T) -> Option<f64>, set: impl Fn(&mut T, Option<f64>)) {
    let mut values: Vec<Option<f64>> = rows.iter().map(&get).collect();
    let missing = values.iter().filter(|v| v.is_none()).count();
    if stats::impute_median(&mut values).is_none() && missing > 0 {
        tracing::warn!(column, "column is entirely missing; leaving values null");
    }
    for (row, value) in rows.iter_mut().zip(values) {
        set(row, value);
    }
}

impl DataProcessor for JsonProcessor {
    fn tag(&self) -> FormatTag {
        FormatTag::Json
    }

    fn process(&self) -> Result<ProcessedRecord, PipelineError> {
        let (mut companies, mut employees, mut performance) = self.flatten()?;

        // Clean: median imputation over each batch column.
        impute_f64_column(&mut companies, "revenue", |c| c.revenue, |c, v| c.revenue = v);
        impute_f64_column(&mut performance, "revenue", |p| p.revenue, |p, v| p.revenue = v);

        let mut hired: Vec<Option<NaiveDate>> = employees.iter().map(|e| e.hired_date).collect();
        let missing = hired.iter().filter(|v| v.is_none()).count();
        if stats::impute_median_date(&mut hired).is_none() && missing > 0 {
            tracing::warn!(column = "hired_date", "column is entirely missing; leaving values null");
        }
        for (employee, date) in employees.iter_mut().zip(hired) {
            employee.hired_date = date;
        }

        // Re-nest by the company id join key; the back-reference is stripped
        // from embedded employees but kept on performance records.
        let records = companies
            .into_iter()
            .map(|company| {
                let nested_employees = employees
                    .iter()
                    .filter(|e| e.company_id == company.id)
                    .map(|e| EmployeeRecord {
                        employee_id: e.id,
                        employee_name: e.name.clone(),
                        role: e.role.clone(),
                        cash_money: e.cash_money,
                        hired_date: e.hired_date,
                        company_name: e.company_name.clone(),
                    })
                    .collect();
                let nested_performance = performance
                    .iter()
                    .filter(|p| p.company_id == company.id)
                    .map(|p| PerformanceRecord {
                        quarter: p.quarter.clone(),
                        revenue: p.revenue,
                        profit_margin: p.profit_margin,
                        company_id: p.company_id,
                    })
                    .collect();
                CompanyRecord {
                    company_id: company.id,
                    company_name: company.name,
                    industry: company.industry,
                    revenue: company.revenue,
                    location: company.location,
                    employees: nested_employees,
                    performance: nested_performance,
                }
            })
            .collect();

        Ok(ProcessedRecord::Json(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture() -> Value {
        json!({
            "companies": [
                {
                    "id": 1, "name": "IronWorks", "industry": "Fitness",
                    "revenue": 100.0, "location": "Austin",
                    "employees": [
                        { "id": 11, "name": "Ana", "role": "Trainer",
                          "cashmoneh": 50000.0, "hired_date": "2020-01-10" },
                        { "id": 12, "name": "Ben", "role": "Manager",
                          "cashmoneh": 70000.0, "hired_date": null }
                    ],
                    "performance": {
                        "2023_Q1": { "revenue": 100.0, "profit_margin": 0.1 },
                        "2023_Q2": { "revenue": null, "profit_margin": 0.2 }
                    }
                },
                {
                    "id": 2, "name": "AquaFit", "industry": "Fitness",
                    "revenue": null, "location": "Boston",
                    "employees": [
                        { "id": 21, "name": "Cleo", "role": "Trainer",
                          "cashmoneh": 52000.0, "hired_date": "2022-06-01" }
                    ],
                    "performance": {
                        "2023_Q1": { "revenue": 400.0, "profit_margin": 0.3 }
                    }
                },
                {
                    "id": 3, "name": "ZenYoga", "industry": "Wellness",
                    "revenue": 200.0, "location": "Denver",
                    "employees": [],
                    "performance": {
                        "2023_Q1": { "revenue": 200.0, "profit_margin": 0.15 }
                    }
                },
                {
                    "id": 4, "name": "PeakClimb", "industry": "Fitness",
                    "revenue": 400.0, "location": "Boulder",
                    "employees": [],
                    "performance": {}
                }
            ]
        })
    }

    fn process_fixture() -> Vec<CompanyRecord> {
        match JsonProcessor::new(fixture()).process().unwrap() {
            ProcessedRecord::Json(records) => records,
            other => panic!("expected json record, got {:?}", other.tag()),
        }
    }

    #[test]
    fn company_revenue_imputed_with_column_median() {
        let records = process_fixture();
        // Non-null revenues [100, 200, 400] → median 200 fills company 2.
        assert_eq!(records[1].company_name, "AquaFit");
        assert_eq!(records[1].revenue, Some(200.0));
        assert_eq!(records[0].revenue, Some(100.0));
    }

    #[test]
    fn performance_revenue_imputed_and_keyed_by_company() {
        let records = process_fixture();
        // Non-null performance revenues [100, 400, 200] → median 200.
        let q2 = records[0]
            .performance
            .iter()
            .find(|p| p.quarter == "2023_Q2")
            .unwrap();
        assert_eq!(q2.revenue, Some(200.0));
        assert_eq!(q2.company_id, 1, "performance keeps the back-reference");
    }

    #[test]
    fn employees_nest_under_their_own_company_only() {
        let records = process_fixture();
        assert_eq!(records[0].employees.len(), 2);
        assert_eq!(records[1].employees.len(), 1);
        assert!(records[2].employees.is_empty());
        for record in &records {
            for employee in &record.employees {
                assert_eq!(employee.company_name, record.company_name);
            }
        }
        // Stripped back-reference: the serialized employee has no Company_Id.
        let value = serde_json::to_value(&records[0].employees[0]).unwrap();
        assert!(value.get("Company_Id").is_none());
        assert!(value.get("Company_Name").is_some());
    }

    #[test]
    fn missing_hired_date_gets_the_median_date() {
        let records = process_fixture();
        // Present dates [2020-01-10, 2022-06-01]; Ben lands on the midpoint.
        let ben = &records[0].employees[1];
        assert_eq!(ben.employee_name, "Ben");
        let date = ben.hired_date.expect("imputed");
        assert!(date > NaiveDate::from_ymd_opt(2020, 1, 10).unwrap());
        assert!(date < NaiveDate::from_ymd_opt(2022, 6, 1).unwrap());
    }

    #[test]
    fn missing_companies_key_is_a_processing_error() {
        let err = JsonProcessor::new(json!({"rows": []})).process().unwrap_err();
        assert!(matches!(err, PipelineError::Processing(_)));
    }

    #[test]
    fn employee_without_numeric_id_is_a_processing_error() {
        // A defaulted id could collide with a real employee's; ids are as
        // mandatory on employees as they are on companies.
        let doc = json!({
            "companies": [{
                "id": 1, "name": "IronWorks", "industry": "Fitness",
                "revenue": 100.0, "location": "Austin",
                "employees": [
                    { "name": "Ana", "role": "Trainer", "cashmoneh": 50000.0 }
                ],
                "performance": {}
            }]
        });
        let err = JsonProcessor::new(doc).process().unwrap_err();
        assert!(matches!(err, PipelineError::Processing(_)));
        assert!(err.to_string().contains("employee"));
    }
}
