// src/stats.rs
//
// Batch median helpers used for imputation. Medians are computed once over
// the whole batch after all rows for a source are loaded, never online.

use chrono::NaiveDate;

/// Median with pandas semantics: even counts average the two middle values.
/// Returns `None` for an empty slice.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Median date; even counts take the midpoint of the two middle dates.
pub fn median_date(dates: &[NaiveDate]) -> Option<NaiveDate> {
    if dates.is_empty() {
        return None;
    }
    let mut sorted = dates.to_vec();
    sorted.sort();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        let (a, b) = (sorted[mid - 1], sorted[mid]);
        Some(a + chrono::Duration::days((b - a).num_days() / 2))
    }
}

/// Fills missing entries with the median of the present ones, returning the
/// median used. An all-missing column is left untouched (`None` propagates;
/// the caller decides whether to warn).
pub fn impute_median(column: &mut [Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = column.iter().flatten().copied().collect();
    let m = median(&present)?;
    for v in column.iter_mut() {
        if v.is_none() {
            *v = Some(m);
        }
    }
    Some(m)
}

/// Date variant of [`impute_median`].
pub fn impute_median_date(column: &mut [Option<NaiveDate>]) -> Option<NaiveDate> {
    let present: Vec<NaiveDate> = column.iter().flatten().copied().collect();
    let m = median_date(&present)?;
    for v in column.iter_mut() {
        if v.is_none() {
            *v = Some(m);
        }
    }
    Some(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn median_odd_and_even_counts() {
        assert_eq!(median(&[100.0, 200.0, 400.0]), Some(200.0));
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn median_is_order_independent() {
        assert_eq!(median(&[400.0, 100.0, 200.0]), Some(200.0));
    }

    #[test]
    fn median_date_even_count_takes_midpoint() {
        let dates = [d("2020-01-01"), d("2020-01-11")];
        assert_eq!(median_date(&dates), Some(d("2020-01-06")));
    }

    #[test]
    fn impute_fills_only_missing_values() {
        let mut col = vec![Some(100.0), Some(200.0), None, Some(400.0)];
        assert_eq!(impute_median(&mut col), Some(200.0));
        assert_eq!(col, vec![Some(100.0), Some(200.0), Some(200.0), Some(400.0)]);
    }

    #[test]
    fn impute_leaves_all_missing_column_null() {
        let mut col: Vec<Option<f64>> = vec![None, None];
        assert_eq!(impute_median(&mut col), None);
        assert_eq!(col, vec![None, None]);
    }

    #[test]
    fn impute_dates() {
        let mut col = vec![Some(d("2021-03-01")), None, Some(d("2021-05-01"))];
        // Two present dates, 61 days apart: midpoint is 2021-03-31.
        assert_eq!(impute_median_date(&mut col), Some(d("2021-03-31")));
        assert_eq!(col[1], Some(d("2021-03-31")));
    }
}
