//! Summary tables derived from the filtered transaction set
//!
//! Every aggregator is a pure function over `&[Transaction]` returning a
//! freshly built table. [`Dashboard::build`] applies the date range once and
//! computes all five tables.

pub mod category;
pub mod city;
pub mod monthly;
pub mod rfm;
pub mod state;

pub use category::*;
pub use city::*;
pub use monthly::*;
pub use rfm::*;
pub use state::*;

use serde::Serialize;
use std::thread;
use tracing::{debug, warn};

use crate::parser::Transaction;
use crate::range::DateRange;

/// How many rows the best/worst style views show
pub const DISPLAY_TOP_N: usize = 5;

/// Middle value, or the mean of the two middle values for an even count
pub(crate) fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// All summary tables for one date range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub range: DateRange,
    pub categories: CategoryTable,
    pub monthly: MonthlyTable,
    pub rfm: RfmTable,
    pub states: StateTable,
    pub cities: CityTable,
}

impl Dashboard {
    /// Filter `rows` to `range` and aggregate the result
    pub fn build(rows: &[Transaction], range: DateRange) -> Self {
        let filtered = range.filter(rows);
        debug!(%range, total = rows.len(), kept = filtered.len(), "Applied date range");
        Self::from_filtered(&filtered, range)
    }

    /// Aggregate rows that are already restricted to `range`.
    ///
    /// Category, monthly, RFM and state tables are computed on separate
    /// threads; the city table starts once the state ranking is known.
    pub fn from_filtered(rows: &[Transaction], range: DateRange) -> Self {
        if rows.is_empty() {
            warn!(%range, "No transactions in date range");
        }

        let (categories, monthly, rfm, states, cities) = thread::scope(|s| {
            let categories = s.spawn(|| category_orders(rows));
            let monthly = s.spawn(|| monthly_orders(rows));
            let rfm = s.spawn(|| rfm_table(rows));

            let states = sales_by_state(rows);
            let allowed = states.states();
            let cities = sales_by_city(rows, allowed.as_slice());

            (
                join(categories),
                join(monthly),
                join(rfm),
                states,
                cities,
            )
        });

        debug!(
            categories = categories.len(),
            months = monthly.len(),
            sellers = rfm.len(),
            states = states.len(),
            cities = cities.len(),
            "Aggregated dashboard tables"
        );

        Self {
            range,
            categories,
            monthly,
            rfm,
            states,
            cities,
        }
    }
}

fn join<T>(handle: thread::ScopedJoinHandle<'_, T>) -> T {
    handle
        .join()
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::parser::parse_timestamp;
    use chrono::{NaiveDate, NaiveDateTime};

    pub(crate) fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    /// Three orders: two toys from S1 in January, one book from S2 in February
    pub(crate) fn sample_rows() -> Vec<Transaction> {
        vec![
            Transaction::new("A", "S1", ts("2023-01-05 10:00:00"), 10.0)
                .with_category("toys")
                .with_location("SP", "sao paulo", -23.55, -46.63),
            Transaction::new("B", "S1", ts("2023-01-20 15:30:00"), 20.0)
                .with_category("toys")
                .with_location("SP", "campinas", -22.90, -47.06),
            Transaction::new("C", "S2", ts("2023-02-01 08:15:00"), 5.0)
                .with_category("books")
                .with_location("RJ", "rio de janeiro", -22.91, -43.17),
        ]
    }

    #[test]
    fn test_median() {
        assert_eq!(median(vec![]), None);
        assert_eq!(median(vec![3.0]), Some(3.0));
        assert_eq!(median(vec![5.0, 1.0, 3.0]), Some(3.0));
        assert_eq!(median(vec![4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_dashboard_sample() {
        let rows = sample_rows();
        let range = DateRange::spanning(&rows).unwrap();
        let dashboard = Dashboard::build(&rows, range);

        assert_eq!(dashboard.categories.rows[0].category, "toys");
        assert_eq!(dashboard.monthly.len(), 2);
        assert_eq!(dashboard.rfm.len(), 2);
        assert_eq!(dashboard.states.states(), vec!["SP", "RJ"]);
        assert_eq!(dashboard.cities.len(), 3);
    }

    #[test]
    fn test_dashboard_matches_direct_calls() {
        let rows = sample_rows();
        let range = DateRange::spanning(&rows).unwrap();
        let dashboard = Dashboard::build(&rows, range);

        assert_eq!(dashboard.categories, category_orders(&rows));
        assert_eq!(dashboard.monthly, monthly_orders(&rows));
        assert_eq!(dashboard.rfm, rfm_table(&rows));
        let states = sales_by_state(&rows);
        let allowed = states.states();
        assert_eq!(dashboard.cities, sales_by_city(&rows, allowed.as_slice()));
        assert_eq!(dashboard.states, states);
    }

    #[test]
    fn test_empty_range_yields_empty_tables() {
        let rows = sample_rows();
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 12, 31).unwrap(),
        )
        .unwrap();
        let dashboard = Dashboard::build(&rows, range);

        assert!(dashboard.categories.is_empty());
        assert!(dashboard.monthly.is_empty());
        assert!(dashboard.rfm.is_empty());
        assert!(dashboard.states.is_empty());
        assert!(dashboard.cities.is_empty());
    }

    #[test]
    fn test_narrow_range_recomputes_recency() {
        let rows = sample_rows();
        let january = DateRange::new(
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 31).unwrap(),
        )
        .unwrap();
        let dashboard = Dashboard::build(&rows, january);

        assert_eq!(dashboard.rfm.len(), 1);
        assert_eq!(dashboard.rfm.rows[0].recency, 0);
        assert_eq!(dashboard.monthly.total_revenue(), 30.0);
    }
}
