use std::collections::{BTreeMap, HashSet};

use chrono::Datelike;
use serde::Serialize;

use crate::parser::Transaction;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyOrders {
    /// Calendar month as `YYYY-MM`
    pub month: String,
    pub total_order: usize,
    pub revenue: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MonthlyTable {
    pub rows: Vec<MonthlyOrders>,
}

impl MonthlyTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_orders(&self) -> usize {
        self.rows.iter().map(|r| r.total_order).sum()
    }

    pub fn total_revenue(&self) -> f64 {
        self.rows.iter().map(|r| r.revenue).sum()
    }
}

#[derive(Default)]
struct MonthAcc<'a> {
    orders: HashSet<&'a str>,
    revenue: f64,
}

/// Bucket orders and revenue by calendar month.
///
/// Only months with at least one row appear; gaps are not filled.
pub fn monthly_orders(rows: &[Transaction]) -> MonthlyTable {
    let mut months: BTreeMap<(i32, u32), MonthAcc> = BTreeMap::new();
    for row in rows {
        let key = (row.purchased_at.year(), row.purchased_at.month());
        let acc = months.entry(key).or_default();
        acc.orders.insert(row.order_id.as_str());
        acc.revenue += row.price.unwrap_or_default();
    }

    let rows = months
        .into_iter()
        .map(|((year, month), acc)| MonthlyOrders {
            month: format!("{year:04}-{month:02}"),
            total_order: acc.orders.len(),
            revenue: acc.revenue,
        })
        .collect();

    MonthlyTable { rows }
}
