use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::median;
use crate::parser::Transaction;

/// Number of states kept in the ranking
pub const STATE_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesByState {
    pub state: String,
    pub total_order: usize,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StateTable {
    pub rows: Vec<SalesByState>,
}

impl StateTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// State codes in rank order
    pub fn states(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.state.clone()).collect()
    }

    pub fn top(&self, n: usize) -> &[SalesByState] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Lowest ranked states, fewest orders first
    pub fn bottom(&self, n: usize) -> Vec<SalesByState> {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| {
            a.total_order
                .cmp(&b.total_order)
                .then_with(|| a.state.cmp(&b.state))
        });
        rows.truncate(n);
        rows
    }

    /// Median of the state centers, for centering a map
    pub fn map_center(&self) -> Option<(f64, f64)> {
        let lat = median(self.rows.iter().filter_map(|r| r.lat).collect())?;
        let lng = median(self.rows.iter().filter_map(|r| r.lng).collect())?;
        Some((lat, lng))
    }
}

#[derive(Default)]
struct StateAcc<'a> {
    orders: HashSet<&'a str>,
    lats: Vec<f64>,
    lngs: Vec<f64>,
}

/// Rank states by distinct order count and keep the top [`STATE_LIMIT`].
///
/// Coordinates are the medians over every row of the state, so an order with
/// several items contributes several samples.
pub fn sales_by_state(rows: &[Transaction]) -> StateTable {
    let mut states: HashMap<&str, StateAcc> = HashMap::new();
    for row in rows {
        let Some(state) = row.state.as_deref() else {
            continue;
        };
        let acc = states.entry(state).or_default();
        acc.orders.insert(row.order_id.as_str());
        acc.lats.extend(row.lat);
        acc.lngs.extend(row.lng);
    }

    let mut rows: Vec<SalesByState> = states
        .into_iter()
        .map(|(state, acc)| SalesByState {
            state: state.to_string(),
            total_order: acc.orders.len(),
            lat: median(acc.lats),
            lng: median(acc.lngs),
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_order
            .cmp(&a.total_order)
            .then_with(|| a.state.cmp(&b.state))
    });
    rows.truncate(STATE_LIMIT);

    StateTable { rows }
}
