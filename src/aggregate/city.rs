use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::debug;

use super::median;
use crate::parser::Transaction;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesByCity {
    pub city: String,
    /// First state seen for the city
    pub state: String,
    pub total_order: usize,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Min-max scaled `total_order`, in [0, 1]
    pub normalized_order: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CityTable {
    pub rows: Vec<SalesByCity>,
}

impl CityTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `(lat, lng, weight)` samples for a heat map
    pub fn heat_points(&self) -> Vec<(f64, f64, f64)> {
        self.rows
            .iter()
            .filter_map(|r| Some((r.lat?, r.lng?, r.normalized_order)))
            .collect()
    }
}

#[derive(Default)]
struct CityAcc<'a> {
    state: Option<&'a str>,
    orders: HashSet<&'a str>,
    lats: Vec<f64>,
    lngs: Vec<f64>,
}

/// Per-city order counts limited to `allowed_states`, with heat weights.
///
/// The weight is `(count - min) / (max - min)` over the kept cities. When
/// every kept city has the same count every weight is 1.0.
pub fn sales_by_city<S: AsRef<str>>(rows: &[Transaction], allowed_states: &[S]) -> CityTable {
    let allowed: HashSet<&str> = allowed_states.iter().map(|s| s.as_ref()).collect();

    let mut cities: BTreeMap<&str, CityAcc> = BTreeMap::new();
    for row in rows {
        let Some(city) = row.city.as_deref() else {
            continue;
        };
        let acc = cities.entry(city).or_default();
        match (acc.state, row.state.as_deref()) {
            (None, seen) => acc.state = seen,
            (Some(first), Some(other)) if first != other => {
                debug!(city, first, other, "City seen under more than one state");
            }
            _ => {}
        }
        acc.orders.insert(row.order_id.as_str());
        acc.lats.extend(row.lat);
        acc.lngs.extend(row.lng);
    }

    let kept: Vec<(&str, &str, CityAcc)> = cities
        .into_iter()
        .filter_map(|(city, acc)| {
            let state = acc.state.filter(|s| allowed.contains(s))?;
            Some((city, state, acc))
        })
        .collect();

    let counts = kept.iter().map(|(_, _, acc)| acc.orders.len());
    let min = counts.clone().min().unwrap_or(0);
    let max = counts.max().unwrap_or(0);
    let normalize = |count: usize| {
        if max == min {
            1.0
        } else {
            (count - min) as f64 / (max - min) as f64
        }
    };

    let rows = kept
        .into_iter()
        .map(|(city, state, acc)| SalesByCity {
            city: city.to_string(),
            state: state.to_string(),
            total_order: acc.orders.len(),
            lat: median(acc.lats),
            lng: median(acc.lngs),
            normalized_order: normalize(acc.orders.len()),
        })
        .collect();

    CityTable { rows }
}
