use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::parser::Transaction;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryOrders {
    pub category: String,
    pub total_order: usize,
}

/// Categories ranked by distinct order count, highest first
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CategoryTable {
    pub rows: Vec<CategoryOrders>,
}

impl CategoryTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Best performing categories
    pub fn best(&self, n: usize) -> &[CategoryOrders] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Worst performing categories, fewest orders first
    pub fn worst(&self, n: usize) -> Vec<CategoryOrders> {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| {
            a.total_order
                .cmp(&b.total_order)
                .then_with(|| a.category.cmp(&b.category))
        });
        rows.truncate(n);
        rows
    }
}

/// Count distinct orders per product category.
///
/// Rows without a category are not counted. Ties are broken by category name.
pub fn category_orders(rows: &[Transaction]) -> CategoryTable {
    let mut orders: HashMap<&str, HashSet<&str>> = HashMap::new();
    for row in rows {
        if let Some(category) = row.category.as_deref() {
            orders
                .entry(category)
                .or_default()
                .insert(row.order_id.as_str());
        }
    }

    let mut rows: Vec<CategoryOrders> = orders
        .into_iter()
        .map(|(category, ids)| CategoryOrders {
            category: category.to_string(),
            total_order: ids.len(),
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_order
            .cmp(&a.total_order)
            .then_with(|| a.category.cmp(&b.category))
    });

    CategoryTable { rows }
}
