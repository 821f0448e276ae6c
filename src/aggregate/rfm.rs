//! Seller recency / frequency / monetary segmentation

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::parser::Transaction;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SellerRfm {
    pub seller_id: String,
    /// Days between the seller's last purchase date and the latest date in the set
    pub recency: i64,
    /// Distinct orders
    pub frequency: usize,
    /// Sum of item prices
    pub monetary: f64,
    /// 1-based label in first-seen order of `seller_id`
    pub identifier: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RfmAverages {
    pub recency: f64,
    pub frequency: f64,
    pub monetary: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RfmTable {
    pub rows: Vec<SellerRfm>,
}

impl RfmTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, seller_id: &str) -> Option<&SellerRfm> {
        self.rows.iter().find(|r| r.seller_id == seller_id)
    }

    /// Most recently active sellers
    pub fn top_by_recency(&self, n: usize) -> Vec<&SellerRfm> {
        self.sorted_view(n, |a, b| a.recency.cmp(&b.recency))
    }

    pub fn top_by_frequency(&self, n: usize) -> Vec<&SellerRfm> {
        self.sorted_view(n, |a, b| b.frequency.cmp(&a.frequency))
    }

    pub fn top_by_monetary(&self, n: usize) -> Vec<&SellerRfm> {
        self.sorted_view(n, |a, b| b.monetary.total_cmp(&a.monetary))
    }

    /// Mean of each metric rounded to one decimal place
    pub fn averages(&self) -> Option<RfmAverages> {
        if self.rows.is_empty() {
            return None;
        }
        let n = self.rows.len() as f64;
        let round = |v: f64| (v * 10.0).round() / 10.0;

        Some(RfmAverages {
            recency: round(self.rows.iter().map(|r| r.recency as f64).sum::<f64>() / n),
            frequency: round(self.rows.iter().map(|r| r.frequency as f64).sum::<f64>() / n),
            monetary: round(self.rows.iter().map(|r| r.monetary).sum::<f64>() / n),
        })
    }

    // Stable sort, so ties stay in identifier order
    fn sorted_view<F>(&self, n: usize, cmp: F) -> Vec<&SellerRfm>
    where
        F: Fn(&SellerRfm, &SellerRfm) -> std::cmp::Ordering,
    {
        let mut view: Vec<&SellerRfm> = self.rows.iter().collect();
        view.sort_by(|a, b| cmp(a, b));
        view.truncate(n);
        view
    }
}

struct SellerAcc<'a> {
    seller_id: &'a str,
    last_purchase: NaiveDate,
    orders: HashSet<&'a str>,
    monetary: f64,
}

/// Compute recency, frequency and monetary value per seller.
///
/// Recency is measured against the latest purchase date of the whole input,
/// so the most recent seller always has recency 0. Rows without a seller are
/// skipped here only.
pub fn rfm_table(rows: &[Transaction]) -> RfmTable {
    let mut sellers: Vec<SellerAcc> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for row in rows {
        let Some(seller_id) = row.seller_id.as_deref() else {
            continue;
        };
        let date = row.purchase_date();
        let idx = *positions.entry(seller_id).or_insert_with(|| {
            sellers.push(SellerAcc {
                seller_id,
                last_purchase: date,
                orders: HashSet::new(),
                monetary: 0.0,
            });
            sellers.len() - 1
        });

        let acc = &mut sellers[idx];
        acc.last_purchase = acc.last_purchase.max(date);
        acc.orders.insert(row.order_id.as_str());
        acc.monetary += row.price.unwrap_or_default();
    }

    if sellers.is_empty() {
        return RfmTable::default();
    }
    let Some(latest) = rows.iter().map(Transaction::purchase_date).max() else {
        return RfmTable::default();
    };

    let rows = sellers
        .into_iter()
        .enumerate()
        .map(|(idx, acc)| SellerRfm {
            seller_id: acc.seller_id.to_string(),
            recency: (latest - acc.last_purchase).num_days(),
            frequency: acc.orders.len(),
            monetary: acc.monetary,
            identifier: idx + 1,
        })
        .collect();

    RfmTable { rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::tests::{sample_rows, ts};

    #[test]
    fn test_sample_sellers() {
        let table = rfm_table(&sample_rows());

        let s1 = table.get("S1").unwrap();
        // last purchase 2023-01-20, latest in set 2023-02-01
        assert_eq!((s1.frequency, s1.monetary, s1.recency), (2, 30.0, 12));

        let s2 = table.get("S2").unwrap();
        assert_eq!((s2.frequency, s2.monetary, s2.recency), (1, 5.0, 0));
    }

    #[test]
    fn test_identifier_follows_first_seen_order() {
        let rows = vec![
            Transaction::new("o1", "zeta", ts("2023-01-01 10:00:00"), 1.0),
            Transaction::new("o2", "alpha", ts("2023-01-02 10:00:00"), 100.0),
            Transaction::new("o3", "zeta", ts("2023-01-03 10:00:00"), 1.0),
            Transaction::new("o4", "mid", ts("2023-01-04 10:00:00"), 50.0),
        ];
        let table = rfm_table(&rows);
        let order: Vec<_> = table
            .rows
            .iter()
            .map(|r| (r.seller_id.as_str(), r.identifier))
            .collect();
        assert_eq!(order, vec![("zeta", 1), ("alpha", 2), ("mid", 3)]);

        // sort views leave the labels alone
        let by_money: Vec<_> = table.top_by_monetary(3).iter().map(|r| r.identifier).collect();
        assert_eq!(by_money, vec![2, 3, 1]);
        assert_eq!(table.rows[0].identifier, 1);
    }

    #[test]
    fn test_recency_truncates_to_dates() {
        let rows = vec![
            Transaction::new("o1", "a", ts("2023-01-01 23:59:00"), 1.0),
            Transaction::new("o2", "b", ts("2023-01-02 00:01:00"), 1.0),
        ];
        let table = rfm_table(&rows);
        assert_eq!(table.get("a").unwrap().recency, 1);
        assert_eq!(table.get("b").unwrap().recency, 0);
    }

    #[test]
    fn test_sort_views() {
        let rows = vec![
            Transaction::new("o1", "a", ts("2023-01-01 10:00:00"), 10.0),
            Transaction::new("o2", "a", ts("2023-01-02 10:00:00"), 10.0),
            Transaction::new("o3", "b", ts("2023-01-10 10:00:00"), 1.0),
            Transaction::new("o4", "c", ts("2023-01-10 10:00:00"), 40.0),
        ];
        let table = rfm_table(&rows);

        let ids = |v: Vec<&SellerRfm>| v.iter().map(|r| r.seller_id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(table.top_by_recency(2)), vec!["b", "c"]);
        assert_eq!(ids(table.top_by_frequency(1)), vec!["a"]);
        assert_eq!(ids(table.top_by_monetary(5)), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_averages() {
        let table = rfm_table(&sample_rows());
        let avg = table.averages().unwrap();
        assert_eq!(avg.recency, 6.0);
        assert_eq!(avg.frequency, 1.5);
        assert_eq!(avg.monetary, 17.5);
        assert!(RfmTable::default().averages().is_none());
    }

    #[test]
    fn test_rows_without_seller_are_skipped() {
        let mut orphan = Transaction::new("o3", "s1", ts("2023-01-10 10:00:00"), 99.0);
        orphan.seller_id = None;
        let rows = vec![
            Transaction::new("o1", "s1", ts("2023-01-01 10:00:00"), 4.0),
            Transaction::new("o2", "s2", ts("2023-01-03 10:00:00"), 6.0),
            orphan,
        ];

        let table = rfm_table(&rows);
        assert_eq!(table.len(), 2);
        let s1 = table.get("s1").unwrap();
        assert_eq!((s1.frequency, s1.monetary), (1, 4.0));
        // the sellerless row still sets the latest date
        assert_eq!(s1.recency, 9);
        assert_eq!(table.get("s2").unwrap().recency, 7);
    }

    #[test]
    fn test_blank_price_adds_nothing() {
        let mut blank = Transaction::new("o2", "s1", ts("2023-01-02 10:00:00"), 0.0);
        blank.price = None;
        let rows = vec![Transaction::new("o1", "s1", ts("2023-01-01 10:00:00"), 4.0), blank];

        let s1 = rfm_table(&rows).get("s1").cloned().unwrap();
        assert_eq!((s1.frequency, s1.monetary), (2, 4.0));
    }

    #[test]
    fn test_empty_input() {
        assert!(rfm_table(&[]).is_empty());
    }
}
