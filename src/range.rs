use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{DashboardError, Result};
use crate::parser::Transaction;

/// Inclusive calendar-date window applied to purchase timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(DashboardError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The [first, last] purchase dates of a row set
    pub fn spanning(rows: &[Transaction]) -> Option<Self> {
        let mut dates = rows.iter().map(Transaction::purchase_date);
        let first = dates.next()?;
        let (start, end) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(Self { start, end })
    }

    /// Fill missing bounds from the dataset's own first and last purchase dates
    pub fn resolve(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        rows: &[Transaction],
    ) -> Result<Self> {
        if let (Some(start), Some(end)) = (start, end) {
            return Self::new(start, end);
        }

        let span = Self::spanning(rows).ok_or(DashboardError::EmptyDataset)?;
        Self::new(start.unwrap_or(span.start), end.unwrap_or(span.end))
    }

    /// Whether a date falls inside the window; `end` covers the whole day
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Rows purchased inside the window, in input order
    pub fn filter(&self, rows: &[Transaction]) -> Vec<Transaction> {
        rows.iter()
            .filter(|row| self.contains(row.purchase_date()))
            .cloned()
            .collect()
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
