//! Monthly demand series aggregation.
//!
//! Groups raw order lines into fixed-width calendar-month buckets per
//! product. The fixed-length contract matters: every product that appears in
//! the order log gets exactly `months` entries, oldest first, zero-filled
//! for silent months, so downstream interval/variation formulas can divide
//! safely.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::error::{EngineError, EngineResult};
use crate::records::OrderRecord;

/// Default trailing window length.
pub const DEFAULT_WINDOW_MONTHS: usize = 12;

/// A trailing window of calendar months ending at (and including) the month
/// of `as_of`.
///
/// The engine never reads the wall clock; callers supply the reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisWindow {
    months: usize,
    as_of: NaiveDate,
}

impl AnalysisWindow {
    /// Twelve trailing months ending at `as_of`.
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            months: DEFAULT_WINDOW_MONTHS,
            as_of,
        }
    }

    /// A trailing window of `months` months ending at `as_of`.
    pub fn trailing(months: usize, as_of: NaiveDate) -> EngineResult<Self> {
        if months == 0 {
            return Err(EngineError::invalid_parameter(
                "analysis window must cover at least one month",
            ));
        }
        Ok(Self { months, as_of })
    }

    pub fn months(&self) -> usize {
        self.months
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    /// Index of the oldest month in the window, in whole months since year 0.
    fn start_index(&self) -> i64 {
        month_index(self.as_of) - (self.months as i64 - 1)
    }

    /// Bucket offset for `date`, or `None` when it falls outside the window.
    pub fn offset_of(&self, date: NaiveDate) -> Option<usize> {
        let offset = month_index(date) - self.start_index();
        if (0..self.months as i64).contains(&offset) {
            Some(offset as usize)
        } else {
            None
        }
    }

    /// Whether `date` falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.offset_of(date).is_some()
    }

    /// The window's month keys (`YYYY-MM`), oldest first.
    pub fn month_keys(&self) -> Vec<String> {
        let start = self.start_index();
        (0..self.months as i64)
            .map(|offset| {
                let idx = start + offset;
                let year = idx.div_euclid(12);
                let month = idx.rem_euclid(12) + 1;
                format!("{year:04}-{month:02}")
            })
            .collect()
    }
}

/// `YYYY-MM` bucket key for a calendar date.
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

fn month_index(date: NaiveDate) -> i64 {
    date.year() as i64 * 12 + (date.month0() as i64)
}

/// Build per-product monthly sales series over the trailing window.
///
/// Only sale lines contribute demand; purchase lines still register the
/// product so it receives a (zero-filled) series. Orders outside the window
/// are ignored.
pub fn monthly_sales_series(
    orders: &[OrderRecord],
    window: &AnalysisWindow,
) -> HashMap<String, Vec<f64>> {
    let mut series: HashMap<String, Vec<f64>> = HashMap::new();

    for order in orders {
        let buckets = series
            .entry(order.product_id.clone())
            .or_insert_with(|| vec![0.0; window.months()]);

        if !order.is_sale() {
            continue;
        }
        if let Some(offset) = window.offset_of(order.order_date) {
            buckets[offset] += order.quantity as f64;
        }
    }

    series
}
