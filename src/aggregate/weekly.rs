//! Week bucketing

use super::{week_label, week_start};
use crate::models::Transaction;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeeklyTotal {
    pub week_start: NaiveDate,
    pub label: String,
    pub amount: f64,
    pub count: usize,
}

/// Sum signed amounts per Monday-aligned week, ascending by week start
pub fn weekly_totals(transactions: &[Transaction]) -> Vec<WeeklyTotal> {
    let mut buckets: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();

    for tx in transactions {
        if !tx.amount.is_finite() {
            continue;
        }
        let Some(date) = tx.parsed_date() else {
            continue;
        };
        let bucket = buckets.entry(week_start(date)).or_insert((0.0, 0));
        bucket.0 += tx.amount;
        bucket.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(start, (amount, count))| WeeklyTotal {
            week_start: start,
            label: week_label(start),
            amount,
            count,
        })
        .collect()
}
