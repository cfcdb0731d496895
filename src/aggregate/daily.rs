//! Day bucketing

use crate::models::Transaction;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Window used by the recent-days views
pub const TRAILING_WINDOW_DAYS: u32 = 14;

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub amount: f64,
}

/// Signed sum per calendar day, ascending. Days without transactions are absent.
pub fn daily_totals(transactions: &[Transaction]) -> Vec<DailyTotal> {
    bucket_by_day(
        transactions
            .iter()
            .filter(|tx| tx.amount.is_finite())
            .filter_map(|tx| tx.parsed_date().map(|date| (date, tx.amount))),
    )
}

/// Daily sums restricted to `[today - (days - 1), today]`
pub fn trailing_daily_totals(
    transactions: &[Transaction],
    today: NaiveDate,
    days: u32,
) -> Vec<DailyTotal> {
    if days == 0 {
        return Vec::new();
    }
    let first = today - Duration::days(days as i64 - 1);

    daily_totals(transactions)
        .into_iter()
        .filter(|day| day.date >= first && day.date <= today)
        .collect()
}

/// Expense magnitude per calendar day, for the spend heatmap
pub fn daily_spend_totals(transactions: &[Transaction]) -> Vec<DailyTotal> {
    bucket_by_day(
        transactions
            .iter()
            .filter_map(|tx| Some((tx.parsed_date()?, tx.spend()?))),
    )
}

fn bucket_by_day(entries: impl Iterator<Item = (NaiveDate, f64)>) -> Vec<DailyTotal> {
    let mut days: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (date, amount) in entries {
        *days.entry(date).or_insert(0.0) += amount;
    }
    days.into_iter()
        .map(|(date, amount)| DailyTotal { date, amount })
        .collect()
}
