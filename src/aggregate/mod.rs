//! Pure aggregation over the uploaded record set
//!
//! Every chart and card reads its numbers from here. None of these functions
//! fail: malformed dates and non-finite amounts are skipped, empty input gives
//! empty output.

pub mod category;
pub mod daily;
pub mod heatmap;
pub mod weekly;

pub use category::{category_spend, top_spend_category, weekly_category_totals, CategoryBreakdown, CategoryTotal, WeeklyCategoryRow};
pub use daily::{daily_spend_totals, daily_totals, trailing_daily_totals, DailyTotal, TRAILING_WINDOW_DAYS};
pub use heatmap::{heatmap_grid, heatmap_thresholds, heatmap_tier, HeatmapCell, HeatmapGrid, Tier};
pub use weekly::{weekly_totals, WeeklyTotal};

use crate::models::{Asset, Goal, Liability, Transaction};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::cmp::Reverse;

/// Calendar date of a transaction's date string.
///
/// Timestamps keep the calendar date as written; no timezone conversion happens.
pub fn parse_transaction_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts.date());
        }
    }
    None
}

/// Monday of the week containing `date`; Sundays back up six days
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_monday() as i64;
    date - Duration::days(back)
}

/// Human range for a week bucket, e.g. "Jun 30 – Jul 6"
pub fn week_label(start: NaiveDate) -> String {
    let end = start + Duration::days(6);
    format!("{} – {}", start.format("%b %-d"), end.format("%b %-d"))
}

/// Sum of finite values; NaN entries from malformed uploads are ignored
pub fn sum_finite(values: impl IntoIterator<Item = f64>) -> f64 {
    values.into_iter().filter(|v| v.is_finite()).sum()
}

pub fn total_assets(assets: &[Asset]) -> f64 {
    sum_finite(assets.iter().map(|a| a.value))
}

pub fn total_liabilities(liabilities: &[Liability]) -> f64 {
    sum_finite(liabilities.iter().map(|l| l.value))
}

/// Newest first; transactions with unparseable dates sort last in input order
pub fn recent_transactions(transactions: &[Transaction], limit: usize) -> Vec<&Transaction> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by_key(|tx| Reverse(tx.parsed_date()));
    sorted.truncate(limit);
    sorted
}

/// Newest expenses only
pub fn recent_expenses(transactions: &[Transaction], limit: usize) -> Vec<&Transaction> {
    let mut sorted: Vec<&Transaction> = transactions
        .iter()
        .filter(|tx| tx.spend().is_some())
        .collect();
    sorted.sort_by_key(|tx| Reverse(tx.parsed_date()));
    sorted.truncate(limit);
    sorted
}

/// Expenses re-signed as positive spend, for the spend-oriented charts
pub fn spend_transactions(transactions: &[Transaction]) -> Vec<Transaction> {
    transactions
        .iter()
        .filter_map(|tx| {
            tx.spend().map(|spend| Transaction {
                amount: spend,
                ..tx.clone()
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct GoalProgress {
    /// Rounded and clamped to 0..=100
    pub percent: u8,
    pub remaining: f64,
    pub achieved: bool,
}

pub fn goal_progress(goal: &Goal) -> GoalProgress {
    let ratio = goal.current / goal.target;
    let percent = if goal.target > 0.0 && ratio.is_finite() {
        (ratio * 100.0).round().clamp(0.0, 100.0) as u8
    } else {
        0
    };

    let remaining = if goal.target.is_finite() && goal.current.is_finite() {
        (goal.target - goal.current).max(0.0)
    } else {
        0.0
    };

    GoalProgress {
        percent,
        remaining,
        achieved: percent >= 100,
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::tx;
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_transaction_date_formats() {
        assert_eq!(parse_transaction_date("2025-07-01"), Some(date("2025-07-01")));
        assert_eq!(
            parse_transaction_date("2024-07-10T10:00:00Z"),
            Some(date("2024-07-10"))
        );
        assert_eq!(
            parse_transaction_date("2024-07-10T23:30:00+05:30"),
            Some(date("2024-07-10"))
        );
        assert_eq!(
            parse_transaction_date("2024-07-10T08:15:00.250"),
            Some(date("2024-07-10"))
        );
        assert_eq!(parse_transaction_date("2025-02-30"), None);
        assert_eq!(parse_transaction_date(""), None);
        assert_eq!(parse_transaction_date("yesterday"), None);
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2025-07-01 is a Tuesday, 2025-07-06 a Sunday
        assert_eq!(week_start(date("2025-07-01")), date("2025-06-30"));
        assert_eq!(week_start(date("2025-07-06")), date("2025-06-30"));
        assert_eq!(week_start(date("2025-06-30")), date("2025-06-30"));
        assert_eq!(week_start(date("2025-07-07")), date("2025-07-07"));
    }

    #[test]
    fn test_week_label() {
        assert_eq!(week_label(date("2025-06-30")), "Jun 30 – Jul 6");
        assert_eq!(week_label(date("2025-07-07")), "Jul 7 – Jul 13");
    }

    #[test]
    fn test_totals_ignore_nan() {
        let assets = vec![
            Asset { kind: "savings".into(), value: 250000.0 },
            Asset { kind: "broken".into(), value: f64::NAN },
        ];
        assert_eq!(total_assets(&assets), 250000.0);
        assert_eq!(total_liabilities(&[]), 0.0);
    }

    #[test]
    fn test_recent_transactions_newest_first() {
        let txs = vec![
            tx("a", "2025-07-01", "food", -10.0),
            tx("b", "garbage", "food", -20.0),
            tx("c", "2025-07-03", "food", 30.0),
            tx("d", "2025-07-02", "food", -40.0),
        ];

        let ids: Vec<&str> = recent_transactions(&txs, 10).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "d", "a", "b"]);

        let ids: Vec<&str> = recent_expenses(&txs, 2).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "a"]);
    }

    #[test]
    fn test_spend_transactions_flip_sign() {
        let txs = vec![
            tx("a", "2025-07-01", "food", -10.0),
            tx("b", "2025-07-01", "salary", 500.0),
        ];
        let spend = spend_transactions(&txs);
        assert_eq!(spend.len(), 1);
        assert_eq!(spend[0].amount, 10.0);
    }

    #[test]
    fn test_goal_progress_clamps() {
        let mut goal = Goal {
            id: "g1".into(),
            name: "Emergency fund".into(),
            current: 16000.0,
            target: 25000.0,
            deadline: "2025-09-15".into(),
        };
        let p = goal_progress(&goal);
        assert_eq!(p.percent, 64);
        assert_eq!(p.remaining, 9000.0);
        assert!(!p.achieved);

        goal.current = 30000.0;
        let p = goal_progress(&goal);
        assert_eq!(p.percent, 100);
        assert_eq!(p.remaining, 0.0);
        assert!(p.achieved);

        goal.target = 0.0;
        assert_eq!(goal_progress(&goal).percent, 0);

        goal.target = f64::NAN;
        assert_eq!(goal_progress(&goal).percent, 0);
    }
}
