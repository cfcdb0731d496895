//! Chart series derived from the expense side of the record set

use crate::aggregate::{
    category_spend, daily_spend_totals, heatmap_grid, spend_transactions, trailing_daily_totals,
    weekly_category_totals, weekly_totals, CategoryBreakdown, CategoryTotal, DailyTotal, HeatmapGrid,
    WeeklyTotal, TRAILING_WINDOW_DAYS,
};
use crate::models::RecordSet;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PieSlice {
    pub category: String,
    pub amount: f64,
    /// Share of total spend, 0..=100
    pub percent: f64,
}

pub fn pie_slices(totals: Vec<CategoryTotal>) -> Vec<PieSlice> {
    let total: f64 = totals.iter().map(|t| t.amount).sum();
    totals
        .into_iter()
        .map(|t| PieSlice {
            percent: if total > 0.0 { t.amount / total * 100.0 } else { 0.0 },
            category: t.category,
            amount: t.amount,
        })
        .collect()
}

pub fn spending_pie(records: &RecordSet) -> Vec<PieSlice> {
    pie_slices(category_spend(&records.transactions))
}

/// Weekly spend, oldest week first
pub fn spending_trend(records: &RecordSet) -> Vec<WeeklyTotal> {
    weekly_totals(&spend_transactions(&records.transactions))
}

pub fn category_bars(records: &RecordSet) -> CategoryBreakdown {
    weekly_category_totals(&spend_transactions(&records.transactions))
}

pub fn spend_heatmap(records: &RecordSet) -> HeatmapGrid {
    heatmap_grid(&daily_spend_totals(&records.transactions))
}

/// Spend per day over the trailing window ending `today`
pub fn recent_daily_spend(records: &RecordSet, today: NaiveDate) -> Vec<DailyTotal> {
    trailing_daily_totals(
        &spend_transactions(&records.transactions),
        today,
        TRAILING_WINDOW_DAYS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::test_support::tx;
    use crate::aggregate::Tier;

    fn records() -> RecordSet {
        RecordSet {
            transactions: vec![
                tx("1", "2025-07-01", "food", -300.0),
                tx("2", "2025-07-02", "travel", -100.0),
                tx("3", "2025-07-08", "food", -200.0),
                tx("4", "2025-07-08", "salary", 50000.0),
            ],
            ..RecordSet::default()
        }
    }

    #[test]
    fn test_pie_ignores_income() {
        let slices = spending_pie(&records());
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].category, "food");
        assert_eq!(slices[0].amount, 500.0);
        assert!((slices[0].percent - 83.333).abs() < 0.01);
    }

    #[test]
    fn test_trend_is_positive_spend_per_week() {
        let trend = spending_trend(&records());
        let amounts: Vec<f64> = trend.iter().map(|w| w.amount).collect();
        assert_eq!(amounts, vec![400.0, 200.0]);
        assert_eq!(trend[0].label, "Jun 30 – Jul 6");
    }

    #[test]
    fn test_category_bars_union() {
        let bars = category_bars(&records());
        assert_eq!(bars.categories, vec!["food", "travel"]);
        assert_eq!(bars.weeks.len(), 2);
    }

    #[test]
    fn test_heatmap_from_spend() {
        let grid = spend_heatmap(&records());
        assert_eq!(grid.weeks.len(), 2);
        assert_eq!(grid.max, 300.0);
        let top = grid.cells().find(|c| c.amount == 300.0).unwrap();
        assert_eq!(top.tier, Tier::VeryHigh);
    }

    #[test]
    fn test_recent_daily_spend_window() {
        let today = NaiveDate::from_ymd_opt(2025, 7, 15).unwrap();
        let days = recent_daily_spend(&records(), today);
        // 2025-07-01 is outside the 14-day window ending on the 15th
        let dates: Vec<String> = days.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, vec!["2025-07-02", "2025-07-08"]);
    }

    #[test]
    fn test_pie_slices_zero_total() {
        let slices = pie_slices(vec![CategoryTotal { category: "x".into(), amount: 0.0 }]);
        assert_eq!(slices[0].percent, 0.0);
    }
}
