//! Category aggregation

use super::{week_label, week_start};
use crate::models::Transaction;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeeklyCategoryRow {
    pub week_start: NaiveDate,
    pub label: String,
    /// Every category in the breakdown appears here, absent ones as zero
    pub totals: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CategoryBreakdown {
    /// Union of categories across the whole input, sorted
    pub categories: Vec<String>,
    pub weeks: Vec<WeeklyCategoryRow>,
}

impl CategoryBreakdown {
    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty() || self.categories.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

/// Week buckets split by category with a consistent series per category
pub fn weekly_category_totals(transactions: &[Transaction]) -> CategoryBreakdown {
    let usable: Vec<(NaiveDate, &str, f64)> = transactions
        .iter()
        .filter(|tx| tx.amount.is_finite())
        .filter_map(|tx| Some((week_start(tx.parsed_date()?), tx.category_key(), tx.amount)))
        .collect();

    let categories: BTreeSet<&str> = usable.iter().map(|(_, category, _)| *category).collect();

    let mut weeks: BTreeMap<NaiveDate, BTreeMap<String, f64>> = BTreeMap::new();
    for (start, category, amount) in &usable {
        let row = weeks.entry(*start).or_insert_with(|| {
            categories
                .iter()
                .map(|c| (c.to_string(), 0.0))
                .collect()
        });
        *row.entry(category.to_string()).or_insert(0.0) += amount;
    }

    CategoryBreakdown {
        categories: categories.into_iter().map(str::to_string).collect(),
        weeks: weeks
            .into_iter()
            .map(|(start, totals)| WeeklyCategoryRow {
                week_start: start,
                label: week_label(start),
                totals,
            })
            .collect(),
    }
}

/// Expense magnitude per category, largest first (ties by name)
pub fn category_spend(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for tx in transactions {
        if let Some(spend) = tx.spend() {
            *totals.entry(tx.category_key()).or_insert(0.0) += spend;
        }
    }

    let mut out: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, amount)| CategoryTotal {
            category: category.to_string(),
            amount,
        })
        .collect();
    out.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    out
}

/// Category with the largest expense total, if there are any expenses
pub fn top_spend_category(transactions: &[Transaction]) -> Option<CategoryTotal> {
    category_spend(transactions).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::test_support::tx;

    #[test]
    fn test_categories_unioned_across_all_weeks() {
        // first week only has food; shopping appears later
        let txs = vec![
            tx("1", "2025-07-01", "food", 100.0),
            tx("2", "2025-07-08", "food", 50.0),
            tx("3", "2025-07-09", "shopping", 80.0),
            tx("4", "2025-07-16", "bills", 30.0),
        ];

        let breakdown = weekly_category_totals(&txs);
        assert_eq!(breakdown.categories, vec!["bills", "food", "shopping"]);
        assert_eq!(breakdown.weeks.len(), 3);

        for row in &breakdown.weeks {
            assert_eq!(row.totals.len(), 3, "every week carries every category");
        }

        let first = &breakdown.weeks[0].totals;
        assert_eq!(first["food"], 100.0);
        assert_eq!(first["shopping"], 0.0);
        assert_eq!(first["bills"], 0.0);

        let second = &breakdown.weeks[1].totals;
        assert_eq!(second["food"], 50.0);
        assert_eq!(second["shopping"], 80.0);
    }

    #[test]
    fn test_blank_category_becomes_other() {
        let txs = vec![tx("1", "2025-07-01", "  ", 10.0)];
        let breakdown = weekly_category_totals(&txs);
        assert_eq!(breakdown.categories, vec!["Other"]);
    }

    #[test]
    fn test_empty_breakdown() {
        assert!(weekly_category_totals(&[]).is_empty());
        let bad = vec![tx("1", "nope", "food", 10.0)];
        let breakdown = weekly_category_totals(&bad);
        assert!(breakdown.is_empty());
        assert!(breakdown.categories.is_empty());
    }

    #[test]
    fn test_category_spend_and_top() {
        let txs = vec![
            tx("1", "2025-07-01", "food", -120.0),
            tx("2", "2025-07-02", "travel", -500.0),
            tx("3", "2025-07-03", "food", -300.0),
            tx("4", "2025-07-03", "salary", 9000.0),
        ];

        let spend = category_spend(&txs);
        assert_eq!(spend.len(), 2);
        assert_eq!(spend[0].category, "travel");
        assert_eq!(spend[1].amount, 420.0);

        assert_eq!(top_spend_category(&txs).unwrap().category, "travel");
        assert!(top_spend_category(&[tx("1", "2025-07-01", "salary", 5.0)]).is_none());
    }
}
