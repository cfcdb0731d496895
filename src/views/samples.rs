//! Illustrative data shown before anything is uploaded

use super::cards::{ActivityItem, ActivityKind, GoalCard, ReceiptRow, SummaryCard};
use crate::aggregate::{
    goal_progress, heatmap_grid, week_label, CategoryBreakdown, CategoryTotal, DailyTotal, HeatmapGrid,
    WeeklyCategoryRow, WeeklyTotal,
};
use crate::models::Goal;
use chrono::NaiveDate;
use std::collections::BTreeMap;

pub const SUMMARY_PROMPT: &str = "Upload your MCP JSON to view your personalized summary.";
pub const GOAL_PROMPT: &str = "Upload MCP JSON to view and track your savings goals.";
pub const RECEIPTS_PROMPT: &str =
    "Your recent expenses will appear here once data is available. Upload your MCP file to get started.";
pub const ACTIVITY_PROMPT: &str = "Upload your MCP file to view your recent activity";
pub const CHART_PROMPT: &str = "Upload your MCP JSON to see your own numbers.";
pub const SMART_TIP: &str = "You're spending 15% less on dining out this month. \
Consider investing this saved amount in your emergency fund.";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

pub fn summary() -> SummaryCard {
    SummaryCard {
        total_assets: 250000.0,
        total_liabilities: 80000.0,
        net_worth: 170000.0,
        active_goals: 3,
    }
}

pub fn goal() -> GoalCard {
    let goal = Goal {
        id: "sample".to_string(),
        name: "Save ₹25,000 by Sept 15".to_string(),
        current: 16000.0,
        target: 25000.0,
        deadline: "2025-09-15".to_string(),
    };
    GoalCard::from_goal(&goal, goal_progress(&goal))
}

pub fn receipts() -> Vec<ReceiptRow> {
    [
        ("1", "Swiggy", "food", 499.0, date(2024, 7, 10)),
        ("2", "Amazon", "shopping", 1299.0, date(2024, 7, 9)),
        ("3", "Starbucks", "food", 350.0, date(2024, 7, 8)),
        ("4", "Uber", "transport", 180.0, date(2024, 7, 7)),
        ("5", "Electricity Bill", "bills", 2100.0, date(2024, 7, 5)),
    ]
    .into_iter()
    .map(|(id, merchant, category, amount, day)| ReceiptRow::new(id, merchant, category, amount, Some(day)))
    .collect()
}

pub fn activity() -> Vec<ActivityItem> {
    use ActivityKind::*;
    [
        ("SIP Investment", 5000.0, "2 hours ago", Investment),
        ("Grocery Shopping", 2840.0, "1 day ago", Expense),
        ("Salary Credited", 75000.0, "3 days ago", Income),
        ("Online Shopping", 1200.0, "4 days ago", Expense),
        ("Electricity Bill", 3000.0, "5 days ago", Expense),
        ("Interest Credited", 800.0, "6 days ago", Income),
        ("Dining Out", 1500.0, "7 days ago", Expense),
        ("Mobile Recharge", 399.0, "8 days ago", Expense),
        ("Fuel", 2000.0, "9 days ago", Expense),
        ("Bonus Received", 10000.0, "10 days ago", Income),
    ]
    .into_iter()
    .map(|(label, amount, when, kind)| ActivityItem {
        label: label.to_string(),
        when: when.to_string(),
        amount,
        kind,
    })
    .collect()
}

pub fn spending() -> Vec<CategoryTotal> {
    [
        ("Food", 1200.0),
        ("Shopping", 800.0),
        ("Bills", 600.0),
        ("Travel", 400.0),
        ("Entertainment", 300.0),
    ]
    .into_iter()
    .map(|(category, amount)| CategoryTotal {
        category: category.to_string(),
        amount,
    })
    .collect()
}

pub fn trend() -> Vec<WeeklyTotal> {
    [
        (date(2025, 6, 30), 4200.0),
        (date(2025, 7, 7), 3800.0),
        (date(2025, 7, 14), 4500.0),
        (date(2025, 7, 21), 3900.0),
    ]
    .into_iter()
    .map(|(start, amount)| WeeklyTotal {
        week_start: start,
        label: week_label(start),
        amount,
        count: 0,
    })
    .collect()
}

pub fn categories() -> CategoryBreakdown {
    let rows = [
        (date(2025, 6, 30), 1200.0, 800.0, 500.0),
        (date(2025, 7, 7), 900.0, 950.0, 600.0),
        (date(2025, 7, 14), 1100.0, 700.0, 550.0),
        (date(2025, 7, 21), 1000.0, 850.0, 650.0),
    ];

    CategoryBreakdown {
        categories: vec!["Bills".into(), "Food".into(), "Shopping".into()],
        weeks: rows
            .into_iter()
            .map(|(start, food, shopping, bills)| WeeklyCategoryRow {
                week_start: start,
                label: week_label(start),
                totals: BTreeMap::from([
                    ("Bills".to_string(), bills),
                    ("Food".to_string(), food),
                    ("Shopping".to_string(), shopping),
                ]),
            })
            .collect(),
    }
}

pub fn daily_spend() -> Vec<DailyTotal> {
    [
        (1, 1200.0),
        (2, 800.0),
        (3, 400.0),
        (4, 600.0),
        (5, 300.0),
        (6, 0.0),
    ]
    .into_iter()
    .map(|(d, amount)| DailyTotal {
        date: date(2025, 7, d),
        amount,
    })
    .collect()
}

pub fn heatmap() -> HeatmapGrid {
    heatmap_grid(&daily_spend())
}
