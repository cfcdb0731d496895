//! Summary, goal, receipt, activity and tip cards

use super::format::{day_month, rupees};
use crate::aggregate::{
    goal_progress, recent_expenses, recent_transactions, top_spend_category, total_assets,
    total_liabilities, GoalProgress,
};
use crate::models::{Flow, Goal, RecordSet, Transaction};
use chrono::NaiveDate;
use serde::Serialize;

pub const RECEIPT_LIMIT: usize = 5;
pub const ACTIVITY_LIMIT: usize = 10;
/// Rows shown in the collapsed activity list
pub const ACTIVITY_COLLAPSED: usize = 3;

pub const NO_EXPENSES_TIP: &str = "Great job! No expenses in your recent transactions.";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SummaryCard {
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub net_worth: f64,
    pub active_goals: usize,
}

impl SummaryCard {
    pub fn from_records(records: &RecordSet) -> Self {
        let total_assets = total_assets(&records.assets);
        let total_liabilities = total_liabilities(&records.liabilities);
        Self {
            total_assets,
            total_liabilities,
            net_worth: total_assets - total_liabilities,
            active_goals: records.goals.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GoalCard {
    pub name: String,
    pub current: f64,
    pub target: f64,
    pub deadline: String,
    pub progress: GoalProgress,
    /// Encouragement line keyed on progress
    pub message: String,
    /// "₹9,000 to go" or the achieved banner
    pub status: String,
}

impl GoalCard {
    pub fn from_goal(goal: &Goal, progress: GoalProgress) -> Self {
        let status = if progress.achieved {
            "Goal achieved! 🎉".to_string()
        } else {
            format!("{} to go", rupees(progress.remaining))
        };

        Self {
            name: goal.name.clone(),
            current: goal.current,
            target: goal.target,
            deadline: goal.deadline.clone(),
            message: progress_message(progress.percent).to_string(),
            progress,
            status,
        }
    }

    /// Card for the first goal, if any
    pub fn first(records: &RecordSet) -> Option<Self> {
        records
            .goals
            .first()
            .map(|goal| Self::from_goal(goal, goal_progress(goal)))
    }
}

pub fn progress_message(percent: u8) -> &'static str {
    match percent {
        100.. => "Goal achieved! 🎉",
        80..=99 => "Excellent progress, you're nearly there!",
        60..=79 => "More than halfway there, great job!",
        40..=59 => "Good momentum, keep it up!",
        _ => "Just getting started, you've got this!",
    }
}

/// Emoji for a category; unknown and blank categories fall back to a card
pub fn category_icon(category: &str) -> &'static str {
    match category.trim().to_lowercase().as_str() {
        "food" => "🍔",
        "groceries" => "🛒",
        "shopping" => "🛍️",
        "travel" => "✈️",
        "bills" => "💡",
        "entertainment" => "🎬",
        "health" => "💊",
        "transport" => "🚗",
        _ => "💳",
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReceiptRow {
    pub id: String,
    pub merchant: String,
    pub category: String,
    pub icon: &'static str,
    /// Expense magnitude
    pub amount: f64,
    pub date: Option<NaiveDate>,
}

impl ReceiptRow {
    pub fn new(id: &str, merchant: &str, category: &str, amount: f64, date: Option<NaiveDate>) -> Self {
        Self {
            id: id.to_string(),
            merchant: merchant.to_string(),
            category: category.to_string(),
            icon: category_icon(category),
            amount,
            date,
        }
    }

    pub fn from_transaction(tx: &Transaction) -> Self {
        Self::new(
            &tx.id,
            &tx.merchant,
            tx.category_key(),
            tx.spend().unwrap_or(0.0),
            tx.parsed_date(),
        )
    }

    /// "10 Jul", or a dash when the date did not parse
    pub fn date_label(&self) -> String {
        self.date.map(day_month).unwrap_or_else(|| "—".to_string())
    }
}

/// Most recent expenses, newest first
pub fn receipts(records: &RecordSet) -> Vec<ReceiptRow> {
    recent_expenses(&records.transactions, RECEIPT_LIMIT)
        .into_iter()
        .map(ReceiptRow::from_transaction)
        .collect()
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Income,
    Expense,
    Investment,
}

impl ActivityKind {
    pub fn sign(self) -> &'static str {
        match self {
            ActivityKind::Income => "+",
            ActivityKind::Expense | ActivityKind::Investment => "-",
        }
    }

    fn of(tx: &Transaction) -> Self {
        let category = tx.category.to_lowercase();
        if category.contains("invest") || category.contains("sip") {
            ActivityKind::Investment
        } else if tx.flow() == Flow::Income {
            ActivityKind::Income
        } else {
            ActivityKind::Expense
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActivityItem {
    pub label: String,
    /// Relative day, e.g. "3 days ago"
    pub when: String,
    /// Magnitude; direction is carried by `kind`
    pub amount: f64,
    pub kind: ActivityKind,
}

impl ActivityItem {
    pub fn from_transaction(tx: &Transaction, today: NaiveDate) -> Self {
        Self {
            label: tx.label().to_string(),
            when: tx
                .parsed_date()
                .map(|date| relative_day(date, today))
                .unwrap_or_else(|| "unknown date".to_string()),
            amount: if tx.amount.is_finite() { tx.amount.abs() } else { 0.0 },
            kind: ActivityKind::of(tx),
        }
    }

    pub fn amount_label(&self) -> String {
        format!("{}{}", self.kind.sign(), rupees(self.amount))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActivityList {
    pub items: Vec<ActivityItem>,
    /// Items beyond the collapsed view
    pub hidden: usize,
    pub expanded: bool,
}

impl ActivityList {
    /// Keep all items when expanded, otherwise the first three
    pub fn new(mut items: Vec<ActivityItem>, expanded: bool) -> Self {
        let hidden = if expanded {
            0
        } else {
            items.len().saturating_sub(ACTIVITY_COLLAPSED)
        };
        if !expanded {
            items.truncate(ACTIVITY_COLLAPSED);
        }
        Self { items, hidden, expanded }
    }
}

pub fn recent_activity(records: &RecordSet, today: NaiveDate) -> Vec<ActivityItem> {
    recent_transactions(&records.transactions, ACTIVITY_LIMIT)
        .into_iter()
        .map(|tx| ActivityItem::from_transaction(tx, today))
        .collect()
}

pub fn relative_day(date: NaiveDate, today: NaiveDate) -> String {
    match (today - date).num_days() {
        0 => "today".to_string(),
        1 => "1 day ago".to_string(),
        -1 => "in 1 day".to_string(),
        n if n > 1 => format!("{} days ago", n),
        n => format!("in {} days", -n),
    }
}

/// Tip naming the category with the highest spend
pub fn smart_tip(records: &RecordSet) -> String {
    match top_spend_category(&records.transactions) {
        Some(top) => format!(
            "You've spent the most on {} recently. Consider reviewing your spending in this category.",
            top.category
        ),
        None => NO_EXPENSES_TIP.to_string(),
    }
}
