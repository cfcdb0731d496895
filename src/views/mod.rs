//! View models for every dashboard panel
//!
//! Each panel is either sample data with an upload prompt, an empty-state
//! message, or live data computed from the current record set.

pub mod cards;
pub mod charts;
pub mod format;
pub mod samples;
pub mod text;

use crate::aggregate::{CategoryBreakdown, DailyTotal, HeatmapGrid, WeeklyTotal};
use crate::backend::Summaries;
use crate::models::RecordSet;
use cards::{ActivityList, GoalCard, ReceiptRow, SummaryCard};
use charts::PieSlice;
use chrono::NaiveDate;
use serde::Serialize;

pub const NO_SPENDING: &str = "No spending data yet.";
pub const NO_TREND: &str = "No weekly trend data yet.";
pub const NO_CATEGORIES: &str = "No category data yet.";
pub const NO_DAILY: &str = "No daily data yet.";
pub const NO_RECENT_DAYS: &str = "No spending in the last 14 days.";
pub const NO_EXPENSES: &str = "No recent expenses.";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Panel<T> {
    Sample { data: T, prompt: String },
    Empty { message: String },
    Live { data: T },
}

impl<T> Panel<T> {
    pub fn sample(data: T, prompt: &str) -> Self {
        Panel::Sample {
            data,
            prompt: prompt.to_string(),
        }
    }

    pub fn empty(message: &str) -> Self {
        Panel::Empty {
            message: message.to_string(),
        }
    }

    /// Live data, or the empty message when `is_empty` holds
    pub fn live_or_empty(data: T, is_empty: impl FnOnce(&T) -> bool, message: &str) -> Self {
        if is_empty(&data) {
            Self::empty(message)
        } else {
            Panel::Live { data }
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Panel::Sample { data, .. } | Panel::Live { data } => Some(data),
            Panel::Empty { .. } => None,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Panel::Live { .. })
    }

    pub fn is_sample(&self) -> bool {
        matches!(self, Panel::Sample { .. })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Dashboard {
    pub summary: Panel<SummaryCard>,
    pub goal: Panel<GoalCard>,
    pub receipts: Panel<Vec<ReceiptRow>>,
    pub recent_activity: Panel<ActivityList>,
    pub spending: Panel<Vec<PieSlice>>,
    pub trend: Panel<Vec<WeeklyTotal>>,
    pub categories: Panel<CategoryBreakdown>,
    pub heatmap: Panel<HeatmapGrid>,
    pub daily_spend: Panel<Vec<DailyTotal>>,
    pub smart_tip: Panel<String>,
    /// Insights carried in the upload, if any
    pub insights: Vec<String>,
    pub summaries: Option<Summaries>,
}

impl Dashboard {
    /// Build every panel. `None` records means nothing has been uploaded.
    pub fn build(
        records: Option<&RecordSet>,
        summaries: Option<&Summaries>,
        today: NaiveDate,
        expanded: bool,
    ) -> Self {
        let empty = RecordSet::default();
        let loaded = records.is_some();
        let records = records.unwrap_or(&empty);

        let has_balances =
            !(records.assets.is_empty() && records.liabilities.is_empty() && records.goals.is_empty());
        let has_transactions = records.has_transactions();

        let summary = if loaded && has_balances {
            Panel::Live {
                data: SummaryCard::from_records(records),
            }
        } else {
            Panel::sample(samples::summary(), samples::SUMMARY_PROMPT)
        };

        let goal = match GoalCard::first(records) {
            Some(card) => Panel::Live { data: card },
            None => Panel::sample(samples::goal(), samples::GOAL_PROMPT),
        };

        if !has_transactions {
            return Self {
                summary,
                goal,
                receipts: Panel::sample(samples::receipts(), samples::RECEIPTS_PROMPT),
                recent_activity: Panel::sample(
                    ActivityList::new(samples::activity(), expanded),
                    samples::ACTIVITY_PROMPT,
                ),
                spending: Panel::sample(charts::pie_slices(samples::spending()), samples::CHART_PROMPT),
                trend: Panel::sample(samples::trend(), samples::CHART_PROMPT),
                categories: Panel::sample(samples::categories(), samples::CHART_PROMPT),
                heatmap: Panel::sample(samples::heatmap(), samples::CHART_PROMPT),
                daily_spend: Panel::sample(samples::daily_spend(), samples::CHART_PROMPT),
                smart_tip: Panel::sample(samples::SMART_TIP.to_string(), samples::CHART_PROMPT),
                insights: records.insights.clone().unwrap_or_default(),
                summaries: summaries.cloned(),
            };
        }

        Self {
            summary,
            goal,
            receipts: Panel::live_or_empty(cards::receipts(records), Vec::is_empty, NO_EXPENSES),
            recent_activity: Panel::Live {
                data: ActivityList::new(cards::recent_activity(records, today), expanded),
            },
            spending: Panel::live_or_empty(charts::spending_pie(records), Vec::is_empty, NO_SPENDING),
            trend: Panel::live_or_empty(charts::spending_trend(records), Vec::is_empty, NO_TREND),
            categories: Panel::live_or_empty(
                charts::category_bars(records),
                CategoryBreakdown::is_empty,
                NO_CATEGORIES,
            ),
            heatmap: Panel::live_or_empty(charts::spend_heatmap(records), HeatmapGrid::is_empty, NO_DAILY),
            daily_spend: Panel::live_or_empty(
                charts::recent_daily_spend(records, today),
                Vec::is_empty,
                NO_RECENT_DAYS,
            ),
            smart_tip: Panel::Live {
                data: cards::smart_tip(records),
            },
            insights: records.insights.clone().unwrap_or_default(),
            summaries: summaries.cloned(),
        }
    }
}
