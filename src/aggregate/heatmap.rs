//! Daily spend heatmap: dense weekly grid with five intensity tiers

use super::daily::DailyTotal;
use super::week_start;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

/// Longest span the grid covers; older days are dropped
pub const MAX_HEATMAP_WEEKS: i64 = 53;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Zero,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl Tier {
    pub const ALL: [Tier; 5] = [Tier::Zero, Tier::Low, Tier::Medium, Tier::High, Tier::VeryHigh];

    /// Legend text for this tier given the grid thresholds
    pub fn legend(self, thresholds: &[f64; 3]) -> String {
        match self {
            Tier::Zero => "0".to_string(),
            Tier::Low => format!("1 - {}", thresholds[0]),
            Tier::Medium => format!("{} - {}", thresholds[0] + 1.0, thresholds[1]),
            Tier::High => format!("{} - {}", thresholds[1] + 1.0, thresholds[2]),
            Tier::VeryHigh => format!("{}+", thresholds[2] + 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub amount: f64,
    pub tier: Tier,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct HeatmapGrid {
    /// Rows of seven days, Monday first
    pub weeks: Vec<Vec<HeatmapCell>>,
    pub thresholds: [f64; 3],
    pub max: f64,
}

impl HeatmapGrid {
    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = &HeatmapCell> {
        self.weeks.iter().flatten()
    }
}

/// Thresholds at 25%, 50% and 75% of the maximum, rounded up
pub fn heatmap_thresholds(max: f64) -> [f64; 3] {
    let max = if max.is_finite() { max.max(0.0) } else { 0.0 };
    [(max * 0.25).ceil(), (max * 0.5).ceil(), (max * 0.75).ceil()]
}

/// Intensity tier; zero, negative and non-finite amounts are `Zero`
pub fn heatmap_tier(amount: f64, thresholds: &[f64; 3]) -> Tier {
    if !amount.is_finite() || amount <= 0.0 {
        Tier::Zero
    } else if amount <= thresholds[0] {
        Tier::Low
    } else if amount <= thresholds[1] {
        Tier::Medium
    } else if amount <= thresholds[2] {
        Tier::High
    } else {
        Tier::VeryHigh
    }
}

/// Build the grid from the Monday of the earliest day through the week of the
/// latest day, at most `MAX_HEATMAP_WEEKS` rows ending at the latest week.
/// Days with no entry are zero.
pub fn heatmap_grid(days: &[DailyTotal]) -> HeatmapGrid {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for day in days.iter().filter(|d| d.amount.is_finite()) {
        *by_day.entry(day.date).or_insert(0.0) += day.amount;
    }

    let (Some(first), Some(last)) = (by_day.keys().next().copied(), by_day.keys().next_back().copied()) else {
        return HeatmapGrid {
            thresholds: heatmap_thresholds(0.0),
            ..HeatmapGrid::default()
        };
    };

    let mut start = week_start(first);
    let mut week_count = ((last - start).num_days() + 7) / 7;
    if week_count > MAX_HEATMAP_WEEKS {
        start = week_start(last) - Duration::weeks(MAX_HEATMAP_WEEKS - 1);
        warn!(
            "Heatmap spans {} weeks from {}; showing the last {} from {}",
            week_count, first, MAX_HEATMAP_WEEKS, start
        );
        week_count = MAX_HEATMAP_WEEKS;
        by_day = by_day.split_off(&start);
    }

    let max = by_day.values().copied().fold(0.0_f64, f64::max);
    let thresholds = heatmap_thresholds(max);

    let weeks = (0..week_count)
        .map(|w| {
            (0..7)
                .map(|d| {
                    let date = start + Duration::days(w * 7 + d);
                    let amount = by_day.get(&date).copied().unwrap_or(0.0);
                    HeatmapCell {
                        date,
                        amount,
                        tier: heatmap_tier(amount, &thresholds),
                    }
                })
                .collect()
        })
        .collect();

    HeatmapGrid {
        weeks,
        thresholds,
        max,
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tier::Zero => "zero",
            Tier::Low => "low",
            Tier::Medium => "medium",
            Tier::High => "high",
            Tier::VeryHigh => "very high",
        };
        write!(f, "{}", s)
    }
}
