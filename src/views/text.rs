//! Plain-text rendering of dashboard panels for the terminal

use super::cards::{ActivityList, GoalCard, ReceiptRow, SummaryCard};
use super::charts::PieSlice;
use super::format::{day_month, rupees};
use super::{Dashboard, Panel};
use crate::aggregate::{CategoryBreakdown, DailyTotal, HeatmapGrid, Tier, WeeklyTotal};
use crate::backend::Summaries;
use std::fmt::Write;

const BAR_WIDTH: usize = 24;

pub fn tier_glyph(tier: Tier) -> char {
    match tier {
        Tier::Zero => '·',
        Tier::Low => '░',
        Tier::Medium => '▒',
        Tier::High => '▓',
        Tier::VeryHigh => '█',
    }
}

/// Render a panel body with a heading; sample panels carry their prompt
fn section<T>(title: &str, panel: &Panel<T>, body: impl Fn(&T) -> String) -> String {
    let mut out = format!("## {}\n", title);
    match panel {
        Panel::Sample { data, prompt } => {
            let _ = writeln!(out, "_{}_ (sample data)", prompt);
            out.push_str(&body(data));
        }
        Panel::Empty { message } => {
            let _ = writeln!(out, "{}", message);
        }
        Panel::Live { data } => out.push_str(&body(data)),
    }
    out
}

fn bar(amount: f64, max: f64) -> String {
    let filled = if max > 0.0 && amount.is_finite() {
        ((amount / max) * BAR_WIDTH as f64).round().clamp(0.0, BAR_WIDTH as f64) as usize
    } else {
        0
    };
    "█".repeat(filled)
}

pub fn format_summary(card: &SummaryCard) -> String {
    format!(
        "Total assets:      {}\nTotal liabilities: {}\nNet worth:         {}\nActive goals:      {}\n",
        rupees(card.total_assets),
        rupees(card.total_liabilities),
        rupees(card.net_worth),
        card.active_goals
    )
}

pub fn format_goal(card: &GoalCard) -> String {
    let filled = card.progress.percent as usize * BAR_WIDTH / 100;
    format!(
        "{} ({}%)\n[{}{}]\n{} of {}  {}\n{}\n",
        card.name,
        card.progress.percent,
        "█".repeat(filled),
        " ".repeat(BAR_WIDTH - filled),
        rupees(card.current),
        rupees(card.target),
        card.status,
        card.message
    )
}

pub fn format_receipts(rows: &[ReceiptRow]) -> String {
    rows.iter().fold(String::new(), |mut out, row| {
        let _ = writeln!(
            out,
            "{} {:<20} {:>7}  {}",
            row.icon,
            row.merchant,
            row.date_label(),
            rupees(row.amount)
        );
        out
    })
}

pub fn format_activity(list: &ActivityList) -> String {
    let mut out = String::new();
    for item in &list.items {
        let _ = writeln!(out, "{:<24} {:<14} {}", item.label, item.when, item.amount_label());
    }
    if list.hidden > 0 {
        let _ = writeln!(out, "… {} more (use --all to expand)", list.hidden);
    }
    out
}

pub fn format_pie(slices: &[PieSlice]) -> String {
    let max = slices.iter().map(|s| s.amount).fold(0.0, f64::max);
    slices.iter().fold(String::new(), |mut out, slice| {
        let _ = writeln!(
            out,
            "{:<16} {:>12} {:>5.1}%  {}",
            slice.category,
            rupees(slice.amount),
            slice.percent,
            bar(slice.amount, max)
        );
        out
    })
}

pub fn format_trend(weeks: &[WeeklyTotal]) -> String {
    let max = weeks.iter().map(|w| w.amount).fold(0.0, f64::max);
    weeks.iter().fold(String::new(), |mut out, week| {
        let _ = writeln!(
            out,
            "{:<16} {:>12}  {}",
            week.label,
            rupees(week.amount),
            bar(week.amount, max)
        );
        out
    })
}

pub fn format_categories(breakdown: &CategoryBreakdown) -> String {
    let mut out = String::new();
    for week in &breakdown.weeks {
        let cells: Vec<String> = breakdown
            .categories
            .iter()
            .map(|c| format!("{} {}", c, rupees(week.totals.get(c).copied().unwrap_or(0.0))))
            .collect();
        let _ = writeln!(out, "{:<16} {}", week.label, cells.join(" | "));
    }
    out
}

pub fn format_heatmap(grid: &HeatmapGrid) -> String {
    let mut out = String::from("             M T W T F S S\n");
    for week in &grid.weeks {
        let start = week.first().map(|c| day_month(c.date)).unwrap_or_default();
        let glyphs: Vec<String> = week.iter().map(|c| tier_glyph(c.tier).to_string()).collect();
        let _ = writeln!(out, "{:<12} {}", start, glyphs.join(" "));
    }
    let legend: Vec<String> = Tier::ALL
        .iter()
        .map(|t| format!("{} {}", tier_glyph(*t), t.legend(&grid.thresholds)))
        .collect();
    let _ = writeln!(out, "{}", legend.join("  "));
    out
}

pub fn format_daily(days: &[DailyTotal]) -> String {
    let max = days.iter().map(|d| d.amount).fold(0.0, f64::max);
    days.iter().fold(String::new(), |mut out, day| {
        let _ = writeln!(
            out,
            "{:<8} {:>12}  {}",
            day_month(day.date),
            rupees(day.amount),
            bar(day.amount, max)
        );
        out
    })
}

pub fn format_summaries(summaries: &Summaries) -> String {
    let mut out = format!("## AI Summaries ({})\n", summaries.source);
    for line in &summaries.lines {
        let _ = writeln!(out, "- {}", line);
    }
    out
}

pub fn render_dashboard(dashboard: &Dashboard) -> String {
    let mut parts = vec![
        section("Summary", &dashboard.summary, format_summary),
        section("Financial Goal", &dashboard.goal, format_goal),
        section("Recent Receipts", &dashboard.receipts, |rows| format_receipts(rows)),
        section("Recent Activity", &dashboard.recent_activity, format_activity),
        section("Spending by Category", &dashboard.spending, |s| format_pie(s)),
        section("Weekly Trend", &dashboard.trend, |w| format_trend(w)),
        section("Weekly Categories", &dashboard.categories, format_categories),
        section("Daily Spend", &dashboard.heatmap, format_heatmap),
        section("Last 14 Days", &dashboard.daily_spend, |d| format_daily(d)),
        section("Smart Tip", &dashboard.smart_tip, |tip| format!("{}\n", tip)),
    ];

    if !dashboard.insights.is_empty() {
        let mut insights = String::from("## Insights\n");
        for line in &dashboard.insights {
            let _ = writeln!(insights, "- {}", line);
        }
        parts.push(insights);
    }
    if let Some(summaries) = &dashboard.summaries {
        parts.push(format_summaries(summaries));
    }

    parts.join("\n")
}
