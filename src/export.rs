//! CSV exports: receipts and the dashboard report

use crate::aggregate::recent_transactions;
use crate::models::RecordSet;
use crate::views::{Dashboard, Panel};
use crate::Result;
use csv::Writer;
use std::io;
use std::path::Path;
use tracing::info;

pub const RECEIPTS_HEADER: [&str; 3] = ["Date", "Merchant", "Amount"];
pub const REPORT_HEADER: [&str; 5] = ["Section", "Metric", "Value", "Source", "Action"];

/// Rows exported when nothing has been uploaded
const SAMPLE_RECEIPTS: [(&str, &str, f64); 3] = [
    ("2025-07-03", "Starbucks", 400.0),
    ("2025-07-02", "Uber", 800.0),
    ("2025-07-01", "Amazon", 1200.0),
];

fn finish(writer: Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

fn number(value: f64) -> String {
    if value.is_finite() {
        format!("{}", value)
    } else {
        String::new()
    }
}

/// One row per transaction, newest first
pub fn receipts_csv(records: Option<&RecordSet>) -> Result<String> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(RECEIPTS_HEADER)?;

    match records.filter(|r| r.has_transactions()) {
        Some(records) => {
            let transactions = &records.transactions;
            for tx in recent_transactions(transactions, transactions.len()) {
                writer.write_record([tx.date.as_str(), tx.merchant.as_str(), number(tx.amount).as_str()])?;
            }
        }
        None => {
            for (date, merchant, amount) in SAMPLE_RECEIPTS {
                writer.write_record([date, merchant, number(amount).as_str()])?;
            }
        }
    }

    finish(writer)
}

fn source<T>(panel: &Panel<T>) -> &'static str {
    if panel.is_sample() {
        "sample"
    } else {
        "upload"
    }
}

/// Summary totals, goal progress, top category and summaries as one sheet
pub fn report_csv(dashboard: &Dashboard) -> Result<String> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(REPORT_HEADER)?;

    if let Some(card) = dashboard.summary.data() {
        let src = source(&dashboard.summary);
        writer.write_record(["Summary", "Total assets", number(card.total_assets).as_str(), src, ""])?;
        writer.write_record(["Summary", "Total liabilities", number(card.total_liabilities).as_str(), src, ""])?;
        writer.write_record(["Summary", "Net worth", number(card.net_worth).as_str(), src, ""])?;
        writer.write_record(["Summary", "Active goals", card.active_goals.to_string().as_str(), src, ""])?;
    }

    if let Some(goal) = dashboard.goal.data() {
        writer.write_record([
            "Goal",
            goal.name.as_str(),
            format!("{}%", goal.progress.percent).as_str(),
            source(&dashboard.goal),
            goal.status.as_str(),
        ])?;
    }

    match &dashboard.spending {
        Panel::Empty { message } => {
            writer.write_record(["Spending", "Top category", "", "upload", message.as_str()])?;
        }
        panel => {
            if let Some(top) = panel.data().and_then(|slices| slices.first()) {
                let tip = dashboard.smart_tip.data().map(String::as_str).unwrap_or_default();
                writer.write_record([
                    "Spending",
                    format!("Top category: {}", top.category).as_str(),
                    number(top.amount).as_str(),
                    source(panel),
                    tip,
                ])?;
            }
        }
    }

    if let Some(summaries) = &dashboard.summaries {
        let src = summaries.source.to_string();
        for (i, line) in summaries.lines.iter().enumerate() {
            writer.write_record(["Summaries", format!("Point {}", i + 1).as_str(), line.as_str(), src.as_str(), ""])?;
        }
    }

    finish(writer)
}

pub fn write_export(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    info!("Wrote {}", path.display());
    Ok(())
}
