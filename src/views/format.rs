//! Display formatting for rupee amounts and short dates

use chrono::NaiveDate;

/// Format an amount as rupees with Indian digit grouping: ₹12,34,567.50
///
/// Whole amounts drop the paise. Non-finite values render as a dash.
pub fn rupees(val: f64) -> String {
    if !val.is_finite() {
        return "₹—".to_string();
    }

    let negative = val < 0.0;
    let abs = val.abs();
    let fixed = format!("{:.2}", abs);
    let (int_part, dec_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let grouped = group_indian(int_part);
    let body = if dec_part == "00" {
        format!("₹{grouped}")
    } else {
        format!("₹{grouped}.{dec_part}")
    };

    if negative && abs >= 0.005 {
        format!("-{body}")
    } else {
        body
    }
}

/// Last three digits, then groups of two
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// "10 Jul"
pub fn day_month(date: NaiveDate) -> String {
    date.format("%d %b").to_string()
}
