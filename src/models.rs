//! Core data models for the uploaded record set

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

//
// ================= Records =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Asset {
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: String,
    #[serde(default = "missing_number", deserialize_with = "lenient_number")]
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Liability {
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: String,
    #[serde(default = "missing_number", deserialize_with = "lenient_number")]
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default = "missing_number", deserialize_with = "lenient_number")]
    pub current: f64,
    #[serde(default = "missing_number", deserialize_with = "lenient_number")]
    pub target: f64,
    /// ISO date string, kept as supplied
    #[serde(default, deserialize_with = "lenient_string")]
    pub deadline: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    /// ISO date or timestamp string, kept as supplied
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub merchant: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,
    /// Signed: positive is money in, negative is money out
    #[serde(default = "missing_number", deserialize_with = "lenient_number")]
    pub amount: f64,
}

impl Transaction {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        crate::aggregate::parse_transaction_date(&self.date)
    }

    pub fn flow(&self) -> Flow {
        if self.amount > 0.0 {
            Flow::Income
        } else if self.amount < 0.0 {
            Flow::Expense
        } else {
            Flow::Neutral
        }
    }

    /// Expense magnitude, or `None` for income, zero and non-finite amounts
    pub fn spend(&self) -> Option<f64> {
        (self.amount.is_finite() && self.amount < 0.0).then(|| -self.amount)
    }

    /// Category used for grouping; blank categories collapse into "Other"
    pub fn category_key(&self) -> &str {
        let trimmed = self.category.trim();
        if trimmed.is_empty() {
            "Other"
        } else {
            trimmed
        }
    }

    /// Label for activity lists: category, then merchant, then a generic name
    pub fn label(&self) -> &str {
        if !self.category.trim().is_empty() {
            &self.category
        } else if !self.merchant.trim().is_empty() {
            &self.merchant
        } else {
            "Transaction"
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Flow {
    Income,
    Expense,
    Neutral,
}

//
// ================= Record Set =================
//

/// The uploaded bundle driving every dashboard view
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecordSet {
    pub assets: Vec<Asset>,
    pub liabilities: Vec<Liability>,
    pub goals: Vec<Goal>,
    pub transactions: Vec<Transaction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<Vec<String>>,
}

impl RecordSet {
    pub fn has_transactions(&self) -> bool {
        !self.transactions.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
            && self.liabilities.is_empty()
            && self.goals.is_empty()
            && self.transactions.is_empty()
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Flow::Income => "Income",
            Flow::Expense => "Expense",
            Flow::Neutral => "Neutral",
        };
        write!(f, "{}", s)
    }
}

//
// ================= Lenient field decoding =================
//

fn missing_number() -> f64 {
    f64::NAN
}

/// Numbers pass through; anything else becomes NaN instead of failing the upload
fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64().unwrap_or(f64::NAN))
}

/// Strings pass through, numbers and booleans are stringified, everything else is empty
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}
