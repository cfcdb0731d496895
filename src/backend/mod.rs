//! Remote callers for the AI backend
//!
//! Three stateless request/response operations: chat answers, transaction
//! categorization and summary generation. `FinanceBackend` is the seam; the
//! reqwest implementation lives in `http`.

use crate::config::Config;
use crate::error::DashboardError;
use crate::models::Transaction;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{info, warn};

pub mod http;
pub use http::HttpBackend;

#[cfg(test)]
pub(crate) mod mock;

/// Prompt sent to `/ask` when the summaries endpoint is unavailable
pub const SUMMARY_FALLBACK_PROMPT: &str = "Generate 5 personalized financial summary points for the user. \
Keep each point concise and actionable. Return only the summary points, one per line.";

pub const MAX_SUMMARIES: usize = 5;

/// Shown when the fallback answer contains no usable lines
pub const PLACEHOLDER_SUMMARIES: [&str; 5] = [
    "Your total assets are ₹2,50,000",
    "You have 3 active financial goals",
    "Your monthly spending is ₹45,000",
    "You've saved 15% of your income this month",
    "Your emergency fund covers 6 months of expenses",
];

/// Identity the backend scopes every request to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub phone_number: String,
}

impl From<&Config> for Session {
    fn from(config: &Config) -> Self {
        Self {
            session_id: config.session_id.clone(),
            phone_number: config.phone_number.clone(),
        }
    }
}

/// =============================
/// Wire Models
/// =============================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub prompt: String,
    pub session_id: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorizeRequest {
    pub session_id: String,
    pub phone_number: String,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummariesRequest {
    pub session_id: String,
}

/// Trait for the AI backend (one implementation per transport)
#[async_trait]
pub trait FinanceBackend: Send + Sync {
    /// Conversational answer for a prompt
    async fn ask(&self, request: &AskRequest) -> Result<String>;

    /// Raw category entries as returned by the server
    async fn categorize(&self, request: &CategorizeRequest) -> Result<Vec<Value>>;

    /// Summary lines from the dedicated endpoint
    async fn summaries(&self, request: &SummariesRequest) -> Result<Vec<String>>;
}

/// =============================
/// Ask
/// =============================

pub async fn ask(backend: &dyn FinanceBackend, session: &Session, prompt: &str) -> Result<String> {
    let request = AskRequest {
        prompt: prompt.to_string(),
        session_id: session.session_id.clone(),
        phone_number: session.phone_number.clone(),
    };
    backend.ask(&request).await
}

/// =============================
/// Categorize
/// =============================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAssignment {
    /// Position of the transaction in the request
    pub index: usize,
    pub transaction_id: String,
    pub category: String,
}

/// Categorize transactions and tie each returned category back to its transaction
pub async fn categorize_transactions(
    backend: &dyn FinanceBackend,
    session: &Session,
    transactions: &[Transaction],
) -> Result<Vec<CategoryAssignment>> {
    let request = CategorizeRequest {
        session_id: session.session_id.clone(),
        phone_number: session.phone_number.clone(),
        transactions: transactions.to_vec(),
    };

    let raw = backend.categorize(&request).await?;
    let assignments = reassociate_categories(transactions, &raw)?;

    info!(
        "Categorized {} of {} transactions",
        assignments.len(),
        transactions.len()
    );
    Ok(assignments)
}

/// Match server category entries to input transactions.
///
/// Entries that all carry an `id` are matched by id, which requires every
/// input transaction to have a distinct non-empty id. Otherwise the count must
/// equal the input count and entries are matched by position.
pub fn reassociate_categories(
    transactions: &[Transaction],
    raw: &[Value],
) -> Result<Vec<CategoryAssignment>> {
    let keyed: Option<Vec<(String, String)>> = raw
        .iter()
        .map(|entry| Some((entry_id(entry)?, entry_category(entry)?)))
        .collect();

    if let Some(keyed) = keyed.filter(|k| !k.is_empty()) {
        return assign_by_id(transactions, keyed);
    }

    if raw.len() != transactions.len() {
        return Err(DashboardError::BackendError(format!(
            "categorization returned {} categories for {} transactions",
            raw.len(),
            transactions.len()
        )));
    }

    transactions
        .iter()
        .zip(raw)
        .enumerate()
        .map(|(index, (tx, entry))| {
            let category = entry_category(entry).ok_or_else(|| {
                DashboardError::BackendError(format!(
                    "categorization entry {} has no category",
                    index
                ))
            })?;
            Ok(CategoryAssignment {
                index,
                transaction_id: tx.id.clone(),
                category,
            })
        })
        .collect()
}

fn assign_by_id(
    transactions: &[Transaction],
    keyed: Vec<(String, String)>,
) -> Result<Vec<CategoryAssignment>> {
    let mut index_of: HashMap<&str, usize> = HashMap::new();
    for (index, tx) in transactions.iter().enumerate() {
        if tx.id.is_empty() || index_of.insert(tx.id.as_str(), index).is_some() {
            return Err(DashboardError::BackendError(format!(
                "categorization returned ids but transaction {} has a missing or repeated id",
                index
            )));
        }
    }

    let mut seen: HashSet<usize> = HashSet::new();
    keyed
        .into_iter()
        .map(|(id, category)| {
            let Some(&index) = index_of.get(id.as_str()) else {
                return Err(DashboardError::BackendError(format!(
                    "categorization returned unknown transaction id '{}'",
                    id
                )));
            };
            if !seen.insert(index) {
                return Err(DashboardError::BackendError(format!(
                    "categorization returned transaction id '{}' more than once",
                    id
                )));
            }
            Ok(CategoryAssignment {
                index,
                transaction_id: id,
                category,
            })
        })
        .collect()
}

fn entry_id(entry: &Value) -> Option<String> {
    match entry.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn entry_category(entry: &Value) -> Option<String> {
    match entry {
        Value::String(s) => Some(s.clone()),
        Value::Object(_) => entry.get("category")?.as_str().map(str::to_string),
        _ => None,
    }
}

/// =============================
/// Summaries
/// =============================

/// Which tier produced a set of summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummarySource {
    Endpoint,
    AskFallback,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summaries {
    pub lines: Vec<String>,
    pub source: SummarySource,
}

impl Summaries {
    pub fn is_placeholder(&self) -> bool {
        self.source == SummarySource::Placeholder
    }
}

/// Summaries endpoint first, then `/ask` with a fixed prompt, then placeholders.
///
/// Only a failure of the `/ask` fallback is returned as an error.
pub async fn fetch_summaries(backend: &dyn FinanceBackend, session: &Session) -> Result<Summaries> {
    let request = SummariesRequest {
        session_id: session.session_id.clone(),
    };

    match backend.summaries(&request).await {
        Ok(lines) => {
            info!("Summaries from dedicated endpoint ({} lines)", lines.len());
            return Ok(Summaries {
                lines,
                source: SummarySource::Endpoint,
            });
        }
        Err(e) => {
            warn!("Summaries endpoint not available, using ask fallback: {}", e);
        }
    }

    let answer = ask(backend, session, SUMMARY_FALLBACK_PROMPT).await?;
    let lines = split_summary_lines(&answer);

    if lines.is_empty() {
        warn!("Ask fallback returned no summary lines, using placeholders");
        return Ok(Summaries {
            lines: PLACEHOLDER_SUMMARIES.iter().map(|s| s.to_string()).collect(),
            source: SummarySource::Placeholder,
        });
    }

    Ok(Summaries {
        lines,
        source: SummarySource::AskFallback,
    })
}

/// Non-blank lines of an answer, at most `MAX_SUMMARIES`
pub fn split_summary_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(MAX_SUMMARIES)
        .map(str::to_string)
        .collect()
}

impl fmt::Display for SummarySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SummarySource::Endpoint => "backend",
            SummarySource::AskFallback => "ask-fallback",
            SummarySource::Placeholder => "placeholder",
        };
        write!(f, "{}", s)
    }
}
