//! Application state
//!
//! One `AppState` per session, shared by reference with every view and
//! handler. The record set is only ever replaced as a whole; views hold an
//! `Arc` to the snapshot they render.

use crate::backend::{self, CategoryAssignment, FinanceBackend, Session, Summaries};
use crate::chat::ChatSession;
use crate::loader::{load_record_set, upload_fingerprint};
use crate::models::RecordSet;
use crate::sequence::RequestSequencer;
use crate::views::Dashboard;
use crate::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// An uploaded record set plus what identifies the upload
#[derive(Debug, Clone, Serialize)]
pub struct LoadedRecords {
    pub records: Arc<RecordSet>,
    pub fingerprint: String,
    /// Bumped on every replacement, including categorization refreshes
    pub generation: u64,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadSummary {
    pub fingerprint: String,
    pub generation: u64,
    pub assets: usize,
    pub liabilities: usize,
    pub goals: usize,
    pub transactions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CategorizeOutcome {
    Applied { updated: usize, generation: u64 },
    /// Nothing loaded, or no transactions to send
    NothingToCategorize,
    /// A newer request or a new upload landed first
    Stale,
}

pub struct AppState {
    session: Session,
    records: RwLock<Option<Arc<LoadedRecords>>>,
    generation: AtomicU64,
    upload_error: RwLock<Option<String>>,
    summaries: RwLock<Option<Summaries>>,
    summaries_seq: RequestSequencer,
    categorize_seq: RequestSequencer,
    chat: ChatSession,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        Self {
            chat: ChatSession::new(session.clone()),
            session,
            records: RwLock::new(None),
            generation: AtomicU64::new(0),
            upload_error: RwLock::new(None),
            summaries: RwLock::new(None),
            summaries_seq: RequestSequencer::new(),
            categorize_seq: RequestSequencer::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    /// Load uploaded text and swap it in.
    ///
    /// On failure the previous record set stays and the error is kept for the
    /// inline error region until the next successful upload.
    pub async fn upload(&self, text: &str) -> Result<UploadSummary> {
        match load_record_set(text) {
            Ok(records) => {
                let loaded = self.replace(records, upload_fingerprint(text)).await;
                *self.upload_error.write().await = None;

                let summary = UploadSummary {
                    fingerprint: loaded.fingerprint.clone(),
                    generation: loaded.generation,
                    assets: loaded.records.assets.len(),
                    liabilities: loaded.records.liabilities.len(),
                    goals: loaded.records.goals.len(),
                    transactions: loaded.records.transactions.len(),
                };
                info!(
                    fingerprint = %summary.fingerprint,
                    transactions = summary.transactions,
                    "Record set uploaded"
                );
                Ok(summary)
            }
            Err(e) => {
                warn!("Upload rejected: {}", e);
                *self.upload_error.write().await = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Single-assignment replacement of the current record set
    pub async fn replace(&self, records: RecordSet, fingerprint: String) -> Arc<LoadedRecords> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let loaded = Arc::new(LoadedRecords {
            records: Arc::new(records),
            fingerprint,
            generation,
            loaded_at: Utc::now(),
        });
        *self.records.write().await = Some(loaded.clone());
        loaded
    }

    pub async fn records(&self) -> Option<Arc<LoadedRecords>> {
        self.records.read().await.clone()
    }

    pub async fn upload_error(&self) -> Option<String> {
        self.upload_error.read().await.clone()
    }

    pub async fn summaries(&self) -> Option<Summaries> {
        self.summaries.read().await.clone()
    }

    /// Fetch summaries; returns `None` when a newer refresh superseded this one
    pub async fn refresh_summaries(&self, backend: &dyn FinanceBackend) -> Result<Option<Summaries>> {
        let ticket = self.summaries_seq.begin();
        let summaries = backend::fetch_summaries(backend, &self.session).await?;

        let Some(summaries) = self.summaries_seq.accept(ticket, summaries) else {
            info!("Discarding stale summaries (ticket {})", ticket.value());
            return Ok(None);
        };

        *self.summaries.write().await = Some(summaries.clone());
        Ok(Some(summaries))
    }

    /// Categorize the current transactions and swap in the re-categorized set
    pub async fn categorize(&self, backend: &dyn FinanceBackend) -> Result<CategorizeOutcome> {
        let Some(current) = self.records().await else {
            return Ok(CategorizeOutcome::NothingToCategorize);
        };
        if !current.records.has_transactions() {
            return Ok(CategorizeOutcome::NothingToCategorize);
        }

        let ticket = self.categorize_seq.begin();
        let assignments =
            backend::categorize_transactions(backend, &self.session, &current.records.transactions)
                .await?;

        if !self.categorize_seq.is_current(ticket) {
            info!("Discarding stale categorization (ticket {})", ticket.value());
            return Ok(CategorizeOutcome::Stale);
        }

        // compare-and-swap against the snapshot the request was built from
        let mut slot = self.records.write().await;
        let still_same = slot
            .as_ref()
            .map(|loaded| loaded.generation == current.generation)
            .unwrap_or(false);
        if !still_same {
            info!("Record set replaced while categorizing; discarding result");
            return Ok(CategorizeOutcome::Stale);
        }

        let (records, updated) = apply_categories(&current.records, &assignments);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *slot = Some(Arc::new(LoadedRecords {
            records: Arc::new(records),
            fingerprint: current.fingerprint.clone(),
            generation,
            loaded_at: Utc::now(),
        }));

        Ok(CategorizeOutcome::Applied { updated, generation })
    }

    /// Build every dashboard panel from the current snapshot
    pub async fn dashboard(&self, today: NaiveDate, expanded: bool) -> Dashboard {
        let loaded = self.records().await;
        let summaries = self.summaries().await;
        Dashboard::build(
            loaded.as_ref().map(|l| l.records.as_ref()),
            summaries.as_ref(),
            today,
            expanded,
        )
    }
}

/// Copy of `records` with assigned categories written in by position; returns how many changed
pub fn apply_categories(records: &RecordSet, assignments: &[CategoryAssignment]) -> (RecordSet, usize) {
    let mut transactions = records.transactions.clone();
    let mut updated = 0;

    for assignment in assignments {
        let Some(tx) = transactions.get_mut(assignment.index) else {
            warn!("Category assignment for missing transaction {}", assignment.index);
            continue;
        };
        if tx.category != assignment.category {
            tx.category = assignment.category.clone();
            updated += 1;
        }
    }

    (
        RecordSet {
            transactions,
            ..records.clone()
        },
        updated,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::MockBackend;
    use crate::backend::SummarySource;
    use crate::error::DashboardError;
    use serde_json::json;
    use std::time::Duration;

    const SAMPLE: &str = r#"{
        "assets": [{"type": "savings", "value": 250000}],
        "liabilities": [{"type": "loan", "value": 80000}],
        "goals": [{"id": "g1", "name": "Trip", "current": 5, "target": 10, "deadline": "2025-12-01"}],
        "transactions": [
            {"id": "t1", "date": "2025-07-01", "merchant": "Swiggy", "category": "", "amount": -499},
            {"id": "t2", "date": "2025-07-02", "merchant": "Uber", "category": "transport", "amount": -180}
        ]
    }"#;

    fn state() -> AppState {
        AppState::new(Session {
            session_id: "test-session".into(),
            phone_number: "9999999999".into(),
        })
    }

    #[tokio::test]
    async fn test_upload_replaces_and_clears_error() {
        let app = state();
        assert!(app.records().await.is_none());

        let err = app.upload("{not json").await.unwrap_err();
        assert!(matches!(err, DashboardError::ParseError(_)));
        assert!(app.upload_error().await.unwrap().contains("not valid JSON"));

        let summary = app.upload(SAMPLE).await.unwrap();
        assert_eq!(summary.transactions, 2);
        assert_eq!(summary.generation, 1);
        assert!(app.upload_error().await.is_none());

        let second = app
            .upload(r#"{"assets":[],"liabilities":[],"goals":[],"transactions":[]}"#)
            .await
            .unwrap();
        assert_eq!(second.generation, 2);
        assert!(app.records().await.unwrap().records.is_empty());
    }

    #[tokio::test]
    async fn test_failed_upload_keeps_previous_records() {
        let app = state();
        app.upload(SAMPLE).await.unwrap();
        assert!(app.upload(r#"{"assets":[]}"#).await.is_err());

        let loaded = app.records().await.unwrap();
        assert_eq!(loaded.records.transactions.len(), 2);
        assert!(app.upload_error().await.unwrap().contains("liabilities"));
    }

    #[tokio::test]
    async fn test_snapshots_are_not_mutated_by_replacement() {
        let app = state();
        app.upload(SAMPLE).await.unwrap();
        let before = app.records().await.unwrap();

        app.upload(r#"{"assets":[],"liabilities":[],"goals":[],"transactions":[]}"#)
            .await
            .unwrap();
        assert_eq!(before.records.transactions.len(), 2);
    }

    #[tokio::test]
    async fn test_categorize_applies_new_categories() {
        let app = state();
        app.upload(SAMPLE).await.unwrap();
        let backend = MockBackend::new().with_categories(Ok(vec![json!("food"), json!("transport")]));

        let outcome = app.categorize(&backend).await.unwrap();
        assert_eq!(outcome, CategorizeOutcome::Applied { updated: 1, generation: 2 });

        let loaded = app.records().await.unwrap();
        assert_eq!(loaded.records.transactions[0].category, "food");
        assert_eq!(loaded.records.transactions[1].category, "transport");
    }

    #[tokio::test]
    async fn test_categorize_without_records() {
        let app = state();
        let backend = MockBackend::new();
        assert_eq!(
            app.categorize(&backend).await.unwrap(),
            CategorizeOutcome::NothingToCategorize
        );
    }

    #[tokio::test]
    async fn test_categorize_mismatch_surfaces_error_and_keeps_data() {
        let app = state();
        app.upload(SAMPLE).await.unwrap();
        let backend = MockBackend::new().with_categories(Ok(vec![json!("food")]));

        assert!(app.categorize(&backend).await.is_err());
        assert_eq!(app.records().await.unwrap().generation, 1);
    }

    #[tokio::test]
    async fn test_refresh_summaries_stores_result() {
        let app = state();
        let backend = MockBackend::new()
            .with_summaries(Err("404"))
            .with_answer(Ok(""));

        let summaries = app.refresh_summaries(&backend).await.unwrap().unwrap();
        assert_eq!(summaries.source, SummarySource::Placeholder);
        assert_eq!(app.summaries().await, Some(summaries));
    }

    #[test]
    fn test_apply_categories_counts_changes() {
        let records = load_record_set(SAMPLE).unwrap();
        let assignments = vec![
            CategoryAssignment { index: 0, transaction_id: "t1".into(), category: "food".into() },
            CategoryAssignment { index: 1, transaction_id: "t2".into(), category: "transport".into() },
        ];
        let (updated_records, updated) = apply_categories(&records, &assignments);
        assert_eq!(updated, 1);
        assert_eq!(updated_records.transactions[0].category, "food");
        assert_eq!(records.transactions[0].category, "");
    }

    #[tokio::test]
    async fn test_categorize_positional_without_ids() {
        let app = state();
        app.upload(
            r#"{"assets":[],"liabilities":[],"goals":[],"transactions":[
                {"date": "2025-07-01", "merchant": "Swiggy", "category": "", "amount": -499},
                {"date": "2025-07-02", "merchant": "Uber", "category": "", "amount": -180}
            ]}"#,
        )
        .await
        .unwrap();
        let backend = MockBackend::new().with_categories(Ok(vec![json!("food"), json!("transport")]));

        let outcome = app.categorize(&backend).await.unwrap();
        assert_eq!(outcome, CategorizeOutcome::Applied { updated: 2, generation: 2 });

        let loaded = app.records().await.unwrap();
        let categories: Vec<&str> = loaded.records.transactions.iter().map(|t| t.category.as_str()).collect();
        assert_eq!(categories, vec!["food", "transport"]);
    }

    #[tokio::test]
    async fn test_categorize_positional_with_repeated_ids() {
        let app = state();
        app.upload(
            r#"{"assets":[],"liabilities":[],"goals":[],"transactions":[
                {"id": "1", "date": "2025-07-01", "merchant": "Swiggy", "category": "", "amount": -499},
                {"id": "1", "date": "2025-07-02", "merchant": "Uber", "category": "", "amount": -180}
            ]}"#,
        )
        .await
        .unwrap();
        let backend = MockBackend::new().with_categories(Ok(vec![json!("food"), json!("transport")]));

        app.categorize(&backend).await.unwrap();
        let loaded = app.records().await.unwrap();
        assert_eq!(loaded.records.transactions[0].category, "food");
        assert_eq!(loaded.records.transactions[1].category, "transport");
    }

    #[tokio::test]
    async fn test_categorize_superseded_by_newer_request() {
        let app = state();
        app.upload(SAMPLE).await.unwrap();
        let slow = MockBackend::new()
            .with_categories(Ok(vec![json!("slow-a"), json!("slow-b")]))
            .with_categorize_delay(Duration::from_millis(50));
        let fast = MockBackend::new().with_categories(Ok(vec![json!("food"), json!("travel")]));

        let (first, second) = tokio::join!(app.categorize(&slow), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            app.categorize(&fast).await
        });

        assert_eq!(first.unwrap(), CategorizeOutcome::Stale);
        assert_eq!(second.unwrap(), CategorizeOutcome::Applied { updated: 2, generation: 2 });

        let loaded = app.records().await.unwrap();
        assert_eq!(loaded.generation, 2);
        assert_eq!(loaded.records.transactions[0].category, "food");
        assert_eq!(loaded.records.transactions[1].category, "travel");
    }

    #[tokio::test]
    async fn test_categorize_discarded_when_upload_lands_first() {
        let app = state();
        app.upload(SAMPLE).await.unwrap();
        let slow = MockBackend::new()
            .with_categories(Ok(vec![json!("food"), json!("transport")]))
            .with_categorize_delay(Duration::from_millis(50));
        let replacement = r#"{"assets":[],"liabilities":[],"goals":[],"transactions":[
            {"id": "n1", "date": "2025-07-05", "merchant": "Zepto", "category": "groceries", "amount": -320}
        ]}"#;

        let (outcome, uploaded) = tokio::join!(app.categorize(&slow), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            app.upload(replacement).await
        });

        assert_eq!(outcome.unwrap(), CategorizeOutcome::Stale);
        assert_eq!(uploaded.unwrap().generation, 2);

        let loaded = app.records().await.unwrap();
        assert_eq!(loaded.generation, 2);
        assert_eq!(loaded.records.transactions.len(), 1);
        assert_eq!(loaded.records.transactions[0].category, "groceries");
    }

    #[tokio::test]
    async fn test_refresh_summaries_superseded_keeps_newer() {
        let app = state();
        let slow = MockBackend::new()
            .with_summaries(Ok(vec!["old".into()]))
            .with_summaries_delay(Duration::from_millis(50));
        let fast = MockBackend::new().with_summaries(Ok(vec!["new".into()]));

        let (first, second) = tokio::join!(app.refresh_summaries(&slow), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            app.refresh_summaries(&fast).await
        });

        assert_eq!(first.unwrap(), None);
        let kept = second.unwrap().unwrap();
        assert_eq!(kept.lines, vec!["new"]);
        assert_eq!(app.summaries().await, Some(kept));
    }
}
