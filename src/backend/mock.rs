//! Scripted backend for unit tests

use super::{AskRequest, CategorizeRequest, FinanceBackend, SummariesRequest};
use crate::error::DashboardError;
use crate::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Answers with the prompt echoed back unless scripted otherwise
pub(crate) struct MockBackend {
    answer: Option<std::result::Result<String, String>>,
    categories: std::result::Result<Vec<Value>, String>,
    summaries: std::result::Result<Vec<String>, String>,
    delays: HashMap<String, Duration>,
    categorize_delay: Option<Duration>,
    summaries_delay: Option<Duration>,
    ask_calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    last_categorize: Mutex<Option<CategorizeRequest>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            answer: None,
            categories: Ok(Vec::new()),
            summaries: Err("not scripted".to_string()),
            delays: HashMap::new(),
            categorize_delay: None,
            summaries_delay: None,
            ask_calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            last_categorize: Mutex::new(None),
        }
    }

    pub fn with_answer(mut self, answer: std::result::Result<&str, &str>) -> Self {
        self.answer = Some(answer.map(str::to_string).map_err(str::to_string));
        self
    }

    pub fn with_categories(mut self, categories: std::result::Result<Vec<Value>, &str>) -> Self {
        self.categories = categories.map_err(str::to_string);
        self
    }

    pub fn with_summaries(mut self, summaries: std::result::Result<Vec<String>, &str>) -> Self {
        self.summaries = summaries.map_err(str::to_string);
        self
    }

    /// Hold the answer to `prompt` back for `delay`
    pub fn with_delay(mut self, prompt: &str, delay: Duration) -> Self {
        self.delays.insert(prompt.to_string(), delay);
        self
    }

    pub fn with_categorize_delay(mut self, delay: Duration) -> Self {
        self.categorize_delay = Some(delay);
        self
    }

    pub fn with_summaries_delay(mut self, delay: Duration) -> Self {
        self.summaries_delay = Some(delay);
        self
    }

    pub fn ask_calls(&self) -> usize {
        self.ask_calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }

    pub fn last_categorize(&self) -> Option<CategorizeRequest> {
        self.last_categorize.lock().unwrap().clone()
    }
}

#[async_trait]
impl FinanceBackend for MockBackend {
    async fn ask(&self, request: &AskRequest) -> Result<String> {
        self.ask_calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt.clone());

        if let Some(delay) = self.delays.get(&request.prompt) {
            tokio::time::sleep(*delay).await;
        }

        match &self.answer {
            None => Ok(format!("echo: {}", request.prompt)),
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(e)) => Err(DashboardError::BackendError(e.clone())),
        }
    }

    async fn categorize(&self, request: &CategorizeRequest) -> Result<Vec<Value>> {
        *self.last_categorize.lock().unwrap() = Some(request.clone());
        if let Some(delay) = self.categorize_delay {
            tokio::time::sleep(delay).await;
        }
        self.categories
            .clone()
            .map_err(DashboardError::BackendError)
    }

    async fn summaries(&self, _request: &SummariesRequest) -> Result<Vec<String>> {
        if let Some(delay) = self.summaries_delay {
            tokio::time::sleep(delay).await;
        }
        self.summaries
            .clone()
            .map_err(DashboardError::BackendError)
    }
}
