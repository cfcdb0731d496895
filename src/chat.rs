//! AI assistant chat session
//!
//! Stores the transcript shown in the assistant panel and routes prompts to
//! the backend's ask endpoint. Answers to superseded prompts are dropped.

use crate::backend::{self, FinanceBackend, Session};
use crate::sequence::RequestSequencer;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

pub const WELCOME_MESSAGE: &str = "Welcome to WalletSense!";

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

/// A single message in the transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub message_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub role: MessageRole,
    pub content: String,
    /// Set on system entries that report a failed request
    #[serde(default)]
    pub is_error: bool,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: String) -> Self {
        Self {
            message_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            role,
            content,
            is_error: false,
        }
    }

    pub fn error(content: String) -> Self {
        Self {
            is_error: true,
            ..Self::new(MessageRole::System, content)
        }
    }
}

/// Transcript for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    messages: VecDeque<ChatMessage>,
}

impl Transcript {
    /// New transcript seeded with the welcome message
    pub fn new() -> Self {
        let mut transcript = Self {
            created_at: Utc::now(),
            updated_at: Utc::now(),
            messages: VecDeque::new(),
        };
        transcript.push(ChatMessage::new(
            MessageRole::Assistant,
            WELCOME_MESSAGE.to_string(),
        ));
        transcript
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push_back(message);
        self.updated_at = Utc::now();
    }

    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.back()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one `send`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "answer", rename_all = "snake_case")]
pub enum ChatReply {
    Answered(String),
    /// A newer prompt was sent before this answer arrived
    Superseded,
    /// Blank prompt; nothing was sent
    Ignored,
}

/// Chat session: transcript plus request sequencing
pub struct ChatSession {
    session: Session,
    transcript: RwLock<Transcript>,
    sequencer: RequestSequencer,
}

impl ChatSession {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            transcript: RwLock::new(Transcript::new()),
            sequencer: RequestSequencer::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Send a prompt. Blank prompts are not sent and return `Ignored`.
    pub async fn send(&self, backend: &dyn FinanceBackend, prompt: &str) -> Result<ChatReply> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Ok(ChatReply::Ignored);
        }

        let ticket = self.sequencer.begin();
        self.transcript
            .write()
            .await
            .push(ChatMessage::new(MessageRole::User, prompt.to_string()));

        let result = backend::ask(backend, &self.session, prompt).await;

        if !self.sequencer.is_current(ticket) {
            info!("Dropping answer for superseded prompt (ticket {})", ticket.value());
            return Ok(ChatReply::Superseded);
        }

        let mut transcript = self.transcript.write().await;
        match result {
            Ok(answer) => {
                transcript.push(ChatMessage::new(MessageRole::Assistant, answer.clone()));
                Ok(ChatReply::Answered(answer))
            }
            Err(e) => {
                warn!("Chat request failed: {}", e);
                transcript.push(ChatMessage::error(e.to_string()));
                Err(e)
            }
        }
    }

    pub async fn transcript(&self) -> Transcript {
        self.transcript.read().await.clone()
    }
}
