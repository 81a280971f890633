//! Support Chat
//!
//! A chat session keeps the transcript of one conversation with the support
//! endpoint. Backend answers are narrowed to the part relevant to the
//! question with [`crate::extract::extract`]; failures become a short bot
//! message and, for connection problems, a [`Notice`].

use crate::backend::{BackendError, ChurnBackend};
use crate::extract::extract;
use crate::notice::Notice;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

pub const NOT_UNDERSTOOD: &str = "I didn't understand that question.";
pub const SERVER_FAILURE: &str = "Failed to get response from server.";
pub const PROCESSING_ERROR: &str = "Error processing response.";
pub const CONNECTION_ERROR: &str = "Connection error, please retry.";

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One line of the transcript
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub at: DateTime<Utc>,
}

/// The bot's answer to one question
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatOutcome {
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

/// A conversation with the support endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ChatSession {
    id: Uuid,
    messages: Vec<ChatMessage>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            messages: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Transcript, oldest first
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Send a message and record both sides of the exchange
    ///
    /// Blank messages are ignored and return `None`. The message is trimmed
    /// before it is sent.
    pub async fn ask(&mut self, backend: &dyn ChurnBackend, message: &str) -> Option<ChatOutcome> {
        let query = message.trim();
        if query.is_empty() {
            return None;
        }

        self.push(Sender::User, query);
        let outcome = answer(backend, query).await;
        self.push(Sender::Bot, &outcome.reply);

        tracing::debug!(session = %self.id, messages = self.messages.len(), "Chat exchange recorded");
        Some(outcome)
    }

    fn push(&mut self, sender: Sender, text: &str) {
        self.messages.push(ChatMessage {
            sender,
            text: text.to_string(),
            at: Utc::now(),
        });
    }
}

/// Ask the backend one question, without a transcript
pub async fn answer(backend: &dyn ChurnBackend, query: &str) -> ChatOutcome {
    match backend.chat(query).await {
        Ok(reply) => ChatOutcome {
            reply: match reply.response {
                Some(text) => extract(query, &text),
                None => NOT_UNDERSTOOD.to_string(),
            },
            notice: None,
        },
        Err(e) => {
            tracing::warn!(backend = backend.name(), error = %e, "Chat request failed");
            failure_outcome(&e)
        }
    }
}

fn failure_outcome(error: &BackendError) -> ChatOutcome {
    if error.is_connection() {
        return ChatOutcome {
            reply: CONNECTION_ERROR.to_string(),
            notice: Some(Notice::destructive(
                "Error",
                "Failed to connect to the server. Please try again.",
            )),
        };
    }

    let reply = match error {
        BackendError::Decode(_) => PROCESSING_ERROR,
        _ => SERVER_FAILURE,
    };

    ChatOutcome {
        reply: reply.to_string(),
        notice: None,
    }
}
