// src/models.rs

use crate::constants::{INITIALIZE_SUCCESS_MESSAGE, TIME_LOCALE, WELCOME_TEXT};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// One turn in the conversation.
///
/// Field names match the persisted JSON layout, so `is_user` is stored as `isUser`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: usize,
    pub sender: String,
    pub text: String,
    pub timestamp: String,
    #[serde(rename = "isUser")]
    pub is_user: bool,
}

impl Message {
    pub fn user(id: usize, sender: &str, text: impl Into<String>, time_format: &str) -> Self {
        Self {
            id,
            sender: sender.to_string(),
            text: text.into(),
            timestamp: format_timestamp(Local::now(), time_format),
            is_user: true,
        }
    }

    /// Builds a bot message. Literal `*` characters are dropped from the text.
    pub fn bot(id: usize, sender: &str, text: &str, time_format: &str) -> Self {
        Self {
            id,
            sender: sender.to_string(),
            text: strip_asterisks(text),
            timestamp: format_timestamp(Local::now(), time_format),
            is_user: false,
        }
    }

    /// The synthetic first message shown when there is no history.
    pub fn welcome(sender: &str, time_format: &str) -> Self {
        Self::bot(0, sender, WELCOME_TEXT, time_format)
    }
}

pub fn strip_asterisks(text: &str) -> String {
    text.replace('*', "")
}

/// Formats with Korean names for `%p`, `%A`, `%B` and friends.
pub fn format_timestamp(at: DateTime<Local>, time_format: &str) -> String {
    at.format_localized(time_format, TIME_LOCALE).to_string()
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub question: &'a str,
}

/// A successful `/chat` answer, before any display cleanup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    pub answer: String,
}

/// Body returned by `POST /initialize`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InitializeStatus {
    pub message: String,
}

impl InitializeStatus {
    /// Only this exact message warrants a user-facing notice.
    pub fn is_success(&self) -> bool {
        self.message == INITIALIZE_SUCCESS_MESSAGE
    }
}

/// Logs details of each API call.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiCallLog {
    pub timestamp: DateTime<Utc>,
    pub endpoint: String,
    pub request_summary: String,
    pub response_status: Option<u16>,
    pub response_time_ms: u128,
}
