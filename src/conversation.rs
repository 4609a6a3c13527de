// src/conversation.rs

use crate::constants::MESSAGES_KEY;
use crate::errors::ChatResult;
use crate::models::Message;
use crate::storage::KeyValueStorage;

/// Loads and saves the conversation history in a single storage slot.
#[derive(Debug)]
pub struct MessageStore<S> {
    storage: S,
    bot_label: String,
    time_format: String,
}

impl<S: KeyValueStorage> MessageStore<S> {
    pub fn new(storage: S, bot_label: impl Into<String>, time_format: impl Into<String>) -> Self {
        Self {
            storage,
            bot_label: bot_label.into(),
            time_format: time_format.into(),
        }
    }

    /// Returns the stored history, or just the welcome message when there is
    /// nothing usable in storage.
    pub fn load(&self) -> Vec<Message> {
        match self.read_stored() {
            Some(messages) if !messages.is_empty() => {
                log::info!("Conversation history loaded ({} messages)", messages.len());
                messages
            }
            _ => {
                log::info!("No existing conversation history found");
                vec![Message::welcome(&self.bot_label, &self.time_format)]
            }
        }
    }

    fn read_stored(&self) -> Option<Vec<Message>> {
        let raw = match self.storage.get(MESSAGES_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                log::warn!("Failed to read conversation history: {}", e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(messages) => Some(messages),
            Err(e) => {
                log::warn!("Discarding unparsable conversation history: {}", e);
                None
            }
        }
    }

    /// Overwrites the stored history with the full list.
    pub fn save(&mut self, messages: &[Message]) -> ChatResult<()> {
        let json_str = serde_json::to_string(messages)?;
        self.storage.set(MESSAGES_KEY, json_str)?;
        log::debug!("Conversation history saved ({} messages)", messages.len());
        Ok(())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
