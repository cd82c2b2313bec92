use serde::Serialize;

use super::message::Message;
use crate::constants::DEFAULT_OTHER_NAME;

/// All messages exchanged with one counterpart, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thread {
    pub other_id: u64,
    pub other_name: String,
    pub other_phone: Option<String>,
    pub other_photo: Option<String>,
    pub messages: Vec<Message>,
}

impl Thread {
    /// Empty thread for a counterpart we have not exchanged messages with yet.
    pub fn stub(other_id: u64, other_name: Option<&str>) -> Self {
        Self {
            other_id,
            other_name: other_name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .unwrap_or(DEFAULT_OTHER_NAME)
                .to_string(),
            other_phone: None,
            other_photo: None,
            messages: Vec::new(),
        }
    }

    /// Timestamp of the most recent message, 0 for stubs.
    pub fn last_activity(&self) -> i64 {
        self.messages
            .last()
            .map(Message::timestamp_millis)
            .unwrap_or(0)
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn unread_count(&self, user_id: u64) -> usize {
        self.messages
            .iter()
            .filter(|m| m.is_unread_for(user_id))
            .count()
    }

    /// Phone number if it is usable for a call.
    pub fn phone(&self) -> Option<&str> {
        self.other_phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}
