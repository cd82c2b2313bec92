use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::de;

/// A chat message as returned by `GET /forms/messages/{userId}`.
///
/// Counterpart contact fields are denormalized by the server and may be
/// missing on any given message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, deserialize_with = "de::opt_id")]
    pub id: Option<u64>,
    #[serde(deserialize_with = "de::id")]
    pub sender_id: u64,
    #[serde(deserialize_with = "de::id")]
    pub receiver_id: u64,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    /// `None` means unread.
    #[serde(default, deserialize_with = "de::read_marker")]
    pub read_at: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub sender_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub receiver_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub sender_phone: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub receiver_phone: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub sender_photo: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub receiver_photo: Option<String>,
}

/// Envelope of the message list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageList {
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Message {
    pub fn is_mine(&self, user_id: u64) -> bool {
        self.sender_id == user_id
    }

    /// The other participant, from the point of view of `user_id`.
    pub fn counterpart(&self, user_id: u64) -> u64 {
        if self.sender_id == user_id {
            self.receiver_id
        } else {
            self.sender_id
        }
    }

    pub fn is_unread_for(&self, user_id: u64) -> bool {
        self.receiver_id == user_id && self.read_at.is_none()
    }

    pub fn counterpart_name(&self, user_id: u64) -> Option<&str> {
        self.pick(user_id, &self.sender_name, &self.receiver_name)
    }

    pub fn counterpart_phone(&self, user_id: u64) -> Option<&str> {
        self.pick(user_id, &self.sender_phone, &self.receiver_phone)
    }

    pub fn counterpart_photo(&self, user_id: u64) -> Option<&str> {
        self.pick(user_id, &self.sender_photo, &self.receiver_photo)
    }

    fn pick<'a>(
        &self,
        user_id: u64,
        sender_side: &'a Option<String>,
        receiver_side: &'a Option<String>,
    ) -> Option<&'a str> {
        if self.is_mine(user_id) {
            receiver_side.as_deref()
        } else {
            sender_side.as_deref()
        }
    }

    /// Milliseconds since the epoch, 0 when the server sent no usable timestamp.
    pub fn timestamp_millis(&self) -> i64 {
        self.created_at.map(|t| t.timestamp_millis()).unwrap_or(0)
    }

    pub fn text(&self) -> Option<&str> {
        self.body.as_deref().map(str::trim).filter(|b| !b.is_empty())
    }
}
