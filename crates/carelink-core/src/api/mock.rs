//! Scripted in-memory backend for widget tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;

use super::MessagingApi;
use crate::error::ApiError;
use crate::models::{Message, Profile};
use crate::session::UserType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    FetchMessages { user_id: u64 },
    SendMessage { sender_id: u64, receiver_id: u64, body: String },
    MarkRead { user_id: u64, other_id: u64 },
    FetchProfile { role: UserType, id: u64 },
}

#[derive(Default)]
struct MockState {
    messages: Vec<Message>,
    profiles: HashMap<u64, Profile>,
    calls: Vec<ApiCall>,
    fail_fetch: bool,
    fail_send: Option<String>,
    fail_mark_read: bool,
    fail_profile: bool,
    send_delay: Option<Duration>,
    profile_delay: Option<Duration>,
    fetch_delays: Vec<Duration>,
    next_id: u64,
}

/// Behaves like the real server: sends append, mark-read stamps `read_at`.
#[derive(Default)]
pub struct MockApi {
    state: Mutex<MockState>,
}

pub fn message(sender: u64, receiver: u64, minute_of_day: u32, read: bool) -> Message {
    let at = Utc
        .with_ymd_and_hms(2024, 5, 1, minute_of_day / 60, minute_of_day % 60, 0)
        .unwrap();
    Message {
        id: None,
        sender_id: sender,
        receiver_id: receiver,
        body: Some(format!("{} -> {} at {}", sender, receiver, minute_of_day)),
        image_url: None,
        created_at: Some(at),
        read_at: read.then(|| "2024-05-01T23:00:00Z".to_string()),
        sender_name: None,
        receiver_name: None,
        sender_phone: None,
        receiver_phone: None,
        sender_photo: None,
        receiver_photo: None,
    }
}

impl MockApi {
    pub fn with_messages(messages: Vec<Message>) -> Self {
        let api = Self::default();
        api.set_messages(messages);
        api
    }

    pub fn set_messages(&self, messages: Vec<Message>) {
        self.state.lock().messages = messages;
    }

    pub fn set_profile(&self, id: u64, profile: Profile) {
        self.state.lock().profiles.insert(id, profile);
    }

    pub fn fail_fetch(&self, fail: bool) {
        self.state.lock().fail_fetch = fail;
    }

    pub fn fail_send(&self, message: Option<&str>) {
        self.state.lock().fail_send = message.map(str::to_string);
    }

    pub fn fail_mark_read(&self, fail: bool) {
        self.state.lock().fail_mark_read = fail;
    }

    pub fn fail_profile(&self, fail: bool) {
        self.state.lock().fail_profile = fail;
    }

    pub fn set_send_delay(&self, delay: Duration) {
        self.state.lock().send_delay = Some(delay);
    }

    pub fn set_profile_delay(&self, delay: Duration) {
        self.state.lock().profile_delay = Some(delay);
    }

    /// Delays for the next fetches, consumed in call order.
    pub fn queue_fetch_delays(&self, delays: Vec<Duration>) {
        self.state.lock().fetch_delays = delays;
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().calls.clone()
    }

    pub fn count(&self, pred: impl Fn(&ApiCall) -> bool) -> usize {
        self.state.lock().calls.iter().filter(|c| pred(c)).count()
    }

    pub fn sends(&self) -> usize {
        self.count(|c| matches!(c, ApiCall::SendMessage { .. }))
    }

    pub fn fetches(&self) -> usize {
        self.count(|c| matches!(c, ApiCall::FetchMessages { .. }))
    }
}

#[async_trait]
impl MessagingApi for MockApi {
    async fn fetch_messages(&self, user_id: u64) -> Result<Vec<Message>, ApiError> {
        let (result, delay) = {
            let mut state = self.state.lock();
            state.calls.push(ApiCall::FetchMessages { user_id });
            let delay = if state.fetch_delays.is_empty() {
                None
            } else {
                Some(state.fetch_delays.remove(0))
            };
            let result = if state.fail_fetch {
                Err(ApiError::server(503, Some("service unavailable".to_string())))
            } else {
                Ok(state
                    .messages
                    .iter()
                    .filter(|m| m.sender_id == user_id || m.receiver_id == user_id)
                    .cloned()
                    .collect())
            };
            (result, delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn send_message(
        &self,
        sender_id: u64,
        receiver_id: u64,
        body: &str,
    ) -> Result<(), ApiError> {
        let delay = {
            let mut state = self.state.lock();
            state.calls.push(ApiCall::SendMessage {
                sender_id,
                receiver_id,
                body: body.to_string(),
            });
            state.send_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock();
        if let Some(message) = state.fail_send.clone() {
            let message = (!message.is_empty()).then_some(message);
            return Err(ApiError::server(500, message));
        }
        state.next_id += 1;
        let mut sent = message(sender_id, receiver_id, 23 * 60 + 59, false);
        sent.id = Some(state.next_id);
        sent.body = Some(body.to_string());
        state.messages.push(sent);
        Ok(())
    }

    async fn mark_read(&self, user_id: u64, other_id: u64) -> Result<(), ApiError> {
        let mut state = self.state.lock();
        state.calls.push(ApiCall::MarkRead { user_id, other_id });
        if state.fail_mark_read {
            return Err(ApiError::server(500, None));
        }
        for m in state
            .messages
            .iter_mut()
            .filter(|m| m.sender_id == other_id && m.receiver_id == user_id)
        {
            m.read_at.get_or_insert_with(|| "2024-05-02T00:00:00Z".to_string());
        }
        Ok(())
    }

    async fn fetch_profile(&self, role: UserType, id: u64) -> Result<Profile, ApiError> {
        let delay = {
            let mut state = self.state.lock();
            state.calls.push(ApiCall::FetchProfile { role, id });
            state.profile_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.state.lock();
        if state.fail_profile {
            return Err(ApiError::server(404, Some("not found".to_string())));
        }
        Ok(state.profiles.get(&id).cloned().unwrap_or_default())
    }
}
