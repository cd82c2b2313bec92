//! Host-agnostic view models of the widget panel.
//!
//! Hosts draw these; nothing here knows about terminals or JSON output.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constants::IMAGE_PREVIEW;
use crate::models::{Message, Thread};
use crate::status::StatusMessage;
use crate::store::ThreadStore;
use crate::view::{View, ViewState};

/// One row of the thread list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadRow {
    pub other_id: u64,
    pub name: String,
    pub preview: String,
    pub unread: usize,
    pub last_activity: Option<DateTime<Utc>>,
    pub photo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageBubble {
    pub mine: bool,
    pub body: Option<String>,
    pub image_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub unread: bool,
}

/// Header and history of the open conversation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationView {
    pub other_id: u64,
    pub name: String,
    pub phone: Option<String>,
    /// The call affordance is only offered with a usable phone number.
    pub call_enabled: bool,
    pub photo: Option<String>,
    pub unread: usize,
    pub messages: Vec<MessageBubble>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelSnapshot {
    pub open: bool,
    pub view: View,
    pub rows: Vec<ThreadRow>,
    pub conversation: Option<ConversationView>,
    pub unread_total: usize,
    pub draft: String,
    pub status: Option<StatusMessage>,
    pub sending: bool,
}

pub fn preview(message: &Message) -> String {
    match (message.text(), &message.image_url) {
        (Some(text), _) => first_line(text),
        (None, Some(_)) => IMAGE_PREVIEW.to_string(),
        (None, None) => String::new(),
    }
}

fn first_line(text: &str) -> String {
    text.lines().next().unwrap_or_default().trim().to_string()
}

pub fn thread_rows(store: &ThreadStore) -> Vec<ThreadRow> {
    let user_id = store.user_id();
    store
        .ordered()
        .into_iter()
        .map(|thread| ThreadRow {
            other_id: thread.other_id,
            name: thread.other_name.clone(),
            preview: thread.last_message().map(preview).unwrap_or_default(),
            unread: thread.unread_count(user_id),
            last_activity: thread.last_message().and_then(|m| m.created_at),
            photo: thread.other_photo.clone(),
        })
        .collect()
}

pub fn conversation(thread: &Thread, user_id: u64) -> ConversationView {
    let phone = thread.phone().map(str::to_string);
    ConversationView {
        other_id: thread.other_id,
        name: thread.other_name.clone(),
        call_enabled: phone.is_some(),
        phone,
        photo: thread.other_photo.clone(),
        unread: thread.unread_count(user_id),
        messages: thread
            .messages
            .iter()
            .map(|m| MessageBubble {
                mine: m.is_mine(user_id),
                body: m.text().map(str::to_string),
                image_url: m.image_url.clone(),
                created_at: m.created_at,
                unread: m.is_unread_for(user_id),
            })
            .collect(),
    }
}

pub fn panel(
    store: &ThreadStore,
    view: &ViewState,
    draft: &str,
    status: Option<&StatusMessage>,
    sending: bool,
) -> PanelSnapshot {
    let conversation = view
        .active_thread()
        .and_then(|id| store.get(id))
        .map(|thread| conversation(thread, store.user_id()));

    PanelSnapshot {
        open: view.open,
        view: view.view,
        rows: thread_rows(store),
        conversation,
        unread_total: store.unread_total(),
        draft: draft.to_string(),
        status: status.cloned(),
        sending,
    }
}
