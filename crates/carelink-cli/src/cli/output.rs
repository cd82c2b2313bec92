use anyhow::{Context, Result};
use carelink_core::render::{ConversationView, ThreadRow};
use carelink_core::{Session, WidgetEvent};
use serde::Serialize;
use serde_json::{json, Value};

pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    text.context("Failed to serialize output")
}

#[derive(Debug, Serialize)]
pub struct ThreadListing {
    pub unread_total: usize,
    pub threads: Vec<ThreadRow>,
}

pub fn whoami(session: Option<&Session>) -> Value {
    match session {
        Some(session) => json!({ "signed_in": true, "session": session }),
        None => json!({ "signed_in": false }),
    }
}

pub fn conversation(view: &ConversationView) -> Value {
    json!({ "conversation": view })
}

/// One line of `watch` output. Refreshes carry the rows as they stand when printed.
pub fn event_line(event: &WidgetEvent, rows: &[ThreadRow]) -> Value {
    match event {
        WidgetEvent::Refreshed { unread, .. } => json!({
            "event": "refreshed",
            "unread_total": unread,
            "threads": rows,
        }),
        WidgetEvent::ContactResolved { other_id, phone } => json!({
            "event": "contact_resolved",
            "other_id": other_id,
            "phone": phone,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carelink_core::UserType;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[test]
    fn test_compact_and_pretty_output() {
        let value = json!({"a": 1});
        assert_eq!(to_json(&value, false).unwrap(), r#"{"a":1}"#);
        assert_eq!(to_json(&value, true).unwrap(), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_whoami_without_session() {
        assert_eq!(whoami(None), json!({"signed_in": false}));
    }

    #[test]
    fn test_whoami_reports_session_fields() {
        let session = Session {
            user_id: 42,
            user_type: UserType::Provider,
            user_name: Some("Dana".to_string()),
        };
        let value = whoami(Some(&session));
        assert_eq!(value["signed_in"], json!(true));
        assert_eq!(value["session"]["user_id"], json!(42));
        assert_eq!(value["session"]["user_name"], json!("Dana"));
    }

    #[test]
    fn test_event_lines() {
        let refreshed = WidgetEvent::Refreshed {
            threads: Arc::new(HashMap::new()),
            unread: 3,
        };
        let line = event_line(&refreshed, &[]);
        assert_eq!(line["event"], json!("refreshed"));
        assert_eq!(line["unread_total"], json!(3));
        assert_eq!(line["threads"], json!([]));

        let resolved = WidgetEvent::ContactResolved {
            other_id: 7,
            phone: Some("555-0100".to_string()),
        };
        let line = event_line(&resolved, &[]);
        assert_eq!(line, json!({"event": "contact_resolved", "other_id": 7, "phone": "555-0100"}));
    }
}
