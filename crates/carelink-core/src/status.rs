// Inline status line for the composer: a single transient message that
// clears itself once its duration has passed.

use std::time::{Duration, Instant};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Info,
    Error,
}

impl StatusLevel {
    pub fn icon(&self) -> &'static str {
        match self {
            StatusLevel::Info => "ℹ",
            StatusLevel::Error => "✗",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
}

#[derive(Debug, Clone)]
pub struct StatusLine {
    ttl: Duration,
    current: Option<(StatusMessage, Instant)>,
}

impl StatusLine {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    /// Replace whatever is showing; the new message expires `ttl` after `now`.
    pub fn show(&mut self, text: impl Into<String>, level: StatusLevel, now: Instant) {
        let message = StatusMessage {
            text: text.into(),
            level,
        };
        self.current = Some((message, now + self.ttl));
    }

    pub fn current(&self, now: Instant) -> Option<&StatusMessage> {
        match &self.current {
            Some((message, expires_at)) if now < *expires_at => Some(message),
            _ => None,
        }
    }
}
