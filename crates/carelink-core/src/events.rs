use std::collections::HashMap;
use std::sync::Arc;

use crate::models::Thread;

/// Notifications broadcast by the widget for other on-page components.
///
/// Consumers subscribe through `MessagingWidget::subscribe` and never need
/// to touch the widget's store.
#[derive(Debug, Clone)]
pub enum WidgetEvent {
    /// A poll finished and the thread map was rebuilt.
    Refreshed {
        threads: Arc<HashMap<u64, Thread>>,
        unread: usize,
    },
    /// A profile lookup filled in a counterpart's phone number.
    ContactResolved { other_id: u64, phone: Option<String> },
}

impl WidgetEvent {
    pub fn unread(&self) -> Option<usize> {
        match self {
            WidgetEvent::Refreshed { unread, .. } => Some(*unread),
            WidgetEvent::ContactResolved { .. } => None,
        }
    }
}
