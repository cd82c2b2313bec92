use std::sync::Arc;

use carelink_core::render::PanelSnapshot;
use carelink_core::view::View;
use carelink_core::{HttpApi, MessagingWidget, WidgetError, WidgetEvent};
use tracing::debug;

pub type Widget = MessagingWidget<HttpApi>;

pub struct App {
    pub widget: Arc<Widget>,
    pub running: bool,
    /// First Ctrl+C arms, second one quits
    pub pending_quit: bool,
    /// Cursor in the thread list
    pub selected: usize,
    /// Nav bar pill, fed only by refreshed notifications
    pub nav_unread: usize,
}

impl App {
    pub fn new(widget: Arc<Widget>) -> Self {
        Self {
            widget,
            running: true,
            pending_quit: false,
            selected: 0,
            nav_unread: 0,
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn snapshot(&self) -> PanelSnapshot {
        self.widget.snapshot()
    }

    pub fn on_widget_event(&mut self, event: &WidgetEvent) {
        if let Some(unread) = event.unread() {
            self.nav_unread = unread;
        }
    }

    /// Keep the list cursor inside the current rows.
    pub fn clamp_selection(&mut self, rows: usize) {
        if rows == 0 {
            self.selected = 0;
        } else if self.selected >= rows {
            self.selected = rows - 1;
        }
    }

    pub fn select_next(&mut self, rows: usize) {
        if rows > 0 {
            self.selected = (self.selected + 1).min(rows - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn in_conversation(&self) -> bool {
        let state = self.widget.view_state();
        state.open && matches!(state.view, View::Conversation(_))
    }

    // ===== Background operations =====
    // Network calls run on their own tasks so keys keep flowing while they are out.

    pub fn spawn_open(&self, other_id: u64, name: Option<String>) {
        let widget = Arc::clone(&self.widget);
        tokio::spawn(async move {
            widget.open_thread(other_id, name.as_deref()).await;
        });
    }

    pub fn spawn_send(&self) {
        let widget = Arc::clone(&self.widget);
        tokio::spawn(async move {
            match widget.send().await {
                Ok(()) => {}
                // Surfaced by the widget's status line
                Err(WidgetError::Api(_)) => {}
                Err(e) => debug!(error = %e, "send ignored"),
            }
        });
    }

    pub fn spawn_refresh(&self) {
        let widget = Arc::clone(&self.widget);
        tokio::spawn(async move {
            let _ = widget.refresh().await;
        });
    }

    // ===== Composer =====

    pub fn push_char(&self, c: char) {
        self.widget.edit_draft(|draft| draft.push(c));
    }

    pub fn push_str(&self, text: &str) {
        self.widget.edit_draft(|draft| draft.push_str(text));
    }

    pub fn backspace(&self) {
        self.widget.edit_draft(|draft| {
            draft.pop();
        });
    }
}
