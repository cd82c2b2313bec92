pub mod chrome;
pub mod conversation;
pub mod thread_list;

pub use chrome::{render_footer, render_nav, render_page};

use carelink_core::render::PanelSnapshot;
use carelink_core::view::View;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Clear},
    Frame,
};

use crate::ui::{theme, App};

/// Floating messaging panel over the page.
pub fn render_panel(f: &mut Frame, app: &App, snapshot: &PanelSnapshot, area: Rect) {
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER_ACTIVE))
        .style(Style::default().bg(theme::BG_PANEL));
    let inner = block.inner(area);
    f.render_widget(block, area);

    match (snapshot.view, &snapshot.conversation) {
        (View::Conversation(_), Some(conversation)) => {
            conversation::render_conversation(f, snapshot, conversation, inner)
        }
        _ => thread_list::render_thread_list(f, app, snapshot, inner),
    }
}
