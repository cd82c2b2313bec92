use carelink_core::constants::IMAGE_PREVIEW;
use carelink_core::render::{ConversationView, MessageBubble, PanelSnapshot};
use carelink_core::status::StatusLevel;
use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::ui::format::{message_time, truncate};
use crate::ui::{layout, theme};

pub fn render_conversation(
    f: &mut Frame,
    snapshot: &PanelSnapshot,
    conversation: &ConversationView,
    area: Rect,
) {
    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(layout::COMPOSER_HEIGHT),
    ])
    .split(area);

    render_header(f, conversation, chunks[0]);
    render_messages(f, conversation, chunks[1]);
    render_status(f, snapshot, chunks[2]);
    render_composer(f, snapshot, chunks[3]);
}

fn render_header(f: &mut Frame, conversation: &ConversationView, area: Rect) {
    let call = match (&conversation.phone, conversation.call_enabled) {
        (Some(phone), true) => Span::styled(
            format!("☎ {}", phone),
            Style::default().fg(theme::ACCENT_SUCCESS),
        ),
        _ => Span::styled("☎ no phone", theme::text_dim()),
    };
    let width = area.width as usize;
    let name = truncate(&conversation.name, width.saturating_sub(call.width() + 4));

    let cols = Layout::horizontal([Constraint::Min(0), Constraint::Length(call.width() as u16 + 1)])
        .split(area);
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" ← ", theme::text_dim()),
            Span::styled(name, theme::title()),
        ])),
        cols[0],
    );
    f.render_widget(
        Paragraph::new(Line::from(call)).alignment(Alignment::Right),
        cols[1],
    );
}

fn render_messages(f: &mut Frame, conversation: &ConversationView, area: Rect) {
    if conversation.messages.is_empty() {
        let empty = Paragraph::new("Say hello")
            .style(theme::text_dim())
            .alignment(Alignment::Center);
        f.render_widget(empty, area);
        return;
    }

    let today = Local::now().date_naive();
    let mut lines: Vec<Line> = Vec::new();
    for bubble in &conversation.messages {
        lines.extend(bubble_lines(bubble, today));
        lines.push(Line::raw(""));
    }

    // Newest at the bottom: scroll past whatever does not fit
    let total = wrapped_height(&lines, area.width);
    let scroll = total.saturating_sub(area.height);
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(paragraph.scroll((scroll, 0)), area);
}

fn wrapped_height(lines: &[Line], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = lines.iter().map(|line| line.width().div_ceil(width).max(1)).sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn bubble_lines(bubble: &MessageBubble, today: chrono::NaiveDate) -> Vec<Line<'static>> {
    let (alignment, style) = if bubble.mine {
        (
            Alignment::Right,
            Style::default().fg(theme::TEXT_PRIMARY).bg(theme::BG_MINE),
        )
    } else {
        (Alignment::Left, theme::text_primary())
    };

    let mut lines = Vec::new();
    if let Some(body) = &bubble.body {
        for line in body.lines() {
            lines.push(Line::styled(format!(" {} ", line), style).alignment(alignment));
        }
    }
    if bubble.image_url.is_some() {
        lines.push(Line::styled(format!(" {} ", IMAGE_PREVIEW), theme::text_muted()).alignment(alignment));
    }

    let mut meta = message_time(bubble.created_at, today);
    if bubble.unread {
        meta.push_str(" •");
    }
    lines.push(Line::styled(meta, theme::text_dim()).alignment(alignment));
    lines
}

fn render_status(f: &mut Frame, snapshot: &PanelSnapshot, area: Rect) {
    let line = match (&snapshot.status, snapshot.sending) {
        (Some(status), _) => {
            let style = match status.level {
                StatusLevel::Error => theme::error(),
                StatusLevel::Info => theme::text_muted(),
            };
            Line::styled(format!(" {} {}", status.level.icon(), status.text), style)
        }
        (None, true) => Line::styled(" Sending…", theme::text_muted()),
        (None, false) => Line::raw(""),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_composer(f: &mut Frame, snapshot: &PanelSnapshot, area: Rect) {
    let border = if snapshot.sending {
        theme::BORDER_INACTIVE
    } else {
        theme::ACCENT_PRIMARY
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(theme::BG_INPUT));

    let inner_width = area.width.saturating_sub(2) as usize;
    let text = if snapshot.draft.is_empty() {
        Line::styled("Type a message…", theme::text_dim())
    } else {
        // Keep the tail of a long draft visible
        let chars: Vec<char> = snapshot.draft.chars().collect();
        let start = chars.len().saturating_sub(inner_width.saturating_sub(1));
        Line::styled(chars[start..].iter().collect::<String>(), theme::text_primary())
    };
    f.render_widget(Paragraph::new(text).block(block), area);
}
