// Page chrome drawn under the floating panel

use carelink_core::render::PanelSnapshot;
use carelink_core::UserType;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::format::unread_badge;
use crate::ui::{layout, theme, App};

pub fn render_nav(f: &mut Frame, app: &App, area: Rect) {
    let padding = " ".repeat(layout::CONTENT_PADDING_H as usize);
    let session = app.widget.session();
    let who = session
        .user_name
        .clone()
        .unwrap_or_else(|| format!("#{}", session.user_id));

    let mut spans = vec![
        Span::raw(padding),
        Span::styled("Carelink", theme::title()),
        Span::styled(format!("  {} ({})", who, session.user_type.as_str()), theme::text_muted()),
    ];
    // Nav pill only moves when a refresh notification arrives
    if app.nav_unread > 0 {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(unread_badge(app.nav_unread), theme::badge()));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn render_page(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Length(2),
        Constraint::Min(0),
    ])
    .split(area);

    let headline = if app.widget.session().user_type == UserType::Provider {
        "Your families can reach you here."
    } else {
        "Messages from your care providers appear here."
    };
    let page = Paragraph::new(vec![
        Line::styled(headline, theme::text_primary()),
        Line::styled("Press m to open messages.", theme::text_dim()),
    ])
    .alignment(Alignment::Center);
    f.render_widget(page, chunks[1]);
}

pub fn render_footer(f: &mut Frame, app: &App, snapshot: &PanelSnapshot, area: Rect) {
    let hints = if app.pending_quit {
        Span::styled("Press Ctrl+C again to quit", theme::error())
    } else if !snapshot.open {
        Span::styled("m messages · r refresh · q quit", theme::text_dim())
    } else if snapshot.conversation.is_some() {
        Span::styled("enter send · esc back", theme::text_dim())
    } else {
        Span::styled("↑↓ select · enter open · esc close", theme::text_dim())
    };

    let launcher_style = if snapshot.open {
        Style::default().fg(theme::ACCENT_PRIMARY)
    } else {
        theme::text_primary()
    };
    let mut launcher = vec![Span::styled("[ Messages ", launcher_style)];
    if snapshot.unread_total > 0 {
        launcher.push(Span::styled(unread_badge(snapshot.unread_total), theme::badge()));
        launcher.push(Span::styled(" ]", launcher_style));
    } else {
        launcher.push(Span::styled("]", launcher_style));
    }

    let chunks = Layout::horizontal([Constraint::Min(0), Constraint::Length(20)]).split(area);
    let padding = " ".repeat(layout::CONTENT_PADDING_H as usize);
    f.render_widget(Paragraph::new(Line::from(vec![Span::raw(padding), hints])), chunks[0]);
    f.render_widget(
        Paragraph::new(Line::from(launcher)).alignment(Alignment::Right),
        chunks[1],
    );
}
