use carelink_core::render::{PanelSnapshot, ThreadRow};
use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::ui::format::{message_time, truncate, unread_badge};
use crate::ui::{theme, App};

pub fn render_thread_list(f: &mut Frame, app: &App, snapshot: &PanelSnapshot, area: Rect) {
    let chunks = Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).split(area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled(" Messages", theme::title()),
        Span::styled(
            if snapshot.unread_total > 0 {
                format!("  {} unread", snapshot.unread_total)
            } else {
                String::new()
            },
            theme::text_muted(),
        ),
    ]));
    f.render_widget(title, chunks[0]);

    if snapshot.rows.is_empty() {
        let empty = Paragraph::new("No conversations yet")
            .style(theme::text_dim())
            .alignment(Alignment::Center);
        f.render_widget(empty, chunks[1]);
        return;
    }

    let width = chunks[1].width as usize;
    let today = Local::now().date_naive();
    let items: Vec<ListItem> = snapshot
        .rows
        .iter()
        .map(|row| row_item(row, width, today))
        .collect();

    let list = List::new(items).highlight_style(theme::selected());
    let mut state = ListState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(list, chunks[1], &mut state);
}

fn row_item(row: &ThreadRow, width: usize, today: chrono::NaiveDate) -> ListItem<'static> {
    let time = message_time(row.last_activity, today);
    let badge = unread_badge(row.unread);

    // " name ... badge time "
    let reserved = badge.width() + time.width() + 3;
    let name = truncate(&row.name, width.saturating_sub(reserved));
    let gap = width.saturating_sub(name.width() + reserved).max(1);

    let name_style = if row.unread > 0 {
        theme::text_primary().add_modifier(Modifier::BOLD)
    } else {
        theme::text_primary()
    };
    let mut header = vec![
        Span::raw(" "),
        Span::styled(name, name_style),
        Span::raw(" ".repeat(gap)),
    ];
    if !badge.is_empty() {
        header.push(Span::styled(badge, theme::badge()));
        header.push(Span::raw(" "));
    }
    header.push(Span::styled(time, theme::text_dim()));

    let preview = truncate(&row.preview, width.saturating_sub(2));
    ListItem::new(vec![
        Line::from(header),
        Line::from(vec![
            Span::raw(" "),
            Span::styled(preview, Style::default().fg(theme::TEXT_MUTED)),
        ]),
        Line::raw(""),
    ])
}
