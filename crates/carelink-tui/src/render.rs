use ratatui::{
    layout::{Constraint, Layout},
    style::Style,
    widgets::Block,
    Frame,
};

use crate::ui;
use crate::ui::layout;
use crate::ui::App;

pub(crate) fn render(f: &mut Frame, app: &mut App) {
    let bg_block = Block::default().style(Style::default().bg(ui::theme::BG_APP));
    f.render_widget(bg_block, f.area());

    let snapshot = app.snapshot();
    app.clamp_selection(snapshot.rows.len());

    let chunks = Layout::vertical([
        Constraint::Length(layout::NAV_HEIGHT),
        Constraint::Min(0),
        Constraint::Length(layout::FOOTER_HEIGHT),
    ])
    .split(f.area());

    ui::views::render_nav(f, app, chunks[0]);
    ui::views::render_page(f, app, chunks[1]);
    ui::views::render_footer(f, app, &snapshot, chunks[2]);

    if snapshot.open {
        let area = layout::panel_area(chunks[1]);
        ui::views::render_panel(f, app, &snapshot, area);
    }
}
