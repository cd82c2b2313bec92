use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ui::App;
use carelink_core::view::View;

pub(crate) fn handle_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        if app.pending_quit {
            app.quit();
        } else {
            app.pending_quit = true;
        }
        return;
    }
    app.pending_quit = false;

    let state = app.widget.view_state();
    match (state.open, state.view) {
        (false, _) => handle_page_key(app, key),
        (true, View::List) => handle_list_key(app, key),
        (true, View::Conversation(_)) => handle_conversation_key(app, key),
    }
}

pub(crate) fn handle_paste(app: &mut App, text: &str) {
    if app.in_conversation() {
        // Composer is a single line
        app.push_str(&text.replace(['\r', '\n'], " "));
    }
}

fn handle_page_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('m') | KeyCode::Enter => {
            let widget = app.widget.clone();
            tokio::spawn(async move { widget.show_widget(None, None).await });
        }
        KeyCode::Char('r') => app.spawn_refresh(),
        KeyCode::Char('q') => app.quit(),
        _ => {}
    }
}

fn handle_list_key(app: &mut App, key: KeyEvent) {
    let rows = app.snapshot().rows;
    app.clamp_selection(rows.len());
    match key.code {
        KeyCode::Esc | KeyCode::Char('m') => app.widget.hide_widget(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(rows.len()),
        KeyCode::Enter => {
            if let Some(row) = rows.get(app.selected) {
                app.spawn_open(row.other_id, Some(row.name.clone()));
            }
        }
        KeyCode::Char('r') => app.spawn_refresh(),
        KeyCode::Char('q') => app.quit(),
        _ => {}
    }
}

fn handle_conversation_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.widget.back(),
        KeyCode::Enter => app.spawn_send(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(c) => app.push_char(c),
        _ => {}
    }
}
