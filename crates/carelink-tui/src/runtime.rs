use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::input::{handle_key, handle_paste};
use crate::render::render;
use crate::ui::{App, Tui};

pub(crate) async fn run_app(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let mut event_stream = EventStream::new();

    // Redraw tick: background sends and fetches change the snapshot without a key press,
    // and the status line expires on its own.
    let mut tick_interval = tokio::time::interval(Duration::from_millis(100));

    let mut widget_events = app.widget.subscribe();

    while app.running {
        terminal.draw(|f| render(f, app))?;

        tokio::select! {
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        handle_key(app, key);
                    }
                    Some(Ok(Event::Paste(text))) => handle_paste(app, &text),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "terminal event stream error");
                    }
                    None => app.quit(),
                }
            }

            event = widget_events.recv() => {
                match event {
                    Ok(event) => app.on_widget_event(&event),
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "widget events lagged");
                    }
                    Err(RecvError::Closed) => app.quit(),
                }
            }

            _ = tick_interval.tick() => {}
        }
    }

    Ok(())
}
