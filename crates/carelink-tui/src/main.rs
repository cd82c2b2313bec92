mod input;
mod render;
mod runtime;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use carelink_core::config::CoreConfig;
use carelink_core::tracing_setup::init_file_tracing;
use carelink_core::{HttpApi, MessagingWidget, SessionStore};
use clap::Parser;
use tracing::info;

use crate::runtime::run_app;
use ui::App;

/// Terminal messaging panel for Carelink parents and providers
#[derive(Parser, Debug)]
#[command(name = "carelink-tui", version)]
struct Args {
    /// Path to a JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Open straight into the conversation with this user
    #[arg(long, value_name = "USER_ID")]
    open: Option<u64>,

    /// Display name for the --open counterpart until their messages arrive
    #[arg(long, requires = "open")]
    name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_file_tracing("carelink-tui");

    let config = CoreConfig::load(args.config.as_deref())?;
    let sessions = SessionStore::open(config.session_path())
        .with_context(|| format!("reading {}", config.session_path().display()))?;

    let Some(widget) = MessagingWidget::activate(&sessions, HttpApi::from_config(&config), &config)
    else {
        eprintln!("Not signed in. Run `carelink-cli login --email <email> --password <password>` first.");
        return Ok(());
    };
    info!(user_id = widget.session().user_id, "messaging panel active");

    // Set up panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::event::DisableBracketedPaste
        );
        eprintln!("\n\n=== PANIC ===");
        eprintln!("{}", panic_info);
        eprintln!("=============\n");
        original_hook(panic_info);
    }));

    let mut app = App::new(widget.clone());
    let mut terminal = ui::init_terminal()?;

    let polling = widget.spawn_polling();
    if let Some(other_id) = args.open {
        let widget = widget.clone();
        let name = args.name.clone();
        tokio::spawn(async move { widget.show_widget(Some(other_id), name.as_deref()).await });
    }

    let result = run_app(&mut terminal, &mut app).await;

    polling.abort();
    ui::restore_terminal()?;

    if let Err(err) = result {
        eprintln!("Error: {err}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_requires_open() {
        assert!(Args::try_parse_from(["carelink-tui", "--name", "Maya"]).is_err());
        let args = Args::try_parse_from(["carelink-tui", "--open", "7", "--name", "Maya"]).unwrap();
        assert_eq!(args.open, Some(7));
        assert_eq!(args.name.as_deref(), Some("Maya"));
    }
}
