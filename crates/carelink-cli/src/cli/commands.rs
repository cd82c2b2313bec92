use std::future::Future;
use std::io::Write;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use carelink_core::config::CoreConfig;
use carelink_core::view::View;
use carelink_core::{HttpApi, MessagingWidget, Session, SessionStore, UserType};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};

use super::output::{self, to_json, ThreadListing};

/// CLI command parsed from arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Sign in and store the session
    Login { email: String, password: String },
    /// Forget the stored session
    Logout,
    /// Print the stored session
    Whoami,
    /// Fetch once and list threads
    Threads,
    /// Open a conversation (marks it read)
    Open { other_id: u64, name: Option<String> },
    /// Send a message to a conversation
    Send { other_id: u64, body: String },
    /// Poll and print every refresh
    Watch,
}

type Widget = MessagingWidget<HttpApi>;

/// Run one command, writing its JSON result to `out`.
pub async fn run<W: Write>(
    command: CliCommand,
    config: &CoreConfig,
    pretty: bool,
    out: &mut W,
) -> Result<()> {
    let session_path = config.session_path();
    let mut sessions = SessionStore::open(&session_path)
        .with_context(|| format!("Failed to read session: {}", session_path.display()))?;

    match command {
        CliCommand::Login { email, password } => {
            let api = HttpApi::from_config(config);
            let login = api.login(&email, &password).await?;
            let user_type = UserType::parse(login.user_type.as_deref());
            sessions.sign_in(login.user_id, user_type, login.name.as_deref())?;
            info!(user_id = login.user_id, "signed in");
            let session = Session::load(&sessions).ok_or_else(|| anyhow!("session not stored"))?;
            writeln!(out, "{}", to_json(&output::whoami(Some(&session)), pretty)?)?;
        }
        CliCommand::Logout => {
            sessions.sign_out()?;
            writeln!(out, "{}", to_json(&output::whoami(None), pretty)?)?;
        }
        CliCommand::Whoami => {
            let session = Session::load(&sessions);
            writeln!(out, "{}", to_json(&output::whoami(session.as_ref()), pretty)?)?;
        }
        CliCommand::Threads => {
            let widget = activate(&sessions, config)?;
            widget.refresh().await?;
            let snapshot = widget.snapshot();
            let listing = ThreadListing {
                unread_total: snapshot.unread_total,
                threads: snapshot.rows,
            };
            writeln!(out, "{}", to_json(&listing, pretty)?)?;
        }
        CliCommand::Open { other_id, name } => {
            let widget = activate(&sessions, config)?;
            open(&widget, other_id, name.as_deref()).await?;
            print_conversation(&widget, other_id, pretty, out)?;
        }
        CliCommand::Send { other_id, body } => {
            let widget = activate(&sessions, config)?;
            open(&widget, other_id, None).await?;
            widget.set_draft(body);
            widget.send().await?;
            print_conversation(&widget, other_id, pretty, out)?;
        }
        CliCommand::Watch => {
            let widget = activate(&sessions, config)?;
            let ctrl_c = async {
                let _ = tokio::signal::ctrl_c().await;
            };
            watch(&widget, out, ctrl_c).await?;
        }
    }
    Ok(())
}

fn activate(sessions: &SessionStore, config: &CoreConfig) -> Result<Arc<Widget>> {
    MessagingWidget::activate(sessions, HttpApi::from_config(config), config)
        .ok_or_else(|| anyhow!("not signed in"))
}

async fn open(widget: &Widget, other_id: u64, name: Option<&str>) -> Result<()> {
    widget.show_widget(Some(other_id), name).await;
    if widget.view_state().view != View::Conversation(other_id) {
        bail!("no conversation with user {}", other_id);
    }
    Ok(())
}

fn print_conversation<W: Write>(widget: &Widget, other_id: u64, pretty: bool, out: &mut W) -> Result<()> {
    let conversation = widget
        .snapshot()
        .conversation
        .ok_or_else(|| anyhow!("no conversation with user {}", other_id))?;
    writeln!(out, "{}", to_json(&output::conversation(&conversation), pretty)?)?;
    Ok(())
}

/// Stream one JSON line per widget event until `shutdown` resolves.
async fn watch<W, F>(widget: &Arc<Widget>, out: &mut W, shutdown: F) -> Result<()>
where
    W: Write,
    F: Future<Output = ()>,
{
    let mut events = widget.subscribe();
    let polling = widget.spawn_polling();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            event = events.recv() => match event {
                Ok(event) => {
                    let rows = widget.snapshot().rows;
                    writeln!(out, "{}", to_json(&output::event_line(&event, &rows), false)?)?;
                    out.flush()?;
                }
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "watch lagged"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    polling.abort();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_watch_prints_a_line_per_poll() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forms/messages/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "messages": [
                    {"sender_id": 7, "receiver_id": 42, "body": "hi",
                     "created_at": "2024-05-01T10:05:00Z", "read_at": null,
                     "sender_name": "Maya", "sender_phone": "555-0100"}
                ]
            })))
            .mount(&server)
            .await;

        let mut config = CoreConfig::new(std::env::temp_dir());
        config.api_base = server.uri();
        config.poll_interval = Duration::from_millis(30);
        let session = Session {
            user_id: 42,
            user_type: UserType::Parent,
            user_name: None,
        };
        let widget = Arc::new(MessagingWidget::new(session, HttpApi::from_config(&config), &config));

        let mut out = Vec::new();
        watch(&widget, &mut out, tokio::time::sleep(Duration::from_millis(300)))
            .await
            .unwrap();

        let lines: Vec<Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert!(lines.len() >= 2, "expected repeated refreshes, got {}", lines.len());
        for line in &lines {
            assert_eq!(line["event"], json!("refreshed"));
            assert_eq!(line["unread_total"], json!(1));
            assert_eq!(line["threads"][0]["name"], json!("Maya"));
        }
    }
}
