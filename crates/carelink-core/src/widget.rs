use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::api::MessagingApi;
use crate::config::CoreConfig;
use crate::constants::{EVENT_CHANNEL_CAPACITY, GENERIC_SEND_ERROR};
use crate::error::{ApiError, WidgetError};
use crate::events::WidgetEvent;
use crate::models::Thread;
use crate::render::{self, PanelSnapshot};
use crate::session::{Session, SessionStore, UserType};
use crate::status::{StatusLevel, StatusLine, StatusMessage};
use crate::store::{ContactCache, ThreadStore};
use crate::view::{transition, Effect, ViewEvent, ViewState};

struct WidgetState {
    store: ThreadStore,
    contacts: ContactCache,
    view: ViewState,
    draft: String,
    status: StatusLine,
    /// Ticket of the newest fetch whose result has been applied.
    applied_fetch: u64,
}

/// The chat surface of a signed-in user.
///
/// All state sits behind one lock that is only held between awaits, so
/// readers never see a half-built thread map.
pub struct MessagingWidget<A: MessagingApi> {
    session: Session,
    api: Arc<A>,
    poll_interval: Duration,
    state: Arc<Mutex<WidgetState>>,
    sending: AtomicBool,
    fetch_tickets: AtomicU64,
    events: broadcast::Sender<WidgetEvent>,
    /// Latest contact backfill task.
    enrichment: Mutex<Option<JoinHandle<()>>>,
}

/// View effects that still need the network once `dispatch` has applied the rest.
enum Followup {
    MarkRead(u64),
    Refetch,
}

/// Clears the single-flight send flag when the send finishes, whatever the outcome.
struct SendGuard<'a>(&'a AtomicBool);

impl<'a> SendGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SendGuard(flag))
    }
}

impl Drop for SendGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<A: MessagingApi + 'static> MessagingWidget<A> {
    /// `None` when nobody is signed in; no request is made in that case.
    pub fn activate(sessions: &SessionStore, api: A, config: &CoreConfig) -> Option<Arc<Self>> {
        let session = Session::load(sessions)?;
        Some(Arc::new(Self::new(session, api, config)))
    }

    pub fn new(session: Session, api: A, config: &CoreConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(WidgetState {
                store: ThreadStore::new(session.user_id),
                contacts: ContactCache::new(),
                view: ViewState::default(),
                draft: String::new(),
                status: StatusLine::new(config.status_ttl),
                applied_fetch: 0,
            })),
            session,
            api: Arc::new(api),
            poll_interval: config.poll_interval,
            sending: AtomicBool::new(false),
            fetch_tickets: AtomicU64::new(0),
            events,
            enrichment: Mutex::new(None),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WidgetEvent> {
        self.events.subscribe()
    }

    // ===== Panel operations =====

    /// Open the panel, straight into a conversation when a counterpart is given.
    pub async fn show_widget(&self, counterpart_id: Option<u64>, counterpart_name: Option<&str>) {
        match counterpart_id {
            Some(other_id) => self.open_thread(other_id, counterpart_name).await,
            None => {
                self.dispatch(ViewEvent::Show);
            }
        }
    }

    pub fn hide_widget(&self) {
        self.dispatch(ViewEvent::Hide);
    }

    /// Deep link into a conversation: marks it read on the server, then refetches.
    pub async fn open_thread(&self, other_id: u64, counterpart_name: Option<&str>) {
        let effects = self.dispatch(ViewEvent::Open {
            other_id,
            name: counterpart_name.map(str::to_string),
        });
        self.run_effects(effects).await;
    }

    pub fn back(&self) {
        self.dispatch(ViewEvent::Back);
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        self.state.lock().draft = text.into();
    }

    pub fn draft(&self) -> String {
        self.state.lock().draft.clone()
    }

    /// Edit the composer text in place, under the same lock `send` clears it with.
    pub fn edit_draft(&self, edit: impl FnOnce(&mut String)) {
        edit(&mut self.state.lock().draft);
    }

    /// Apply a view transition and the effects that need no network.
    fn dispatch(&self, event: ViewEvent) -> Vec<Followup> {
        let mut state = self.state.lock();
        let (view, effects) = transition(state.view, event);
        state.view = view;

        let mut followups = Vec::with_capacity(effects.len());
        for effect in effects {
            match effect {
                Effect::EnsureStub { other_id, name } => {
                    state.store.ensure_stub(other_id, name.as_deref());
                }
                Effect::MarkRead { other_id } => followups.push(Followup::MarkRead(other_id)),
                Effect::Refetch => followups.push(Followup::Refetch),
            }
        }
        followups
    }

    async fn run_effects(&self, followups: Vec<Followup>) {
        for followup in followups {
            match followup {
                Followup::MarkRead(other_id) => {
                    // The next poll picks the read state up again if this fails.
                    if let Err(e) = self.api.mark_read(self.session.user_id, other_id).await {
                        warn!(other_id, error = %e, "mark read failed");
                    }
                }
                Followup::Refetch => {
                    let _ = self.refresh().await;
                }
            }
        }
    }

    // ===== Sync =====

    /// One poll cycle: fetch, rebuild, reconcile the view and notify.
    ///
    /// Missing phones are looked up on a background task, so this returns without
    /// waiting on profile requests. On failure the previous threads are left
    /// exactly as they were.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let ticket = self.fetch_tickets.fetch_add(1, Ordering::AcqRel) + 1;
        let messages = match self.api.fetch_messages(self.session.user_id).await {
            Ok(messages) => messages,
            Err(e) => {
                warn!(error = %e, "message poll failed, keeping last state");
                return Err(e);
            }
        };

        let (threads, unread, lookups) = {
            let mut state = self.state.lock();
            if ticket <= state.applied_fetch {
                debug!(ticket, applied = state.applied_fetch, "discarding superseded poll");
                return Ok(());
            }
            state.applied_fetch = ticket;

            let WidgetState {
                store,
                contacts,
                view,
                ..
            } = &mut *state;
            store.rebuild(messages, contacts);

            let active_present = view.active_thread().map_or(true, |id| store.contains(id));
            let (next, _) = transition(*view, ViewEvent::Rebuilt { active_present });
            *view = next;

            let lookups: Vec<u64> = store
                .missing_phones(contacts)
                .into_iter()
                .filter(|id| contacts.begin(*id))
                .collect();
            (Arc::new(store.threads().clone()), store.unread_total(), lookups)
        };

        debug!(threads = threads.len(), unread, "threads rebuilt");
        let _ = self.events.send(WidgetEvent::Refreshed { threads, unread });

        if !lookups.is_empty() {
            let task = tokio::spawn(enrich_contacts(
                Arc::clone(&self.api),
                Arc::clone(&self.state),
                self.events.clone(),
                self.session.user_type.counterpart_role(),
                lookups,
            ));
            *self.enrichment.lock() = Some(task);
        }
        Ok(())
    }

    /// Wait for the latest contact backfill to finish.
    pub async fn contacts_settled(&self) {
        let task = self.enrichment.lock().take();
        if let Some(task) = task {
            let _ = task.await;
        }
    }

    /// Poll immediately, then on every interval, until the task is aborted.
    ///
    /// Each poll runs on its own task: a request that hangs does not hold back
    /// the next tick, and a late result is dropped if a newer one was applied.
    pub fn spawn_polling(self: &Arc<Self>) -> JoinHandle<()> {
        let widget = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(widget.poll_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let poll = Arc::clone(&widget);
                tokio::spawn(async move {
                    let _ = poll.refresh().await;
                });
            }
        })
    }

    // ===== Sending =====

    /// Send the composer text to the open conversation.
    ///
    /// The message shows up through the refetch that follows, never by local append.
    pub async fn send(&self) -> Result<(), WidgetError> {
        let (other_id, body) = {
            let state = self.state.lock();
            let body = state.draft.trim().to_string();
            if body.is_empty() {
                return Err(WidgetError::EmptyDraft);
            }
            let Some(other_id) = state.view.active_thread() else {
                return Err(WidgetError::NoActiveThread);
            };
            (other_id, body)
        };

        let Some(guard) = SendGuard::acquire(&self.sending) else {
            debug!(other_id, "send already in flight");
            return Err(WidgetError::SendInFlight);
        };

        let result = self
            .api
            .send_message(self.session.user_id, other_id, &body)
            .await;
        drop(guard);

        match result {
            Ok(()) => {
                info!(other_id, "message sent");
                {
                    let mut state = self.state.lock();
                    // Keep anything typed while the request was out.
                    if state.draft.trim() == body {
                        state.draft.clear();
                    }
                }
                let _ = self.refresh().await;
                Ok(())
            }
            Err(e) => {
                warn!(other_id, error = %e, "send failed");
                let text = match &e {
                    ApiError::Server { message, .. } => message.clone(),
                    _ => GENERIC_SEND_ERROR.to_string(),
                };
                self.state
                    .lock()
                    .status
                    .show(text, StatusLevel::Error, Instant::now());
                Err(e.into())
            }
        }
    }

    pub fn is_sending(&self) -> bool {
        self.sending.load(Ordering::Acquire)
    }

    // ===== Reads =====

    pub fn view_state(&self) -> ViewState {
        self.state.lock().view
    }

    pub fn unread_total(&self) -> usize {
        self.state.lock().store.unread_total()
    }

    pub fn thread(&self, other_id: u64) -> Option<Thread> {
        self.state.lock().store.get(other_id).cloned()
    }

    pub fn threads(&self) -> HashMap<u64, Thread> {
        self.state.lock().store.threads().clone()
    }

    pub fn status_at(&self, now: Instant) -> Option<StatusMessage> {
        self.state.lock().status.current(now).cloned()
    }

    pub fn snapshot(&self) -> PanelSnapshot {
        self.snapshot_at(Instant::now())
    }

    pub fn snapshot_at(&self, now: Instant) -> PanelSnapshot {
        let sending = self.is_sending();
        let state = self.state.lock();
        render::panel(
            &state.store,
            &state.view,
            &state.draft,
            state.status.current(now),
            sending,
        )
    }
}

/// Profile lookups for counterparts without a phone, one at a time.
async fn enrich_contacts<A: MessagingApi>(
    api: Arc<A>,
    state: Arc<Mutex<WidgetState>>,
    events: broadcast::Sender<WidgetEvent>,
    role: UserType,
    ids: Vec<u64>,
) {
    for other_id in ids {
        match api.fetch_profile(role, other_id).await {
            Ok(profile) => {
                let phone = {
                    let mut state = state.lock();
                    let contact = state.contacts.resolve(other_id, profile);
                    state.store.apply_contact(other_id, &contact);
                    state
                        .store
                        .get(other_id)
                        .and_then(Thread::phone)
                        .map(str::to_string)
                };
                let _ = events.send(WidgetEvent::ContactResolved { other_id, phone });
            }
            Err(e) => {
                debug!(other_id, error = %e, "profile lookup failed");
                state.lock().contacts.fail(other_id);
            }
        }
    }
}
