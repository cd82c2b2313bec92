use std::collections::HashMap;

use super::contacts::{Contact, ContactCache};
use crate::constants::DEFAULT_OTHER_NAME;
use crate::models::{Message, Thread};

/// Conversation threads of the session user, keyed by counterpart id.
///
/// Threads are derived: every rebuild replaces the whole map from the
/// latest server payload.
#[derive(Debug)]
pub struct ThreadStore {
    user_id: u64,
    threads: HashMap<u64, Thread>,
    /// Names handed to us by deep links, used when the payload has none.
    name_hints: HashMap<u64, String>,
}

impl ThreadStore {
    pub fn new(user_id: u64) -> Self {
        Self {
            user_id,
            threads: HashMap::new(),
            name_hints: HashMap::new(),
        }
    }

    // ===== Getters =====

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    pub fn threads(&self) -> &HashMap<u64, Thread> {
        &self.threads
    }

    pub fn get(&self, other_id: u64) -> Option<&Thread> {
        self.threads.get(&other_id)
    }

    pub fn contains(&self, other_id: u64) -> bool {
        self.threads.contains_key(&other_id)
    }

    /// Most recently active first; stubs (timestamp 0) last, ties by id.
    pub fn ordered(&self) -> Vec<&Thread> {
        let mut threads: Vec<&Thread> = self.threads.values().collect();
        threads.sort_by(|a, b| {
            b.last_activity()
                .cmp(&a.last_activity())
                .then_with(|| a.other_id.cmp(&b.other_id))
        });
        threads
    }

    pub fn unread_for(&self, other_id: u64) -> usize {
        self.threads
            .get(&other_id)
            .map(|t| t.unread_count(self.user_id))
            .unwrap_or(0)
    }

    pub fn unread_total(&self) -> usize {
        self.threads
            .values()
            .map(|t| t.unread_count(self.user_id))
            .sum()
    }

    /// Counterparts that have no phone and no resolved or running lookup.
    pub fn missing_phones(&self, contacts: &ContactCache) -> Vec<u64> {
        let mut ids: Vec<u64> = self
            .threads
            .values()
            .filter(|t| t.phone().is_none() && contacts.needs_lookup(t.other_id))
            .map(|t| t.other_id)
            .collect();
        ids.sort_unstable();
        ids
    }

    // ===== Mutations =====

    /// Replace every thread with ones built from `messages`.
    pub fn rebuild(&mut self, messages: Vec<Message>, contacts: &ContactCache) {
        let threads = build_threads(self.user_id, messages, &self.name_hints, contacts);
        self.threads = threads;
    }

    pub fn remember_name(&mut self, other_id: u64, name: &str) {
        let name = name.trim();
        if !name.is_empty() {
            self.name_hints.insert(other_id, name.to_string());
        }
    }

    /// Local placeholder so a conversation can be shown before any message exists.
    pub fn ensure_stub(&mut self, other_id: u64, name: Option<&str>) {
        if let Some(name) = name {
            self.remember_name(other_id, name);
        }
        let hint = self.name_hints.get(&other_id).map(String::as_str);
        self.threads
            .entry(other_id)
            .or_insert_with(|| Thread::stub(other_id, hint));
    }

    /// Backfill a resolved contact into the live thread. Payload values win.
    pub fn apply_contact(&mut self, other_id: u64, contact: &Contact) {
        if let Some(thread) = self.threads.get_mut(&other_id) {
            backfill(thread, Some(contact));
        }
    }
}

/// Group a flat message list into one thread per counterpart.
pub fn build_threads(
    user_id: u64,
    messages: Vec<Message>,
    name_hints: &HashMap<u64, String>,
    contacts: &ContactCache,
) -> HashMap<u64, Thread> {
    let mut threads: HashMap<u64, Thread> = HashMap::new();

    for message in messages {
        let other_id = message.counterpart(user_id);
        let thread = threads.entry(other_id).or_insert_with(|| Thread {
            other_id,
            other_name: String::new(),
            other_phone: None,
            other_photo: None,
            messages: Vec::new(),
        });

        if thread.other_name.is_empty() {
            if let Some(name) = message.counterpart_name(user_id) {
                thread.other_name = name.trim().to_string();
            }
        }
        if thread.other_phone.is_none() {
            thread.other_phone = message.counterpart_phone(user_id).map(str::to_string);
        }
        if thread.other_photo.is_none() {
            thread.other_photo = message.counterpart_photo(user_id).map(str::to_string);
        }
        thread.messages.push(message);
    }

    for thread in threads.values_mut() {
        if thread.other_name.is_empty() {
            thread.other_name = name_hints
                .get(&thread.other_id)
                .cloned()
                .unwrap_or_else(|| DEFAULT_OTHER_NAME.to_string());
        }
        backfill(thread, contacts.get(thread.other_id));
    }

    threads
}

fn backfill(thread: &mut Thread, contact: Option<&Contact>) {
    let Some(contact) = contact else {
        return;
    };
    if thread.phone().is_none() {
        if let Some(phone) = &contact.phone {
            thread.other_phone = Some(phone.clone());
        }
    }
    if thread.other_photo.is_none() {
        thread.other_photo = contact.photo.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Profile;
    use serde_json::json;
    use std::collections::HashSet;

    fn msg(sender: u64, receiver: u64, at: &str, read: bool) -> Message {
        let read_at = if read {
            json!("2024-05-01T12:00:00Z")
        } else {
            json!(null)
        };
        serde_json::from_value(json!({
            "sender_id": sender,
            "receiver_id": receiver,
            "body": format!("{} -> {}", sender, receiver),
            "created_at": at,
            "read_at": read_at,
        }))
        .unwrap()
    }

    fn scenario() -> Vec<Message> {
        vec![
            msg(9, 42, "2024-05-01T09:00:00Z", true),
            msg(42, 7, "2024-05-01T10:00:00Z", false),
            msg(7, 42, "2024-05-01T10:05:00Z", false),
        ]
    }

    #[test]
    fn test_rebuild_keys_match_payload_counterparts() {
        let mut store = ThreadStore::new(42);
        let contacts = ContactCache::new();
        store.rebuild(scenario(), &contacts);

        let keys: HashSet<u64> = store.threads().keys().copied().collect();
        assert_eq!(keys, HashSet::from([7, 9]));

        store.rebuild(vec![msg(5, 42, "2024-05-02T08:00:00Z", false)], &contacts);
        let keys: HashSet<u64> = store.threads().keys().copied().collect();
        assert_eq!(keys, HashSet::from([5]));
    }

    #[test]
    fn test_rebuild_drops_local_stub() {
        let mut store = ThreadStore::new(42);
        store.ensure_stub(11, Some("New Sitter"));
        assert!(store.contains(11));

        store.rebuild(scenario(), &ContactCache::new());
        assert!(!store.contains(11));
    }

    #[test]
    fn test_unread_counts() {
        let mut store = ThreadStore::new(42);
        store.rebuild(scenario(), &ContactCache::new());

        assert_eq!(store.unread_for(7), 1);
        assert_eq!(store.unread_for(9), 0);
        assert_eq!(store.unread_for(123), 0);
        assert_eq!(store.unread_total(), 1);
    }

    #[test]
    fn test_outgoing_messages_never_count_unread() {
        let mut store = ThreadStore::new(42);
        store.rebuild(
            vec![
                msg(42, 7, "2024-05-01T10:00:00Z", false),
                msg(42, 7, "2024-05-01T10:01:00Z", false),
            ],
            &ContactCache::new(),
        );
        assert_eq!(store.unread_total(), 0);
    }

    #[test]
    fn test_ordering_most_recent_first() {
        let mut store = ThreadStore::new(42);
        store.rebuild(
            vec![
                msg(1, 42, "2024-05-01T08:00:00Z", true),
                msg(3, 42, "2024-05-01T10:00:00Z", true),
                msg(2, 42, "2024-05-01T09:00:00Z", true),
            ],
            &ContactCache::new(),
        );
        store.ensure_stub(4, None);

        let order: Vec<u64> = store.ordered().iter().map(|t| t.other_id).collect();
        assert_eq!(order, vec![3, 2, 1, 4]);
    }

    #[test]
    fn test_messages_keep_server_order() {
        let mut store = ThreadStore::new(42);
        store.rebuild(scenario(), &ContactCache::new());
        let times: Vec<i64> = store
            .get(7)
            .unwrap()
            .messages
            .iter()
            .map(Message::timestamp_millis)
            .collect();
        assert!(times[0] < times[1]);
    }

    #[test]
    fn test_name_resolution_order() {
        let mut store = ThreadStore::new(42);
        store.remember_name(9, "Hinted");
        let mut named: Message = msg(7, 42, "2024-05-01T10:05:00Z", false);
        named.sender_name = Some("Maya".to_string());

        store.rebuild(
            vec![
                named,
                msg(9, 42, "2024-05-01T09:00:00Z", true),
                msg(5, 42, "2024-05-01T08:00:00Z", true),
            ],
            &ContactCache::new(),
        );

        assert_eq!(store.get(7).unwrap().other_name, "Maya");
        assert_eq!(store.get(9).unwrap().other_name, "Hinted");
        assert_eq!(store.get(5).unwrap().other_name, "User");
    }

    #[test]
    fn test_contacts_backfill_missing_phone_only() {
        let mut contacts = ContactCache::new();
        contacts.begin(7);
        contacts.resolve(
            7,
            Profile {
                phone: Some("555-0100".to_string()),
                ..Profile::default()
            },
        );
        contacts.begin(9);
        contacts.resolve(
            9,
            Profile {
                phone: Some("555-0199".to_string()),
                ..Profile::default()
            },
        );

        let mut with_phone = msg(9, 42, "2024-05-01T09:00:00Z", true);
        with_phone.sender_phone = Some("555-4242".to_string());

        let mut store = ThreadStore::new(42);
        store.rebuild(vec![msg(7, 42, "2024-05-01T10:05:00Z", false), with_phone], &contacts);

        assert_eq!(store.get(7).unwrap().phone(), Some("555-0100"));
        assert_eq!(store.get(9).unwrap().phone(), Some("555-4242"));
        assert!(store.missing_phones(&contacts).is_empty());
    }

    #[test]
    fn test_missing_phones_skips_resolved_and_pending() {
        let mut contacts = ContactCache::new();
        let mut store = ThreadStore::new(42);
        store.rebuild(scenario(), &contacts);
        assert_eq!(store.missing_phones(&contacts), vec![7, 9]);

        contacts.begin(7);
        assert_eq!(store.missing_phones(&contacts), vec![9]);
    }
}
