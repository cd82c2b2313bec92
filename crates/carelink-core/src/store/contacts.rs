use std::collections::{HashMap, HashSet};

use crate::models::Profile;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contact {
    pub phone: Option<String>,
    pub photo: Option<String>,
}

/// Counterpart contact details resolved through profile lookups.
///
/// A resolved entry is kept for the life of the widget, even when the
/// profile had no phone, so each counterpart is looked up once. Failed
/// lookups leave no entry and may be retried.
#[derive(Debug, Default)]
pub struct ContactCache {
    entries: HashMap<u64, Contact>,
    pending: HashSet<u64>,
}

impl ContactCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, other_id: u64) -> Option<&Contact> {
        self.entries.get(&other_id)
    }

    pub fn phone(&self, other_id: u64) -> Option<&str> {
        self.entries.get(&other_id)?.phone.as_deref()
    }

    pub fn needs_lookup(&self, other_id: u64) -> bool {
        !self.entries.contains_key(&other_id) && !self.pending.contains(&other_id)
    }

    /// Claim a lookup; false if one is already resolved or running.
    pub fn begin(&mut self, other_id: u64) -> bool {
        if !self.needs_lookup(other_id) {
            return false;
        }
        self.pending.insert(other_id)
    }

    pub fn resolve(&mut self, other_id: u64, profile: Profile) -> Contact {
        self.pending.remove(&other_id);
        let contact = Contact {
            phone: profile.phone,
            photo: profile.photo,
        };
        self.entries.insert(other_id, contact.clone());
        contact
    }

    pub fn fail(&mut self, other_id: u64) {
        self.pending.remove(&other_id);
    }
}
