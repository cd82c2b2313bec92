use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::session_keys;
use crate::error::SessionError;

/// Role of the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Parent,
    Provider,
}

impl UserType {
    /// Anything other than `provider` reads as a parent.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("provider") => UserType::Provider,
            _ => UserType::Parent,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Parent => "parent",
            UserType::Provider => "provider",
        }
    }

    /// Profile role of the people this user talks to.
    pub fn counterpart_role(&self) -> UserType {
        match self {
            UserType::Parent => UserType::Provider,
            UserType::Provider => UserType::Parent,
        }
    }
}

/// Signed-in user as seen by the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user_id: u64,
    pub user_type: UserType,
    pub user_name: Option<String>,
}

impl Session {
    /// `None` when no usable user id is stored.
    pub fn load(store: &SessionStore) -> Option<Self> {
        let user_id = store
            .get(session_keys::USER_ID)?
            .trim()
            .parse::<u64>()
            .ok()?;
        Some(Self {
            user_id,
            user_type: UserType::parse(store.get(session_keys::USER_TYPE)),
            user_name: store
                .get(session_keys::USER_NAME)
                .filter(|n| !n.trim().is_empty())
                .map(str::to_string),
        })
    }
}

/// Persisted string key-value storage shared by everything in the process.
///
/// Values are kept as strings, as the site does in localStorage. A missing
/// file is an empty store.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl SessionStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SessionError> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path: Some(path),
            values,
        })
    }

    /// Store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<(), SessionError> {
        self.values.insert(key.to_string(), value.into());
        self.save()
    }

    pub fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        if self.values.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }

    /// Write the login response the way the site's login form does.
    pub fn sign_in(
        &mut self,
        user_id: u64,
        user_type: UserType,
        user_name: Option<&str>,
    ) -> Result<(), SessionError> {
        self.values
            .insert(session_keys::USER_ID.to_string(), user_id.to_string());
        self.values
            .insert(session_keys::USER_TYPE.to_string(), user_type.as_str().to_string());
        match user_name {
            Some(name) => {
                self.values
                    .insert(session_keys::USER_NAME.to_string(), name.to_string());
            }
            None => {
                self.values.remove(session_keys::USER_NAME);
            }
        }
        self.save()
    }

    pub fn sign_out(&mut self) -> Result<(), SessionError> {
        for key in [
            session_keys::USER_ID,
            session_keys::USER_TYPE,
            session_keys::USER_NAME,
        ] {
            self.values.remove(key);
        }
        self.save()
    }

    fn save(&self) -> Result<(), SessionError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_has_no_session() {
        let dir = tempdir().unwrap();
        let store = SessionStore::open(dir.path().join("session.json")).unwrap();
        assert!(Session::load(&store).is_none());
    }

    #[test]
    fn test_sign_in_round_trips_through_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let mut store = SessionStore::open(&path).unwrap();
        store.sign_in(42, UserType::Provider, Some("Dana")).unwrap();

        let reopened = SessionStore::open(&path).unwrap();
        let session = Session::load(&reopened).unwrap();
        assert_eq!(session.user_id, 42);
        assert_eq!(session.user_type, UserType::Provider);
        assert_eq!(session.user_name.as_deref(), Some("Dana"));
    }

    #[test]
    fn test_non_numeric_user_id_is_not_a_session() {
        let mut store = SessionStore::in_memory();
        store.set(session_keys::USER_ID, "null").unwrap();
        assert!(Session::load(&store).is_none());
    }

    #[test]
    fn test_unknown_user_type_reads_as_parent() {
        let mut store = SessionStore::in_memory();
        store.set(session_keys::USER_ID, "7").unwrap();
        store.set(session_keys::USER_TYPE, "admin").unwrap();
        assert_eq!(Session::load(&store).unwrap().user_type, UserType::Parent);
    }

    #[test]
    fn test_sign_out_clears_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut store = SessionStore::open(&path).unwrap();
        store.sign_in(3, UserType::Parent, None).unwrap();
        store.set("flash_message", "hello").unwrap();
        store.sign_out().unwrap();

        let reopened = SessionStore::open(&path).unwrap();
        assert!(Session::load(&reopened).is_none());
        assert_eq!(reopened.get("flash_message"), Some("hello"));
    }

    #[test]
    fn test_counterpart_role() {
        assert_eq!(UserType::Parent.counterpart_role(), UserType::Provider);
        assert_eq!(UserType::Provider.counterpart_role().as_str(), "parent");
    }
}
