//! Key-value storage for the persisted session.
//!
//! # Design
//! The session is stored under three fixed keys. Writes and removals go
//! through batch operations that implementations apply atomically, so a
//! reader never sees a session id without its CSRF token.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::types::Session;

/// Fixed storage keys for the persisted session record.
pub mod keys {
    pub const SESSION_NAME: &str = "ezpRestClient.sessionName";
    pub const SESSION_ID: &str = "ezpRestClient.sessionId";
    pub const CSRF_TOKEN: &str = "ezpRestClient.csrfToken";

    pub const ALL: [&str; 3] = [SESSION_NAME, SESSION_ID, CSRF_TOKEN];
}

/// String key-value store scoped to the client's runtime environment.
///
/// `set_all` and `remove_all` must apply every entry or none.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set_all(&self, entries: &[(&str, &str)]);
    fn remove_all(&self, keys: &[&str]);
}

/// Process-local storage backed by a `HashMap` behind one lock.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set_all(&self, entries: &[(&str, &str)]) {
        let mut map = self.entries.lock();
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
    }

    fn remove_all(&self, keys: &[&str]) {
        let mut map = self.entries.lock();
        for key in keys {
            map.remove(*key);
        }
    }
}

/// Outcome of reading the persisted session keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredSession {
    Absent,
    Complete(Session),
    /// Some but not all keys were present.
    Partial,
}

pub fn load_session(storage: &dyn SessionStorage) -> StoredSession {
    let name = storage.get(keys::SESSION_NAME);
    let id = storage.get(keys::SESSION_ID);
    let csrf_token = storage.get(keys::CSRF_TOKEN);
    match (name, id, csrf_token) {
        (Some(name), Some(id), Some(csrf_token)) => StoredSession::Complete(Session {
            name,
            id,
            csrf_token,
        }),
        (None, None, None) => StoredSession::Absent,
        _ => StoredSession::Partial,
    }
}

pub fn save_session(storage: &dyn SessionStorage, session: &Session) {
    storage.set_all(&[
        (keys::SESSION_NAME, session.name.as_str()),
        (keys::SESSION_ID, session.id.as_str()),
        (keys::CSRF_TOKEN, session.csrf_token.as_str()),
    ]);
}

pub fn clear_session(storage: &dyn SessionStorage) {
    storage.remove_all(&keys::ALL);
}
