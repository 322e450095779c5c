//! In-memory session store and location.

use parking_lot::Mutex;
use std::collections::BTreeMap;

use quillpad_app::ports::{KEY_ROLE, KEY_TOKEN, KEY_USERNAME, KEY_USER_ID};
use quillpad_app::{HashLocation, KeyValueStore, StorageError};
use quillpad_core::session::Role;

/// [`KeyValueStore`] over a map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding a signed-in session.
    pub fn signed_in(token: &str, username: &str, user_id: i64, role: Option<Role>) -> Self {
        let store = Self::new();
        {
            let mut data = store.data.lock();
            data.insert(KEY_TOKEN.into(), token.into());
            data.insert(KEY_USERNAME.into(), username.into());
            data.insert(KEY_USER_ID.into(), user_id.to_string());
            if let Some(role) = role {
                data.insert(KEY_ROLE.into(), role.as_str().into());
            }
        }
        store
    }

    /// Copy of the contents.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.data.lock().clone()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.data.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.data.lock().insert(key.into(), value.into());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.data.lock().remove(key);
        Ok(())
    }
}

/// [`HashLocation`] that records every assignment.
#[derive(Debug, Default)]
pub struct MemoryLocation {
    current: Mutex<String>,
    assigned: Mutex<Vec<String>>,
}

impl MemoryLocation {
    /// Location starting at `hash`.
    pub fn at(hash: &str) -> Self {
        Self {
            current: Mutex::new(hash.to_string()),
            assigned: Mutex::new(Vec::new()),
        }
    }

    /// Change the location as the host would, without recording an assignment.
    pub fn set(&self, hash: &str) {
        *self.current.lock() = hash.to_string();
    }

    /// Hashes the engine assigned, in order.
    pub fn assigned(&self) -> Vec<String> {
        self.assigned.lock().clone()
    }
}

impl HashLocation for MemoryLocation {
    fn current(&self) -> String {
        self.current.lock().clone()
    }

    fn assign(&self, hash: &str) {
        *self.current.lock() = hash.to_string();
        self.assigned.lock().push(hash.to_string());
    }
}
