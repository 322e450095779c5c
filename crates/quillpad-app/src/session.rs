//! # Session Context
//!
//! Injectable owner of the [`Session`] snapshot. The snapshot is readable
//! everywhere; only the auth workflows write it, and every write goes through
//! the persisted store first.

use parking_lot::RwLock;
use std::sync::Arc;

use quillpad_core::{Authored, Session, UserRecord};

use crate::errors::StorageError;
use crate::ports::{KeyValueStore, KEY_ROLE, KEY_TOKEN, KEY_USERNAME, KEY_USER_ID, SESSION_KEYS};

/// Session snapshot plus its persisted backing.
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    current: RwLock<Session>,
}

impl SessionStore {
    /// Empty snapshot over `store`. Call [`Self::refresh_from_storage`] to load.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            current: RwLock::new(Session::default()),
        }
    }

    /// Read-only copy of the snapshot.
    #[must_use]
    pub fn current_user(&self) -> Session {
        self.current.read().clone()
    }

    /// Reload every field from storage. Returns whether a token is present.
    ///
    /// Unreadable values are treated as absent; an unparsable role or user id
    /// leaves that field empty.
    pub fn refresh_from_storage(&self) -> bool {
        let read = |key: &str| match self.store.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(err) => {
                tracing::warn!(key, error = %err, "Failed to read session key");
                None
            }
        };
        let session = Session {
            token: read(KEY_TOKEN),
            username: read(KEY_USERNAME),
            user_id: read(KEY_USER_ID).and_then(|id| id.parse().ok()),
            role: read(KEY_ROLE).and_then(|role| role.parse().ok()),
        };
        let has_token = session.is_authenticated();
        *self.current.write() = session;
        has_token
    }

    /// Persist the login response and update the snapshot.
    pub fn sign_in(
        &self,
        token: &str,
        username: Option<&str>,
        user_id: Option<i64>,
    ) -> Result<(), StorageError> {
        self.store.set(KEY_TOKEN, token)?;
        if let Some(username) = username {
            self.store.set(KEY_USERNAME, username)?;
        }
        if let Some(id) = user_id {
            self.store.set(KEY_USER_ID, &id.to_string())?;
        }
        let mut session = self.current.write();
        session.token = Some(token.to_string());
        session.username = username.map(str::to_string);
        session.user_id = user_id;
        Ok(())
    }

    /// Persist role, username and id from a profile record.
    pub fn apply_profile(&self, user: &UserRecord) -> Result<(), StorageError> {
        let role = user.parsed_role();
        match &user.role {
            Some(raw) => self.store.set(KEY_ROLE, raw)?,
            None => self.store.remove(KEY_ROLE)?,
        }
        if let Some(username) = &user.username {
            self.store.set(KEY_USERNAME, username)?;
        }
        if let Some(id) = user.id {
            self.store.set(KEY_USER_ID, &id.to_string())?;
        }
        let mut session = self.current.write();
        session.role = role;
        if user.username.is_some() {
            session.username = user.username.clone();
        }
        if user.id.is_some() {
            session.user_id = user.id;
        }
        Ok(())
    }

    /// Clear the snapshot and every persisted key. The snapshot is cleared even
    /// if storage fails; the first storage error is returned.
    pub fn clear(&self) -> Result<(), StorageError> {
        *self.current.write() = Session::default();
        let mut first_error = None;
        for key in SESSION_KEYS {
            if let Err(err) = self.store.remove(key) {
                tracing::warn!(key, error = %err, "Failed to clear session key");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Whether a token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current.read().is_authenticated()
    }

    /// See [`Session::is_admin`].
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.current.read().is_admin()
    }

    /// See [`Session::can_create_post`].
    #[must_use]
    pub fn can_create_post(&self) -> bool {
        self.current.read().can_create_post()
    }

    /// See [`Session::can_edit_or_delete`].
    #[must_use]
    pub fn can_edit_or_delete<T: Authored + ?Sized>(&self, item: &T) -> bool {
        self.current.read().can_edit_or_delete(item)
    }

    /// Whether a token exists but the role has not been fetched yet.
    #[must_use]
    pub fn needs_profile(&self) -> bool {
        let session = self.current.read();
        session.token.is_some() && session.role.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use quillpad_core::Role;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapStore(Mutex<HashMap<String, String>>);

    impl KeyValueStore for MapStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.0.lock().get(key).cloned())
        }
        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.0.lock().insert(key.into(), value.into());
            Ok(())
        }
        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.0.lock().remove(key);
            Ok(())
        }
    }

    fn store() -> (Arc<MapStore>, SessionStore) {
        let backing = Arc::new(MapStore::default());
        let session = SessionStore::new(backing.clone());
        (backing, session)
    }

    #[test]
    fn test_refresh_reads_all_keys() {
        let (backing, session) = store();
        backing.set(KEY_TOKEN, "tok").unwrap();
        backing.set(KEY_USERNAME, "ada").unwrap();
        backing.set(KEY_USER_ID, "7").unwrap();
        backing.set(KEY_ROLE, "editor").unwrap();
        assert!(session.refresh_from_storage());
        let user = session.current_user();
        assert_eq!(user.user_id, Some(7));
        assert_eq!(user.role, Some(Role::Editor));
    }

    #[test]
    fn test_unknown_role_fails_closed() {
        let (backing, session) = store();
        backing.set(KEY_TOKEN, "tok").unwrap();
        backing.set(KEY_ROLE, "superuser").unwrap();
        session.refresh_from_storage();
        assert_eq!(session.current_user().role, None);
        assert!(session.needs_profile());
        assert!(!session.can_create_post());
    }

    #[test]
    fn test_sign_in_profile_and_clear() {
        let (backing, session) = store();
        session.sign_in("tok", Some("ada"), Some(3)).unwrap();
        assert!(session.needs_profile());
        session
            .apply_profile(&UserRecord {
                id: Some(3),
                username: Some("ada".into()),
                role: Some("admin".into()),
                ..UserRecord::default()
            })
            .unwrap();
        assert!(session.is_admin());
        assert_eq!(backing.get(KEY_ROLE).unwrap().as_deref(), Some("admin"));

        session.clear().unwrap();
        assert!(!session.is_authenticated());
        for key in SESSION_KEYS {
            assert_eq!(backing.get(key).unwrap(), None);
        }
        assert!(!session.refresh_from_storage());
    }
}
