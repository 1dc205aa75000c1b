use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::{FileStore, KeyValueStore, MemoryStore, StoreError};
use crate::models::User;

pub const USERS_KEY: &str = "users_data";
pub const AUTH_KEY: &str = "is_logged_in";
pub const TOKEN_KEY: &str = "user_token";
pub const CURRENT_USER_KEY: &str = "current_user";

/// Persistence adapter over a `KeyValueStore`.
///
/// Reads never fail: a missing, unreadable or malformed value reads as
/// empty. Writes return their error so the caller can decide whether it
/// matters.
pub struct Storage {
    backend: Box<dyn KeyValueStore>,
}

impl Storage {
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Storage backed by `<key>.json` files in `dir`.
    pub fn open(dir: PathBuf) -> Result<Self, StoreError> {
        Ok(Self::new(Box::new(FileStore::new(dir)?)))
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.backend.get(key) {
            Ok(Some(contents)) => match serde_json::from_str(&contents) {
                Ok(value) => Some(value),
                Err(e) => {
                    debug!(key, error = %e, "Stored value is malformed, treating as empty");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                debug!(key, error = %e, "Failed to read stored value, treating as empty");
                None
            }
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let contents = serde_json::to_string(value)?;
        self.backend.set(key, &contents)
    }

    // ===== Users =====

    /// The cached user snapshot; empty if never populated or malformed.
    pub fn get_users(&self) -> Vec<User> {
        self.read_json(USERS_KEY).unwrap_or_default()
    }

    /// Overwrite the full snapshot.
    pub fn save_users(&self, users: &[User]) -> Result<(), StoreError> {
        self.write_json(USERS_KEY, users)?;
        debug!(count = users.len(), "Saved user snapshot");
        Ok(())
    }

    pub fn get_user_by_id(&self, id: &str) -> Option<User> {
        self.get_users().into_iter().find(|u| u.id == id)
    }

    pub fn has_users(&self) -> bool {
        !self.get_users().is_empty()
    }

    /// When the snapshot was last written, if the backend knows.
    pub fn users_updated_at(&self) -> Option<DateTime<Utc>> {
        self.backend.updated_at(USERS_KEY)
    }

    // ===== Authentication =====

    pub fn is_authenticated(&self) -> bool {
        self.read_json::<bool>(AUTH_KEY).unwrap_or(false)
    }

    pub fn set_authenticated(&self, authenticated: bool) -> Result<(), StoreError> {
        self.write_json(AUTH_KEY, &authenticated)
    }

    /// Clear the auth flag and token. The user snapshot stays, so the next
    /// login does not need to refetch.
    pub fn logout(&self) -> Result<(), StoreError> {
        self.backend.remove(AUTH_KEY)?;
        self.backend.remove(TOKEN_KEY)?;
        Ok(())
    }

    // ===== Current User =====

    pub fn current_user(&self) -> Option<User> {
        self.read_json(CURRENT_USER_KEY)
    }

    pub fn set_current_user(&self, user: &User) -> Result<(), StoreError> {
        self.write_json(CURRENT_USER_KEY, user)
    }

    pub fn clear_current_user(&self) -> Result<(), StoreError> {
        self.backend.remove(CURRENT_USER_KEY)
    }

    /// Wipe everything, snapshot included.
    pub fn clear_all(&self) -> Result<(), StoreError> {
        self.backend.clear()
    }
}

/// Human-friendly age of a timestamp ("just now", "5m ago", "2h ago", "3d ago").
pub fn age_display(since: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - since).num_minutes();
    if minutes < 1 {
        // Includes negative ages from clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60;
        // Round up: 1h 30m+ becomes 2h
        if minutes % 60 >= 30 {
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = minutes / 1440;
        // Round up: 1d 12h+ becomes 2d
        if (minutes % 1440) / 60 >= 12 {
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::fixtures::user;
    use crate::models::UserStatus;
    use chrono::Duration;
    use tempfile::TempDir;

    fn sample_users() -> Vec<User> {
        vec![
            user("1", "Lendsqr", "Adedeji", UserStatus::Active),
            user("2", "Iridia", "Debby", UserStatus::Pending),
        ]
    }

    #[test]
    fn test_get_users_empty_when_never_saved() {
        let storage = Storage::in_memory();
        assert!(storage.get_users().is_empty());
        assert!(!storage.has_users());
    }

    #[test]
    fn test_save_then_get_users() {
        let storage = Storage::in_memory();
        storage.save_users(&sample_users()).unwrap();
        assert_eq!(storage.get_users(), sample_users());
        assert!(storage.users_updated_at().is_some());
    }

    #[test]
    fn test_save_users_overwrites_snapshot() {
        let storage = Storage::in_memory();
        storage.save_users(&sample_users()).unwrap();
        storage.save_users(&sample_users()[..1]).unwrap();
        assert_eq!(storage.get_users().len(), 1);
    }

    #[test]
    fn test_malformed_users_read_as_empty() {
        let backend = MemoryStore::new();
        backend.set(USERS_KEY, "{ not json").unwrap();
        let storage = Storage::new(Box::new(backend));
        assert!(storage.get_users().is_empty());
    }

    #[test]
    fn test_get_user_by_id() {
        let storage = Storage::in_memory();
        assert!(storage.get_user_by_id("1").is_none());

        storage.save_users(&sample_users()).unwrap();
        assert_eq!(storage.get_user_by_id("2").map(|u| u.username), Some("Debby".to_string()));
        assert!(storage.get_user_by_id("999").is_none());
    }

    #[test]
    fn test_authentication_flag() {
        let storage = Storage::in_memory();
        assert!(!storage.is_authenticated());

        storage.set_authenticated(true).unwrap();
        assert!(storage.is_authenticated());

        storage.set_authenticated(false).unwrap();
        assert!(!storage.is_authenticated());
    }

    #[test]
    fn test_non_boolean_flag_is_not_authenticated() {
        let backend = MemoryStore::new();
        backend.set(AUTH_KEY, "\"yes\"").unwrap();
        let storage = Storage::new(Box::new(backend));
        assert!(!storage.is_authenticated());
    }

    #[test]
    fn test_logout_preserves_users() {
        let backend = MemoryStore::new();
        backend.set(TOKEN_KEY, "\"abc\"").unwrap();
        let storage = Storage::new(Box::new(backend));
        storage.save_users(&sample_users()).unwrap();
        storage.set_authenticated(true).unwrap();

        storage.logout().unwrap();

        assert!(!storage.is_authenticated());
        assert_eq!(storage.get_users(), sample_users());
        assert!(storage.backend.get(TOKEN_KEY).unwrap().is_none());
    }

    #[test]
    fn test_current_user_marker() {
        let storage = Storage::in_memory();
        assert!(storage.current_user().is_none());

        let users = sample_users();
        storage.set_current_user(&users[0]).unwrap();
        assert_eq!(storage.current_user(), Some(users[0].clone()));

        storage.clear_current_user().unwrap();
        assert!(storage.current_user().is_none());
    }

    #[test]
    fn test_clear_all_wipes_snapshot() {
        let storage = Storage::in_memory();
        storage.save_users(&sample_users()).unwrap();
        storage.set_authenticated(true).unwrap();
        storage.clear_all().unwrap();
        assert!(storage.get_users().is_empty());
        assert!(!storage.is_authenticated());
    }

    #[test]
    fn test_file_backed_storage_survives_reopen() {
        let tmp = TempDir::new().unwrap();
        {
            let storage = Storage::open(tmp.path().to_path_buf()).unwrap();
            storage.save_users(&sample_users()).unwrap();
            storage.set_authenticated(true).unwrap();
        }

        let storage = Storage::open(tmp.path().to_path_buf()).unwrap();
        assert_eq!(storage.backend_name(), "FileStore");
        assert_eq!(storage.get_users(), sample_users());
        assert!(storage.is_authenticated());
    }

    #[test]
    fn test_age_display() {
        let now = Utc::now();
        assert_eq!(age_display(now, now), "just now");
        assert_eq!(age_display(now + Duration::minutes(5), now), "just now");
        assert_eq!(age_display(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(age_display(now - Duration::minutes(80), now), "1h ago");
        assert_eq!(age_display(now - Duration::minutes(95), now), "2h ago");
        assert_eq!(age_display(now - Duration::hours(25), now), "1d ago");
        assert_eq!(age_display(now - Duration::hours(37), now), "2d ago");
    }
}
