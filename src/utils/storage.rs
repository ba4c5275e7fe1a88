use serde::{de::DeserializeOwned, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;

/// String key/value persistence (sessionStorage in the browser)
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), String>;
    fn remove_item(&self, key: &str) -> Result<(), String>;
}

pub fn save_to_storage<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let json = serde_json::to_string(value)
        .map_err(|e| format!("Failed to serialize {}: {}", key, e))?;
    store.set_item(key, &json)
}

/// Unreadable or outdated entries count as absent
pub fn load_from_storage<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let json = store.get_item(key)?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("⚠️ Ignoring unreadable storage entry '{}': {}", key, e);
            None
        }
    }
}

pub fn remove_from_storage(store: &dyn KeyValueStore, key: &str) -> Result<(), String> {
    store.remove_item(key)
}

/// In-memory store: used off-browser and when sessionStorage is unavailable
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), String> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Per-tab `window.sessionStorage`. Nothing is shared across tabs.
#[cfg(target_arch = "wasm32")]
pub struct BrowserSessionStore;

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for BrowserSessionStore {
    fn get_item(&self, key: &str) -> Option<String> {
        use gloo_storage::{SessionStorage, Storage};
        SessionStorage::raw().get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        use gloo_storage::{SessionStorage, Storage};
        SessionStorage::raw()
            .set_item(key, value)
            .map_err(|_| format!("Failed to write '{}' to sessionStorage", key))
    }

    fn remove_item(&self, key: &str) -> Result<(), String> {
        use gloo_storage::{SessionStorage, Storage};
        SessionStorage::raw()
            .remove_item(key)
            .map_err(|_| format!("Failed to remove '{}' from sessionStorage", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SessionSnapshot, User};

    #[test]
    fn json_round_trip_through_store() {
        let store = MemoryStore::new();
        let snapshot = SessionSnapshot {
            user: Some(User {
                email: "ada@example.com".into(),
            }),
            is_authed: true,
        };

        save_to_storage(&store, "auth", &snapshot).unwrap();
        assert_eq!(
            store.get_item("auth").as_deref(),
            Some(r#"{"user":{"email":"ada@example.com"},"isAuthed":true}"#)
        );

        remove_from_storage(&store, "auth").unwrap();
        assert_eq!(load_from_storage::<SessionSnapshot>(&store, "auth"), None);
    }

    #[test]
    fn corrupt_entry_reads_as_absent() {
        let store = MemoryStore::new();
        store.set_item("auth", "{not json").unwrap();
        assert_eq!(load_from_storage::<SessionSnapshot>(&store, "auth"), None);
    }
}
