//! The key-value map a storage node owns.
//!
//! Modeled as a small trait so the HTTP layer doesn't care whether the
//! backing map is the in-memory default or something else swapped in
//! later — the same seam `corelib::Partitioner` uses to keep the hash
//! function pluggable at the type level without the ring caring which
//! one is live.

use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;

pub trait Store: Send + Sync + 'static {
    fn put(&self, key: String, value: Value);
    fn get(&self, key: &str) -> Option<Value>;
    /// Returns `true` if the key existed and was removed.
    fn delete(&self, key: &str) -> bool;
    fn keys(&self) -> Vec<String>;
    fn size(&self) -> usize;
}

/// Flat in-memory map guarded by a single mutex. No transactional
/// grouping across keys.
#[derive(Default)]
pub struct InMemoryStore {
    data: Mutex<HashMap<String, Value>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for InMemoryStore {
    fn put(&self, key: String, value: Value) {
        self.data.lock().insert(key, value);
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.data.lock().get(key).cloned()
    }

    fn delete(&self, key: &str) -> bool {
        self.data.lock().remove(key).is_some()
    }

    fn keys(&self) -> Vec<String> {
        self.data.lock().keys().cloned().collect()
    }

    fn size(&self) -> usize {
        self.data.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get_round_trips() {
        let store = InMemoryStore::new();
        store.put("user:1001".to_string(), serde_json::json!({"name": "Alice"}));
        assert_eq!(store.get("user:1001"), Some(serde_json::json!({"name": "Alice"})));
    }

    #[test]
    fn get_missing_key_is_none() {
        let store = InMemoryStore::new();
        assert_eq!(store.get("nope"), None);
    }

    #[test]
    fn delete_reports_whether_key_existed() {
        let store = InMemoryStore::new();
        store.put("k".to_string(), Value::Null);
        assert!(store.delete("k"));
        assert!(!store.delete("k"));
    }

    #[test]
    fn special_characters_in_keys_round_trip() {
        let store = InMemoryStore::new();
        for key in ["key with spaces", "key/with/slashes", "🔑_emoji_key"] {
            store.put(key.to_string(), serde_json::json!("x"));
        }
        assert_eq!(store.size(), 3);
        assert_eq!(store.get("🔑_emoji_key"), Some(serde_json::json!("x")));
    }
}
