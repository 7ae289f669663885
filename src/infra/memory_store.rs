// ============================================================
// Layer 6 — In-Memory Object Store
// ============================================================
// A HashMap behind a RwLock. Used by tests and handy for dry
// runs; "presigned" links use a memory:// scheme that encodes
// the expiry time.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use parking_lot::RwLock;

use crate::domain::traits::ObjectStore;
use crate::error::StoreError;

#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<String, (Vec<u8>, String)>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys currently stored, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn content_type(&self, key: &str) -> Option<String> {
        self.objects.read().get(key).map(|(_, ct)| ct.clone())
    }
}

impl ObjectStore for MemoryObjectStore {
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.objects
            .read()
            .get(key)
            .map(|(bytes, _)| bytes.clone())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), StoreError> {
        self.objects
            .write()
            .insert(key.to_string(), (bytes.to_vec(), content_type.to_string()));
        Ok(())
    }

    fn presigned_get(&self, key: &str, expires_in: Duration) -> Result<String, StoreError> {
        if !self.objects.read().contains_key(key) {
            return Err(StoreError::NotFound(key.to_string()));
        }
        let expires = Utc::now() + chrono::Duration::seconds(expires_in.as_secs() as i64);
        Ok(format!("memory://{key}?expires={}", expires.timestamp()))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_overwrite() {
        let store = MemoryObjectStore::new();
        store.put("a/b", b"one", "text/plain").unwrap();
        store.put("a/b", b"two", "text/plain").unwrap();
        assert_eq!(store.get("a/b").unwrap(), b"two");
        assert_eq!(store.keys(), vec!["a/b".to_string()]);
        assert_eq!(store.content_type("a/b").as_deref(), Some("text/plain"));
    }

    #[test]
    fn test_missing_key_is_not_found() {
        let store = MemoryObjectStore::new();
        assert!(matches!(store.get("nope"), Err(StoreError::NotFound(k)) if k == "nope"));
        assert!(store.presigned_get("nope", Duration::from_secs(60)).is_err());
    }

    #[test]
    fn test_presigned_link_names_key() {
        let store = MemoryObjectStore::new();
        store.put("x.docx", b"..", "application/octet-stream").unwrap();
        let url = store.presigned_get("x.docx", Duration::from_secs(900)).unwrap();
        assert!(url.starts_with("memory://x.docx?expires="));
    }
}
