// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The two capabilities the core is handed from outside:
//
//   ObjectStore   — where templates live and where generated
//                   documents, signed uploads and metadata go.
//                   Implementations: FsObjectStore (MemoryObjectStore in tests)
//                   (a MinIO/S3 client would be a third).
//
//   MorphAnalyzer — best-effort word analysis used to inflect
//                   personal names. Implementation:
//                   RussianNameAnalyzer (rule based).
//
// Both are passed in explicitly (Arc<dyn ...>) by the host
// application; nothing in the core constructs them on its own.
//
// Reference: Rust Book §17 (Trait Objects)

use std::time::Duration;

use crate::domain::grammar::Parse;
use crate::error::StoreError;

// ─── ObjectStore ──────────────────────────────────────────────────────────────
/// A flat key → bytes store with time-limited read links.
///
/// Calls are blocking. The core applies no timeout or retry of
/// its own; callers wrap these calls with their own policy.
pub trait ObjectStore: Send + Sync {
    /// Read a whole object. Missing keys are `StoreError::NotFound`.
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Create or overwrite an object.
    fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), StoreError>;

    /// A link that lets a client fetch `key` until `expires_in` elapses.
    fn presigned_get(&self, key: &str, expires_in: Duration) -> Result<String, StoreError>;
}

// ─── MorphAnalyzer ────────────────────────────────────────────────────────────
/// Produces zero or more candidate readings for a lowercase word.
///
/// Candidates come back best first. Returning an empty Vec means
/// "unknown word" and the caller leaves the word untouched.
pub trait MorphAnalyzer: Send + Sync {
    fn parse(&self, word: &str) -> Vec<Parse>;
}
