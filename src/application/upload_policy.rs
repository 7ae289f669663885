// ============================================================
// Layer 2 — Upload Policy
// ============================================================
// Boundary checks for signed uploads, applied before anything
// is written to the store:
//
//   - extension (text after the last '.', lowercased) must be
//     in the allow-list
//   - size must not exceed the configured maximum

use std::collections::BTreeSet;

use crate::error::UploadRejection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    allowed:   BTreeSet<String>,
    max_bytes: u64,
}

impl UploadPolicy {
    pub fn new(allowed: BTreeSet<String>, max_bytes: u64) -> Self {
        Self { allowed, max_bytes }
    }

    /// Validate an upload; returns the normalised extension.
    pub fn check(&self, filename: &str, size: u64) -> Result<String, UploadRejection> {
        let extension = extension_of(filename);
        if !self.allowed.contains(&extension) {
            return Err(UploadRejection::Extension {
                extension,
                allowed: self.allowed.iter().cloned().collect::<Vec<_>>().join(", "),
            });
        }
        if size > self.max_bytes {
            return Err(UploadRejection::TooLarge {
                size,
                max: self.max_bytes,
            });
        }
        Ok(extension)
    }
}

/// Lowercased text after the last '.', or "" when there is none.
fn extension_of(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None           => String::new(),
    }
}
