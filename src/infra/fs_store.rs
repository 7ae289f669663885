// ============================================================
// Layer 6 — Filesystem Object Store
// ============================================================
// Stores objects as files under one root directory, the local
// stand-in for a MinIO/S3 bucket:
//
//   <root>/
//     templates/PT MITRA - NDA_eng.docx
//     <id>/generated/eng.docx
//     <id>/signed/NDA_SIGNED_20260304_050607_1.pdf
//     <id>/metadata.json
//
// Writes go to a uniquely named temporary sibling first and are
// renamed into place, so a reader never sees half a metadata
// record and concurrent writers never share a scratch file.
// "Presigned" links are file:// URLs carrying the expiry time.
//
// Reference: Rust Book §12 (I/O and File Handling)

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use tempfile::NamedTempFile;

use crate::domain::traits::ObjectStore;
use crate::error::StoreError;

#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            key: root.display().to_string(),
            source,
        })?;
        tracing::debug!("Opened object store at '{}'", root.display());
        Ok(Self { root })
    }

    /// Map a key onto a path under the root, refusing anything that
    /// could escape it.
    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let rel = Path::new(key);
        let clean = !key.is_empty()
            && rel
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !clean {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(rel))
    }
}

fn io_err(key: &str) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        key: key.to_string(),
        source,
    }
}

impl ObjectStore for FsObjectStore {
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(key.to_string())),
            Err(e) => Err(io_err(key)(e)),
        }
    }

    fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err(key))?;
        }

        // A uniquely named sibling, removed on drop unless persisted.
        let dir     = path.parent().unwrap_or(self.root.as_path());
        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err(key))?;
        tmp.write_all(bytes).map_err(io_err(key))?;
        tmp.persist(&path).map_err(|e| io_err(key)(e.error))?;

        tracing::debug!("Stored '{}' ({} bytes, {})", key, bytes.len(), content_type);
        Ok(())
    }

    fn presigned_get(&self, key: &str, expires_in: Duration) -> Result<String, StoreError> {
        let path = self.path_for(key)?;
        if !path.is_file() {
            return Err(StoreError::NotFound(key.to_string()));
        }
        let path    = path.canonicalize().map_err(io_err(key))?;
        let expires = Utc::now() + chrono::Duration::seconds(expires_in.as_secs() as i64);
        Ok(format!("file://{}?expires={}", path.display(), expires.timestamp()))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_with_nested_keys() {
        let dir   = tempfile::tempdir().unwrap();
        let store = FsObjectStore::open(dir.path().join("bucket")).unwrap();

        store.put("abc/generated/eng.docx", b"docx", "x").unwrap();
        assert_eq!(store.get("abc/generated/eng.docx").unwrap(), b"docx");
        assert!(dir.path().join("bucket/abc/generated/eng.docx").is_file());

        let siblings: Vec<_> = fs::read_dir(dir.path().join("bucket/abc/generated")).unwrap().collect();
        assert_eq!(siblings.len(), 1);
    }

    #[test]
    fn test_missing_object_is_not_found() {
        let dir   = tempfile::tempdir().unwrap();
        let store = FsObjectStore::open(dir.path()).unwrap();
        assert!(matches!(store.get("templates/x.docx"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_keys_cannot_escape_root() {
        let dir   = tempfile::tempdir().unwrap();
        let store = FsObjectStore::open(dir.path()).unwrap();
        for key in ["../evil", "/etc/passwd", "", "a/../../b"] {
            assert!(matches!(store.put(key, b"x", "x"), Err(StoreError::InvalidKey(_))), "{key}");
        }
    }

    #[test]
    fn test_template_names_with_spaces() {
        let dir   = tempfile::tempdir().unwrap();
        let store = FsObjectStore::open(dir.path()).unwrap();
        store.put("templates/PT MITRA - NDA_eng.docx", b"t", "x").unwrap();
        assert_eq!(store.get("templates/PT MITRA - NDA_eng.docx").unwrap(), b"t");
    }

    #[test]
    fn test_presigned_link_is_file_url() {
        let dir   = tempfile::tempdir().unwrap();
        let store = FsObjectStore::open(dir.path()).unwrap();
        store.put("a/b.pdf", b"%PDF", "application/pdf").unwrap();

        let url = store.presigned_get("a/b.pdf", Duration::from_secs(900)).unwrap();
        assert!(url.starts_with("file://"));
        assert!(url.contains("b.pdf?expires="));
        assert!(store.presigned_get("a/missing.pdf", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_failed_put_leaves_no_scratch_file() {
        let dir   = tempfile::tempdir().unwrap();
        let store = FsObjectStore::open(dir.path()).unwrap();
        // The target is an existing directory, so the final rename fails.
        fs::create_dir_all(dir.path().join("a/b/taken")).unwrap();
        fs::write(dir.path().join("a/b/taken/inner"), b"x").unwrap();

        assert!(matches!(store.put("a/b/taken", b"new", "x"), Err(StoreError::Io { .. })));
        let names: Vec<String> = fs::read_dir(dir.path().join("a/b"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["taken".to_string()]);
    }

    #[test]
    fn test_concurrent_puts_to_one_key() {
        let dir   = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(FsObjectStore::open(dir.path()).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || store.put("templates/t.docx", format!("v{i}").as_bytes(), "x"))
            })
            .collect();
        for h in handles {
            h.join().unwrap().unwrap();
        }

        let body = store.get("templates/t.docx").unwrap();
        assert!(body.starts_with(b"v") && body.len() == 2);
        assert_eq!(fs::read_dir(dir.path().join("templates")).unwrap().count(), 1);
    }
}
