// ============================================================
// Cross-cutting — Error Types
// ============================================================
// Every layer below the CLI returns one of these typed errors.
// The CLI wraps them in anyhow with extra context.
//
//   StoreError   — raised by ObjectStore implementations
//   CatalogError — raised when a variant's mapping table is invalid
//   NdaError     — everything a workflow operation can report
//
// Missing field values and failed inflections are NOT errors:
// they leave the placeholder / word untouched.
//
// Reference: thiserror crate documentation

use thiserror::Error;
use uuid::Uuid;

use crate::domain::nda::{NdaStatus, NdaVariant};

/// Failures reported by an object store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested object key does not exist
    #[error("object '{0}' not found")]
    NotFound(String),

    /// The backend could not be reached or the write/read failed
    #[error("storage i/o failure on '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The key cannot be mapped onto the backend (e.g. "../x")
    #[error("invalid object key '{0}'")]
    InvalidKey(String),

    /// Stored bytes could not be decoded (e.g. corrupt metadata JSON)
    #[error("stored object '{key}' is corrupt: {reason}")]
    Corrupt { key: String, reason: String },
}

/// A mapping table that violates the catalog invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("variant '{variant}' has an empty placeholder label")]
    EmptyToken { variant: String },

    #[error("variant '{variant}' maps placeholder '{token}' more than once")]
    DuplicateToken { variant: String, token: String },

    #[error("variant '{variant}' maps field '{field}' from more than one placeholder")]
    DuplicateField { variant: String, field: String },

    #[error("variant '{variant}' is defined more than once")]
    DuplicateVariant { variant: String },

    #[error("template for variant '{variant}' contains unmapped placeholders: {tokens:?}")]
    UnmappedTokens { variant: String, tokens: Vec<String> },
}

/// Why an upload was refused before anything was written.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadRejection {
    #[error("file extension '{extension}' is not allowed (allowed: {allowed})")]
    Extension { extension: String, allowed: String },

    #[error("file is {size} bytes, maximum allowed is {max} bytes")]
    TooLarge { size: u64, max: u64 },
}

/// Errors returned by the NDA workflow operations.
#[derive(Debug, Error)]
pub enum NdaError {
    /// Configuration error: no mapping table / template for the variant
    #[error("unknown NDA variant '{0}'")]
    UnknownVariant(String),

    /// The variant is known but its template is missing from the store
    #[error("template '{0}' not found in store")]
    TemplateNotFound(String),

    #[error("NDA with id {0} not found")]
    RecordNotFound(Uuid),

    #[error("NDA {id} has no generated document for variant '{variant}'")]
    ArtifactNotFound { id: Uuid, variant: NdaVariant },

    /// Lifecycle guard failure; the record was not modified
    #[error("invalid state: NDA is '{current}', operation requires '{required}'")]
    InvalidState {
        current: NdaStatus,
        required: NdaStatus,
    },

    #[error("upload rejected: {0}")]
    UploadRejected(#[from] UploadRejection),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The template bytes could not be parsed or the output could not be packed
    #[error("document error: {0}")]
    Document(String),

    #[error("storage error: {0}")]
    Storage(#[source] StoreError),
}

impl NdaError {
    /// Only infrastructure failures are worth retrying; everything else
    /// needs the request or the configuration corrected first.
    pub fn is_retryable(&self) -> bool {
        matches!(self, NdaError::Storage(StoreError::Io { .. }))
    }
}

impl From<StoreError> for NdaError {
    fn from(e: StoreError) -> Self {
        NdaError::Storage(e)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_io_failures_are_retryable() {
        let io = NdaError::from(StoreError::Io {
            key:    "x".into(),
            source: std::io::Error::new(std::io::ErrorKind::TimedOut, "slow"),
        });
        assert!(io.is_retryable());

        assert!(!NdaError::TemplateNotFound("t.docx".into()).is_retryable());
        assert!(!NdaError::UnknownVariant("fr".into()).is_retryable());
        assert!(!NdaError::from(StoreError::NotFound("k".into())).is_retryable());
    }

    #[test]
    fn test_invalid_state_message_names_both_states() {
        let e = NdaError::InvalidState {
            current:  NdaStatus::Generated,
            required: NdaStatus::SignedUploaded,
        };
        let msg = e.to_string();
        assert!(msg.contains("generated"));
        assert!(msg.contains("signed_uploaded"));
    }
}
