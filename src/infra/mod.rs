// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Concerns the core is handed from outside:
//
//   settings.rs     — service configuration (defaults, JSON file,
//                     NDA_* environment overrides)
//
//   layout.rs       — object keys for templates, generated and
//                     signed documents and metadata
//
//   fs_store.rs     — ObjectStore on a local directory
//
//   memory_store.rs — ObjectStore in a HashMap (tests only)
//
// A MinIO/S3 backend would be one more ObjectStore impl here;
// nothing above this layer would change.
//
// Reference: Rust Book §7 (Modules)

/// Service configuration
pub mod settings;

/// Object key layout
pub mod layout;

/// Filesystem-backed object store
pub mod fs_store;

/// In-memory object store
#[cfg(test)]
pub mod memory_store;
