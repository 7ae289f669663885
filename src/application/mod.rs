// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers into the NDA operations:
//
//   generator      — catalog + inflection + template → filled .docx
//   workflow       — generate / upload-signed / submit / status /
//                    download-link over the object store
//   record_locks   — one lock per record id
//   upload_policy  — extension and size checks for signed uploads
//   templates      — copies template files into the store
//
// Rules for this layer:
//   - No .docx parsing here (that's Layer 4)
//   - No printing here (that's Layer 1)
//   - Storage only through the ObjectStore trait
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

pub mod generator;
pub mod record_locks;
pub mod templates;
pub mod upload_policy;
pub mod workflow;
