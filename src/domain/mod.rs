// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain structs, enums and traits describing what the system
// works with:
//
//   document — paragraphs made of styled runs
//   fields   — the values a caller supplies
//   catalog  — which field fills which placeholder, per variant
//   nda      — the NDA record and its lifecycle state machine
//   grammar  — grammatical cases and analyzer parses
//   traits   — ObjectStore and MorphAnalyzer capabilities
//
// Rules for this layer:
//   - NO .docx / XML code here
//   - NO file I/O or network calls
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

pub mod catalog;
pub mod document;
pub mod fields;
pub mod grammar;
pub mod nda;
pub mod traits;
