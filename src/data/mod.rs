// ============================================================
// Layer 4 — Document Processing
// ============================================================
// Everything that touches document text:
//
//   template bytes (.docx)
//       │
//       ▼
//   docx_template  → word/document.xml out of the zip package
//       │
//       ▼
//   wordml         → <w:t> text nodes grouped by paragraph
//       │
//       ▼
//   substitution   → [LABEL] tokens replaced across node boundaries,
//       │            node count and everything around them untouched
//       ▼
//   wordml         → changed nodes written back, all other XML as read
//       │
//       ▼
//   docx_template  → package re-zipped, other parts copied raw
//
// Field values bound for an inflected placeholder pass through
// inflection (backed by russian_names) before substitution.
//
// Reference: quick-xml and zip crate documentation
//            Rust Book §8 (Strings and UTF-8)

/// Run-span placeholder substitution engine
pub mod substitution;

/// Reads and rewrites .docx packages
pub mod docx_template;

/// Text nodes of word/document.xml
pub mod wordml;

/// Puts personal names into a grammatical case
pub mod inflection;

/// Rule-based MorphAnalyzer for Russian personal names
pub mod russian_names;
