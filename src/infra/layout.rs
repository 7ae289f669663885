// ============================================================
// Layer 6 — Artifact Storage Layout
// ============================================================
// Object keys for everything the workflow stores:
//
//   templates/<template-name>                     read-only, provisioned out of band
//   <id>/generated/<variant>.docx                 one slot per variant
//   <id>/signed/NDA_SIGNED_<timestamp>_<n>.<ext>  append-only, n = 1, 2, ...
//   <id>/metadata.json                            overwritten on every change

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::nda::NdaVariant;

pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const BINARY_CONTENT_TYPE: &str = "application/octet-stream";

pub fn template_key(template_name: &str) -> String {
    format!("templates/{template_name}")
}

pub fn generated_key(id: Uuid, variant: NdaVariant) -> String {
    format!("{id}/generated/{variant}.docx")
}

pub fn signed_key(id: Uuid, uploaded_at: DateTime<Utc>, seq: usize, extension: &str) -> String {
    format!(
        "{id}/signed/NDA_SIGNED_{}_{seq}.{extension}",
        uploaded_at.format("%Y%m%d_%H%M%S")
    )
}

/// File name offered to the caller for a generated document.
pub fn generated_file_name(id: Uuid, variant: NdaVariant) -> String {
    format!("NDA_{variant}_{id}.docx")
}

pub fn metadata_key(id: Uuid) -> String {
    format!("{id}/metadata.json")
}
