// ============================================================
// Layer 2 — Template Provisioning
// ============================================================
// Copies the catalog's template files from a local directory
// into the object store under templates/<name>. A template that
// is absent locally is skipped with a warning; the others are
// still uploaded.

use std::fs;
use std::path::Path;

use crate::domain::catalog::FieldCatalog;
use crate::domain::traits::ObjectStore;
use crate::error::StoreError;
use crate::infra::layout::{self, DOCX_CONTENT_TYPE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    Uploaded { bytes: usize },
    Missing,
}

/// Upload every template the catalog names from `dir`.
///
/// Fails only when `dir` itself is missing or a read/write fails.
pub fn provision_templates(
    store:   &dyn ObjectStore,
    catalog: &FieldCatalog,
    dir:     &Path,
) -> Result<Vec<(String, ProvisionOutcome)>, StoreError> {
    if !dir.is_dir() {
        return Err(StoreError::NotFound(dir.display().to_string()));
    }

    let mut outcomes = Vec::new();
    for schema in catalog.schemas() {
        let name = schema.template.clone();
        let path = dir.join(&name);

        if !path.is_file() {
            tracing::warn!("Template not found locally: '{}'", path.display());
            outcomes.push((name, ProvisionOutcome::Missing));
            continue;
        }

        let bytes = fs::read(&path).map_err(|source| StoreError::Io {
            key: path.display().to_string(),
            source,
        })?;
        store.put(&layout::template_key(&name), &bytes, DOCX_CONTENT_TYPE)?;
        tracing::info!("Uploaded template '{}' ({} bytes)", name, bytes.len());

        outcomes.push((name, ProvisionOutcome::Uploaded { bytes: bytes.len() }));
    }

    Ok(outcomes)
}
