// ============================================================
// Layer 2 — Document Generator
// ============================================================
// Turns (variant, fields) into a filled .docx:
//
//   1. look up the variant's mapping table
//   2. resolve field values, inflecting where a row asks for it
//   3. fetch the variant's template from the object store
//   4. run the substitution engine over every paragraph
//
// Nothing is stored here; the workflow decides where the bytes go.

use std::sync::Arc;

use crate::data::docx_template::{render_template, scan_placeholders, RenderedDocument};
use crate::data::inflection::Inflector;
use crate::data::substitution::Replacements;
use crate::domain::catalog::{FieldCatalog, VariantSchema};
use crate::domain::fields::FieldDictionary;
use crate::domain::nda::NdaVariant;
use crate::domain::traits::ObjectStore;
use crate::error::{CatalogError, NdaError, StoreError};
use crate::infra::layout;

/// Result of checking one variant's template against its table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateReport {
    pub variant:  NdaVariant,
    pub template: String,
    /// Whether the template exists in the store at all
    pub found:    bool,
    /// Placeholders in the template that the table does not map
    pub unmapped: Vec<String>,
}

impl TemplateReport {
    pub fn is_ok(&self) -> bool {
        self.found && self.unmapped.is_empty()
    }
}

pub struct DocumentGenerator {
    catalog:   FieldCatalog,
    inflector: Inflector,
    store:     Arc<dyn ObjectStore>,
}

impl DocumentGenerator {
    pub fn new(catalog: FieldCatalog, inflector: Inflector, store: Arc<dyn ObjectStore>) -> Self {
        Self { catalog, inflector, store }
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    /// Render `variant` with `fields`. Absent or null fields leave
    /// their placeholder in the output.
    pub fn generate(&self, variant: NdaVariant, fields: &FieldDictionary) -> Result<RenderedDocument, NdaError> {
        let schema       = self.catalog.schema(variant)?;
        let replacements = self.replacements(schema, fields);
        let template     = self.load_template(&schema.template)?;

        let rendered = render_template(&template, &replacements)?;
        tracing::info!(
            "Generated '{}' NDA: {} of {} mapped fields supplied, {} placeholders filled",
            variant,
            replacements.len(),
            schema.rows().len(),
            rendered.replaced
        );
        Ok(rendered)
    }

    /// The token → text table for one request.
    pub fn replacements(&self, schema: &VariantSchema, fields: &FieldDictionary) -> Replacements {
        schema
            .resolve(fields)
            .into_iter()
            .map(|f| {
                let value = match f.inflect {
                    Some(case) => self.inflector.inflect_name(f.value, case),
                    None       => f.value.to_string(),
                };
                (f.token, value)
            })
            .collect()
    }

    fn load_template(&self, name: &str) -> Result<Vec<u8>, NdaError> {
        match self.store.get(&layout::template_key(name)) {
            Ok(bytes)                     => Ok(bytes),
            Err(StoreError::NotFound(_)) => Err(NdaError::TemplateNotFound(name.to_string())),
            Err(e)                        => Err(e.into()),
        }
    }

    /// Check every variant's template: present in the store, and
    /// every placeholder it contains is mapped.
    pub fn check_templates(&self) -> Result<Vec<TemplateReport>, NdaError> {
        let mut reports = Vec::new();

        for schema in self.catalog.schemas() {
            let bytes = match self.load_template(&schema.template) {
                Ok(bytes) => bytes,
                Err(NdaError::TemplateNotFound(_)) => {
                    tracing::warn!("Template '{}' is missing from the store", schema.template);
                    reports.push(TemplateReport {
                        variant:  schema.variant,
                        template: schema.template.clone(),
                        found:    false,
                        unmapped: Vec::new(),
                    });
                    continue;
                }
                Err(e) => return Err(e),
            };

            let tokens   = scan_placeholders(&bytes)?;
            let unmapped = match schema.check_tokens(&tokens) {
                Ok(())                                          => Vec::new(),
                Err(CatalogError::UnmappedTokens { tokens, .. }) => tokens,
                Err(e)                                          => return Err(e.into()),
            };
            if !unmapped.is_empty() {
                tracing::warn!("Template '{}' has unmapped placeholders: {:?}", schema.template, unmapped);
            }

            reports.push(TemplateReport {
                variant:  schema.variant,
                template: schema.template.clone(),
                found:    true,
                unmapped,
            });
        }

        Ok(reports)
    }
}
