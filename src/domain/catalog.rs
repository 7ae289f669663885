// ============================================================
// Layer 3 — Field Schema & Mapping Catalog
// ============================================================
// One table per NDA variant saying which field fills which
// placeholder, plus the template file the variant is rendered
// from. Pure data: the only behaviour is validation and lookup.
//
//   variant  template                        rows
//   eng      "PT MITRA - NDA_eng.docx"       POINT 1 → effective_date, ...
//   ru_en    "PT MITRA - NDA_rus_eng.docx"   POINT 1 → effective_date, ...
//
// Invariants checked when a table is built (never later):
//   - no empty placeholder label
//   - no label listed twice
//   - no field key filled from two placeholders

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::fields::FieldDictionary;
use crate::domain::grammar::GrammaticalCase;
use crate::domain::nda::NdaVariant;
use crate::error::{CatalogError, NdaError};

/// One row of a variant's table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Placeholder label without brackets, e.g. "POINT 5.1"
    pub label:   String,
    /// Field dictionary key, e.g. "signatory_title"
    pub field:   String,
    /// Inflect the value into this case before substitution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inflect: Option<GrammaticalCase>,
}

impl FieldMapping {
    pub fn new(label: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            label:   label.into(),
            field:   field.into(),
            inflect: None,
        }
    }

    pub fn inflected(mut self, case: GrammaticalCase) -> Self {
        self.inflect = Some(case);
        self
    }

    /// The literal token as it appears in the template: `[label]`
    pub fn token(&self) -> String {
        format!("[{}]", self.label)
    }
}

/// A field value ready for substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField<'a> {
    pub token:   String,
    pub value:   &'a str,
    pub inflect: Option<GrammaticalCase>,
}

/// Everything the generator needs to know about one variant.
///
/// Only built through `VariantSchema::new`, which enforces the
/// table invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantSchema {
    pub variant:  NdaVariant,
    pub template: String,
    rows:         Vec<FieldMapping>,
}

impl VariantSchema {
    /// Build and validate a variant table.
    pub fn new(
        variant:  NdaVariant,
        template: impl Into<String>,
        rows:     Vec<FieldMapping>,
    ) -> Result<Self, CatalogError> {
        let name       = variant.to_string();
        let mut labels = HashSet::new();
        let mut fields = HashSet::new();

        for row in &rows {
            if row.label.is_empty() {
                return Err(CatalogError::EmptyToken { variant: name });
            }
            if !labels.insert(row.label.as_str()) {
                return Err(CatalogError::DuplicateToken {
                    variant: name,
                    token:   row.token(),
                });
            }
            if !fields.insert(row.field.as_str()) {
                return Err(CatalogError::DuplicateField {
                    variant: name,
                    field:   row.field.clone(),
                });
            }
        }

        Ok(Self {
            variant,
            template: template.into(),
            rows,
        })
    }

    pub fn rows(&self) -> &[FieldMapping] {
        &self.rows
    }

    /// Pair each placeholder with its value from `fields`.
    ///
    /// Rows whose field is absent or null are skipped, which keeps
    /// the placeholder verbatim in the output.
    pub fn resolve<'a>(&self, fields: &'a FieldDictionary) -> Vec<ResolvedField<'a>> {
        self.rows
            .iter()
            .filter_map(|row| {
                fields.get(&row.field).map(|value| ResolvedField {
                    token:   row.token(),
                    value,
                    inflect: row.inflect,
                })
            })
            .collect()
    }

    /// Fail if a template uses a placeholder this table does not map.
    pub fn check_tokens<S: AsRef<str>>(&self, found: &[S]) -> Result<(), CatalogError> {
        let known: HashSet<String> = self.rows.iter().map(FieldMapping::token).collect();
        let mut unmapped: Vec<String> = found
            .iter()
            .map(|t| t.as_ref().to_string())
            .filter(|t| !known.contains(t))
            .collect();
        unmapped.sort();
        unmapped.dedup();

        if unmapped.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::UnmappedTokens {
                variant: self.variant.to_string(),
                tokens:  unmapped,
            })
        }
    }
}

/// The set of variant tables the generator can render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCatalog {
    schemas: BTreeMap<NdaVariant, VariantSchema>,
}

impl FieldCatalog {
    /// Collect variant tables; a variant listed twice is rejected.
    pub fn new(schemas: impl IntoIterator<Item = VariantSchema>) -> Result<Self, CatalogError> {
        let mut by_variant = BTreeMap::new();
        for schema in schemas {
            let variant = schema.variant;
            if by_variant.insert(variant, schema).is_some() {
                return Err(CatalogError::DuplicateVariant {
                    variant: variant.to_string(),
                });
            }
        }
        Ok(Self { schemas: by_variant })
    }

    /// The two NDA forms shipped with the service.
    pub fn builtin() -> Result<Self, CatalogError> {
        let eng = VariantSchema::new(
            NdaVariant::Eng,
            "PT MITRA - NDA_eng.docx",
            vec![
                FieldMapping::new("POINT 1", "effective_date"),
                FieldMapping::new("POINT 2", "company_name"),
                FieldMapping::new("POINT 3", "country"),
                FieldMapping::new("POINT 4", "registration_number"),
                FieldMapping::new("POINT 5", "signatory_name"),
                FieldMapping::new("POINT 5.1", "signatory_title"),
                FieldMapping::new("POINT 6", "address"),
                FieldMapping::new("POINT 7", "email"),
            ],
        )?;

        let ru_en = VariantSchema::new(
            NdaVariant::RuEn,
            "PT MITRA - NDA_rus_eng.docx",
            vec![
                FieldMapping::new("POINT 1", "effective_date"),
                FieldMapping::new("POINT 2", "company_name_en"),
                FieldMapping::new("POINT 3", "company_name_ru"),
                FieldMapping::new("POINT 4", "country_en"),
                FieldMapping::new("POINT 5", "country_ru"),
                FieldMapping::new("POINT 6", "registration_number"),
                FieldMapping::new("POINT 7", "signatory_name_en"),
                FieldMapping::new("POINT 7.1", "signatory_title_en"),
                // "в лице Иванова Ивана Ивановича"
                FieldMapping::new("POINT 8", "signatory_name_ru").inflected(GrammaticalCase::Genitive),
                FieldMapping::new("POINT 9", "address_en"),
                FieldMapping::new("POINT 10", "address_ru"),
                FieldMapping::new("POINT 11", "email"),
            ],
        )?;

        Self::new([eng, ru_en])
    }

    /// The table for `variant`, or a configuration error.
    pub fn schema(&self, variant: NdaVariant) -> Result<&VariantSchema, NdaError> {
        self.schemas
            .get(&variant)
            .ok_or_else(|| NdaError::UnknownVariant(variant.to_string()))
    }

    pub fn schemas(&self) -> impl Iterator<Item = &VariantSchema> {
        self.schemas.values()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = FieldCatalog::builtin().unwrap();
        assert_eq!(catalog.schema(NdaVariant::Eng).unwrap().rows().len(), 8);
        assert_eq!(catalog.schema(NdaVariant::RuEn).unwrap().rows().len(), 12);
    }

    #[test]
    fn test_rejects_duplicate_field_key() {
        let err = VariantSchema::new(
            NdaVariant::Eng,
            "t.docx",
            vec![
                FieldMapping::new("A", "name"),
                FieldMapping::new("B", "name"),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            CatalogError::DuplicateField { variant: "eng".into(), field: "name".into() }
        );
    }

    #[test]
    fn test_rejects_empty_and_duplicate_tokens() {
        let empty = VariantSchema::new(NdaVariant::Eng, "t", vec![FieldMapping::new("", "a")]);
        assert!(matches!(empty, Err(CatalogError::EmptyToken { .. })));

        let dup = VariantSchema::new(
            NdaVariant::Eng,
            "t",
            vec![FieldMapping::new("A", "a"), FieldMapping::new("A", "b")],
        );
        assert!(matches!(dup, Err(CatalogError::DuplicateToken { token, .. }) if token == "[A]"));
    }

    #[test]
    fn test_resolve_skips_missing_and_null_values() {
        let catalog = FieldCatalog::builtin().unwrap();
        let schema  = catalog.schema(NdaVariant::Eng).unwrap();

        let mut fields = FieldDictionary::new()
            .with("company_name", "Acme")
            .with("signatory_title", "Director");
        fields.insert("email", None);

        let resolved = schema.resolve(&fields);
        let tokens: Vec<&str> = resolved.iter().map(|r| r.token.as_str()).collect();
        assert_eq!(tokens, vec!["[POINT 2]", "[POINT 5.1]"]);
        assert_eq!(resolved[1].value, "Director");
    }

    #[test]
    fn test_only_ru_signatory_name_is_inflected() {
        let catalog = FieldCatalog::builtin().unwrap();
        let inflected: Vec<&str> = catalog
            .schemas()
            .flat_map(|s| s.rows().iter())
            .filter(|r| r.inflect.is_some())
            .map(|r| r.field.as_str())
            .collect();
        assert_eq!(inflected, vec!["signatory_name_ru"]);
    }

    #[test]
    fn test_check_tokens_reports_unmapped() {
        let catalog = FieldCatalog::builtin().unwrap();
        let schema  = catalog.schema(NdaVariant::Eng).unwrap();

        assert!(schema.check_tokens(&["[POINT 1]", "[POINT 5.1]"]).is_ok());

        let err = schema.check_tokens(&["[POINT 1]", "[POINT 9]", "[POINT 9]"]).unwrap_err();
        assert_eq!(
            err,
            CatalogError::UnmappedTokens { variant: "eng".into(), tokens: vec!["[POINT 9]".into()] }
        );
    }

    #[test]
    fn test_missing_variant_is_configuration_error() {
        let only_eng = FieldCatalog::new([VariantSchema::new(NdaVariant::Eng, "t", vec![]).unwrap()]).unwrap();
        assert!(matches!(
            only_eng.schema(NdaVariant::RuEn),
            Err(NdaError::UnknownVariant(v)) if v == "ru_en"
        ));
    }

    #[test]
    fn test_rejects_variant_listed_twice() {
        let first  = VariantSchema::new(NdaVariant::Eng, "a.docx", vec![FieldMapping::new("A", "a")]).unwrap();
        let second = VariantSchema::new(NdaVariant::Eng, "b.docx", vec![FieldMapping::new("B", "b")]).unwrap();
        assert_eq!(
            FieldCatalog::new([first, second]).unwrap_err(),
            CatalogError::DuplicateVariant { variant: "eng".into() }
        );
    }
}
