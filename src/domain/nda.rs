// ============================================================
// Layer 3 — NDA Record and Lifecycle State Machine
// ============================================================
// An NDA moves strictly forward through four states:
//
//   Draft ──generate──▶ Generated ──upload-signed──▶ SignedUploaded ──submit──▶ Submitted
//
//   generate       no guard; never moves the status backwards
//   upload-signed  status must not be Draft; appends to the signed set
//   submit         status must be exactly SignedUploaded
//
// A guard failure returns NdaError::InvalidState and leaves the
// record exactly as it was. Upload validation (extension, size)
// happens in the workflow before any of these methods is called.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::fields::FieldDictionary;
use crate::error::NdaError;

// ─── NdaVariant ──────────────────────────────────────────────────────────────
/// Which form of the NDA a document is generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NdaVariant {
    /// English-only form
    Eng,
    /// Bilingual Russian/English form
    RuEn,
}

impl NdaVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            NdaVariant::Eng  => "eng",
            NdaVariant::RuEn => "ru_en",
        }
    }
}

impl fmt::Display for NdaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NdaVariant {
    type Err = NdaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eng"   => Ok(NdaVariant::Eng),
            "ru_en" => Ok(NdaVariant::RuEn),
            other   => Err(NdaError::UnknownVariant(other.to_string())),
        }
    }
}

// ─── NdaStatus ───────────────────────────────────────────────────────────────
/// Lifecycle status. The derived ordering is the lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NdaStatus {
    Draft,
    Generated,
    SignedUploaded,
    Submitted,
}

impl NdaStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            NdaStatus::Draft          => "draft",
            NdaStatus::Generated      => "generated",
            NdaStatus::SignedUploaded => "signed_uploaded",
            NdaStatus::Submitted      => "submitted",
        }
    }
}

impl fmt::Display for NdaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── NdaFiles ────────────────────────────────────────────────────────────────
/// Object keys of everything stored for one NDA.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NdaFiles {
    /// One slot per variant generated so far
    #[serde(default)]
    pub generated: BTreeMap<NdaVariant, String>,

    /// Every signed upload, oldest first
    #[serde(default)]
    pub signed: Vec<String>,
}

// ─── NdaRecord ───────────────────────────────────────────────────────────────
/// The metadata kept for one NDA.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NdaRecord {
    pub id:         Uuid,
    /// Variant of the first generation request
    pub variant:    NdaVariant,
    pub status:     NdaStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub fields:     FieldDictionary,
    #[serde(default)]
    pub files:      NdaFiles,
}

impl NdaRecord {
    /// A fresh record in Draft with a new random id.
    pub fn draft(variant: NdaVariant, fields: FieldDictionary) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            variant,
            status: NdaStatus::Draft,
            created_at: now,
            updated_at: now,
            fields,
            files: NdaFiles::default(),
        }
    }

    /// Record a generated document for `variant`.
    ///
    /// Replaces only that variant's slot, merges the fields used
    /// into the record, and lifts Draft to Generated. A record that
    /// is already further along keeps its status.
    pub fn record_generated(
        &mut self,
        variant: NdaVariant,
        path:    impl Into<String>,
        fields:  &FieldDictionary,
    ) {
        self.files.generated.insert(variant, path.into());
        self.fields.merge(fields);
        self.advance_to(NdaStatus::Generated);
    }

    /// Guard for upload-signed, checked before any bytes are written.
    pub fn ensure_can_upload_signed(&self) -> Result<(), NdaError> {
        if self.status == NdaStatus::Draft {
            return Err(NdaError::InvalidState {
                current:  self.status,
                required: NdaStatus::Generated,
            });
        }
        Ok(())
    }

    /// Append a signed artifact and move to SignedUploaded.
    pub fn record_signed_upload(&mut self, path: impl Into<String>) -> Result<NdaStatus, NdaError> {
        self.ensure_can_upload_signed()?;
        self.files.signed.push(path.into());
        self.advance_to(NdaStatus::SignedUploaded);
        Ok(self.status)
    }

    /// Guard for submit.
    pub fn ensure_can_submit(&self) -> Result<(), NdaError> {
        if self.status != NdaStatus::SignedUploaded {
            return Err(NdaError::InvalidState {
                current:  self.status,
                required: NdaStatus::SignedUploaded,
            });
        }
        Ok(())
    }

    /// Final transition. No artifacts change.
    pub fn submit(&mut self) -> Result<NdaStatus, NdaError> {
        self.ensure_can_submit()?;
        self.advance_to(NdaStatus::Submitted);
        Ok(self.status)
    }

    // Status never moves backwards; the timestamp moves on every mutation.
    fn advance_to(&mut self, status: NdaStatus) {
        self.status     = self.status.max(status);
        self.updated_at = Utc::now();
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fields() -> FieldDictionary {
        FieldDictionary::new().with("company_name", "Acme")
    }

    #[test]
    fn test_variant_parsing() {
        assert_eq!("eng".parse::<NdaVariant>().unwrap(), NdaVariant::Eng);
        assert_eq!("ru_en".parse::<NdaVariant>().unwrap(), NdaVariant::RuEn);
        assert!(matches!(
            "fr".parse::<NdaVariant>(),
            Err(NdaError::UnknownVariant(v)) if v == "fr"
        ));
    }

    #[test]
    fn test_status_order_is_lifecycle_order() {
        assert!(NdaStatus::Draft < NdaStatus::Generated);
        assert!(NdaStatus::Generated < NdaStatus::SignedUploaded);
        assert!(NdaStatus::SignedUploaded < NdaStatus::Submitted);
    }

    #[test]
    fn test_full_happy_path() {
        let mut r = NdaRecord::draft(NdaVariant::Eng, fields());
        assert_eq!(r.status, NdaStatus::Draft);

        r.record_generated(NdaVariant::Eng, "id/generated/eng.docx", &fields());
        assert_eq!(r.status, NdaStatus::Generated);

        assert_eq!(r.record_signed_upload("id/signed/a.pdf").unwrap(), NdaStatus::SignedUploaded);
        assert_eq!(r.submit().unwrap(), NdaStatus::Submitted);
        assert_eq!(r.files.signed, vec!["id/signed/a.pdf".to_string()]);
    }

    #[test]
    fn test_upload_while_draft_is_rejected_without_mutation() {
        let mut r      = NdaRecord::draft(NdaVariant::Eng, fields());
        let before     = r.clone();
        let err        = r.record_signed_upload("x.pdf").unwrap_err();
        assert!(matches!(
            err,
            NdaError::InvalidState { current: NdaStatus::Draft, required: NdaStatus::Generated }
        ));
        assert_eq!(r, before);
    }

    #[test]
    fn test_submit_while_generated_is_rejected() {
        let mut r = NdaRecord::draft(NdaVariant::Eng, fields());
        r.record_generated(NdaVariant::Eng, "p", &fields());
        let before = r.clone();

        let err = r.submit().unwrap_err();
        assert!(matches!(
            err,
            NdaError::InvalidState { current: NdaStatus::Generated, required: NdaStatus::SignedUploaded }
        ));
        assert_eq!(r, before);
    }

    #[test]
    fn test_regeneration_keeps_other_variant_and_status() {
        let mut r = NdaRecord::draft(NdaVariant::RuEn, fields());
        r.record_generated(NdaVariant::RuEn, "id/generated/ru_en.docx", &fields());
        r.record_signed_upload("id/signed/a.pdf").unwrap();

        r.record_generated(NdaVariant::Eng, "id/generated/eng.docx", &fields());
        assert_eq!(r.status, NdaStatus::SignedUploaded);
        assert_eq!(r.files.generated.len(), 2);
        assert_eq!(r.files.generated[&NdaVariant::RuEn], "id/generated/ru_en.docx");
    }

    #[test]
    fn test_reupload_appends_without_status_change() {
        let mut r = NdaRecord::draft(NdaVariant::Eng, fields());
        r.record_generated(NdaVariant::Eng, "g", &fields());
        r.record_signed_upload("s1.pdf").unwrap();
        r.record_signed_upload("s2.pdf").unwrap();
        assert_eq!(r.status, NdaStatus::SignedUploaded);
        assert_eq!(r.files.signed.len(), 2);
    }

    #[test]
    fn test_record_json_shape() {
        let mut r = NdaRecord::draft(NdaVariant::RuEn, fields());
        r.record_generated(NdaVariant::RuEn, "p", &fields());
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["status"], "generated");
        assert_eq!(json["variant"], "ru_en");
        assert_eq!(json["files"]["generated"]["ru_en"], "p");

        let back: NdaRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, r);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Generate(NdaVariant),
        Upload,
        Submit,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Generate(NdaVariant::Eng)),
            Just(Op::Generate(NdaVariant::RuEn)),
            Just(Op::Upload),
            Just(Op::Submit),
        ]
    }

    proptest! {
        #[test]
        fn prop_status_walk_never_decreases(ops in proptest::collection::vec(op(), 0..24)) {
            let mut r    = NdaRecord::draft(NdaVariant::Eng, FieldDictionary::new());
            let mut last = r.status;

            for op in ops {
                let before = r.clone();
                let result = match op {
                    Op::Generate(v) => {
                        r.record_generated(v, format!("g/{v}"), &FieldDictionary::new());
                        Ok(r.status)
                    }
                    Op::Upload => r.record_signed_upload("s"),
                    Op::Submit => r.submit(),
                };

                if result.is_err() {
                    prop_assert_eq!(&r, &before);
                }
                prop_assert!(r.status >= last);
                last = r.status;
            }
        }
    }
}
