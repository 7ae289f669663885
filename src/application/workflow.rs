// ============================================================
// Layer 2 — NDA Workflow
// ============================================================
// The four lifecycle operations plus the read-only ones, each a
// short sequence over the record's metadata and the object store:
//
//   generate       render → put <id>/generated/<variant>.docx → save metadata
//   upload_signed  guard → validate upload → put <id>/signed/... → save metadata
//   submit         guard → save metadata
//   status         load metadata
//   download_link  load metadata → presigned link to a generated document
//
// Every sequence that reads and then writes one record runs under
// that record's lock, so two uploads for the same id never lose
// each other's entry. A guard or validation failure returns before
// anything is written.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::application::generator::DocumentGenerator;
use crate::application::record_locks::RecordLocks;
use crate::application::upload_policy::UploadPolicy;
use crate::domain::fields::FieldDictionary;
use crate::domain::nda::{NdaRecord, NdaStatus, NdaVariant};
use crate::domain::traits::ObjectStore;
use crate::error::{NdaError, StoreError};
use crate::infra::layout::{self, BINARY_CONTENT_TYPE, DOCX_CONTENT_TYPE, JSON_CONTENT_TYPE};

/// What `generate` hands back to the caller.
#[derive(Debug, Clone)]
pub struct Generated {
    pub record_id: Uuid,
    pub variant:   NdaVariant,
    pub bytes:     Vec<u8>,
    /// Suggested download name, e.g. "NDA_eng_<id>.docx"
    pub file_name: String,
    pub status:    NdaStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub url:                String,
    pub expires_in_seconds: u64,
}

pub struct NdaWorkflow {
    generator:   DocumentGenerator,
    store:       Arc<dyn ObjectStore>,
    policy:      UploadPolicy,
    link_expiry: Duration,
    locks:       RecordLocks,
}

impl NdaWorkflow {
    pub fn new(
        generator:   DocumentGenerator,
        store:       Arc<dyn ObjectStore>,
        policy:      UploadPolicy,
        link_expiry: Duration,
    ) -> Self {
        Self {
            generator,
            store,
            policy,
            link_expiry,
            locks: RecordLocks::new(),
        }
    }

    pub fn generator(&self) -> &DocumentGenerator {
        &self.generator
    }

    /// Render `variant` and store it.
    ///
    /// Without `record_id` a new Draft record is created and moved
    /// to Generated. With one, the existing record's slot for this
    /// variant is replaced and its status never moves backwards.
    pub fn generate(
        &self,
        record_id: Option<Uuid>,
        variant:   NdaVariant,
        fields:    &FieldDictionary,
    ) -> Result<Generated, NdaError> {
        match record_id {
            None => {
                let record = NdaRecord::draft(variant, fields.clone());
                self.generate_into(record, variant, fields)
            }
            Some(id) => self.locks.with_lock(id, || {
                let record = self.load_record(id)?;
                self.generate_into(record, variant, fields)
            }),
        }
    }

    fn generate_into(
        &self,
        mut record: NdaRecord,
        variant:    NdaVariant,
        fields:     &FieldDictionary,
    ) -> Result<Generated, NdaError> {
        let rendered = self.generator.generate(variant, fields)?;

        let key = layout::generated_key(record.id, variant);
        self.store.put(&key, &rendered.bytes, DOCX_CONTENT_TYPE)?;
        record.record_generated(variant, key, fields);
        self.save_record(&record)?;

        tracing::info!("NDA {} generated ({}), status {}", record.id, variant, record.status);
        Ok(Generated {
            record_id: record.id,
            variant,
            file_name: layout::generated_file_name(record.id, variant),
            bytes:     rendered.bytes,
            status:    record.status,
        })
    }

    /// Store a signed copy and move the record to SignedUploaded.
    pub fn upload_signed(&self, id: Uuid, bytes: &[u8], filename: &str) -> Result<NdaStatus, NdaError> {
        self.locks.with_lock(id, || {
            let mut record = self.load_record(id)?;
            record.ensure_can_upload_signed()?;

            let extension = self.policy.check(filename, bytes.len() as u64)?;
            let key       = layout::signed_key(id, Utc::now(), record.files.signed.len() + 1, &extension);
            self.store.put(&key, bytes, BINARY_CONTENT_TYPE)?;

            let status = record.record_signed_upload(key.clone())?;
            self.save_record(&record)?;

            tracing::info!("NDA {} signed copy stored at '{}' ({} bytes)", id, key, bytes.len());
            Ok(status)
        })
    }

    pub fn submit(&self, id: Uuid) -> Result<NdaStatus, NdaError> {
        self.locks.with_lock(id, || {
            let mut record = self.load_record(id)?;
            let status     = record.submit()?;
            self.save_record(&record)?;

            tracing::info!("NDA {} submitted", id);
            Ok(status)
        })
    }

    pub fn status(&self, id: Uuid) -> Result<NdaRecord, NdaError> {
        self.load_record(id)
    }

    /// Time-limited link to the generated document for `variant`.
    pub fn download_link(&self, id: Uuid, variant: NdaVariant) -> Result<DownloadLink, NdaError> {
        let record = self.load_record(id)?;
        let key    = record
            .files
            .generated
            .get(&variant)
            .ok_or(NdaError::ArtifactNotFound { id, variant })?;

        let url = self.store.presigned_get(key, self.link_expiry)?;
        Ok(DownloadLink {
            url,
            expires_in_seconds: self.link_expiry.as_secs(),
        })
    }

    // ─── Metadata ────────────────────────────────────────────────────────────

    fn load_record(&self, id: Uuid) -> Result<NdaRecord, NdaError> {
        let key   = layout::metadata_key(id);
        let bytes = match self.store.get(&key) {
            Ok(bytes)                     => bytes,
            Err(StoreError::NotFound(_)) => return Err(NdaError::RecordNotFound(id)),
            Err(e)                        => return Err(e.into()),
        };
        serde_json::from_slice(&bytes).map_err(|e| {
            NdaError::Storage(StoreError::Corrupt {
                key,
                reason: e.to_string(),
            })
        })
    }

    fn save_record(&self, record: &NdaRecord) -> Result<(), NdaError> {
        let key  = layout::metadata_key(record.id);
        let json = serde_json::to_vec_pretty(record).map_err(|e| {
            NdaError::Storage(StoreError::Corrupt {
                key: key.clone(),
                reason: e.to_string(),
            })
        })?;
        self.store.put(&key, &json, JSON_CONTENT_TYPE)?;
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::docx_template::{read_paragraphs, tests::sample_template};
    use crate::data::inflection::Inflector;
    use crate::domain::catalog::FieldCatalog;
    use crate::error::UploadRejection;
    use crate::infra::memory_store::MemoryObjectStore;
    use std::thread;

    fn setup() -> (Arc<MemoryObjectStore>, NdaWorkflow) {
        let store = Arc::new(MemoryObjectStore::new());
        for name in ["PT MITRA - NDA_eng.docx", "PT MITRA - NDA_rus_eng.docx"] {
            store
                .put(&layout::template_key(name), &sample_template(), DOCX_CONTENT_TYPE)
                .unwrap();
        }

        let generator = DocumentGenerator::new(FieldCatalog::builtin().unwrap(), Inflector::russian(), store.clone());
        let policy    = UploadPolicy::new(["pdf", "doc", "docx", "zip"].map(String::from).into_iter().collect(), 1024);
        let workflow  = NdaWorkflow::new(generator, store.clone(), policy, Duration::from_secs(900));
        (store, workflow)
    }

    fn eng_fields() -> FieldDictionary {
        FieldDictionary::new()
            .with("effective_date", "01.02.2026")
            .with("company_name", "Acme Ltd")
    }

    #[test]
    fn test_generate_creates_record_and_artifact() {
        let (store, wf) = setup();
        let out = wf.generate(None, NdaVariant::Eng, &eng_fields()).unwrap();

        assert_eq!(out.status, NdaStatus::Generated);
        assert_eq!(out.file_name, format!("NDA_eng_{}.docx", out.record_id));
        assert_eq!(store.get(&layout::generated_key(out.record_id, NdaVariant::Eng)).unwrap(), out.bytes);

        let text = read_paragraphs(&out.bytes).unwrap()[0].text();
        assert_eq!(text, "This Agreement is made by Acme Ltd on 01.02.2026.");

        let record = wf.status(out.record_id).unwrap();
        assert_eq!(record.status, NdaStatus::Generated);
        assert_eq!(record.fields.get("company_name"), Some("Acme Ltd"));
        assert_eq!(store.content_type(&layout::metadata_key(out.record_id)).as_deref(), Some(JSON_CONTENT_TYPE));
    }

    #[test]
    fn test_upload_before_generate_is_rejected_and_nothing_written() {
        let (store, wf) = setup();
        let record      = NdaRecord::draft(NdaVariant::Eng, FieldDictionary::new());
        wf.save_record(&record).unwrap();
        let keys_before = store.keys();

        let err = wf.upload_signed(record.id, b"%PDF", "signed.pdf").unwrap_err();
        assert!(matches!(
            err,
            NdaError::InvalidState { current: NdaStatus::Draft, required: NdaStatus::Generated }
        ));
        assert_eq!(store.keys(), keys_before);
        assert_eq!(wf.status(record.id).unwrap().status, NdaStatus::Draft);
    }

    #[test]
    fn test_upload_then_submit() {
        let (store, wf) = setup();
        let id = wf.generate(None, NdaVariant::Eng, &eng_fields()).unwrap().record_id;

        assert_eq!(wf.upload_signed(id, b"%PDF-1.7", "Signed.PDF").unwrap(), NdaStatus::SignedUploaded);
        let record = wf.status(id).unwrap();
        assert_eq!(record.files.signed.len(), 1);
        let key = &record.files.signed[0];
        assert!(key.starts_with(&format!("{id}/signed/NDA_SIGNED_")));
        assert!(key.ends_with("_1.pdf"));
        assert_eq!(store.get(key).unwrap(), b"%PDF-1.7");

        assert_eq!(wf.submit(id).unwrap(), NdaStatus::Submitted);
        assert_eq!(wf.status(id).unwrap().status, NdaStatus::Submitted);
    }

    #[test]
    fn test_submit_before_upload_is_rejected() {
        let (_, wf) = setup();
        let id  = wf.generate(None, NdaVariant::Eng, &eng_fields()).unwrap().record_id;
        let err = wf.submit(id).unwrap_err();
        assert!(matches!(
            err,
            NdaError::InvalidState { current: NdaStatus::Generated, required: NdaStatus::SignedUploaded }
        ));
        assert_eq!(wf.status(id).unwrap().status, NdaStatus::Generated);
    }

    #[test]
    fn test_rejected_upload_writes_nothing() {
        let (store, wf) = setup();
        let id          = wf.generate(None, NdaVariant::Eng, &eng_fields()).unwrap().record_id;
        let keys_before = store.keys();

        let err = wf.upload_signed(id, b"MZ", "virus.exe").unwrap_err();
        assert!(matches!(err, NdaError::UploadRejected(UploadRejection::Extension { .. })));

        let err = wf.upload_signed(id, &vec![0u8; 2048], "big.pdf").unwrap_err();
        assert!(matches!(err, NdaError::UploadRejected(UploadRejection::TooLarge { size: 2048, max: 1024 })));

        assert_eq!(store.keys(), keys_before);
        assert_eq!(wf.status(id).unwrap().status, NdaStatus::Generated);
    }

    #[test]
    fn test_regenerate_other_variant_keeps_status_and_slots() {
        let (_, wf) = setup();
        let id = wf.generate(None, NdaVariant::RuEn, &FieldDictionary::new()).unwrap().record_id;
        wf.upload_signed(id, b"zip", "signed.zip").unwrap();

        let out = wf.generate(Some(id), NdaVariant::Eng, &eng_fields()).unwrap();
        assert_eq!(out.record_id, id);
        assert_eq!(out.status, NdaStatus::SignedUploaded);

        let record = wf.status(id).unwrap();
        assert_eq!(record.variant, NdaVariant::RuEn);
        assert_eq!(record.files.generated.len(), 2);
        assert_eq!(record.files.signed.len(), 1);
    }

    #[test]
    fn test_generate_for_unknown_id_is_not_found() {
        let (_, wf) = setup();
        let id      = Uuid::new_v4();
        assert!(matches!(
            wf.generate(Some(id), NdaVariant::Eng, &eng_fields()),
            Err(NdaError::RecordNotFound(missing)) if missing == id
        ));
        assert!(matches!(wf.status(id), Err(NdaError::RecordNotFound(_))));
        assert!(matches!(wf.submit(id), Err(NdaError::RecordNotFound(_))));
    }

    #[test]
    fn test_missing_template_leaves_no_record() {
        let store     = Arc::new(MemoryObjectStore::new());
        let generator = DocumentGenerator::new(FieldCatalog::builtin().unwrap(), Inflector::russian(), store.clone());
        let wf        = NdaWorkflow::new(generator, store.clone(), UploadPolicy::new(Default::default(), 0), Duration::from_secs(1));

        let err = wf.generate(None, NdaVariant::Eng, &eng_fields()).unwrap_err();
        assert!(matches!(err, NdaError::TemplateNotFound(_)));
        assert!(store.keys().is_empty());
    }

    #[test]
    fn test_corrupt_metadata_is_reported() {
        let (store, wf) = setup();
        let id          = Uuid::new_v4();
        store.put(&layout::metadata_key(id), b"{not json", JSON_CONTENT_TYPE).unwrap();
        let err = wf.status(id).unwrap_err();
        assert!(matches!(err, NdaError::Storage(StoreError::Corrupt { .. })));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_download_link() {
        let (_, wf) = setup();
        let id   = wf.generate(None, NdaVariant::Eng, &eng_fields()).unwrap().record_id;
        let link = wf.download_link(id, NdaVariant::Eng).unwrap();
        assert_eq!(link.expires_in_seconds, 900);
        assert!(link.url.contains(&layout::generated_key(id, NdaVariant::Eng)));

        assert!(matches!(
            wf.download_link(id, NdaVariant::RuEn),
            Err(NdaError::ArtifactNotFound { variant: NdaVariant::RuEn, .. })
        ));
    }

    #[test]
    fn test_concurrent_uploads_are_all_recorded() {
        let (store, wf) = setup();
        let wf = Arc::new(wf);
        let id = wf.generate(None, NdaVariant::Eng, &eng_fields()).unwrap().record_id;

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let wf = wf.clone();
                thread::spawn(move || wf.upload_signed(id, format!("copy {i}").as_bytes(), "signed.pdf"))
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap().unwrap(), NdaStatus::SignedUploaded);
        }

        let record = wf.status(id).unwrap();
        assert_eq!(record.files.signed.len(), 8);
        let mut keys = record.files.signed.clone();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 8);
        assert!(keys.iter().all(|k| store.get(k).is_ok()));
    }
}
