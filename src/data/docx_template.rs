// ============================================================
// Layer 4 — .docx Template Codec
// ============================================================
// Bridges .docx packages and the substitution engine.
//
// How a .docx is laid out:
//   zip package
//     ├── [Content_Types].xml, _rels/, docProps/ ...
//     └── word/
//           ├── document.xml     ← the only part rewritten
//           ├── footer1.xml, header1.xml, styles.xml ...
//           └── media/ ...
//
// Rendering:
//   1. read word/document.xml out of the package
//   2. group its <w:t> text nodes by paragraph (see wordml.rs)
//   3. run the engine over each paragraph, one run per text node
//   4. write changed nodes back, everything else event for event
//   5. re-zip: every other entry is copied raw (still compressed,
//      same name, same order); document.xml keeps its own
//      compression method and timestamp
//
// Run properties, breaks, tabs, fields, hyperlinks and any part
// the engine has no business with come out exactly as they went
// in. A template with nothing to fill is returned unchanged.
//
// Reference: zip crate documentation (ZipArchive::by_index_raw,
//            ZipWriter::raw_copy_file)

use std::io::{Cursor, Read, Write};

use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::data::substitution::{find_placeholders, substitute_paragraph_counted, Replacements};
use crate::data::wordml::WordXml;
use crate::domain::document::Paragraph;
use crate::error::NdaError;

const DOCUMENT_PART: &str = "word/document.xml";

/// A rendered document and how many placeholders were filled.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes:    Vec<u8>,
    pub replaced: usize,
}

/// Fill `replacements` into a .docx template.
pub fn render_template(template: &[u8], replacements: &Replacements) -> Result<RenderedDocument, NdaError> {
    let mut package = open_package(template)?;
    let mut doc     = WordXml::parse(&read_part(&mut package, DOCUMENT_PART)?)?;

    let paragraphs   = doc.paragraphs();
    let mut replaced = 0usize;
    for para in &paragraphs {
        let (after, n) = substitute_paragraph_counted(para, replacements);
        if n == 0 {
            continue;
        }
        replaced += n;
        for (before, run) in para.runs.iter().zip(after.runs) {
            if run.text != before.text {
                doc.set_text(run.style, run.text);
            }
        }
    }

    tracing::debug!(
        "Rewrote {} placeholders across {} paragraphs",
        replaced,
        paragraphs.len()
    );

    if replaced == 0 {
        return Ok(RenderedDocument { bytes: template.to_vec(), replaced });
    }

    let bytes = repack(&mut package, &doc.to_xml()?)?;
    Ok(RenderedDocument { bytes, replaced })
}

/// Every paragraph of a .docx in document order, wherever it sits
/// (body, tables at any depth, content controls, text boxes). Each
/// run is one text node; its style is the node's index.
pub fn read_paragraphs(bytes: &[u8]) -> Result<Vec<Paragraph<usize>>, NdaError> {
    let mut package = open_package(bytes)?;
    let doc         = WordXml::parse(&read_part(&mut package, DOCUMENT_PART)?)?;
    Ok(doc.paragraphs())
}

/// All distinct placeholder tokens in a template, sorted. Tokens
/// split across runs are found too.
pub fn scan_placeholders(bytes: &[u8]) -> Result<Vec<String>, NdaError> {
    let mut tokens: Vec<String> = read_paragraphs(bytes)?
        .iter()
        .flat_map(|p| find_placeholders(&p.text()))
        .collect();
    tokens.sort();
    tokens.dedup();
    Ok(tokens)
}

// ─── Package I/O ──────────────────────────────────────────────────────────────

fn zip_err(e: impl std::fmt::Display) -> NdaError {
    NdaError::Document(format!("cannot read .docx package: {e}"))
}

fn open_package(bytes: &[u8]) -> Result<ZipArchive<Cursor<&[u8]>>, NdaError> {
    ZipArchive::new(Cursor::new(bytes)).map_err(zip_err)
}

fn read_part(package: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> Result<Vec<u8>, NdaError> {
    let mut part = package
        .by_name(name)
        .map_err(|_| NdaError::Document(format!("package has no {name}")))?;
    let mut buf = Vec::with_capacity(part.size() as usize);
    part.read_to_end(&mut buf).map_err(zip_err)?;
    Ok(buf)
}

/// Copy the package entry by entry, swapping in `document` for
/// word/document.xml.
fn repack(package: &mut ZipArchive<Cursor<&[u8]>>, document: &[u8]) -> Result<Vec<u8>, NdaError> {
    let mut out = ZipWriter::new(Cursor::new(Vec::new()));
    for i in 0..package.len() {
        let entry = package.by_index_raw(i).map_err(zip_err)?;
        if entry.name() != DOCUMENT_PART {
            out.raw_copy_file(entry).map_err(pack_err)?;
            continue;
        }

        let options = FileOptions::default()
            .compression_method(entry.compression())
            .last_modified_time(entry.last_modified());
        out.start_file(DOCUMENT_PART, options).map_err(pack_err)?;
        out.write_all(document).map_err(pack_err)?;
    }

    let cursor = out.finish().map_err(pack_err)?;
    Ok(cursor.into_inner())
}

fn pack_err(e: impl std::fmt::Display) -> NdaError {
    NdaError::Document(format!("cannot write .docx package: {e}"))
}
