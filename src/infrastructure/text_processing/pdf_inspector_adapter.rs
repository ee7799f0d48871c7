use std::fmt::Display;
use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};
use pdf_oxide::PdfDocument;

use crate::application::ports::{PageSample, PdfInspectionError, PdfInspector, PdfStructure};
use crate::domain::PdfMetadata;

const MAX_RESOURCE_DEPTH: usize = 16;

/// Structure and images come from `lopdf`, page text from `pdf_oxide`.
#[derive(Default)]
pub struct PdfInspectorAdapter;

impl PdfInspectorAdapter {
    pub fn new() -> Self {
        Self
    }

    fn load(path: &Path) -> Result<Document, PdfInspectionError> {
        let bytes = std::fs::read(path)?;
        let doc = Document::load_mem(&bytes).map_err(|e| {
            let detail = e.to_string();
            if detail.to_lowercase().contains("encrypt") {
                PdfInspectionError::Encrypted
            } else {
                PdfInspectionError::Parse(detail)
            }
        })?;

        if doc.trailer.get(b"Encrypt").is_ok() {
            return Err(PdfInspectionError::Encrypted);
        }
        Ok(doc)
    }

    fn page_text(path: &Path, max_pages: usize) -> Result<Vec<String>, PdfInspectionError> {
        let mut doc = PdfDocument::open(path)
            .map_err(|e| PdfInspectionError::Parse(format!("failed to parse PDF: {e}")))?;
        let page_count = doc
            .page_count()
            .map_err(|e| PdfInspectionError::Parse(format!("failed to read page count: {e}")))?;

        collect_page_text((0..page_count.min(max_pages)).map(|index| doc.extract_text(index)))
    }
}

impl PdfInspector for PdfInspectorAdapter {
    fn read_structure(&self, path: &Path) -> Result<PdfStructure, PdfInspectionError> {
        let doc = Self::load(path)?;
        Ok(PdfStructure {
            page_count: doc.get_pages().len(),
            metadata: read_info(&doc),
        })
    }

    fn sample_pages(
        &self,
        path: &Path,
        max_pages: usize,
    ) -> Result<Vec<PageSample>, PdfInspectionError> {
        let doc = Self::load(path)?;
        let texts = Self::page_text(path, max_pages)?;

        let samples = doc
            .get_pages()
            .into_values()
            .take(max_pages)
            .enumerate()
            .map(|(index, page_id)| PageSample {
                page_number: index + 1,
                text: texts.get(index).cloned().unwrap_or_default(),
                has_images: page_has_images(&doc, page_id),
            })
            .collect();

        Ok(samples)
    }
}

/// The first page the text extractor rejects fails the whole sample.
fn collect_page_text<E: Display>(
    pages: impl IntoIterator<Item = Result<String, E>>,
) -> Result<Vec<String>, PdfInspectionError> {
    pages
        .into_iter()
        .enumerate()
        .map(|(index, text)| {
            text.map_err(|e| {
                PdfInspectionError::Parse(format!(
                    "failed to extract text from page {}: {e}",
                    index + 1
                ))
            })
        })
        .collect()
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn resolve_dict<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Dictionary> {
    match resolve(doc, object)? {
        Object::Dictionary(dict) => Some(dict),
        Object::Stream(stream) => Some(&stream.dict),
        _ => None,
    }
}

fn read_info(doc: &Document) -> PdfMetadata {
    let Some(info) = doc
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|object| resolve_dict(doc, object))
    else {
        return PdfMetadata::default();
    };

    let field = |key: &[u8]| {
        info.get(key)
            .ok()
            .and_then(|object| resolve(doc, object))
            .and_then(|object| match object {
                Object::String(bytes, _) => Some(decode_text_string(bytes)),
                _ => None,
            })
            .unwrap_or_default()
    };

    PdfMetadata {
        title: field(b"Title"),
        author: field(b"Author"),
        subject: field(b"Subject"),
        creator: field(b"Creator"),
        producer: field(b"Producer"),
    }
}

/// PDF text strings are UTF-16BE when they carry a BOM, otherwise a
/// single-byte encoding that is read as Latin-1.
fn decode_text_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Resources may be inherited from any ancestor in the page tree.
fn page_resources<'a>(doc: &'a Document, page_id: ObjectId) -> Option<&'a Dictionary> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_RESOURCE_DEPTH {
        if let Some(resources) = node
            .get(b"Resources")
            .ok()
            .and_then(|object| resolve_dict(doc, object))
        {
            return Some(resources);
        }
        node = node
            .get(b"Parent")
            .ok()
            .and_then(|object| resolve_dict(doc, object))?;
    }
    None
}

fn page_has_images(doc: &Document, page_id: ObjectId) -> bool {
    let Some(xobjects) = page_resources(doc, page_id)
        .and_then(|resources| resources.get(b"XObject").ok())
        .and_then(|object| resolve_dict(doc, object))
    else {
        return false;
    };

    xobjects.iter().any(|(_, object)| {
        resolve_dict(doc, object)
            .and_then(|dict| dict.get(b"Subtype").ok())
            .and_then(|subtype| subtype.as_name().ok())
            .is_some_and(|name| name == b"Image")
    })
}
