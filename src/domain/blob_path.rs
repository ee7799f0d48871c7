use std::fmt;

use super::document_id::DocumentId;

/// Name of a blob inside a container. Every artifact of a document lives
/// under the `{document_id}/` namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobPath(String);

impl BlobPath {
    pub fn new(document_id: &DocumentId, filename: &str) -> Self {
        Self(format!("{document_id}/{filename}"))
    }

    pub fn original_pdf(document_id: &DocumentId) -> Self {
        Self::new(document_id, &format!("{document_id}.pdf"))
    }

    pub fn validation_report(document_id: &DocumentId) -> Self {
        Self::new(document_id, &format!("{document_id}_validation.json"))
    }

    pub fn markdown(document_id: &DocumentId) -> Self {
        Self::new(document_id, &format!("{document_id}.md"))
    }

    pub fn extracted_metadata(document_id: &DocumentId) -> Self {
        Self::new(document_id, &format!("{document_id}_metadata.json"))
    }

    pub fn processing_info(document_id: &DocumentId) -> Self {
        Self::new(document_id, &format!("{document_id}_processing.json"))
    }

    pub fn from_raw(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
