use std::path::Path;

use crate::domain::PdfMetadata;

/// Structural facts read from the document catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfStructure {
    pub page_count: usize,
    pub metadata: PdfMetadata,
}

/// Content of one sampled page, 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSample {
    pub page_number: usize,
    pub text: String,
    pub has_images: bool,
}

/// Blocking PDF parser. Callers run it on the blocking pool.
pub trait PdfInspector: Send + Sync {
    /// Fails with [`PdfInspectionError::Encrypted`] for password protected
    /// files; no decryption is ever attempted.
    fn read_structure(&self, path: &Path) -> Result<PdfStructure, PdfInspectionError>;

    /// Parses the file independently of [`read_structure`] and returns up to
    /// `max_pages` leading pages.
    ///
    /// [`read_structure`]: PdfInspector::read_structure
    fn sample_pages(
        &self,
        path: &Path,
        max_pages: usize,
    ) -> Result<Vec<PageSample>, PdfInspectionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PdfInspectionError {
    #[error("PDF is password protected")]
    Encrypted,
    #[error("PDF reading error: {0}")]
    Parse(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
