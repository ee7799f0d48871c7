use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use sha2::{Digest, Sha256};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::application::ports::{PageSample, PdfInspectionError, PdfInspector};
use crate::domain::{
    BasicInfo, DocumentId, MedicalInfo, PdfInfo, ValidationResult, ValidationStatus,
};

use super::content_sniffer::{PDF_MIME, SNIFF_LEN, sniff_mime_type};
use super::medical_classifier::classify_medical_content;
use super::table_detection::detect_table_patterns;

const STRUCTURE_SAMPLE_PAGES: usize = 3;
const CLASSIFICATION_SAMPLE_PAGES: usize = 5;
const HASH_CHUNK_SIZE: usize = 4096;
const BYTES_PER_MB: u64 = 1024 * 1024;
pub const DEFAULT_PARSE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ValidationLimits {
    pub max_file_size_bytes: u64,
    pub parse_timeout: Duration,
}

impl ValidationLimits {
    pub fn from_megabytes(max_file_size_mb: u64) -> Self {
        Self {
            max_file_size_bytes: max_file_size_mb * BYTES_PER_MB,
            parse_timeout: DEFAULT_PARSE_TIMEOUT,
        }
    }
}

/// Validates medical PDFs in three fail-fast stages: file checks, structural
/// checks, then a best-effort medical content classification.
pub struct PdfValidator {
    inspector: Arc<dyn PdfInspector>,
    limits: ValidationLimits,
}

impl PdfValidator {
    pub fn new(inspector: Arc<dyn PdfInspector>, limits: ValidationLimits) -> Self {
        Self { inspector, limits }
    }

    #[tracing::instrument(skip(self, path), fields(file = %path.display()))]
    pub async fn validate(&self, path: &Path) -> Result<ValidationResult, FileValidationError> {
        tracing::info!("Starting validation");

        match self.run_stages(path).await {
            Ok(result) => {
                tracing::info!(
                    document_id = %result.document_id,
                    page_count = result.pdf_info.page_count,
                    is_medical = ?result.medical_info.is_medical_content,
                    "Validation passed"
                );
                Ok(result)
            }
            Err(e) => {
                tracing::error!(kind = ?e.kind, reason = %e.reason, "Validation failed");
                Err(e)
            }
        }
    }

    async fn run_stages(&self, path: &Path) -> Result<ValidationResult, FileValidationError> {
        let basic_info = self.validate_basic_file(path).await?;
        let pdf_info = self.validate_pdf_structure(path).await?;
        let medical_info = self.assess_medical_content(path).await;

        Ok(ValidationResult {
            document_id: DocumentId::generate(path),
            file_path: path.to_path_buf(),
            validation_status: ValidationStatus::Passed,
            basic_info,
            pdf_info,
            medical_info,
            validation_errors: Vec::new(),
        })
    }

    async fn validate_basic_file(&self, path: &Path) -> Result<BasicInfo, FileValidationError> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(m) if m.is_file() => m,
            Ok(_) => return Err(fail(path, ValidationFailure::NotFound, "File not found")),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(fail(path, ValidationFailure::NotFound, "File not found"));
            }
            Err(e) => return Err(unreadable(path, e)),
        };

        let extension = path.extension().map(|e| e.to_string_lossy().into_owned());
        if !extension
            .as_deref()
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
        {
            let actual = extension
                .map(|e| format!(".{e}"))
                .unwrap_or_else(|| "no extension".to_string());
            return Err(fail(
                path,
                ValidationFailure::InvalidExtension,
                format!("Expected .pdf, got {actual}"),
            ));
        }

        let file_size = metadata.len();
        if file_size > self.limits.max_file_size_bytes {
            return Err(fail(
                path,
                ValidationFailure::TooLarge,
                format!(
                    "Size {file_size} bytes exceeds limit {} bytes",
                    self.limits.max_file_size_bytes
                ),
            ));
        }
        if file_size == 0 {
            return Err(fail(path, ValidationFailure::Empty, "File size is 0 bytes"));
        }

        let header = read_header(path).await.map_err(|e| unreadable(path, e))?;
        let mime_type = sniff_mime_type(&header);
        if mime_type != PDF_MIME {
            return Err(fail(
                path,
                ValidationFailure::InvalidMimeType,
                format!("Expected {PDF_MIME}, got {mime_type}"),
            ));
        }

        let file_hash = hash_file(path).await.map_err(|e| unreadable(path, e))?;

        Ok(BasicInfo {
            file_size,
            file_size_mb: round_to_hundredths(file_size as f64 / BYTES_PER_MB as f64),
            mime_type: mime_type.to_string(),
            file_hash,
            filename: file_name(path),
        })
    }

    async fn validate_pdf_structure(&self, path: &Path) -> Result<PdfInfo, FileValidationError> {
        let inspector = Arc::clone(&self.inspector);
        let owned_path = path.to_path_buf();

        let (structure, samples) = self
            .run_blocking(move || {
                let structure = inspector.read_structure(&owned_path)?;
                let samples = inspector.sample_pages(&owned_path, STRUCTURE_SAMPLE_PAGES)?;
                Ok((structure, samples))
            })
            .await
            .map_err(|e| structural_failure(path, e))?;

        let stats = SampleStats::collect(&samples);
        if !stats.has_text {
            return Err(fail(
                path,
                ValidationFailure::NoExtractableText,
                "PDF appears to be image-only or corrupted",
            ));
        }

        let sampled_pages = structure.page_count.min(STRUCTURE_SAMPLE_PAGES).max(1);

        Ok(PdfInfo {
            page_count: structure.page_count,
            has_text: stats.has_text,
            has_images: stats.has_images,
            has_tables: stats.has_tables,
            total_characters: stats.total_characters,
            avg_chars_per_page: stats.total_characters / sampled_pages,
            pdf_metadata: structure.metadata,
        })
    }

    /// Never fails: parser faults degrade to an indeterminate result.
    async fn assess_medical_content(&self, path: &Path) -> MedicalInfo {
        let inspector = Arc::clone(&self.inspector);
        let owned_path = path.to_path_buf();

        let samples = self
            .run_blocking(move || inspector.sample_pages(&owned_path, CLASSIFICATION_SAMPLE_PAGES))
            .await;

        match samples {
            Ok(pages) => {
                let sample: String = pages.iter().map(|p| p.text.as_str()).collect();
                let info = classify_medical_content(&sample);
                if info.is_medical_content == Some(false) {
                    tracing::warn!("Document does not appear to be medical content");
                }
                info
            }
            Err(e) => {
                tracing::warn!(error = %e, "Medical content classification failed");
                MedicalInfo::indeterminate(e.to_string())
            }
        }
    }

    async fn run_blocking<T, F>(&self, work: F) -> Result<T, StageError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, PdfInspectionError> + Send + 'static,
    {
        tokio::time::timeout(self.limits.parse_timeout, tokio::task::spawn_blocking(work))
            .await
            .map_err(|_| StageError::TimedOut(self.limits.parse_timeout))?
            .map_err(|e| StageError::Join(e.to_string()))?
            .map_err(StageError::Inspection)
    }
}

#[derive(Default)]
struct SampleStats {
    has_text: bool,
    has_images: bool,
    has_tables: bool,
    total_characters: usize,
}

impl SampleStats {
    fn collect(samples: &[PageSample]) -> Self {
        let mut stats = Self::default();
        for page in samples {
            if !page.text.trim().is_empty() {
                stats.has_text = true;
                stats.total_characters += page.text.chars().count();
            }
            stats.has_images |= page.has_images;
            stats.has_tables |= detect_table_patterns(&page.text);
        }
        stats
    }
}

#[derive(Debug, thiserror::Error)]
enum StageError {
    #[error(transparent)]
    Inspection(PdfInspectionError),
    #[error("PDF parsing timed out after {}s", .0.as_secs())]
    TimedOut(Duration),
    #[error("parser task failed: {0}")]
    Join(String),
}

/// Why a file was rejected. Every variant is fatal for the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    NotFound,
    InvalidExtension,
    TooLarge,
    Empty,
    InvalidMimeType,
    Encrypted,
    Corrupted,
    NoExtractableText,
    Unreadable,
}

impl ValidationFailure {
    pub fn message(&self) -> &'static str {
        match self {
            Self::NotFound => "File does not exist",
            Self::InvalidExtension => "Invalid file extension",
            Self::TooLarge => "File too large",
            Self::Empty => "Empty file",
            Self::InvalidMimeType => "Invalid MIME type",
            Self::Encrypted => "Encrypted PDF not supported",
            Self::Corrupted => "Corrupted PDF file",
            Self::NoExtractableText => "No extractable text found",
            Self::Unreadable => "PDF validation failed",
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{}: {filename} ({reason})", kind.message())]
pub struct FileValidationError {
    pub filename: String,
    pub reason: String,
    pub kind: ValidationFailure,
}

fn fail(path: &Path, kind: ValidationFailure, reason: impl Into<String>) -> FileValidationError {
    FileValidationError {
        filename: path.display().to_string(),
        reason: reason.into(),
        kind,
    }
}

fn unreadable(path: &Path, error: io::Error) -> FileValidationError {
    fail(
        path,
        ValidationFailure::Unreadable,
        format!("Unexpected error: {error}"),
    )
}

fn structural_failure(path: &Path, error: StageError) -> FileValidationError {
    match error {
        StageError::Inspection(PdfInspectionError::Encrypted) => {
            fail(path, ValidationFailure::Encrypted, "PDF is password protected")
        }
        StageError::Inspection(e @ PdfInspectionError::Parse(_)) => {
            fail(path, ValidationFailure::Corrupted, e.to_string())
        }
        StageError::Inspection(PdfInspectionError::Io(e)) => unreadable(path, e),
        other => fail(
            path,
            ValidationFailure::Unreadable,
            format!("Unexpected error: {other}"),
        ),
    }
}

async fn read_header(path: &Path) -> io::Result<Vec<u8>> {
    let file = File::open(path).await?;
    let mut header = Vec::with_capacity(SNIFF_LEN);
    file.take(SNIFF_LEN as u64).read_to_end(&mut header).await?;
    Ok(header)
}

async fn hash_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; HASH_CHUNK_SIZE];

    loop {
        let read = file.read(&mut buffer).await?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
