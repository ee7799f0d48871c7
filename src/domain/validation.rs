use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::document_id::DocumentId;

/// Report produced by a successful validation run. Failed validations never
/// produce one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub document_id: DocumentId,
    pub file_path: PathBuf,
    pub validation_status: ValidationStatus,
    pub basic_info: BasicInfo,
    pub pdf_info: PdfInfo,
    pub medical_info: MedicalInfo,
    pub validation_errors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Passed,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicInfo {
    pub file_size: u64,
    pub file_size_mb: f64,
    pub mime_type: String,
    pub file_hash: String,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfInfo {
    pub page_count: usize,
    pub has_text: bool,
    pub has_images: bool,
    pub has_tables: bool,
    pub total_characters: usize,
    pub avg_chars_per_page: usize,
    pub pdf_metadata: PdfMetadata,
}

/// Document information dictionary. Missing entries are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfMetadata {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub creator: String,
    pub producer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalInfo {
    /// `None` when classification could not run.
    pub is_medical_content: Option<bool>,
    pub medical_score: usize,
    pub regulatory_score: usize,
    pub found_medical_keywords: Vec<String>,
    pub found_regulatory_keywords: Vec<String>,
    pub document_type_hints: Vec<DocumentTypeHint>,
    pub sample_length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_error: Option<String>,
}

impl MedicalInfo {
    pub fn indeterminate(error: impl Into<String>) -> Self {
        Self {
            is_medical_content: None,
            medical_score: 0,
            regulatory_score: 0,
            found_medical_keywords: Vec::new(),
            found_regulatory_keywords: Vec::new(),
            document_type_hints: Vec::new(),
            sample_length: 0,
            validation_error: Some(error.into()),
        }
    }

    pub fn is_indeterminate(&self) -> bool {
        self.is_medical_content.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentTypeHint {
    ClinicalTrial,
    Regulatory,
    JournalArticle,
    Review,
}

impl DocumentTypeHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClinicalTrial => "clinical_trial",
            Self::Regulatory => "regulatory",
            Self::JournalArticle => "journal_article",
            Self::Review => "review",
        }
    }
}
