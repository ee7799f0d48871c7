#![allow(dead_code)]

mod pdf_fixtures;

pub use fake_converter::FakeConverter;
pub use pdf_fixtures::{
    PdfFixture, write_bytes, write_encrypted_pdf, write_image_only_pdf, write_text_pdf,
};

use std::sync::Arc;

use medingest::application::services::{DocumentUploader, PdfValidator, ValidationLimits};
use medingest::domain::ContainerType;
use medingest::infrastructure::storage::StorageClients;
use medingest::infrastructure::text_processing::PdfInspectorAdapter;
use medingest::presentation::config::{StorageProviderSetting, StorageSettings};

pub const TEST_MAX_FILE_SIZE_MB: u64 = 1;

pub fn test_validator() -> PdfValidator {
    PdfValidator::new(
        Arc::new(PdfInspectorAdapter::new()),
        ValidationLimits::from_megabytes(TEST_MAX_FILE_SIZE_MB),
    )
}

pub fn storage_settings(provider: StorageProviderSetting, local_path: &str) -> StorageSettings {
    StorageSettings {
        provider,
        containers: ContainerType::ALL
            .iter()
            .map(|t| (*t, t.as_str().replace('_', "-")))
            .collect(),
        max_file_size_mb: TEST_MAX_FILE_SIZE_MB,
        allowed_extensions: vec![".pdf".to_string()],
        local_path: local_path.to_string(),
        azure_account: None,
        azure_access_key: None,
    }
}

pub fn memory_uploader() -> DocumentUploader {
    let clients = StorageClients::new(storage_settings(StorageProviderSetting::Memory, ""))
        .expect("memory storage never needs credentials");
    DocumentUploader::new(Arc::new(clients))
}

use std::path::PathBuf;

use medingest::domain::{
    BasicInfo, DocumentId, DocumentTypeHint, MedicalInfo, PdfInfo, PdfMetadata,
    ValidationResult, ValidationStatus,
};

pub fn sample_validation_result(document_id: &str, medical: Option<bool>) -> ValidationResult {
    let medical_info = match medical {
        None => MedicalInfo::indeterminate("PDF reading error: truncated"),
        Some(is_medical) => MedicalInfo {
            is_medical_content: Some(is_medical),
            medical_score: if is_medical { 7 } else { 0 },
            regulatory_score: 0,
            found_medical_keywords: Vec::new(),
            found_regulatory_keywords: Vec::new(),
            document_type_hints: if is_medical {
                vec![DocumentTypeHint::ClinicalTrial, DocumentTypeHint::Review]
            } else {
                Vec::new()
            },
            sample_length: 120,
            validation_error: None,
        },
    };

    ValidationResult {
        document_id: DocumentId::from_raw(document_id),
        file_path: PathBuf::from(format!("/data/{document_id}.pdf")),
        validation_status: ValidationStatus::Passed,
        basic_info: BasicInfo {
            file_size: 2048,
            file_size_mb: 0.0,
            mime_type: "application/pdf".to_string(),
            file_hash: "ab".repeat(32),
            filename: format!("{document_id}.pdf"),
        },
        pdf_info: PdfInfo {
            page_count: 4,
            has_text: true,
            has_images: false,
            has_tables: false,
            total_characters: 900,
            avg_chars_per_page: 300,
            pdf_metadata: PdfMetadata::default(),
        },
        medical_info,
        validation_errors: Vec::new(),
    }
}
