use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};

use super::document_id::DocumentId;
use super::validation::ValidationResult;

/// String-only key/value tags stored alongside a blob. Blob stores accept
/// nothing but strings, so every typed value is rendered here and nowhere
/// else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlobMetadata(BTreeMap<String, String>);

impl BlobMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags written on the original PDF. Caller extras are applied last and
    /// may override the derived keys.
    pub fn for_raw_upload(
        result: &ValidationResult,
        uploaded_at: DateTime<Utc>,
        extras: &BTreeMap<String, String>,
    ) -> Self {
        let medical = &result.medical_info;
        let mut metadata = Self::new()
            .with("document_id", result.document_id.as_str())
            .with("upload_timestamp", format_timestamp(uploaded_at))
            .with("validation_status", result.validation_status.as_str())
            .with("file_size", result.basic_info.file_size.to_string())
            .with("page_count", result.pdf_info.page_count.to_string())
            .with(
                "is_medical",
                match medical.is_medical_content {
                    Some(true) => "true",
                    Some(false) => "false",
                    None => "unknown",
                },
            )
            .with("medical_score", medical.medical_score.to_string());

        if !medical.document_type_hints.is_empty() {
            let joined = medical
                .document_type_hints
                .iter()
                .map(|hint| hint.as_str())
                .collect::<Vec<_>>()
                .join(",");
            metadata.insert("document_types", joined);
        }

        for (key, value) in extras {
            metadata.insert(key.clone(), value.clone());
        }

        metadata
    }

    /// Tags for derived artifacts: `document_id`, a `content_type` marker and
    /// a timestamp under `timestamp_key`.
    pub fn for_artifact(
        document_id: &DocumentId,
        content_marker: &str,
        timestamp_key: &str,
        at: DateTime<Utc>,
    ) -> Self {
        Self::new()
            .with("document_id", document_id.as_str())
            .with("content_type", content_marker)
            .with(timestamp_key, format_timestamp(at))
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl From<BTreeMap<String, String>> for BlobMetadata {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}
