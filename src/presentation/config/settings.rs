use std::collections::BTreeMap;
use std::path::Path;

use config::{Config, File};
use serde::Deserialize;

use crate::application::services::ValidationLimits;
use crate::domain::ContainerType;

use super::Environment;

pub const ENV_PREFIX: &str = "MEDINGEST";
pub const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: AppSettings,
    pub storage: StorageSettings,
    #[serde(default)]
    pub document_intelligence: DocumentIntelligenceSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub embeddings: EmbeddingsSettings,
    #[serde(default)]
    pub chunking: ChunkingSettings,
    #[serde(default)]
    pub retrieval: RetrievalSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub version: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderSetting {
    Azure,
    Local,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub provider: StorageProviderSetting,
    pub containers: BTreeMap<ContainerType, String>,
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    #[serde(default = "default_local_path")]
    pub local_path: String,
    pub azure_account: Option<String>,
    pub azure_access_key: Option<String>,
}

impl StorageSettings {
    pub fn validation_limits(&self) -> ValidationLimits {
        ValidationLimits::from_megabytes(self.max_file_size_mb)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentIntelligenceSettings {
    #[serde(default)]
    pub enabled: bool,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    #[serde(default = "default_doc_intel_api_version")]
    pub api_version: String,
    #[serde(default = "default_doc_intel_model_id")]
    pub model_id: String,
}

impl Default for DocumentIntelligenceSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            api_key: None,
            api_version: default_doc_intel_api_version(),
            model_id: default_doc_intel_model_id(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub index_name: Option<String>,
    pub max_results: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            index_name: None,
            max_results: 50,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingsSettings {
    pub model_name: String,
    pub dimension: usize,
    pub batch_size: usize,
    pub max_length: usize,
}

impl Default for EmbeddingsSettings {
    fn default() -> Self {
        Self {
            model_name: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            dimension: 384,
            batch_size: 32,
            max_length: 512,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    pub strategy: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub min_chunk_size: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            strategy: "sliding_window".to_string(),
            chunk_size: 1000,
            chunk_overlap: 200,
            min_chunk_size: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub top_k: usize,
    pub rerank_top_k: usize,
    pub hybrid_alpha: f64,
    pub min_relevance_score: f64,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: 10,
            rerank_top_k: 5,
            hybrid_alpha: 0.5,
            min_relevance_score: 0.7,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            enable_json: false,
        }
    }
}

fn default_max_file_size_mb() -> u64 {
    50
}

fn default_allowed_extensions() -> Vec<String> {
    vec![".pdf".to_string()]
}

fn default_local_path() -> String {
    "./data/blobs".to_string()
}

fn default_doc_intel_api_version() -> String {
    "2024-11-30".to_string()
}

fn default_doc_intel_model_id() -> String {
    "prebuilt-layout".to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid environment: {0}")]
    Environment(String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl Settings {
    /// Layers `base.yaml`, `{environment}.yaml` and `MEDINGEST__*` variables,
    /// then validates the result.
    pub fn load_from(config_dir: &Path, environment: Environment) -> Result<Self, SettingsError> {
        let configuration = Config::builder()
            .add_source(File::from(config_dir.join("base.yaml")).required(false))
            .add_source(
                File::from(config_dir.join(format!("{}.yaml", environment.as_str())))
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = configuration.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.storage.max_file_size_mb == 0 {
            return Err(SettingsError::Invalid(
                "storage.max_file_size_mb must be greater than 0".into(),
            ));
        }

        for required in [ContainerType::RawDocuments, ContainerType::ProcessedDocuments] {
            if !self.storage.containers.contains_key(&required) {
                return Err(SettingsError::Invalid(format!(
                    "storage.containers.{required} is required"
                )));
            }
        }

        if self.storage.provider == StorageProviderSetting::Azure
            && (self.storage.azure_account.is_none() || self.storage.azure_access_key.is_none())
        {
            return Err(SettingsError::Invalid(
                "azure storage requires azure_account and azure_access_key".into(),
            ));
        }

        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(SettingsError::Invalid(
                "chunking.chunk_overlap must be less than chunk_size".into(),
            ));
        }

        if !(0.0..=1.0).contains(&self.retrieval.hybrid_alpha) {
            return Err(SettingsError::Invalid(
                "retrieval.hybrid_alpha must be between 0 and 1".into(),
            ));
        }

        let doc_intel = &self.document_intelligence;
        if doc_intel.enabled && (doc_intel.endpoint.is_none() || doc_intel.api_key.is_none()) {
            return Err(SettingsError::Invalid(
                "document_intelligence requires endpoint and api_key when enabled".into(),
            ));
        }

        Ok(())
    }
}
