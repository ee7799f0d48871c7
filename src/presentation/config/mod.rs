mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    AppSettings, ChunkingSettings, DocumentIntelligenceSettings, ENV_PREFIX, ENV_SEPARATOR,
    EmbeddingsSettings, LoggingSettings, RetrievalSettings, SearchSettings, Settings,
    SettingsError, StorageProviderSetting, StorageSettings,
};
