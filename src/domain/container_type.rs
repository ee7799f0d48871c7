use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Logical category of blob container. Concrete container names come from
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerType {
    RawDocuments,
    ProcessedDocuments,
    Embeddings,
}

impl ContainerType {
    pub const ALL: [ContainerType; 3] = [
        ContainerType::RawDocuments,
        ContainerType::ProcessedDocuments,
        ContainerType::Embeddings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RawDocuments => "raw_documents",
            Self::ProcessedDocuments => "processed_documents",
            Self::Embeddings => "embeddings",
        }
    }
}

impl FromStr for ContainerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "raw_documents" | "raw" => Ok(Self::RawDocuments),
            "processed_documents" | "processed" => Ok(Self::ProcessedDocuments),
            "embeddings" => Ok(Self::Embeddings),
            other => Err(format!(
                "Unknown container type: {other}. Expected: raw_documents, processed_documents, or embeddings"
            )),
        }
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
