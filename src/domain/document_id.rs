use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

const RANDOM_SUFFIX_LEN: usize = 8;

/// Identifier scoping every blob written for one ingested document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Builds `<stem>_<8 random hex chars>`, with spaces and dashes folded to
    /// underscores and everything lower-cased.
    pub fn generate(path: &Path) -> Self {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let suffix = Uuid::new_v4().simple().to_string();
        Self::normalized(&format!("{stem}_{}", &suffix[..RANDOM_SUFFIX_LEN]))
    }

    pub fn from_raw(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn normalized(raw: &str) -> Self {
        Self(raw.replace([' ', '-'], "_").to_lowercase())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
