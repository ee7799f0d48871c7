use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::local::LocalFileSystem;
use object_store::{Attributes, ObjectStore};
use serde::{Deserialize, Serialize};

use crate::application::ports::{BlobProperties, BlobStore, BlobStoreError};
use crate::domain::{BlobMetadata, BlobPath, BlobReference, BlobSummary};

use super::object_container::{ObjectContainer, summary_from_properties};

const PROPERTIES_DIR: &str = ".properties";

/// Container mapped to `{base_path}/{container}` on the local filesystem.
///
/// The filesystem backend cannot hold content settings, so they are written
/// to a JSON sidecar under `{base_path}/.properties/{container}/`.
pub struct LocalBlobStore {
    container: String,
    root: PathBuf,
    objects: ObjectContainer,
    properties: ObjectContainer,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredProperties {
    content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content_disposition: Option<String>,
    #[serde(default)]
    metadata: BTreeMap<String, String>,
}

impl LocalBlobStore {
    pub fn new(base_path: PathBuf, container: &str) -> Result<Self, BlobStoreError> {
        std::fs::create_dir_all(&base_path).map_err(BlobStoreError::Io)?;
        let fs = LocalFileSystem::new_with_prefix(&base_path)
            .map_err(|e| BlobStoreError::Configuration(e.to_string()))?;
        let store: Arc<dyn ObjectStore> = Arc::new(fs);

        let root = std::fs::canonicalize(&base_path)
            .map_err(BlobStoreError::Io)?
            .join(container);

        Ok(Self {
            container: container.to_string(),
            root,
            objects: ObjectContainer::nested(Arc::clone(&store), container),
            properties: ObjectContainer::nested(store, &format!("{PROPERTIES_DIR}/{container}")),
        })
    }

    fn sidecar(path: &str) -> BlobPath {
        BlobPath::from_raw(format!("{path}.json"))
    }

    async fn read_properties(&self, name: &str) -> Option<StoredProperties> {
        let raw = self.properties.fetch(&Self::sidecar(name)).await.ok()?;
        match serde_json::from_slice(&raw) {
            Ok(stored) => Some(stored),
            Err(e) => {
                tracing::warn!(blob = name, error = %e, "Unreadable blob properties sidecar");
                None
            }
        }
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    fn container_name(&self) -> &str {
        &self.container
    }

    async fn ensure_container(&self) -> Result<bool, BlobStoreError> {
        if tokio::fs::metadata(&self.root).await.is_ok() {
            return Ok(false);
        }
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| BlobStoreError::ContainerCreationFailed(format!("{}: {e}", self.container)))?;
        Ok(true)
    }

    async fn put(
        &self,
        path: &BlobPath,
        data: Bytes,
        properties: &BlobProperties,
    ) -> Result<BlobReference, BlobStoreError> {
        self.objects.put(path, data, Attributes::new()).await?;

        let stored = StoredProperties {
            content_type: properties.content_type.clone(),
            content_disposition: properties.content_disposition.clone(),
            metadata: properties.metadata.clone().into_inner(),
        };
        self.properties
            .put(
                &Self::sidecar(path.as_str()),
                Bytes::from(serde_json::to_vec(&stored)?),
                Attributes::new(),
            )
            .await?;

        Ok(BlobReference {
            blob_name: path.to_string(),
            url: self.url(path),
        })
    }

    async fn fetch(&self, path: &BlobPath) -> Result<Bytes, BlobStoreError> {
        self.objects.fetch(path).await
    }

    async fn list(&self, prefix: Option<&str>) -> Result<Vec<BlobSummary>, BlobStoreError> {
        let mut summaries = Vec::new();
        for (name, meta) in self.objects.list_objects(prefix).await? {
            let properties = self
                .read_properties(&name)
                .await
                .map(|p| (p.content_type, BlobMetadata::from(p.metadata)));
            summaries.push(summary_from_properties(name, &meta, properties));
        }
        Ok(summaries)
    }

    async fn delete(&self, path: &BlobPath) -> Result<(), BlobStoreError> {
        self.objects.delete(path).await?;
        match self.properties.delete(&Self::sidecar(path.as_str())).await {
            Ok(()) | Err(BlobStoreError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn url(&self, path: &BlobPath) -> String {
        format!("file://{}/{path}", self.root.display())
    }
}
