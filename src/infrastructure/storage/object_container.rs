use std::collections::BTreeMap;
use std::sync::Arc;

use bytes::Bytes;
use futures::TryStreamExt;
use object_store::path::Path as StorePath;
use object_store::{
    Attribute, AttributeValue, Attributes, GetOptions, ObjectMeta, ObjectStore, PutOptions,
    PutPayload,
};

use crate::application::ports::{BlobProperties, BlobStoreError};
use crate::domain::{BlobMetadata, BlobPath, BlobSummary};

/// One blob container expressed over an [`ObjectStore`]. Blob names are
/// relative to `root`, which is empty when the store itself is the container.
pub(super) struct ObjectContainer {
    store: Arc<dyn ObjectStore>,
    root: Option<String>,
}

impl ObjectContainer {
    pub(super) fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store, root: None }
    }

    pub(super) fn nested(store: Arc<dyn ObjectStore>, root: &str) -> Self {
        Self {
            store,
            root: Some(root.trim_matches('/').to_string()),
        }
    }

    fn location(&self, name: &str) -> StorePath {
        match &self.root {
            Some(root) => StorePath::from(format!("{root}/{name}")),
            None => StorePath::from(name),
        }
    }

    fn relative_name(&self, location: &StorePath) -> String {
        let full = location.as_ref();
        match &self.root {
            Some(root) => full
                .strip_prefix(root.as_str())
                .map(|rest| rest.trim_start_matches('/'))
                .unwrap_or(full)
                .to_string(),
            None => full.to_string(),
        }
    }

    pub(super) async fn put(
        &self,
        path: &BlobPath,
        data: Bytes,
        attributes: Attributes,
    ) -> Result<(), BlobStoreError> {
        let options = PutOptions {
            attributes,
            ..Default::default()
        };
        self.store
            .put_opts(&self.location(path.as_str()), PutPayload::from(data), options)
            .await
            .map_err(|e| BlobStoreError::UploadFailed(format!("{path}: {e}")))?;
        Ok(())
    }

    pub(super) async fn fetch(&self, path: &BlobPath) -> Result<Bytes, BlobStoreError> {
        let result = self
            .store
            .get(&self.location(path.as_str()))
            .await
            .map_err(|e| not_found_or(e, path, BlobStoreError::DownloadFailed))?;

        result
            .bytes()
            .await
            .map_err(|e| BlobStoreError::DownloadFailed(format!("{path}: {e}")))
    }

    /// Reads content settings without the body.
    pub(super) async fn attributes(&self, name: &str) -> Result<Attributes, BlobStoreError> {
        let options = GetOptions {
            head: true,
            ..Default::default()
        };
        let result = self
            .store
            .get_opts(&self.location(name), options)
            .await
            .map_err(|e| BlobStoreError::ListFailed(format!("{name}: {e}")))?;
        Ok(result.attributes)
    }

    /// Object listing is segment based, so the walk starts at the deepest
    /// complete segment of `prefix` and the remainder is matched as a string.
    pub(super) async fn list_objects(
        &self,
        prefix: Option<&str>,
    ) -> Result<Vec<(String, ObjectMeta)>, BlobStoreError> {
        let prefix = prefix.unwrap_or_default();
        let parent = prefix.rsplit_once('/').map(|(dir, _)| dir);

        let walk_root = match (&self.root, parent) {
            (Some(root), Some(dir)) => Some(StorePath::from(format!("{root}/{dir}"))),
            (Some(root), None) => Some(StorePath::from(root.as_str())),
            (None, Some(dir)) => Some(StorePath::from(dir)),
            (None, None) => None,
        };

        let objects: Vec<ObjectMeta> = self
            .store
            .list(walk_root.as_ref())
            .try_collect()
            .await
            .map_err(|e| BlobStoreError::ListFailed(e.to_string()))?;

        let mut matched: Vec<(String, ObjectMeta)> = objects
            .into_iter()
            .map(|meta| (self.relative_name(&meta.location), meta))
            .filter(|(name, _)| name.starts_with(prefix))
            .collect();
        matched.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(matched)
    }

    /// Listing with content settings read per blob.
    pub(super) async fn list(
        &self,
        prefix: Option<&str>,
    ) -> Result<Vec<BlobSummary>, BlobStoreError> {
        let mut summaries = Vec::new();
        for (name, meta) in self.list_objects(prefix).await? {
            let attributes = self.attributes(&name).await?;
            summaries.push(summary_from_attributes(name, &meta, &attributes));
        }
        Ok(summaries)
    }

    pub(super) async fn delete(&self, path: &BlobPath) -> Result<(), BlobStoreError> {
        self.store
            .delete(&self.location(path.as_str()))
            .await
            .map_err(|e| not_found_or(e, path, BlobStoreError::DeleteFailed))
    }
}

pub(super) fn to_attributes(properties: &BlobProperties) -> Attributes {
    let mut attributes = Attributes::new();
    attributes.insert(
        Attribute::ContentType,
        AttributeValue::from(properties.content_type.clone()),
    );
    if let Some(disposition) = &properties.content_disposition {
        attributes.insert(
            Attribute::ContentDisposition,
            AttributeValue::from(disposition.clone()),
        );
    }
    for (key, value) in properties.metadata.iter() {
        attributes.insert(
            Attribute::Metadata(key.clone().into()),
            AttributeValue::from(value.clone()),
        );
    }
    attributes
}

pub(super) fn summary_from_attributes(
    name: String,
    meta: &ObjectMeta,
    attributes: &Attributes,
) -> BlobSummary {
    let mut content_type = None;
    let mut metadata = BTreeMap::new();
    for (attribute, value) in attributes.iter() {
        match attribute {
            Attribute::ContentType => content_type = Some(attribute_text(value)),
            Attribute::Metadata(key) => {
                metadata.insert(key.to_string(), attribute_text(value));
            }
            _ => {}
        }
    }

    BlobSummary {
        name,
        size: meta.size as u64,
        last_modified: meta.last_modified,
        content_type,
        metadata,
    }
}

pub(super) fn summary_from_properties(
    name: String,
    meta: &ObjectMeta,
    properties: Option<(String, BlobMetadata)>,
) -> BlobSummary {
    let (content_type, metadata) = match properties {
        Some((content_type, metadata)) => (Some(content_type), metadata.into_inner()),
        None => (None, BTreeMap::new()),
    };
    BlobSummary {
        name,
        size: meta.size as u64,
        last_modified: meta.last_modified,
        content_type,
        metadata,
    }
}

fn attribute_text(value: &AttributeValue) -> String {
    let text: &str = value.as_ref();
    text.to_string()
}

fn not_found_or(
    error: object_store::Error,
    path: &BlobPath,
    otherwise: fn(String) -> BlobStoreError,
) -> BlobStoreError {
    match error {
        object_store::Error::NotFound { .. } => BlobStoreError::NotFound(path.to_string()),
        other => otherwise(format!("{path}: {other}")),
    }
}
