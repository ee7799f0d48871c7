use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::azure::MicrosoftAzureBuilder;

use crate::application::ports::{BlobProperties, BlobStore, BlobStoreError};
use crate::domain::{BlobPath, BlobReference, BlobSummary};

use super::azure_container_client::AzureContainerClient;
use super::object_container::{ObjectContainer, to_attributes};

/// Azure Blob Storage container authorised with the account Shared Key.
pub struct AzureBlobStore {
    container: String,
    objects: ObjectContainer,
    containers: Arc<AzureContainerClient>,
}

impl AzureBlobStore {
    pub fn new(
        account: &str,
        access_key: &str,
        container: &str,
        containers: Arc<AzureContainerClient>,
    ) -> Result<Self, BlobStoreError> {
        let store = MicrosoftAzureBuilder::new()
            .with_account(account)
            .with_access_key(access_key)
            .with_container_name(container)
            .build()
            .map_err(|e| BlobStoreError::Configuration(e.to_string()))?;

        Ok(Self {
            container: container.to_string(),
            objects: ObjectContainer::new(Arc::new(store)),
            containers,
        })
    }
}

#[async_trait]
impl BlobStore for AzureBlobStore {
    fn container_name(&self) -> &str {
        &self.container
    }

    async fn ensure_container(&self) -> Result<bool, BlobStoreError> {
        self.containers.create_container(&self.container).await
    }

    async fn put(
        &self,
        path: &BlobPath,
        data: Bytes,
        properties: &BlobProperties,
    ) -> Result<BlobReference, BlobStoreError> {
        self.objects
            .put(path, data, to_attributes(properties))
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
        self.objects.list(prefix).await
    }

    async fn delete(&self, path: &BlobPath) -> Result<(), BlobStoreError> {
        self.objects.delete(path).await
    }

    fn url(&self, path: &BlobPath) -> String {
        format!(
            "{}/{}/{}",
            self.containers.blob_endpoint(),
            self.container,
            path
        )
    }
}
