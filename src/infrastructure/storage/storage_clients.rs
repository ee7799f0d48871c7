use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use crate::application::ports::{BlobStore, BlobStoreError, BlobStoreProvider};
use crate::domain::ContainerType;
use crate::presentation::config::{StorageProviderSetting, StorageSettings};

use super::azure_blob_store::AzureBlobStore;
use super::azure_container_client::AzureContainerClient;
use super::local_blob_store::LocalBlobStore;
use super::memory_blob_store::InMemoryBlobStore;

/// Resolves container types to stores of the configured provider. Each
/// store is built on first use and reused for the life of the process.
pub struct StorageClients {
    settings: StorageSettings,
    azure: Option<AzureCredentials>,
    cache: Mutex<HashMap<ContainerType, Arc<dyn BlobStore>>>,
}

struct AzureCredentials {
    account: String,
    access_key: String,
    containers: Arc<AzureContainerClient>,
}

impl StorageClients {
    pub fn new(settings: StorageSettings) -> Result<Self, BlobStoreError> {
        let azure = match settings.provider {
            StorageProviderSetting::Azure => {
                let account = settings.azure_account.clone().ok_or_else(|| {
                    BlobStoreError::Configuration("azure_account required".into())
                })?;
                let access_key = settings.azure_access_key.clone().ok_or_else(|| {
                    BlobStoreError::Configuration("azure_access_key required".into())
                })?;
                let containers = Arc::new(AzureContainerClient::new(&account, &access_key)?);
                Some(AzureCredentials {
                    account,
                    access_key,
                    containers,
                })
            }
            StorageProviderSetting::Local | StorageProviderSetting::Memory => None,
        };

        tracing::debug!(provider = ?settings.provider, "Storage clients configured");

        Ok(Self {
            settings,
            azure,
            cache: Mutex::new(HashMap::new()),
        })
    }

    fn build(&self, container: &str) -> Result<Arc<dyn BlobStore>, BlobStoreError> {
        match (self.settings.provider, &self.azure) {
            (StorageProviderSetting::Azure, Some(azure)) => Ok(Arc::new(AzureBlobStore::new(
                &azure.account,
                &azure.access_key,
                container,
                Arc::clone(&azure.containers),
            )?)),
            (StorageProviderSetting::Azure, None) => Err(BlobStoreError::Configuration(
                "azure credentials missing".into(),
            )),
            (StorageProviderSetting::Local, _) => Ok(Arc::new(LocalBlobStore::new(
                PathBuf::from(&self.settings.local_path),
                container,
            )?)),
            (StorageProviderSetting::Memory, _) => Ok(Arc::new(InMemoryBlobStore::new(container))),
        }
    }
}

impl BlobStoreProvider for StorageClients {
    fn container(
        &self,
        container_type: ContainerType,
    ) -> Result<Arc<dyn BlobStore>, BlobStoreError> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(store) = cache.get(&container_type) {
            return Ok(Arc::clone(store));
        }

        let name = self
            .settings
            .containers
            .get(&container_type)
            .ok_or(BlobStoreError::UnknownContainer(container_type))?;
        let store = self.build(name)?;
        cache.insert(container_type, Arc::clone(&store));
        Ok(store)
    }

    fn configured_containers(&self) -> Vec<ContainerType> {
        self.settings.containers.keys().copied().collect()
    }
}
