mod azure_blob_store;
mod azure_container_client;
mod local_blob_store;
mod memory_blob_store;
mod object_container;
mod storage_clients;

pub use azure_blob_store::AzureBlobStore;
pub use azure_container_client::{AzureContainerClient, STORAGE_API_VERSION};
pub use local_blob_store::LocalBlobStore;
pub use memory_blob_store::InMemoryBlobStore;
pub use storage_clients::StorageClients;
