use std::time::Duration;

use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Client, StatusCode};
use sha2::Sha256;

use crate::application::ports::BlobStoreError;

type HmacSha256 = Hmac<Sha256>;

pub const STORAGE_API_VERSION: &str = "2021-08-06";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Container-level Blob REST calls, which the object store abstraction does
/// not cover. Requests are signed with the account Shared Key.
pub struct AzureContainerClient {
    client: Client,
    account: String,
    key: Vec<u8>,
    endpoint: String,
}

impl AzureContainerClient {
    pub fn new(account: &str, access_key: &str) -> Result<Self, BlobStoreError> {
        let key = general_purpose::STANDARD.decode(access_key).map_err(|e| {
            BlobStoreError::Configuration(format!("azure_access_key is not valid base64: {e}"))
        })?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BlobStoreError::Configuration(format!("http client: {e}")))?;

        Ok(Self {
            client,
            account: account.to_string(),
            key,
            endpoint: format!("https://{account}.blob.core.windows.net"),
        })
    }

    pub fn blob_endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `PUT ?restype=container`. `409 Conflict` means the container is
    /// already there.
    #[tracing::instrument(skip(self))]
    pub async fn create_container(&self, container: &str) -> Result<bool, BlobStoreError> {
        let date = rfc1123(Utc::now());
        let string_to_sign = container_string_to_sign(&self.account, container, &date);
        let signature = sign(&self.key, &string_to_sign)?;

        let response = self
            .client
            .put(format!("{}/{container}?restype=container", self.endpoint))
            .header("x-ms-date", &date)
            .header("x-ms-version", STORAGE_API_VERSION)
            .header(CONTENT_LENGTH, 0)
            .header(
                "Authorization",
                format!("SharedKey {}:{signature}", self.account),
            )
            .send()
            .await
            .map_err(|e| BlobStoreError::ContainerCreationFailed(format!("{container}: {e}")))?;

        match response.status() {
            StatusCode::CREATED => {
                tracing::info!(container, "Created container");
                Ok(true)
            }
            StatusCode::CONFLICT => {
                tracing::debug!(container, "Container already exists");
                Ok(false)
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(BlobStoreError::ContainerCreationFailed(format!(
                    "{container}: {status}: {body}"
                )))
            }
        }
    }
}

fn rfc1123(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Eleven standard header slots, all empty for a bodiless container PUT,
/// then the canonical `x-ms-*` headers and resource.
fn container_string_to_sign(account: &str, container: &str, date: &str) -> String {
    format!(
        "PUT\n\n\n\n\n\n\n\n\n\n\n\nx-ms-date:{date}\nx-ms-version:{STORAGE_API_VERSION}\n/{account}/{container}\nrestype:container"
    )
}

fn sign(key: &[u8], string_to_sign: &str) -> Result<String, BlobStoreError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| BlobStoreError::Configuration(format!("invalid signing key: {e}")))?;
    mac.update(string_to_sign.as_bytes());
    Ok(general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}
