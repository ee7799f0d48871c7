use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use crate::application::ports::{ConversionError, ConvertedDocument, DocumentConverter};
use crate::domain::DocumentId;

pub const POLL_TIMEOUT: Duration = Duration::from_secs(300);
pub const INITIAL_BACKOFF: Duration = Duration::from_secs(2);
pub const MAX_BACKOFF: Duration = Duration::from_secs(60);
pub const DEFAULT_API_VERSION: &str = "2024-11-30";
pub const DEFAULT_MODEL_ID: &str = "prebuilt-layout";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OPERATION_LOCATION_HEADER: &str = "Operation-Location";

/// Converts PDFs to markdown with an Azure Document Intelligence analysis
/// model.
pub struct AzureDocIntelConverter {
    client: Client,
    endpoint: String,
    api_key: String,
    api_version: String,
    model_id: String,
}

impl AzureDocIntelConverter {
    pub fn new(
        endpoint: &str,
        api_key: &str,
        api_version: &str,
        model_id: &str,
    ) -> Result<Self, ConversionError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ConversionError::SubmitFailed(format!("http client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            api_version: api_version.to_string(),
            model_id: model_id.to_string(),
        })
    }

    pub fn analyze_url(&self) -> String {
        format!(
            "{}/documentintelligence/documentModels/{}:analyze?api-version={}&outputContentFormat=markdown",
            self.endpoint, self.model_id, self.api_version
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
    }

    /// Starts an analysis and returns the operation URL to poll.
    async fn submit(&self, data: &[u8]) -> Result<String, ConversionError> {
        let body = serde_json::json!({ "base64Source": general_purpose::STANDARD.encode(data) });

        let response = self
            .authorized(self.client.post(self.analyze_url()))
            .json(&body)
            .send()
            .await
            .map_err(|e| ConversionError::SubmitFailed(e.to_string()))?;
        let response = ensure_success(response, ConversionError::SubmitFailed).await?;

        operation_location(response.headers()).ok_or_else(|| {
            ConversionError::SubmitFailed("response missing Operation-Location header".into())
        })
    }

    async fn poll_once(&self, operation_url: &str) -> Result<PollStep, ConversionError> {
        let response = self
            .authorized(self.client.get(operation_url))
            .send()
            .await
            .map_err(|e| ConversionError::AnalysisFailed(format!("poll request: {e}")))?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let header = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok());
            return Ok(PollStep::Throttled(parse_retry_after(header)));
        }

        let response = ensure_success(response, ConversionError::AnalysisFailed).await?;
        response
            .json::<AnalyzeResponse>()
            .await
            .map_err(|e| ConversionError::AnalysisFailed(format!("parse: {e}")))?
            .into_step()
    }

    async fn poll_until_complete(
        &self,
        operation_url: &str,
    ) -> Result<AnalyzeResult, ConversionError> {
        let poll = async {
            let mut backoff = INITIAL_BACKOFF;
            loop {
                match self.poll_once(operation_url).await? {
                    PollStep::Finished(result) => return Ok(result),
                    PollStep::Throttled(retry_after) => {
                        let wait = retry_after.unwrap_or(backoff);
                        tracing::debug!(wait_secs = wait.as_secs(), "Analysis throttled");
                        tokio::time::sleep(wait).await;
                    }
                    PollStep::Pending => {
                        tokio::time::sleep(backoff).await;
                        backoff = next_backoff(backoff);
                    }
                }
            }
        };

        tokio::time::timeout(POLL_TIMEOUT, poll)
            .await
            .map_err(|_| ConversionError::TimedOut(POLL_TIMEOUT.as_secs()))?
    }
}

async fn ensure_success(
    response: Response,
    error: fn(String) -> ConversionError,
) -> Result<Response, ConversionError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(error(format!("{status}: {body}")))
}

fn operation_location(headers: &HeaderMap) -> Option<String> {
    headers
        .get(OPERATION_LOCATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[async_trait]
impl DocumentConverter for AzureDocIntelConverter {
    fn name(&self) -> &'static str {
        "azure_document_intelligence"
    }

    #[tracing::instrument(skip(self, data), fields(document_id = %document_id, bytes = data.len()))]
    async fn convert(
        &self,
        data: &[u8],
        document_id: &DocumentId,
    ) -> Result<ConvertedDocument, ConversionError> {
        let operation_url = self.submit(data).await?;
        let result = self.poll_until_complete(&operation_url).await?;

        if result.content.trim().is_empty() {
            return Err(ConversionError::EmptyResult(document_id.clone()));
        }

        tracing::info!(
            pages = result.pages.len(),
            characters = result.content.len(),
            "Document converted"
        );

        Ok(ConvertedDocument {
            page_count: (!result.pages.is_empty()).then_some(result.pages.len()),
            markdown: result.content,
            model_id: self.model_id.clone(),
            api_version: self.api_version.clone(),
        })
    }
}

pub fn next_backoff(current: Duration) -> Duration {
    (current * 2).min(MAX_BACKOFF)
}

/// Seconds form of `Retry-After`; HTTP dates are ignored.
pub fn parse_retry_after(header: Option<&str>) -> Option<Duration> {
    header
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// What one poll of the analysis operation tells the caller to do next.
#[derive(Debug)]
pub enum PollStep {
    Finished(AnalyzeResult),
    Pending,
    Throttled(Option<Duration>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnalysisStatus {
    NotStarted,
    Running,
    Succeeded,
    Failed,
    Canceled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub status: AnalysisStatus,
    pub analyze_result: Option<AnalyzeResult>,
}

impl AnalyzeResponse {
    pub fn into_step(self) -> Result<PollStep, ConversionError> {
        match self.status {
            AnalysisStatus::Succeeded => Ok(PollStep::Finished(
                self.analyze_result.unwrap_or_default(),
            )),
            AnalysisStatus::NotStarted | AnalysisStatus::Running => Ok(PollStep::Pending),
            status @ (AnalysisStatus::Failed
            | AnalysisStatus::Canceled
            | AnalysisStatus::Unknown) => Err(ConversionError::AnalysisFailed(format!(
                "analysis ended with status {status:?}"
            ))),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct AnalyzeResult {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub pages: Vec<serde_json::Value>,
}
