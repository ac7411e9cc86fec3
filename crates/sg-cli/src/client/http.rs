//! reqwest-based gateway client

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use sg_core::api::{
    ErrorBody, ExecuteRequest, ExecuteResponse, LogsResponse, ServiceInfo, ValidationResponse,
};
use sg_core::AuditRecord;

/// Gateway address used when none is given
pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:8001";

/// Covers both gateway-side SSH timeouts with room to spare
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// Client for one gateway
pub struct GatewayClient {
    base_url: String,
    http: reqwest::Client,
}

impl GatewayClient {
    /// Create a client for the gateway at `base_url`
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    /// `GET /api/`
    pub async fn service_info(&self) -> Result<ServiceInfo> {
        self.send(self.http.get(self.url(""))).await
    }

    /// `POST /api/ssh/execute`
    pub async fn execute(&self, request: &ExecuteRequest) -> Result<ExecuteResponse> {
        self.send(self.http.post(self.url("ssh/execute")).json(request))
            .await
    }

    /// `GET /api/ssh/logs`
    pub async fn logs(&self, limit: Option<usize>) -> Result<Vec<AuditRecord>> {
        let mut request = self.http.get(self.url("ssh/logs"));
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }
        let response: LogsResponse = self.send(request).await?;
        Ok(response.logs)
    }

    /// `GET /api/config/{name}`
    pub async fn fetch_config(&self, name: &str) -> Result<Value> {
        self.send(self.http.get(self.url(&format!("config/{}", name))))
            .await
    }

    /// `POST /api/config/validate`
    pub async fn validate_config(&self, document: &Value) -> Result<ValidationResponse> {
        self.send(self.http.post(self.url("config/validate")).json(document))
            .await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.with_context(|| {
            format!("Failed to reach gateway at {}. Is it running?", self.base_url)
        })?;
        decode(response).await
    }
}

/// Decode a success body, or turn an error body into an error
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return response
            .json()
            .await
            .context("Gateway returned an unexpected response body");
    }

    let text = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.detail)
        .unwrap_or(text);
    Err(anyhow!("Gateway returned {}: {}", status, detail))
}
