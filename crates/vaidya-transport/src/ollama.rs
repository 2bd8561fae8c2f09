//! Ollama-compatible HTTP transport.
//!
//! Sends `POST {base_url}/api/generate` with `stream: false` and the output
//! JSON Schema in `format`, and returns the `response` text for the adapter
//! to parse.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use vaidya_contracts::{
    error::{VaidyaError, VaidyaResult},
    invocation::{ModelRequest, ModelResponse},
};
use vaidya_core::traits::ModelTransport;

/// The `[model]` configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.1".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Request body for /api/generate
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    format: &'a Value,
}

/// Response body from /api/generate
#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// HTTP transport for an Ollama-compatible endpoint.
pub struct OllamaTransport {
    base_url: String,
    model: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl OllamaTransport {
    pub fn new(config: &ModelConfig) -> VaidyaResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VaidyaError::ConfigError {
                reason: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Map a failure while sending the request or reading its body.
    fn map_request_error(&self, e: reqwest::Error) -> VaidyaError {
        if e.is_decode() {
            VaidyaError::TransportFailure {
                reason: format!("unreadable generate response: {e}"),
                retryable: false,
            }
        } else if e.is_connect() {
            VaidyaError::TransportFailure {
                reason: format!("cannot connect to model endpoint at {}", self.base_url),
                retryable: true,
            }
        } else if e.is_timeout() {
            VaidyaError::TransportFailure {
                reason: format!("request timed out after {}s", self.timeout_secs),
                retryable: true,
            }
        } else {
            VaidyaError::TransportFailure {
                reason: e.to_string(),
                retryable: false,
            }
        }
    }
}

/// Whether an HTTP status is worth another attempt: rate limiting and
/// server-side errors are, every other failure status is not.
pub fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

#[async_trait]
impl ModelTransport for OllamaTransport {
    async fn dispatch(&self, request: &ModelRequest) -> VaidyaResult<ModelResponse> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt: &request.prompt,
            stream: false,
            format: &request.output_schema,
        };

        debug!(
            invocation_id = %request.invocation_id,
            model = %self.model,
            url = %url,
            "posting generate request"
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VaidyaError::TransportFailure {
                reason: format!("model endpoint returned HTTP {}: {}", status.as_u16(), body),
                retryable: is_retryable_status(status.as_u16()),
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| self.map_request_error(e))?;

        Ok(ModelResponse::Text(parsed.response))
    }
}
