// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! DashScope (Qwen) text-generation client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::provider::SummaryProvider;
use super::types::{CompletionRequest, ProviderError};

const GENERATION_PATH: &str = "/api/v1/services/aigc/text-generation/generation";

/// Connection settings for the DashScope API
#[derive(Debug, Clone)]
pub struct QwenConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Client for the DashScope text-generation endpoint
pub struct QwenProvider {
    client: Client,
    config: QwenConfig,
}

// --- DashScope wire types ---

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    input: GenerationInput<'a>,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationInput<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    temperature: f32,
    top_p: f32,
    max_tokens: usize,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    output: Option<GenerationOutput>,
}

#[derive(Debug, Deserialize)]
struct GenerationOutput {
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

impl QwenProvider {
    /// Create a new DashScope client
    pub fn new(config: QwenConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let config = QwenConfig {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.filter(|key| !key.trim().is_empty()),
            ..config
        };
        info!(
            "Qwen provider configured: base_url={}, model={}, api_key_set={}",
            config.base_url,
            config.model,
            config.api_key.is_some()
        );

        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn map_transport_error(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout {
                timeout_secs: self.config.timeout_secs,
            }
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl SummaryProvider for QwenProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ProviderError::NotConfigured)?;

        let body = GenerationRequest {
            model: &self.config.model,
            input: GenerationInput {
                prompt: &request.prompt,
            },
            parameters: GenerationParameters {
                temperature: request.temperature,
                top_p: request.top_p,
                max_tokens: request.max_tokens,
            },
        };

        let url = format!("{}{}", self.config.base_url, GENERATION_PATH);
        debug!("Qwen generate POST {} (max_tokens={})", url, request.max_tokens);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let error: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                code: error.code.unwrap_or_else(|| "unknown".to_string()),
                message: error.message.unwrap_or_else(|| "Unknown error".to_string()),
            });
        }

        let parsed: GenerationResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        parsed
            .output
            .and_then(|output| output.text)
            .ok_or_else(|| ProviderError::MalformedResponse("missing output.text".to_string()))
    }

    fn name(&self) -> &'static str {
        "qwen"
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }
}
