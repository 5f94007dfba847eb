// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for the summarization pipeline

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::FetchError;

/// Default summary length in characters
pub const DEFAULT_MAX_LENGTH: usize = 300;

/// Largest summary length a caller may request; it is sent as the provider's
/// `max_tokens`, which DashScope caps
pub const MAX_ALLOWED_LENGTH: usize = 4000;

/// What the `content` field of a request holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryType {
    Url,
    Text,
}

/// A summarization request as received over HTTP or WebSocket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeRequest {
    #[serde(rename = "type")]
    pub kind: SummaryType,
    pub content: String,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

impl SummarizeRequest {
    pub fn text(content: impl Into<String>, max_length: usize) -> Self {
        Self {
            kind: SummaryType::Text,
            content: content.into(),
            max_length,
        }
    }

    pub fn url(content: impl Into<String>, max_length: usize) -> Self {
        Self {
            kind: SummaryType::Url,
            content: content.into(),
            max_length,
        }
    }

    /// Validate the request
    pub fn validate(&self) -> Result<(), String> {
        if self.content.trim().is_empty() {
            return Err("content cannot be empty".to_string());
        }
        if self.max_length == 0 {
            return Err("max_length must be at least 1".to_string());
        }
        if self.max_length > MAX_ALLOWED_LENGTH {
            return Err(format!(
                "max_length cannot exceed {} (provider max_tokens limit)",
                MAX_ALLOWED_LENGTH
            ));
        }
        if self.kind == SummaryType::Url {
            let parsed = url::Url::parse(self.content.trim())
                .map_err(|e| format!("invalid url: {}", e))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(format!("unsupported url scheme: {}", parsed.scheme()));
            }
        }
        Ok(())
    }
}

/// Successful summarization result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl SummarizeResponse {
    pub fn new(summary: String) -> Self {
        Self {
            summary,
            metadata: None,
        }
    }
}

/// Parameters for one completion call to the provider
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: usize,
    pub temperature: f32,
    pub top_p: f32,
}

/// Errors raised by the summarization provider client
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No API key configured
    #[error("provider API key is not configured")]
    NotConfigured,

    /// Provider answered with a non-success status
    #[error("Qwen API error: {message} (status {status}, code {code})")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Provider answered 2xx but the body could not be used
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    /// Request did not complete in time
    #[error("provider request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Connection or protocol failure
    #[error("provider transport error: {0}")]
    Transport(String),
}

/// Errors surfaced by the summarization pipeline
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// Fetching or parsing the source page failed
    #[error("Failed to fetch or parse webpage: {0}")]
    Fetch(#[from] FetchError),

    /// Client exceeded its sliding-window quota
    #[error("Rate limit exceeded. Please try again in {retry_after_secs} seconds.")]
    RateLimitExceeded { retry_after_secs: u64 },

    /// Provider failed or returned an unusable answer
    #[error("{0}")]
    SummarizationFailed(String),

    /// Request failed validation
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Malformed streaming message
    #[error("Invalid message: {0}")]
    Protocol(String),
}

impl From<ProviderError> for SummarizeError {
    fn from(err: ProviderError) -> Self {
        SummarizeError::SummarizationFailed(err.to_string())
    }
}
