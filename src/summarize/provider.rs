// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Summarization provider trait definition

use async_trait::async_trait;

use super::types::{CompletionRequest, ProviderError};

/// Remote text-completion service that writes the summaries
///
/// The summary service owns exactly one provider and never retries a failed
/// call.
#[async_trait]
pub trait SummaryProvider: Send + Sync {
    /// Run one completion and return the raw generated text
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Whether the provider can serve requests (has an API key, etc.)
    fn is_configured(&self) -> bool;
}
