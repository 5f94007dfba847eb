// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Summarization service orchestration
//!
//! Coordinates rate limiting, caching, content fetching and the provider call.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use super::cache::{fingerprint, CacheStats, SummaryCache};
use super::provider::SummaryProvider;
use super::rate_limiter::ClientRateLimiter;
use super::types::{CompletionRequest, SummarizeError, SummarizeRequest, SummaryType};
use crate::config::Settings;
use crate::content::ContentSource;

/// Sampling temperature sent with every completion
pub const TEMPERATURE: f32 = 0.3;

/// Nucleus sampling threshold sent with every completion
pub const TOP_P: f32 = 0.8;

/// Build the provider prompt for a summary of about `max_length` characters
pub fn build_prompt(text: &str, max_length: usize) -> String {
    format!(
        "Please summarize the following text in about {} characters:\n\n{}",
        max_length, text
    )
}

/// Main summarization service
///
/// Owns the per-client rate windows and the summary cache for the lifetime of
/// the process. Concurrent misses for the same fingerprint each call the
/// provider; the last successful write wins.
pub struct SummaryService {
    rate_limiter: ClientRateLimiter,
    cache: SummaryCache,
    provider: Arc<dyn SummaryProvider>,
    content: Arc<dyn ContentSource>,
}

impl SummaryService {
    pub fn new(
        rate_limiter: ClientRateLimiter,
        cache: SummaryCache,
        provider: Arc<dyn SummaryProvider>,
        content: Arc<dyn ContentSource>,
    ) -> Self {
        debug!(
            "Summary service: {} requests per {}s per client, cache ttl {}s",
            rate_limiter.max_requests(),
            rate_limiter.window().as_secs(),
            cache.ttl().as_secs()
        );
        Self {
            rate_limiter,
            cache,
            provider,
            content,
        }
    }

    /// Create a service with limiter and cache sized from settings
    pub fn from_settings(
        settings: &Settings,
        provider: Arc<dyn SummaryProvider>,
        content: Arc<dyn ContentSource>,
    ) -> Self {
        let rate_limiter = ClientRateLimiter::new(
            settings.rate_limit_max_requests,
            Duration::from_secs(settings.rate_limit_window_secs),
            settings.rate_limit_max_clients,
        );
        let cache = SummaryCache::new(
            Duration::from_secs(settings.cache_ttl_secs),
            settings.cache_max_entries,
        );
        Self::new(rate_limiter, cache, provider, content)
    }

    /// Summarize `text` for `client_id`
    ///
    /// The rate limit is charged before the cache is consulted, so cache hits
    /// count against the client's window too.
    pub async fn summarize(
        &self,
        client_id: &str,
        text: &str,
        max_length: usize,
    ) -> Result<String, SummarizeError> {
        if !self.rate_limiter.check(client_id) {
            warn!("Rate limit exceeded for client: {}", client_id);
            return Err(SummarizeError::RateLimitExceeded {
                retry_after_secs: self.rate_limiter.window().as_secs(),
            });
        }

        let key = fingerprint(text, max_length);
        if let Some(summary) = self.cache.get(&key) {
            info!("Returning cached summary for client: {}", client_id);
            return Ok(summary);
        }

        let request = CompletionRequest {
            prompt: build_prompt(text, max_length),
            max_tokens: max_length,
            temperature: TEMPERATURE,
            top_p: TOP_P,
        };

        let start = Instant::now();
        let raw = match self.provider.complete(&request).await {
            Ok(raw) => raw,
            Err(e) => {
                error!("Error in summarization via {}: {}", self.provider.name(), e);
                return Err(SummarizeError::from(e));
            }
        };

        let summary = raw.trim();
        if summary.is_empty() {
            error!("Provider {} returned an empty summary", self.provider.name());
            return Err(SummarizeError::SummarizationFailed(
                "provider returned an empty summary".to_string(),
            ));
        }

        self.cache.put(&key, summary);
        info!(
            "Summary generated by {}: {} chars in {}ms",
            self.provider.name(),
            summary.chars().count(),
            start.elapsed().as_millis()
        );

        Ok(summary.to_string())
    }

    /// Validate a request, resolve its content and summarize it
    pub async fn process(
        &self,
        client_id: &str,
        request: &SummarizeRequest,
    ) -> Result<String, SummarizeError> {
        request.validate().map_err(SummarizeError::InvalidRequest)?;

        let text = match request.kind {
            SummaryType::Url => {
                debug!("Resolving url request: {}", request.content);
                self.content.fetch(request.content.trim()).await?
            }
            SummaryType::Text => request.content.clone(),
        };

        self.summarize(client_id, &text, request.max_length).await
    }

    /// Whether the provider can produce real summaries
    pub fn is_provider_configured(&self) -> bool {
        self.provider.is_configured()
    }

    /// Get cache statistics
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Clear the summary cache
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
