// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Summarization request pipeline
//!
//! Turns text (or the readable text of a URL) into a length-bounded summary:
//! - Per-client sliding-window rate limiting
//! - Fingerprint-keyed summary cache with lazy TTL expiry
//! - One provider call per cache miss, no retries

pub mod cache;
pub mod clock;
pub mod provider;
pub mod qwen;
pub mod rate_limiter;
pub mod service;
pub mod types;

// Re-export commonly used types
pub use cache::{fingerprint, CacheStats, SummaryCache};
pub use clock::{Clock, MockClock, SystemClock};
pub use provider::SummaryProvider;
pub use qwen::{QwenConfig, QwenProvider};
pub use rate_limiter::ClientRateLimiter;
pub use service::{build_prompt, SummaryService};
pub use types::{
    CompletionRequest, ProviderError, SummarizeError, SummarizeRequest, SummarizeResponse,
    SummaryType, DEFAULT_MAX_LENGTH,
};
