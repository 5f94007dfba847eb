// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP content fetching
//!
//! Fetches a web page and reduces it to readable text for summarization.

use async_trait::async_trait;
use reqwest::Client;
use std::net::IpAddr;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use url::{Host, Url};

use super::config::ContentFetchConfig;
use super::extractor::extract_readable_text;

/// Content fetch error types
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// URL could not be parsed or uses an unsupported scheme
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// URL points at localhost or a private network
    #[error("Unsafe URL blocked: {0}")]
    UnsafeUrl(String),
    /// Request timed out
    #[error("Timeout fetching: {0}")]
    Timeout(String),
    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(String),
    /// HTTP non-success status
    #[error("HTTP {status} for: {url}")]
    HttpStatus { status: u16, url: String },
    /// No text could be extracted
    #[error("No content extracted from: {0}")]
    NoContent(String),
}

/// Source of readable text for URL requests
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetches pages over HTTP and extracts their readable text
pub struct ContentFetcher {
    client: Client,
    config: ContentFetchConfig,
}

impl ContentFetcher {
    /// Create a new content fetcher
    pub fn new(config: ContentFetchConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(
                "Mozilla/5.0 (compatible; WebSummarizer/",
                env!("CARGO_PKG_VERSION"),
                ")"
            ))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    /// Check if URL is safe to fetch (http/https, not localhost or a private IP)
    pub fn is_safe_url(url: &str) -> bool {
        let parsed = match Url::parse(url) {
            Ok(u) => u,
            Err(_) => return false,
        };

        if !["http", "https"].contains(&parsed.scheme()) {
            return false;
        }

        match parsed.host() {
            Some(Host::Domain(domain)) => {
                let domain = domain.to_lowercase();
                domain != "localhost" && !domain.ends_with(".localhost")
            }
            Some(Host::Ipv4(ip)) => is_public_ip(IpAddr::V4(ip)),
            Some(Host::Ipv6(ip)) => is_public_ip(IpAddr::V6(ip)),
            None => false,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &ContentFetchConfig {
        &self.config
    }
}

fn is_public_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            !(v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast())
        }
        IpAddr::V6(v6) => {
            let unique_local = (v6.segments()[0] & 0xfe00) == 0xfc00;
            let link_local = (v6.segments()[0] & 0xffc0) == 0xfe80;
            let mapped_private = v6
                .to_ipv4_mapped()
                .map_or(false, |v4| !is_public_ip(IpAddr::V4(v4)));
            !(v6.is_loopback() || v6.is_unspecified() || unique_local || link_local || mapped_private)
        }
    }
}

#[async_trait]
impl ContentSource for ContentFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        if Url::parse(url).is_err() {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }
        if !self.config.allow_private_hosts && !Self::is_safe_url(url) {
            return Err(FetchError::UnsafeUrl(url.to_string()));
        }

        debug!("Fetching content from: {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(url.to_string())
            } else {
                FetchError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let html = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(url.to_string())
            } else {
                FetchError::Http(e.to_string())
            }
        })?;

        let text = extract_readable_text(&html, self.config.max_chars);
        if text.is_empty() {
            return Err(FetchError::NoContent(url.to_string()));
        }

        info!("Fetched {} chars from: {}", text.len(), url);
        Ok(text)
    }
}
