// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Process settings loaded from the environment

use std::env;
use std::str::FromStr;

use crate::content::ContentFetchConfig;
use crate::summarize::QwenConfig;

/// Settings for the summarizer service
#[derive(Debug, Clone)]
pub struct Settings {
    /// Display name reported in logs
    pub app_name: String,
    /// Service version reported by `/health`
    pub version: String,
    /// Verbose logging
    pub debug: bool,
    /// DashScope API key; summarization fails fast without it
    pub dashscope_api_key: Option<String>,
    /// Qwen model name
    pub qwen_model: String,
    /// DashScope API root
    pub provider_base_url: String,
    /// Provider request timeout in seconds
    pub provider_timeout_secs: u64,
    /// Listen host
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Rate limit window length in seconds
    pub rate_limit_window_secs: u64,
    /// Requests admitted per client per window
    pub rate_limit_max_requests: usize,
    /// Upper bound on tracked client identities
    pub rate_limit_max_clients: usize,
    /// Summary cache TTL in seconds
    pub cache_ttl_secs: u64,
    /// Maximum cached summaries
    pub cache_max_entries: usize,
    /// Page fetch timeout in seconds
    pub fetch_timeout_secs: u64,
    /// Maximum extracted characters per page
    pub fetch_max_chars: usize,
    /// Allow fetching loopback and private-network URLs
    pub fetch_allow_private_hosts: bool,
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            app_name: lookup("APP_NAME").unwrap_or(defaults.app_name),
            version: defaults.version,
            debug: lookup("DEBUG").map_or(defaults.debug, |v| parse_flag(&v)),
            dashscope_api_key: lookup("DASHSCOPE_API_KEY").filter(|v| !v.trim().is_empty()),
            qwen_model: lookup("QWEN_MODEL").unwrap_or(defaults.qwen_model),
            provider_base_url: lookup("DASHSCOPE_BASE_URL").unwrap_or(defaults.provider_base_url),
            provider_timeout_secs: parse_or(
                &lookup,
                "PROVIDER_TIMEOUT_SECS",
                defaults.provider_timeout_secs,
            ),
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port),
            rate_limit_window_secs: parse_or(
                &lookup,
                "RATE_LIMIT_WINDOW_SECS",
                defaults.rate_limit_window_secs,
            ),
            rate_limit_max_requests: parse_or(
                &lookup,
                "RATE_LIMIT_MAX_REQUESTS",
                defaults.rate_limit_max_requests,
            ),
            rate_limit_max_clients: parse_or(
                &lookup,
                "RATE_LIMIT_MAX_CLIENTS",
                defaults.rate_limit_max_clients,
            ),
            cache_ttl_secs: parse_or(&lookup, "CACHE_TTL_SECS", defaults.cache_ttl_secs),
            cache_max_entries: parse_or(&lookup, "CACHE_MAX_ENTRIES", defaults.cache_max_entries),
            fetch_timeout_secs: parse_or(
                &lookup,
                "FETCH_TIMEOUT_SECS",
                defaults.fetch_timeout_secs,
            ),
            fetch_max_chars: parse_or(&lookup, "FETCH_MAX_CHARS", defaults.fetch_max_chars),
            fetch_allow_private_hosts: lookup("FETCH_ALLOW_PRIVATE_HOSTS")
                .map_or(defaults.fetch_allow_private_hosts, |v| parse_flag(&v)),
        }
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), String> {
        if self.rate_limit_window_secs == 0 {
            return Err("Rate limit window must be greater than 0".to_string());
        }
        if self.rate_limit_max_requests == 0 {
            return Err("Rate limit must be greater than 0".to_string());
        }
        if self.rate_limit_max_clients == 0 {
            return Err("Rate limit client capacity must be greater than 0".to_string());
        }
        if self.cache_ttl_secs == 0 {
            return Err("Cache TTL must be greater than 0".to_string());
        }
        if self.cache_max_entries == 0 {
            return Err("Cache capacity must be greater than 0".to_string());
        }
        if self.provider_timeout_secs == 0 {
            return Err("Provider timeout must be greater than 0".to_string());
        }
        self.content_fetch_config().validate()
    }

    /// Whether a DashScope API key is present
    pub fn qwen_configured(&self) -> bool {
        self.dashscope_api_key.is_some()
    }

    /// Socket address string to bind
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn qwen_config(&self) -> QwenConfig {
        QwenConfig {
            api_key: self.dashscope_api_key.clone(),
            model: self.qwen_model.clone(),
            base_url: self.provider_base_url.clone(),
            timeout_secs: self.provider_timeout_secs,
        }
    }

    pub fn content_fetch_config(&self) -> ContentFetchConfig {
        ContentFetchConfig {
            timeout_secs: self.fetch_timeout_secs,
            max_chars: self.fetch_max_chars,
            allow_private_hosts: self.fetch_allow_private_hosts,
            ..ContentFetchConfig::default()
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "Web Summarizer".to_string(),
            version: crate::version::VERSION.to_string(),
            debug: false,
            dashscope_api_key: None,
            qwen_model: "qwen-7b-chat".to_string(),
            provider_base_url: "https://dashscope.aliyuncs.com".to_string(),
            provider_timeout_secs: 30,
            host: "0.0.0.0".to_string(),
            port: 8000,
            rate_limit_window_secs: 60,
            rate_limit_max_requests: 30,
            rate_limit_max_clients: 10_000,
            cache_ttl_secs: 3600,
            cache_max_entries: 1000,
            fetch_timeout_secs: 10,
            fetch_max_chars: 20_000,
            fetch_allow_private_hosts: false,
        }
    }
}

/// `true`, `1` and `t` (any case) enable a flag
fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "t")
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
