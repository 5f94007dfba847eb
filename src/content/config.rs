// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for content fetching

/// Settings for fetching and extracting webpage text
#[derive(Debug, Clone)]
pub struct ContentFetchConfig {
    /// Timeout for one page fetch in seconds (default: 10)
    pub timeout_secs: u64,
    /// Maximum characters of extracted text handed to the summarizer (default: 20000)
    pub max_chars: usize,
    /// Maximum redirects followed (default: 5)
    pub max_redirects: usize,
    /// Allow loopback and private-network hosts (default: false)
    pub allow_private_hosts: bool,
}

impl ContentFetchConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("fetch timeout must be at least 1 second".to_string());
        }
        if self.max_chars < 100 {
            return Err("fetch max_chars must be at least 100".to_string());
        }
        Ok(())
    }
}

impl Default for ContentFetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_chars: 20_000,
            max_redirects: 5,
            allow_private_hosts: false,
        }
    }
}
