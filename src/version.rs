// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Web Summarizer service

/// Semantic version number
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name
pub const PACKAGE: &str = env!("CARGO_PKG_NAME");

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "url-summaries",
    "text-summaries",
    "websocket",
    "rate-limiting",
    "summary-cache",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("{} {}", PACKAGE, VERSION)
}
