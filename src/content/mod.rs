// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Webpage content fetching
//!
//! ```text
//! URL → ContentFetcher → HTML → extract_readable_text → clean text
//! ```

pub mod config;
pub mod extractor;
pub mod fetcher;

pub use config::ContentFetchConfig;
pub use extractor::extract_readable_text;
pub use fetcher::{ContentFetcher, ContentSource, FetchError};
