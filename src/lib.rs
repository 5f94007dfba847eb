// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod content;
pub mod summarize;
pub mod version;

// Re-export main types
pub use api::{create_router, ApiServer, AppState};
pub use config::Settings;
pub use content::{ContentFetcher, ContentSource, FetchError};
pub use summarize::{
    SummarizeError, SummarizeRequest, SummarizeResponse, SummaryProvider, SummaryService,
};
