// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::{ConnectInfo, Json, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tracing::{info, warn};

use super::errors::ApiError;
use super::server::AppState;
use crate::summarize::{SummarizeRequest, SummarizeResponse};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub qwen_configured: bool,
}

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.settings.version.clone(),
        qwen_configured: state.service.is_provider_configured(),
    })
}

/// One-shot summarization keyed on the peer IP
pub async fn summarize_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(request): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let client_id = addr.ip().to_string();
    info!(
        "Summarize request from {}: {:?}, max_length {}",
        client_id, request.kind, request.max_length
    );

    match state.service.process(&client_id, &request).await {
        Ok(summary) => Ok(Json(SummarizeResponse::new(summary))),
        Err(e) => {
            let err = ApiError::from(e);
            warn!("Summarize request from {} failed ({}): {}", client_id, err.error_type(), err);
            Err(err)
        }
    }
}
