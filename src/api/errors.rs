// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use tracing::error;

use crate::summarize::SummarizeError;

/// Uniform error body returned by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    Summarize(SummarizeError),
    InternalError(String),
}

impl ApiError {
    /// Short machine-readable kind, used for logging
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Summarize(SummarizeError::Fetch(_)) => "fetch_error",
            ApiError::Summarize(SummarizeError::RateLimitExceeded { .. }) => "rate_limit_exceeded",
            ApiError::Summarize(SummarizeError::SummarizationFailed(_)) => "summarization_failed",
            ApiError::Summarize(SummarizeError::InvalidRequest(_)) => "invalid_request",
            ApiError::Summarize(SummarizeError::Protocol(_)) => "protocol_error",
            ApiError::InternalError(_) => "internal_error",
        }
    }

    /// Every pipeline failure maps to 500; the message tells callers what happened
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    /// Seconds a rate-limited client should wait before retrying
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            ApiError::Summarize(SummarizeError::RateLimitExceeded { retry_after_secs }) => {
                Some(*retry_after_secs)
            }
            _ => None,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let error = match self {
            ApiError::Summarize(e) => format!("Failed to generate summary: {}", e),
            ApiError::InternalError(msg) => msg.clone(),
        };
        ErrorResponse { error }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Summarize(e) => write!(f, "{}", e),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<SummarizeError> for ApiError {
    fn from(err: SummarizeError) -> Self {
        ApiError::Summarize(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status_code(), Json(self.to_response())).into_response();
        if let Some(secs) = self.retry_after() {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

/// Turn a handler panic into the opaque internal error envelope
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("Unhandled panic in request handler: {}", detail);

    ApiError::InternalError("Internal server error".to_string()).into_response()
}
