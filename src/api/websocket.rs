// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Streaming summarization over a WebSocket
//!
//! Each text frame carries one summarize request and is answered with one
//! `{"summary": ...}` frame. The first failure closes the connection with
//! code 1011 and the error message as the close reason.

use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade},
        ConnectInfo, State,
    },
    response::IntoResponse,
};
use std::borrow::Cow;
use std::net::SocketAddr;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::server::AppState;
use crate::summarize::{SummarizeError, SummarizeRequest, SummarizeResponse};

/// Close reasons must fit in a control frame (125 bytes minus the code)
pub const MAX_CLOSE_REASON_BYTES: usize = 123;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> impl IntoResponse {
    let client_id = addr.ip().to_string();
    ws.on_upgrade(move |socket| handle_socket(socket, state, client_id))
}

async fn handle_socket(socket: WebSocket, state: AppState, client_id: String) {
    let connection_id = Uuid::new_v4();
    let span = info_span!("ws", %connection_id, client = %client_id);
    serve_connection(socket, state, client_id)
        .instrument(span)
        .await
}

async fn serve_connection(mut socket: WebSocket, state: AppState, client_id: String) {
    info!("WebSocket connection opened");

    while let Some(frame) = socket.recv().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                debug!("WebSocket receive error: {}", e);
                return;
            }
        };

        let text = match frame {
            Message::Text(text) => text,
            Message::Binary(_) => {
                let err = SummarizeError::Protocol("binary frames are not supported".to_string());
                close_with_error(socket, &err).await;
                return;
            }
            Message::Close(_) => {
                info!("WebSocket client disconnected");
                return;
            }
            Message::Ping(_) | Message::Pong(_) => continue,
        };

        let payload = match handle_message(&state, &client_id, &text).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!("WebSocket request failed: {}", e);
                close_with_error(socket, &e).await;
                return;
            }
        };

        if let Err(e) = socket.send(Message::Text(payload)).await {
            debug!("WebSocket send failed: {}", e);
            return;
        }
    }

    info!("WebSocket connection closed");
}

async fn handle_message(
    state: &AppState,
    client_id: &str,
    text: &str,
) -> Result<String, SummarizeError> {
    let request: SummarizeRequest = serde_json::from_str(text)
        .map_err(|e| SummarizeError::Protocol(format!("invalid request: {}", e)))?;

    let summary = state.service.process(client_id, &request).await?;

    serde_json::to_string(&SummarizeResponse::new(summary))
        .map_err(|e| SummarizeError::Protocol(format!("failed to encode response: {}", e)))
}

async fn close_with_error(mut socket: WebSocket, err: &SummarizeError) {
    let frame = CloseFrame {
        code: close_code::ERROR,
        reason: Cow::Owned(truncate_reason(&err.to_string())),
    };
    if let Err(e) = socket.send(Message::Close(Some(frame))).await {
        debug!("Failed to send close frame: {}", e);
    }
}

/// Cut `reason` to the close-frame limit on a char boundary
pub fn truncate_reason(reason: &str) -> String {
    if reason.len() <= MAX_CLOSE_REASON_BYTES {
        return reason.to_string();
    }
    let mut end = MAX_CLOSE_REASON_BYTES;
    while !reason.is_char_boundary(end) {
        end -= 1;
    }
    reason[..end].to_string()
}
