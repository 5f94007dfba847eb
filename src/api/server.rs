// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use super::errors::handle_panic;
use super::handlers::{health_handler, summarize_handler};
use super::websocket::websocket_handler;
use crate::config::Settings;
use crate::content::{ContentFetcher, ContentSource};
use crate::summarize::{QwenProvider, SummaryProvider, SummaryService};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SummaryService>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(service: SummaryService, settings: Settings) -> Self {
        Self {
            service: Arc::new(service),
            settings: Arc::new(settings),
        }
    }

    /// Wire the Qwen provider and HTTP content fetcher from settings
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let qwen = QwenProvider::new(settings.qwen_config())?;
        info!("Summaries generated by Qwen model {}", qwen.model());
        let fetcher = ContentFetcher::new(settings.content_fetch_config())?;
        info!(
            "Page fetch timeout {}s, up to {} chars",
            fetcher.config().timeout_secs,
            fetcher.config().max_chars
        );

        let provider: Arc<dyn SummaryProvider> = Arc::new(qwen);
        let content: Arc<dyn ContentSource> = Arc::new(fetcher);
        let service = SummaryService::from_settings(&settings, provider, content);
        Ok(Self::new(service, settings))
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/summarize", post(summarize_handler))
        .route("/api/ws", get(websocket_handler))
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// HTTP server running in a background task
pub struct ApiServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl ApiServer {
    /// Bind `listen_addr` and start serving in the background
    pub async fn start(listen_addr: &str, state: AppState) -> Result<Self> {
        let listener = tokio::net::TcpListener::bind(listen_addr).await?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let app = create_router(state);
        let handle = tokio::spawn(async move {
            let serve_future = axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });

            if let Err(e) = serve_future.await {
                error!("HTTP server error: {}", e);
            }
        });

        info!("API server listening on {}", addr);
        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            handle,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections and wait for in-flight requests
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = self.handle.await {
            error!("HTTP server task failed: {}", e);
        }
        info!("API server on {} stopped", self.addr);
    }
}
