// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde_json::Value;
use web_summarizer::version::VERSION;

use crate::common::{spawn_app, EchoProvider, FailingProvider};

async fn get_health(base: &str) -> Value {
    let response = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    response.json().await.unwrap()
}

#[tokio::test]
async fn test_health_reports_configured_provider() {
    let server = spawn_app(EchoProvider::new()).await;
    let body = get_health(&format!("http://{}", server.local_addr())).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], VERSION);
    assert_eq!(body["qwen_configured"], true);

    server.shutdown().await;
}

#[tokio::test]
async fn test_health_without_provider_key() {
    let server = spawn_app(FailingProvider::new()).await;
    let body = get_health(&format!("http://{}", server.local_addr())).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["qwen_configured"], false);

    server.shutdown().await;
}

#[tokio::test]
async fn test_cors_headers_present() {
    let server = spawn_app(EchoProvider::new()).await;
    let response = reqwest::Client::new()
        .get(format!("http://{}/health", server.local_addr()))
        .header("Origin", "https://reader.example")
        .send()
        .await
        .unwrap();

    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));

    server.shutdown().await;
}
