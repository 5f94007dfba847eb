// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::common::{spawn_app, spawn_site, EchoProvider, FailingProvider};

async fn post_summarize(base: &str, body: Value) -> (StatusCode, reqwest::header::HeaderMap, Value) {
    let response = reqwest::Client::new()
        .post(format!("{}/api/summarize", base))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.json::<Value>().await.unwrap();
    (status, headers, body)
}

#[tokio::test]
async fn test_text_summary_then_cache_hit() {
    let provider = EchoProvider::new();
    let server = spawn_app(provider.clone()).await;
    let base = format!("http://{}", server.local_addr());

    let body = json!({"type": "text", "content": "Tokio is an asynchronous runtime for Rust.", "max_length": 120});
    let (status, _, first) = post_summarize(&base, body.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["summary"], "SUMMARY:Tokio is an asynchronous runtime for Rust.");
    assert!(first.get("metadata").is_none());

    let (status, _, second) = post_summarize(&base, body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, second);
    assert_eq!(provider.calls(), 1);

    server.shutdown().await;
}

#[tokio::test]
async fn test_max_length_defaults_to_300() {
    let provider = EchoProvider::new();
    let server = spawn_app(provider.clone()).await;
    let base = format!("http://{}", server.local_addr());

    let (status, _, _) = post_summarize(&base, json!({"type": "text", "content": "abc"})).await;
    assert_eq!(status, StatusCode::OK);
    // Same fingerprint as an explicit 300
    let (status, _, _) =
        post_summarize(&base, json!({"type": "text", "content": "abc", "max_length": 300})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(provider.calls(), 1);

    server.shutdown().await;
}

#[tokio::test]
async fn test_url_summary() {
    let provider = EchoProvider::new();
    let server = spawn_app(provider.clone()).await;
    let base = format!("http://{}", server.local_addr());
    let site = spawn_site().await;

    let (status, _, body) =
        post_summarize(&base, json!({"type": "url", "content": format!("{}/article", site)})).await;
    assert_eq!(status, StatusCode::OK);
    let summary = body["summary"].as_str().unwrap();
    assert!(summary.starts_with("SUMMARY:"));
    assert!(summary.contains("Rust"));

    server.shutdown().await;
}

#[tokio::test]
async fn test_rate_limit_surfaces_as_500() {
    let provider = EchoProvider::new();
    let server = spawn_app(provider.clone()).await;
    let base = format!("http://{}", server.local_addr());

    for _ in 0..30 {
        let (status, _, _) = post_summarize(&base, json!({"type": "text", "content": "hello"})).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, headers, body) =
        post_summarize(&base, json!({"type": "text", "content": "hello"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Failed to generate summary: Rate limit exceeded. Please try again in 60 seconds."
    );
    assert_eq!(headers["retry-after"], "60");

    server.shutdown().await;
}

#[tokio::test]
async fn test_provider_failure_envelope() {
    let provider = FailingProvider::new();
    let server = spawn_app(provider.clone()).await;
    let base = format!("http://{}", server.local_addr());

    let (status, _, body) = post_summarize(&base, json!({"type": "text", "content": "hello"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Failed to generate summary: "));
    assert!(error.contains("model overloaded"));
    assert_eq!(provider.calls(), 1);

    server.shutdown().await;
}

#[tokio::test]
async fn test_invalid_requests_never_reach_provider() {
    let provider = EchoProvider::new();
    let server = spawn_app(provider.clone()).await;
    let base = format!("http://{}", server.local_addr());

    let cases = [
        json!({"type": "text", "content": "   "}),
        json!({"type": "text", "content": "abc", "max_length": 0}),
        json!({"type": "url", "content": "ftp://example.com/file"}),
    ];
    for case in cases {
        let (status, _, body) = post_summarize(&base, case).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("Invalid request"));
    }
    assert_eq!(provider.calls(), 0);

    server.shutdown().await;
}

#[tokio::test]
async fn test_malformed_body_is_client_error() {
    let server = spawn_app(EchoProvider::new()).await;
    let base = format!("http://{}", server.local_addr());

    let response = reqwest::Client::new()
        .post(format!("{}/api/summarize", base))
        .json(&json!({"type": "pdf", "content": "x"}))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_client_error());

    server.shutdown().await;
}
