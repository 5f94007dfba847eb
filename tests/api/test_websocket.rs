// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{protocol::frame::coding::CloseCode, Message},
    MaybeTlsStream, WebSocketStream,
};

use crate::common::{spawn_app, spawn_site, EchoProvider, FailingProvider};

type Socket = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

async fn connect(addr: std::net::SocketAddr) -> Socket {
    let (socket, _) = connect_async(format!("ws://{}/api/ws", addr)).await.unwrap();
    socket
}

/// Next non-control frame from the server
async fn next_frame(socket: &mut Socket) -> Message {
    loop {
        match socket.next().await {
            Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => continue,
            Some(Ok(message)) => return message,
            other => panic!("unexpected stream state: {:?}", other),
        }
    }
}

fn expect_error_close(message: Message) -> String {
    match message {
        Message::Close(Some(frame)) => {
            assert_eq!(frame.code, CloseCode::Error);
            assert!(frame.reason.len() <= 123);
            frame.reason.to_string()
        }
        other => panic!("expected close frame, got {:?}", other),
    }
}

#[tokio::test]
async fn test_each_message_gets_a_summary() {
    let provider = EchoProvider::new();
    let server = spawn_app(provider.clone()).await;
    let mut socket = connect(server.local_addr()).await;

    for content in ["first document", "second document", "first document"] {
        let request = json!({"type": "text", "content": content, "max_length": 80});
        socket
            .send(Message::Text(request.to_string()))
            .await
            .unwrap();

        let reply = match next_frame(&mut socket).await {
            Message::Text(text) => serde_json::from_str::<Value>(&text).unwrap(),
            other => panic!("expected text frame, got {:?}", other),
        };
        assert_eq!(reply["summary"], format!("SUMMARY:{}", content));
    }
    assert_eq!(provider.calls(), 2);

    socket.close(None).await.unwrap();
    server.shutdown().await;
}

#[tokio::test]
async fn test_provider_error_closes_with_1011() {
    let server = spawn_app(FailingProvider::new()).await;
    let mut socket = connect(server.local_addr()).await;

    let request = json!({"type": "text", "content": "anything"});
    socket
        .send(Message::Text(request.to_string()))
        .await
        .unwrap();

    let reason = expect_error_close(next_frame(&mut socket).await);
    assert!(reason.contains("model overloaded"));

    drop(socket);
    server.shutdown().await;
}

#[tokio::test]
async fn test_malformed_message_closes_connection() {
    let provider = EchoProvider::new();
    let server = spawn_app(provider.clone()).await;
    let mut socket = connect(server.local_addr()).await;

    socket
        .send(Message::Text("not json".to_string()))
        .await
        .unwrap();

    let reason = expect_error_close(next_frame(&mut socket).await);
    assert!(reason.starts_with("Invalid message"));
    assert_eq!(provider.calls(), 0);

    drop(socket);
    server.shutdown().await;
}

#[tokio::test]
async fn test_binary_frames_rejected() {
    let server = spawn_app(EchoProvider::new()).await;
    let mut socket = connect(server.local_addr()).await;

    socket.send(Message::Binary(vec![1, 2, 3])).await.unwrap();

    let reason = expect_error_close(next_frame(&mut socket).await);
    assert!(reason.contains("binary frames are not supported"));

    drop(socket);
    server.shutdown().await;
}

#[tokio::test]
async fn test_long_error_reason_is_truncated() {
    let server = spawn_app(EchoProvider::new()).await;
    let site = spawn_site().await;
    let mut socket = connect(server.local_addr()).await;

    // 404 errors echo the URL, which pushes the reason past the limit
    let url = format!("{}/{}", site, "a".repeat(300));
    let request = json!({"type": "url", "content": url});
    socket
        .send(Message::Text(request.to_string()))
        .await
        .unwrap();

    let reason = expect_error_close(next_frame(&mut socket).await);
    assert_eq!(reason.len(), 123);

    drop(socket);
    server.shutdown().await;
}

#[tokio::test]
async fn test_rate_limit_shared_with_http() {
    let server = spawn_app(EchoProvider::new()).await;
    let addr = server.local_addr();

    for _ in 0..30 {
        let response = reqwest::Client::new()
            .post(format!("http://{}/api/summarize", addr))
            .json(&json!({"type": "text", "content": "hello"}))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    let mut socket = connect(addr).await;
    socket
        .send(Message::Text(json!({"type": "text", "content": "hello"}).to_string()))
        .await
        .unwrap();

    let reason = expect_error_close(next_frame(&mut socket).await);
    assert!(reason.starts_with("Rate limit exceeded"));

    drop(socket);
    server.shutdown().await;
}
