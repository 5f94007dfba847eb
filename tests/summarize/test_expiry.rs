// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::sync::Arc;
use std::time::Duration;
use web_summarizer::content::ContentFetcher;
use web_summarizer::summarize::{
    ClientRateLimiter, MockClock, SummarizeError, SummaryCache, SummaryService,
};

use crate::common::{test_settings, EchoProvider};

const WINDOW: Duration = Duration::from_secs(60);
const TTL: Duration = Duration::from_secs(3600);

fn clocked_service(provider: Arc<EchoProvider>, max_requests: usize) -> (SummaryService, MockClock) {
    let clock = MockClock::default();
    let fetcher = ContentFetcher::new(test_settings().content_fetch_config()).unwrap();
    let service = SummaryService::new(
        ClientRateLimiter::with_clock(max_requests, WINDOW, 100, Arc::new(clock.clone())),
        SummaryCache::with_clock(TTL, 100, Arc::new(clock.clone())),
        provider,
        Arc::new(fetcher),
    );
    (service, clock)
}

#[tokio::test]
async fn test_window_elapse_readmits_client() {
    let provider = EchoProvider::new();
    let (service, clock) = clocked_service(provider.clone(), 3);

    for i in 0..3 {
        service.summarize("c", &format!("t{}", i), 100).await.unwrap();
    }
    let err = service.summarize("c", "t3", 100).await.unwrap_err();
    assert!(matches!(err, SummarizeError::RateLimitExceeded { .. }));

    clock.advance(WINDOW - Duration::from_millis(1));
    assert!(service.summarize("c", "t3", 100).await.is_err());

    clock.advance(Duration::from_millis(1));
    service.summarize("c", "t3", 100).await.unwrap();
}

#[tokio::test]
async fn test_entry_served_until_ttl_then_regenerated() {
    let provider = EchoProvider::new();
    let (service, clock) = clocked_service(provider.clone(), 1000);

    service.summarize("c", "text", 100).await.unwrap();

    clock.advance(TTL - Duration::from_millis(1));
    service.summarize("c", "text", 100).await.unwrap();
    assert_eq!(provider.calls(), 1);

    clock.advance(Duration::from_millis(2));
    assert_eq!(service.cache_stats().expired, 1);
    service.summarize("c", "text", 100).await.unwrap();
    assert_eq!(provider.calls(), 2);
    assert_eq!(service.cache_stats().expired, 0);
}
