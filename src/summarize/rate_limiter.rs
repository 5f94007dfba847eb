// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-client sliding-window rate limiting

use lru::LruCache;
use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

use super::clock::{Clock, SystemClock};

/// Sliding-window limiter keyed by client identity (usually the peer IP)
///
/// Each client keeps the instants of its admitted requests inside the trailing
/// window. At most `max_clients` identities are tracked: when a new identity
/// arrives at capacity, idle identities are dropped first and the least recently
/// seen identity goes next. The idle sweep runs at most once per window.
///
/// Evicting an active identity forgets its window, so under sustained capacity
/// pressure an evicted client may be admitted again before its window elapses.
pub struct ClientRateLimiter {
    state: Mutex<LimiterState>,
    window: Duration,
    max_requests: usize,
    clock: Arc<dyn Clock>,
}

struct LimiterState {
    windows: LruCache<String, VecDeque<Instant>>,
    last_sweep: Option<Instant>,
}

impl ClientRateLimiter {
    /// Create a limiter on the system clock
    ///
    /// # Arguments
    /// * `max_requests` - Requests admitted per client inside one window
    /// * `window` - Length of the trailing window
    /// * `max_clients` - Upper bound on tracked client identities
    pub fn new(max_requests: usize, window: Duration, max_clients: usize) -> Self {
        Self::with_clock(max_requests, window, max_clients, Arc::new(SystemClock::new()))
    }

    /// Create a limiter on a caller-supplied clock
    pub fn with_clock(
        max_requests: usize,
        window: Duration,
        max_clients: usize,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let capacity = NonZeroUsize::new(max_clients).unwrap_or(NonZeroUsize::MIN);
        Self {
            state: Mutex::new(LimiterState {
                windows: LruCache::new(capacity),
                last_sweep: None,
            }),
            window,
            max_requests,
            clock,
        }
    }

    /// Check and record a request for `client_id`
    ///
    /// Returns `true` when the request is admitted. A rejected attempt is not
    /// recorded, so it does not extend the client's lockout.
    pub fn check(&self, client_id: &str) -> bool {
        let now = self.clock.now();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let at_capacity = state.windows.len() >= state.windows.cap().get();
        if at_capacity && !state.windows.contains(client_id) {
            self.sweep_idle(&mut state, now);
        }

        let timestamps = state
            .windows
            .get_or_insert_mut(client_id.to_string(), VecDeque::new);
        while let Some(oldest) = timestamps.front() {
            if now.duration_since(*oldest) >= self.window {
                timestamps.pop_front();
            } else {
                break;
            }
        }

        if timestamps.len() >= self.max_requests {
            return false;
        }

        timestamps.push_back(now);
        true
    }

    /// Number of client identities currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .windows
            .len()
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    /// Drop identities with no admitted request inside the window
    ///
    /// Skipped when the previous sweep ran less than one window ago; nothing that
    /// survived it can have gone idle for long.
    fn sweep_idle(&self, state: &mut LimiterState, now: Instant) {
        if let Some(last) = state.last_sweep {
            if now.duration_since(last) < self.window {
                return;
            }
        }
        state.last_sweep = Some(now);

        let windows = &mut state.windows;
        let idle: Vec<String> = windows
            .iter()
            .filter(|(_, timestamps)| {
                timestamps
                    .back()
                    .map_or(true, |last| now.duration_since(*last) >= self.window)
            })
            .map(|(client, _)| client.clone())
            .collect();

        if !idle.is_empty() {
            debug!("Dropping {} idle rate-limit windows", idle.len());
        }
        for client in idle {
            windows.pop(&client);
        }
    }
}
