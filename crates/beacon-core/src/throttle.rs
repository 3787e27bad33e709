//! Per-key admission tables: fixed-window throttling and minimum-interval
//! rate limiting.
//!
//! Both tables are keyed by arbitrary strings (transaction names, error
//! messages) and evaluate expiry lazily on the next observation of a key.
//! Entries are never evicted, so memory grows with the number of distinct
//! keys ever observed; callers must keep the key space bounded.

use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::clock::{Clock, MonotonicClock};

#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    window_start_ms: u64,
    occurrences: u64,
}

/// Fixed-window occurrence counter.
///
/// `observe` answers "should this occurrence be throttled?": the first
/// `max_occurrences` observations of a key inside one window pass, anything
/// after that is throttled until the window expires and a fresh one starts.
pub struct WindowedCounter {
    window_ms: u64,
    max_occurrences: u64,
    entries: DashMap<String, WindowEntry>,
    clock: Arc<dyn Clock>,
}

impl WindowedCounter {
    pub fn new(window: Duration, max_occurrences: u64) -> Self {
        Self::with_clock(window, max_occurrences, Arc::new(MonotonicClock::new()))
    }

    pub fn with_clock(window: Duration, max_occurrences: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            window_ms: window.as_millis() as u64,
            max_occurrences,
            entries: DashMap::new(),
            clock,
        }
    }

    /// Record one occurrence of `key`; returns true when it should be throttled.
    pub fn observe(&self, key: &str) -> bool {
        let now = self.clock.now_millis();
        match self.entries.entry(key.to_owned()) {
            Entry::Occupied(mut o) => {
                let e = o.get_mut();
                if now.saturating_sub(e.window_start_ms) < self.window_ms {
                    e.occurrences = e.occurrences.saturating_add(1);
                    return e.occurrences > self.max_occurrences;
                }
                *e = WindowEntry { window_start_ms: now, occurrences: 1 };
                false
            }
            Entry::Vacant(v) => {
                v.insert(WindowEntry { window_start_ms: now, occurrences: 1 });
                false
            }
        }
    }

    /// Number of keys with a window entry.
    pub fn tracked_keys(&self) -> usize {
        self.entries.len()
    }
}

/// Minimum-interval gate.
///
/// `observe` answers "should this be limited?". A limited call does not move
/// the key's timestamp, so the interval is measured from the last admitted
/// observation.
pub struct RateLimiter {
    min_interval_ms: u64,
    last_seen: DashMap<String, u64>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self::with_clock(min_interval, Arc::new(MonotonicClock::new()))
    }

    pub fn with_clock(min_interval: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            min_interval_ms: min_interval.as_millis() as u64,
            last_seen: DashMap::new(),
            clock,
        }
    }

    pub fn observe(&self, key: &str) -> bool {
        let now = self.clock.now_millis();
        match self.last_seen.entry(key.to_owned()) {
            Entry::Occupied(mut o) => {
                if now.saturating_sub(*o.get()) < self.min_interval_ms {
                    return true;
                }
                *o.get_mut() = now;
                false
            }
            Entry::Vacant(v) => {
                v.insert(now);
                false
            }
        }
    }

    pub fn tracked_keys(&self) -> usize {
        self.last_seen.len()
    }
}
