use std::sync::Arc;
use std::time::Duration;

use beacon_core::clock::{Clock, MonotonicClock};
use beacon_core::throttle::WindowedCounter;

const MINUTE: Duration = Duration::from_secs(60);

/// Error-event throttling over 1m/10m/60m fixed windows
/// (at most 10, 20 and 40 events per key respectively).
pub struct EventAdmission {
    per_1m: WindowedCounter,
    per_10m: WindowedCounter,
    per_60m: WindowedCounter,
}

impl EventAdmission {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(MonotonicClock::new()))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            per_1m: WindowedCounter::with_clock(MINUTE, 10, clock.clone()),
            per_10m: WindowedCounter::with_clock(MINUTE * 10, 20, clock.clone()),
            per_60m: WindowedCounter::with_clock(MINUTE * 60, 40, clock),
        }
    }

    /// True when the event keyed by `key` should be dropped.
    ///
    /// Every window observes the key even when a shorter one already
    /// throttles, so the longer windows keep counting.
    pub fn should_drop(&self, key: &str) -> bool {
        let throttle_1m = self.per_1m.observe(key);
        let throttle_10m = self.per_10m.observe(key);
        let throttle_60m = self.per_60m.observe(key);

        throttle_1m || throttle_10m || throttle_60m
    }
}

impl Default for EventAdmission {
    fn default() -> Self {
        Self::new()
    }
}
