use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use beacon_core::clock::Clock;
use beacon_core::throttle::{RateLimiter, WindowedCounter};

/// What the trace pipeline knows about a transaction when it asks for a rate.
#[derive(Debug, Clone, Default)]
pub struct SamplingContext {
    pub name: String,
    pub attributes: HashMap<String, String>,
}

impl SamplingContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), attributes: HashMap::new() }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Share of the base rate a chatty operation keeps before scaling.
const CHATTY_BASE_SHARE: f64 = 0.1;

/// Per-transaction sampling weights.
///
/// Runaway guard first (10/s and 100/min per name), then chatty operations
/// are limited to one sample per interval and down-weighted; everything
/// else keeps the full weight.
pub struct TraceSampling {
    per_1s: WindowedCounter,
    per_1m: WindowedCounter,
    chatty_limiter: RateLimiter,
    chatty_ops: HashSet<String>,
    op_attribute: String,
}

impl TraceSampling {
    pub fn new(
        chatty_min_interval: Duration,
        chatty_ops: impl IntoIterator<Item = String>,
        op_attribute: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            per_1s: WindowedCounter::with_clock(Duration::from_secs(1), 10, clock.clone()),
            per_1m: WindowedCounter::with_clock(Duration::from_secs(60), 100, clock.clone()),
            chatty_limiter: RateLimiter::with_clock(chatty_min_interval, clock),
            chatty_ops: chatty_ops.into_iter().collect(),
            op_attribute: op_attribute.into(),
        }
    }

    fn is_chatty(&self, ctx: &SamplingContext) -> bool {
        ctx.attributes
            .get(&self.op_attribute)
            .is_some_and(|op| self.chatty_ops.contains(op))
    }

    /// Weight in `[0, 1]` (before the caller's base rate) for `ctx`.
    pub fn sample_rate(&self, ctx: &SamplingContext, chatty_scaler: f64) -> f64 {
        // the minute window is skipped once the second window throttles
        if self.per_1s.observe(&ctx.name) || self.per_1m.observe(&ctx.name) {
            return 0.0;
        }

        if self.is_chatty(ctx) {
            if self.chatty_limiter.observe(&ctx.name) {
                return 0.0;
            }
            return CHATTY_BASE_SHARE * chatty_scaler;
        }

        1.0
    }
}
