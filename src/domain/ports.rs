use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Time source for submission stamps and notification timestamps.
/// Injected so tests can pin the clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed time source for deterministic tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Fresh-id source, keyed by entity prefix ("req", "wo", "res", ...).
pub trait IdGen: Send + Sync {
    fn next(&mut self, prefix: &str) -> String;

    /// Marks an externally assigned id (seed data) as taken. Generators that
    /// cannot collide may ignore this.
    fn reserve(&mut self, _prefix: &str, _id: &str) {}
}

/// Counter-per-prefix generator producing ids like `req1`, `notif3`.
#[derive(Debug, Default)]
pub struct SequentialIds {
    counters: HashMap<String, u64>,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGen for SequentialIds {
    fn next(&mut self, prefix: &str) -> String {
        let counter = self.counters.entry(prefix.to_string()).or_insert(0);
        *counter += 1;
        format!("{}{}", prefix, counter)
    }

    /// Advance the counter for `prefix` past an externally assigned id so
    /// seeded data and generated ids never collide.
    fn reserve(&mut self, prefix: &str, id: &str) {
        if let Some(suffix) = id.strip_prefix(prefix) {
            if let Ok(n) = suffix.parse::<u64>() {
                let counter = self.counters.entry(prefix.to_string()).or_insert(0);
                if n > *counter {
                    *counter = n;
                }
            }
        }
    }
}
