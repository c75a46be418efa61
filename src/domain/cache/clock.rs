//! Time source for cache bookkeeping

use std::fmt::Debug;

use chrono::{DateTime, Utc};

/// Supplies the current time to the cache store
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
