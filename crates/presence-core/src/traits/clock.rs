//! Time source
//!
//! Every presence timestamp is read from one clock so the active and reap
//! comparisons agree with the values that were written.

use chrono::{DateTime, Utc};

/// Source of "now" for presence bookkeeping
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
