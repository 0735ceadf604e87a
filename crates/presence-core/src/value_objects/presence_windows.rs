//! Presence windows - the two staleness thresholds of the viewer registry
//!
//! * **Active window** (`T_active`): a record whose last heartbeat is younger
//!   than this counts as "currently viewing".
//! * **Reap window** (`T_reap`): a record older than this is deleted by the
//!   cleanup sweep.
//!
//! `T_reap` must be strictly greater than `T_active`; the gap is the grace
//! period that keeps a jittery client from flapping between created and
//! deleted. Neither window may exceed [`PresenceWindows::MAX_WINDOW_MS`].

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceWindows {
    active: TimeDelta,
    reap: TimeDelta,
}

impl PresenceWindows {
    /// Default active window (30 seconds)
    pub const DEFAULT_ACTIVE_MS: i64 = 30_000;
    /// Default reap window (60 seconds)
    pub const DEFAULT_REAP_MS: i64 = 60_000;
    /// Upper bound for either window (7 days)
    pub const MAX_WINDOW_MS: i64 = 7 * 24 * 60 * 60 * 1000;

    pub fn new(active: TimeDelta, reap: TimeDelta) -> Result<Self, DomainError> {
        if active <= TimeDelta::zero() {
            return Err(DomainError::InvalidWindows(
                "active window must be positive".to_string(),
            ));
        }
        if reap <= active {
            return Err(DomainError::InvalidWindows(format!(
                "reap window ({}ms) must exceed active window ({}ms)",
                reap.num_milliseconds(),
                active.num_milliseconds()
            )));
        }
        if reap > TimeDelta::milliseconds(Self::MAX_WINDOW_MS) {
            return Err(DomainError::InvalidWindows(format!(
                "reap window ({}ms) must not exceed {}ms",
                reap.num_milliseconds(),
                Self::MAX_WINDOW_MS
            )));
        }
        Ok(Self { active, reap })
    }

    pub fn from_millis(active_ms: i64, reap_ms: i64) -> Result<Self, DomainError> {
        let to_delta = |name: &str, value: i64| {
            TimeDelta::try_milliseconds(value).ok_or_else(|| {
                DomainError::InvalidWindows(format!("{name} window ({value}ms) is out of range"))
            })
        };
        Self::new(to_delta("active", active_ms)?, to_delta("reap", reap_ms)?)
    }

    pub fn active(&self) -> TimeDelta {
        self.active
    }

    pub fn reap(&self) -> TimeDelta {
        self.reap
    }

    /// Records with `last_active_at` strictly after this instant are active
    pub fn active_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.active)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Records with `last_active_at` strictly before this instant are reapable
    pub fn reap_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.reap)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    #[inline]
    pub fn is_active(&self, last_active_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        last_active_at > self.active_cutoff(now)
    }

    #[inline]
    pub fn is_reapable(&self, last_active_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        last_active_at < self.reap_cutoff(now)
    }

    /// Longest sweep interval that still keeps stale rows bounded (`T_reap - T_active`)
    pub fn max_sweep_interval(&self) -> TimeDelta {
        self.reap - self.active
    }
}

impl Default for PresenceWindows {
    fn default() -> Self {
        Self {
            active: TimeDelta::milliseconds(Self::DEFAULT_ACTIVE_MS),
            reap: TimeDelta::milliseconds(Self::DEFAULT_REAP_MS),
        }
    }
}
