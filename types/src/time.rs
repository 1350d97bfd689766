//! Timestamp type used throughout the client.
//!
//! Timestamps are Unix epoch milliseconds (UTC). Relative display
//! ("2m ago") is a pure function of the stored timestamp and a caller
//! supplied notion of "now", so it can be recomputed periodically without
//! touching the stored value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A Unix timestamp in milliseconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(millis: u64) -> Self {
        Self(millis)
    }

    /// Get the current system time as a `Timestamp`.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before Unix epoch")
            .as_millis() as u64;
        Self(millis)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Milliseconds elapsed since this timestamp (relative to `now`).
    pub fn elapsed_since(&self, now: Timestamp) -> u64 {
        now.0.saturating_sub(self.0)
    }

    /// Whether this timestamp + duration has passed relative to `now`.
    pub fn has_expired(&self, duration_millis: u64, now: Timestamp) -> bool {
        now.0 >= self.0.saturating_add(duration_millis)
    }

    /// Subtract a duration, flooring at the epoch.
    pub fn saturating_sub_millis(&self, millis: u64) -> Self {
        Self(self.0.saturating_sub(millis))
    }

    /// Add a duration in milliseconds.
    pub fn saturating_add_millis(&self, millis: u64) -> Self {
        Self(self.0.saturating_add(millis))
    }

    /// Human-relative display of this timestamp: "just now", "Nm ago",
    /// "Nh ago", or "Nd ago".
    pub fn time_ago(&self, now: Timestamp) -> String {
        let minutes = self.elapsed_since(now) / 60_000;
        if minutes < 1 {
            return "just now".to_string();
        }
        if minutes < 60 {
            return format!("{minutes}m ago");
        }
        let hours = minutes / 60;
        if hours < 24 {
            return format!("{hours}h ago");
        }
        format!("{}d ago", hours / 24)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_ago_just_now() {
        let now = Timestamp::new(100_000);
        assert_eq!(Timestamp::new(70_000).time_ago(now), "just now");
    }

    #[test]
    fn time_ago_minutes() {
        let now = Timestamp::new(10 * 60_000);
        assert_eq!(Timestamp::new(8 * 60_000).time_ago(now), "2m ago");
    }

    #[test]
    fn time_ago_hours() {
        let now = Timestamp::new(5 * 3_600_000);
        assert_eq!(Timestamp::new(2 * 3_600_000).time_ago(now), "3h ago");
    }

    #[test]
    fn time_ago_days() {
        let now = Timestamp::new(50 * 3_600_000);
        assert_eq!(Timestamp::EPOCH.time_ago(now), "2d ago");
    }

    #[test]
    fn time_ago_future_timestamp_clamps() {
        let now = Timestamp::new(1_000);
        assert_eq!(Timestamp::new(60_000).time_ago(now), "just now");
    }

    #[test]
    fn expiry() {
        let t = Timestamp::new(1_000);
        assert!(!t.has_expired(5_000, Timestamp::new(5_999)));
        assert!(t.has_expired(5_000, Timestamp::new(6_000)));
    }
}
