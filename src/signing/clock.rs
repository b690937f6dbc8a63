//! Unix-time source for request signing.

use chrono::{DateTime, Utc};

use crate::translation::error::{TranslationError, TranslationResult};

/// Source of the signing timestamp.
pub trait Clock: Send + Sync {
    /// Current time in unix seconds.
    fn now_unix(&self) -> i64;
}

/// Wall clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// A clock frozen at one instant, for reproducible signatures.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_unix(&self) -> i64 {
        self.0
    }
}

/// UTC calendar date (`YYYY-MM-DD`) of a signing timestamp.
pub fn utc_date(timestamp: i64) -> TranslationResult<String> {
    if timestamp <= 0 {
        return Err(TranslationError::ClockError(format!(
            "timestamp must be positive, got {timestamp}"
        )));
    }

    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|datetime| datetime.format("%Y-%m-%d").to_string())
        .ok_or_else(|| TranslationError::ClockError(format!("timestamp out of range: {timestamp}")))
}
