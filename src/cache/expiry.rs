//! TTL evaluation.
//!
//! Expiry is only ever discovered lazily, on read or during a scan. There
//! is no background sweeper.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::cache::entry::CacheEntry;

/// TTL value meaning "never expires". Any negative TTL behaves the same.
pub const NEVER_EXPIRES: i64 = -1;

/// Whether `entry` is past its lifetime at `now` (epoch ms).
///
/// Negative TTLs never expire; otherwise an entry is expired once
/// `now >= stored + ttl`.
pub fn is_expired(entry: &CacheEntry, now: i64) -> bool {
    if entry.ttl < 0 {
        return false;
    }
    now >= entry.stored.saturating_add(entry.ttl)
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
