use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the unix epoch, the unit every ticket timestamp,
/// cooldown expiry, and sweep comparison in this codebase uses.
///
/// A system clock set before 1970 reads as 0 rather than failing.
pub fn current_unix_timestamp_ms() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        Err(_) => 0,
    }
}
