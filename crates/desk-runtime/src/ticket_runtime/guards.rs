//! Advisory gates evaluated before any state-mutating ticket action.
//!
//! All three services are process-wide and transient; expiry is checked on
//! lookup so stale entries need no eviction pass. Callers pass `now_ms`
//! explicitly, which keeps the tests on a synthetic clock.

use std::{
    collections::HashMap,
    sync::Mutex,
};

/// Second component interactions inside this window are rejected as spam.
pub const UI_DEBOUNCE_WINDOW_MS: u64 = 1_200;

fn key_for(guild_id: &str, user_id: &str) -> String {
    format!("{guild_id}-{user_id}")
}

/// Per-(guild,user) creation cooldown keyed on a wall-clock expiry instant.
#[derive(Default)]
pub struct CooldownGuard {
    expiries: Mutex<HashMap<String, u64>>,
}

impl CooldownGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_on_cooldown(&self, guild_id: &str, user_id: &str, now_ms: u64) -> bool {
        let Ok(expiries) = self.expiries.lock() else {
            return false;
        };
        matches!(expiries.get(&key_for(guild_id, user_id)), Some(expiry) if now_ms < *expiry)
    }

    pub fn apply(&self, guild_id: &str, user_id: &str, cooldown_seconds: u64, now_ms: u64) {
        if let Ok(mut expiries) = self.expiries.lock() {
            expiries.insert(
                key_for(guild_id, user_id),
                now_ms.saturating_add(cooldown_seconds.saturating_mul(1_000)),
            );
        }
    }
}

/// Suppresses double-submission of buttons and select menus. Independent of
/// the ticket cooldown and never persisted.
#[derive(Default)]
pub struct UiDebounceGuard {
    last_seen: Mutex<HashMap<String, u64>>,
}

impl UiDebounceGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the interaction should be rejected as spam, and
    /// records the instant otherwise.
    pub fn is_spam(&self, guild_id: &str, user_id: &str, now_ms: u64) -> bool {
        let Ok(mut last_seen) = self.last_seen.lock() else {
            return false;
        };
        let key = key_for(guild_id, user_id);
        if let Some(last) = last_seen.get(&key) {
            if now_ms.saturating_sub(*last) < UI_DEBOUNCE_WINDOW_MS {
                return true;
            }
        }
        last_seen.insert(key, now_ms);
        false
    }
}

/// Ephemeral category selection bridging the two wizard steps. A selection is
/// consumed exactly once; failure exits from the priority step must remove it
/// so a retry never reuses a stale category.
#[derive(Default)]
pub struct WizardCache {
    selections: Mutex<HashMap<String, String>>,
}

impl WizardCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, guild_id: &str, user_id: &str, category_id: String) {
        if let Ok(mut selections) = self.selections.lock() {
            selections.insert(key_for(guild_id, user_id), category_id);
        }
    }

    /// Removes and returns the pending selection.
    pub fn take(&self, guild_id: &str, user_id: &str) -> Option<String> {
        self.selections
            .lock()
            .ok()
            .and_then(|mut selections| selections.remove(&key_for(guild_id, user_id)))
    }

    pub fn remove(&self, guild_id: &str, user_id: &str) {
        if let Ok(mut selections) = self.selections.lock() {
            selections.remove(&key_for(guild_id, user_id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_blocks_until_expiry_instant() {
        let guard = CooldownGuard::new();
        assert!(!guard.is_on_cooldown("g1", "u1", 10_000));

        guard.apply("g1", "u1", 600, 10_000);
        assert!(guard.is_on_cooldown("g1", "u1", 10_000));
        assert!(guard.is_on_cooldown("g1", "u1", 609_999));
        assert!(!guard.is_on_cooldown("g1", "u1", 610_000));
    }

    #[test]
    fn cooldown_is_scoped_per_guild_and_user() {
        let guard = CooldownGuard::new();
        guard.apply("g1", "u1", 600, 0);
        assert!(!guard.is_on_cooldown("g1", "u2", 1));
        assert!(!guard.is_on_cooldown("g2", "u1", 1));
    }

    #[test]
    fn debounce_rejects_inside_window_and_admits_after() {
        let guard = UiDebounceGuard::new();
        assert!(!guard.is_spam("g1", "u1", 1_000));
        assert!(guard.is_spam("g1", "u1", 1_001));
        assert!(guard.is_spam("g1", "u1", 2_199));
        assert!(!guard.is_spam("g1", "u1", 2_200));
    }

    #[test]
    fn debounce_rejection_does_not_extend_the_window() {
        let guard = UiDebounceGuard::new();
        assert!(!guard.is_spam("g1", "u1", 1_000));
        assert!(guard.is_spam("g1", "u1", 2_000));
        // Window is measured from the admitted interaction at t=1000.
        assert!(!guard.is_spam("g1", "u1", 2_300));
    }

    #[test]
    fn wizard_selection_is_consumed_exactly_once() {
        let cache = WizardCache::new();
        cache.set("g1", "u1", "c1".to_string());
        assert_eq!(cache.take("g1", "u1").as_deref(), Some("c1"));
        assert!(cache.take("g1", "u1").is_none());
    }

    #[test]
    fn wizard_set_overwrites_previous_selection() {
        let cache = WizardCache::new();
        cache.set("g1", "u1", "c1".to_string());
        cache.set("g1", "u1", "c2".to_string());
        assert_eq!(cache.take("g1", "u1").as_deref(), Some("c2"));
    }
}
