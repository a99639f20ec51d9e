//! Serde model for the per-guild configuration document.
//!
//! Field names serialize in camelCase so documents written by the dashboard
//! load unchanged. Every field carries a default so partially-written or
//! older documents still parse.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_COOLDOWN_SECONDS: u64 = 600;
pub const DEFAULT_AUTO_CLOSE_HOURS: u64 = 48;
pub const DEFAULT_PANEL_COLOR: u32 = 0x2f3136;
pub const DEFAULT_PRIORITIES: [&str; 3] = ["Normal", "High", "Critical"];

/// One selectable ticket category shown in the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketCategory {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Open,
    Claimed,
}

impl Default for TicketStatus {
    fn default() -> Self {
        Self::Open
    }
}

/// One open support ticket inside a guild. `channel_id` is the primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub channel_id: String,
    pub user_id: String,
    pub category_id: String,
    pub priority: String,
    pub ticket_number: String,
    /// Creation instant, unix milliseconds.
    pub created_at: u64,
    #[serde(default)]
    pub status: TicketStatus,
    #[serde(default)]
    pub claimed_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuildConfig {
    pub panel_channel_id: Option<String>,
    pub panel_message_id: Option<String>,
    pub log_channel_id: Option<String>,
    pub ticket_category_id: Option<String>,
    pub support_role_id: Option<String>,
    pub archive_category_id: Option<String>,
    pub categories: Vec<TicketCategory>,
    pub priorities: Vec<String>,
    /// Per-user creation cooldown, seconds.
    pub cooldown: u64,
    pub auto_close_hours: u64,
    pub auto_claim: bool,
    pub auto_delete_system_messages: bool,
    /// Monotonic ticket counter; never decremented, source of ticket numbers.
    pub ticket_count: u64,
    pub open_tickets: Vec<Ticket>,
    pub blacklist: Vec<String>,
    pub panel_title: String,
    pub panel_description: String,
    pub panel_color: u32,
    pub panel_button_text: String,
    pub settings_complete: bool,
}

impl Default for GuildConfig {
    fn default() -> Self {
        Self {
            panel_channel_id: None,
            panel_message_id: None,
            log_channel_id: None,
            ticket_category_id: None,
            support_role_id: None,
            archive_category_id: None,
            categories: Vec::new(),
            priorities: Vec::new(),
            cooldown: DEFAULT_COOLDOWN_SECONDS,
            auto_close_hours: DEFAULT_AUTO_CLOSE_HOURS,
            auto_claim: true,
            auto_delete_system_messages: false,
            ticket_count: 0,
            open_tickets: Vec::new(),
            blacklist: Vec::new(),
            panel_title: "Support Tickets".to_string(),
            panel_description: "Click the button below to open a ticket.".to_string(),
            panel_color: DEFAULT_PANEL_COLOR,
            panel_button_text: "Create Ticket".to_string(),
            settings_complete: false,
        }
    }
}

impl GuildConfig {
    /// True when the guild may serve ticket actions: setup finished and the
    /// panel channel, ticket category, support role, and at least one wizard
    /// category are all present.
    pub fn is_configured(&self) -> bool {
        self.settings_complete
            && self.panel_channel_id.is_some()
            && self.ticket_category_id.is_some()
            && self.support_role_id.is_some()
            && !self.categories.is_empty()
    }

    pub fn is_blacklisted(&self, user_id: &str) -> bool {
        self.blacklist.iter().any(|entry| entry == user_id)
    }

    pub fn open_ticket_count_for_user(&self, user_id: &str) -> usize {
        self.open_tickets
            .iter()
            .filter(|ticket| ticket.user_id == user_id)
            .count()
    }

    /// Wizard priorities, falling back to the built-in set when unset.
    pub fn effective_priorities(&self) -> Vec<String> {
        if self.priorities.is_empty() {
            DEFAULT_PRIORITIES.iter().map(|p| p.to_string()).collect()
        } else {
            self.priorities.clone()
        }
    }
}

/// Root document: one entry per guild the bot has touched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub guilds: BTreeMap<String, GuildConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_first_touch_values() {
        let cfg = GuildConfig::default();
        assert_eq!(cfg.cooldown, 600);
        assert_eq!(cfg.auto_close_hours, 48);
        assert!(cfg.auto_claim);
        assert_eq!(cfg.ticket_count, 0);
        assert_eq!(cfg.panel_title, "Support Tickets");
        assert_eq!(cfg.panel_color, 0x2f3136);
        assert!(!cfg.settings_complete);
        assert!(!cfg.is_configured());
    }

    #[test]
    fn is_configured_requires_every_reference_and_a_category() {
        let mut cfg = GuildConfig {
            settings_complete: true,
            panel_channel_id: Some("c-panel".to_string()),
            ticket_category_id: Some("c-cat".to_string()),
            support_role_id: Some("r-support".to_string()),
            ..GuildConfig::default()
        };
        assert!(!cfg.is_configured());

        cfg.categories.push(TicketCategory {
            id: "c1".to_string(),
            name: "Billing".to_string(),
        });
        assert!(cfg.is_configured());

        cfg.settings_complete = false;
        assert!(!cfg.is_configured());
    }

    #[test]
    fn effective_priorities_fall_back_to_builtin_set() {
        let mut cfg = GuildConfig::default();
        assert_eq!(cfg.effective_priorities(), vec!["Normal", "High", "Critical"]);
        cfg.priorities = vec!["Low".to_string()];
        assert_eq!(cfg.effective_priorities(), vec!["Low"]);
    }

    #[test]
    fn ticket_round_trips_through_camel_case_json() {
        let ticket = Ticket {
            channel_id: "ch1".to_string(),
            user_id: "u1".to_string(),
            category_id: "c1".to_string(),
            priority: "High".to_string(),
            ticket_number: "0001".to_string(),
            created_at: 1_700_000_000_000,
            status: TicketStatus::Open,
            claimed_by: None,
        };
        let raw = serde_json::to_string(&ticket).expect("encode");
        assert!(raw.contains("\"channelId\""));
        assert!(raw.contains("\"status\":\"open\""));
        let parsed: Ticket = serde_json::from_str(&raw).expect("decode");
        assert_eq!(parsed, ticket);
    }
}
