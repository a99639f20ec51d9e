//! CRUD over a guild's open-ticket list, funneled through the store lock.

use std::sync::Arc;

use anyhow::Result;

use crate::model::Ticket;
use crate::store::ConfigStore;

#[derive(Clone)]
pub struct TicketRegistry {
    store: Arc<ConfigStore>,
}

impl TicketRegistry {
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self { store }
    }

    pub fn add(&self, guild_id: &str, ticket: Ticket) -> Result<()> {
        self.store
            .update_guild(guild_id, |cfg| cfg.open_tickets.push(ticket))
    }

    pub fn find_by_channel(&self, guild_id: &str, channel_id: &str) -> Result<Option<Ticket>> {
        Ok(self
            .store
            .guild(guild_id)?
            .open_tickets
            .into_iter()
            .find(|ticket| ticket.channel_id == channel_id))
    }

    pub fn open_count_for_user(&self, guild_id: &str, user_id: &str) -> Result<usize> {
        Ok(self
            .store
            .guild(guild_id)?
            .open_ticket_count_for_user(user_id))
    }

    pub fn open_tickets(&self, guild_id: &str) -> Result<Vec<Ticket>> {
        Ok(self.store.guild(guild_id)?.open_tickets)
    }

    /// Replaces the entry with the same channel id. A ticket that is no
    /// longer registered is left alone.
    pub fn update(&self, guild_id: &str, ticket: Ticket) -> Result<()> {
        self.store.update_guild(guild_id, |cfg| {
            for entry in cfg.open_tickets.iter_mut() {
                if entry.channel_id == ticket.channel_id {
                    *entry = ticket;
                    break;
                }
            }
        })
    }

    pub fn remove(&self, guild_id: &str, channel_id: &str) -> Result<()> {
        self.store.update_guild(guild_id, |cfg| {
            cfg.open_tickets
                .retain(|ticket| ticket.channel_id != channel_id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TicketStatus;

    fn ticket(channel_id: &str, user_id: &str, number: &str) -> Ticket {
        Ticket {
            channel_id: channel_id.to_string(),
            user_id: user_id.to_string(),
            category_id: "c1".to_string(),
            priority: "Normal".to_string(),
            ticket_number: number.to_string(),
            created_at: 1_000,
            status: TicketStatus::Open,
            claimed_by: None,
        }
    }

    fn registry() -> (tempfile::TempDir, TicketRegistry) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ConfigStore::open(dir.path().join("config.json")).expect("open");
        (dir, TicketRegistry::new(Arc::new(store)))
    }

    #[test]
    fn add_and_find_by_channel() {
        let (_dir, registry) = registry();
        registry.add("g1", ticket("ch1", "u1", "0001")).expect("add");

        let found = registry.find_by_channel("g1", "ch1").expect("find");
        assert_eq!(found.expect("ticket").ticket_number, "0001");
        assert!(registry.find_by_channel("g1", "ch2").expect("find").is_none());
    }

    #[test]
    fn open_count_for_user_counts_only_that_user() {
        let (_dir, registry) = registry();
        registry.add("g1", ticket("ch1", "u1", "0001")).expect("add");
        registry.add("g1", ticket("ch2", "u2", "0002")).expect("add");

        assert_eq!(registry.open_count_for_user("g1", "u1").expect("count"), 1);
        assert_eq!(registry.open_count_for_user("g1", "u3").expect("count"), 0);
    }

    #[test]
    fn update_replaces_matching_channel_entry() {
        let (_dir, registry) = registry();
        registry.add("g1", ticket("ch1", "u1", "0001")).expect("add");

        let mut claimed = ticket("ch1", "u1", "0001");
        claimed.status = TicketStatus::Claimed;
        claimed.claimed_by = Some("staff".to_string());
        registry.update("g1", claimed).expect("update");

        let tickets = registry.open_tickets("g1").expect("tickets");
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].claimed_by.as_deref(), Some("staff"));
    }

    #[test]
    fn remove_filters_out_the_channel() {
        let (_dir, registry) = registry();
        registry.add("g1", ticket("ch1", "u1", "0001")).expect("add");
        registry.add("g1", ticket("ch2", "u2", "0002")).expect("add");

        registry.remove("g1", "ch1").expect("remove");
        let tickets = registry.open_tickets("g1").expect("tickets");
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].channel_id, "ch2");
    }
}
