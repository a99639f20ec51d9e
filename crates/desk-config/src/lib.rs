//! Per-guild configuration document, durable store, and ticket registry.

pub mod model;
pub mod registry;
pub mod store;

pub use model::{ConfigDocument, GuildConfig, Ticket, TicketCategory, TicketStatus};
pub use registry::TicketRegistry;
pub use store::ConfigStore;
