//! Ticket lifecycle runtime: guards, wizard, registry-backed state machine,
//! panel manager, transcript generator, and the inactivity sweep.

mod ticket_runtime;

pub use ticket_runtime::*;
