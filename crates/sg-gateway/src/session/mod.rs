//! Live client sessions
//!
//! The registry is the only owner of the session id to channel mapping.
//! Everything that wants to reach a client goes through
//! [`SessionRegistry::send`].

mod registry;

pub use registry::{Delivery, EventSender, SessionRegistry, Ticket};
