//! Session registry implementation

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

use sg_core::SessionId;
use sg_protocol::GatewayEvent;

/// Sending half of a session's outbound event queue
pub type EventSender = mpsc::UnboundedSender<GatewayEvent>;

/// Identifies one registration of a session id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    session_id: SessionId,
    serial: u64,
}

impl Ticket {
    /// Session this ticket was issued for
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }
}

/// Outcome of [`SessionRegistry::send`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Event queued on the session's channel
    Delivered,
    /// No session registered under the id
    NoSession,
    /// The channel was broken; the session has been removed
    Failed,
}

struct SessionEntry {
    serial: u64,
    sender: EventSender,
}

/// Process-wide table of connected sessions
pub struct SessionRegistry {
    /// At most one channel per session id
    sessions: DashMap<SessionId, SessionEntry>,
    /// Source of registration serials
    next_serial: AtomicU64,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            next_serial: AtomicU64::new(1),
        }
    }

    /// Register `sender` for `session_id`, replacing any existing channel
    pub fn connect(&self, session_id: SessionId, sender: EventSender) -> Ticket {
        let serial = self.next_serial.fetch_add(1, Ordering::Relaxed);
        let replaced = self
            .sessions
            .insert(session_id.clone(), SessionEntry { serial, sender })
            .is_some();

        if replaced {
            tracing::info!("Session {} reconnected, previous channel replaced", session_id);
        } else {
            tracing::info!("Session {} connected", session_id);
        }

        Ticket { session_id, serial }
    }

    /// Remove the session; a no-op if it is not registered
    pub fn disconnect(&self, session_id: &SessionId) {
        if self.sessions.remove(session_id).is_some() {
            tracing::info!("Session {} disconnected", session_id);
        }
    }

    /// Remove the session only if it is still the registration `ticket` names
    pub fn release(&self, ticket: &Ticket) -> bool {
        let removed = self
            .sessions
            .remove_if(&ticket.session_id, |_, entry| entry.serial == ticket.serial)
            .is_some();

        if removed {
            tracing::info!("Session {} disconnected", ticket.session_id);
        } else {
            tracing::debug!(
                "Session {} already replaced or removed, nothing to release",
                ticket.session_id
            );
        }
        removed
    }

    /// Deliver `event` to the session if it is connected.
    ///
    /// A broken channel counts as a disconnect: the entry is removed and
    /// the failure logged. Nothing is returned as an error.
    pub fn send(&self, session_id: &SessionId, event: GatewayEvent) -> Delivery {
        // Clone out of the map so no shard lock is held across removal
        let (serial, sender) = match self.sessions.get(session_id) {
            Some(entry) => (entry.serial, entry.sender.clone()),
            None => {
                tracing::debug!(
                    "Dropping {} event for disconnected session {}",
                    event.kind(),
                    session_id
                );
                return Delivery::NoSession;
            }
        };

        match sender.send(event) {
            Ok(()) => Delivery::Delivered,
            Err(e) => {
                self.sessions
                    .remove_if(session_id, |_, entry| entry.serial == serial);
                tracing::warn!(
                    "Failed to deliver {} event to session {}, removing it",
                    e.0.kind(),
                    session_id
                );
                Delivery::Failed
            }
        }
    }

    /// Whether a channel is registered for the id
    pub fn is_connected(&self, session_id: &SessionId) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Number of connected sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
