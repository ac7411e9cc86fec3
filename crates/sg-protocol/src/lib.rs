//! sg-protocol: Session channel protocol for sshgate
//!
//! This crate defines the JSON messages exchanged between control-panel
//! clients and the gateway over a session channel, plus the connection
//! parameters carried by every execution request.

pub mod error;
pub mod message;
pub mod spec;

pub use error::ProtocolError;
pub use message::{ClientMessage, ExecutionStatus, GatewayEvent, UNKNOWN_REQUEST_ID};
pub use spec::{ConnectionSpec, DEFAULT_SSH_PORT};
