//! sshgate: Command-line client for the sshgate gateway
//!
//! Talks to a running `sg-gateway` over its HTTP API to run commands,
//! browse the audit log and work with control-panel documents.

pub mod client;
pub mod commands;
pub mod output;
