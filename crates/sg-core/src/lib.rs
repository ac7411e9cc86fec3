//! sg-core: Core abstractions and configuration for sshgate
//!
//! This crate provides the domain types, error taxonomy, configuration
//! structures and collaborator traits shared by the gateway daemon and
//! the command-line client.

pub mod api;
pub mod config;
pub mod document;
pub mod error;
pub mod time;
pub mod traits;
pub mod types;

pub use error::SgError;
pub use types::{AuditRecord, ExecutionRequest, ExecutionResult, RequestId, SessionId};
