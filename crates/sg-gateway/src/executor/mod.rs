//! SSH command execution
//!
//! [`SshExecutor`] implements [`sg_core::traits::CommandExecutor`] on top of
//! russh. Every failure mode is folded into the returned
//! [`sg_core::ExecutionResult`].

mod ssh;

pub use ssh::{execute, AcceptAnyHostKey, SshExecutor};
