//! Collaborator trait definitions

mod audit;
mod delivery;
mod executor;

pub use audit::AuditSink;
pub use delivery::ConfigDelivery;
pub use executor::CommandExecutor;
