//! sg-gateway: Remote command gateway daemon
//!
//! The gateway accepts control-panel clients over WebSocket and HTTP, runs
//! their commands on remote hosts over password-authenticated SSH, streams
//! results back to the issuing session and keeps an audit trail of every
//! execution.

pub mod audit;
pub mod delivery;
pub mod dispatch;
pub mod executor;
pub mod server;
pub mod session;
pub mod state;

pub use dispatch::Dispatcher;
pub use server::GatewayServer;
pub use session::SessionRegistry;
pub use state::GatewayState;
