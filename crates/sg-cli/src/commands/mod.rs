//! CLI command implementations

mod config;
mod exec;
mod logs;
mod status;

pub use config::{config_get, config_validate};
pub use exec::exec_command;
pub use logs::logs_command;
pub use status::status_command;
