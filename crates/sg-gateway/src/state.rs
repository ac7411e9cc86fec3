//! Shared gateway state

use std::sync::Arc;

use sg_core::config::GatewayConfig;
use sg_core::traits::{AuditSink, CommandExecutor, ConfigDelivery};
use sg_core::SgError;

use crate::audit;
use crate::delivery::DirectoryDelivery;
use crate::dispatch::Dispatcher;
use crate::executor::SshExecutor;
use crate::session::SessionRegistry;

/// Everything request handlers need, built once at startup
pub struct GatewayState {
    /// Configuration, read-only for the process lifetime
    pub config: GatewayConfig,
    /// Connected sessions
    pub registry: Arc<SessionRegistry>,
    /// Runs executions and reports their events
    pub dispatcher: Dispatcher,
    /// Execution history
    pub audit: Arc<dyn AuditSink>,
    /// Control-panel documents
    pub delivery: Arc<dyn ConfigDelivery>,
}

impl GatewayState {
    /// Assemble state from explicit collaborators
    pub fn new(
        config: GatewayConfig,
        executor: Arc<dyn CommandExecutor>,
        audit: Arc<dyn AuditSink>,
        delivery: Arc<dyn ConfigDelivery>,
    ) -> Self {
        let registry = Arc::new(SessionRegistry::new());
        let dispatcher = Dispatcher::new(Arc::clone(&registry), executor, Arc::clone(&audit));

        Self {
            config,
            registry,
            dispatcher,
            audit,
            delivery,
        }
    }

    /// Build the production collaborators described by `config`
    pub fn from_config(config: GatewayConfig) -> Result<Self, SgError> {
        config.validate()?;

        let executor = Arc::new(SshExecutor::from_config(&config));
        let audit = audit::open_sink(&config.audit)?;
        let delivery = Arc::new(DirectoryDelivery::new(config.documents_dir.clone()));

        Ok(Self::new(config, executor, audit, delivery))
    }
}
