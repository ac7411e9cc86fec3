//! Configuration document delivery trait

use async_trait::async_trait;
use serde_json::Value;

use crate::document::{PanelDocument, Violation};
use crate::error::DocumentError;

/// Serves static control-panel documents
#[async_trait]
pub trait ConfigDelivery: Send + Sync {
    /// Load a document by name
    async fn fetch(&self, name: &str) -> Result<Value, DocumentError>;

    /// Structural check; an empty list means the document is valid
    fn validate_structure(&self, document: &PanelDocument) -> Vec<Violation> {
        document.violations()
    }
}
