//! Control-panel documents served from a directory

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};

use sg_core::error::DocumentError;
use sg_core::traits::ConfigDelivery;

/// Serves `<name>.json` files from one directory
pub struct DirectoryDelivery {
    root: PathBuf,
}

impl DirectoryDelivery {
    /// Serve documents from `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory documents are read from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a document, rejecting names that could escape the directory
    fn document_path(&self, name: &str) -> Result<PathBuf, DocumentError> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(DocumentError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(format!("{}.json", name)))
    }
}

#[async_trait]
impl ConfigDelivery for DirectoryDelivery {
    async fn fetch(&self, name: &str) -> Result<Value, DocumentError> {
        let path = self.document_path(name)?;

        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DocumentError::NotFound(name.to_string()))
            }
            Err(source) => {
                return Err(DocumentError::Read {
                    name: name.to_string(),
                    source,
                })
            }
        };

        serde_json::from_str(&contents).map_err(|source| DocumentError::Parse {
            name: name.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_existing_document() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("sample.json"),
            r#"{"app_name":"Panel","version":"1.0","pages":[],"buttons":[]}"#,
        )
        .unwrap();

        let delivery = DirectoryDelivery::new(dir.path());
        let doc = delivery.fetch("sample").await.unwrap();
        assert_eq!(doc["app_name"], json!("Panel"));
    }

    #[tokio::test]
    async fn test_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let delivery = DirectoryDelivery::new(dir.path());
        assert!(matches!(
            delivery.fetch("simple").await,
            Err(DocumentError::NotFound(name)) if name == "simple"
        ));
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let delivery = DirectoryDelivery::new(dir.path());
        for name in ["../secret", "a/b", "", "x.json"] {
            assert!(matches!(
                delivery.fetch(name).await,
                Err(DocumentError::InvalidName(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{not json").unwrap();

        let delivery = DirectoryDelivery::new(dir.path());
        let err = delivery.fetch("broken").await.unwrap_err();
        assert!(err.to_string().starts_with("Error loading broken config"));
    }
}
