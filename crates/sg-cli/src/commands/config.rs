//! Config document commands

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::client::GatewayClient;
use crate::output::{print_error, print_success};

/// Print a document served by the gateway
pub async fn config_get(client: &GatewayClient, name: &str) -> Result<()> {
    let document = match client.fetch_config(name).await {
        Ok(d) => d,
        Err(e) => {
            print_error(&format!("Failed to fetch config '{}': {}", name, e));
            return Err(e);
        }
    };

    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

/// Ask the gateway to validate a local document file
pub async fn config_validate(client: &GatewayClient, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document: Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    match client.validate_config(&document).await {
        Ok(response) => {
            print_success(&response.message);
            Ok(())
        }
        Err(e) => {
            print_error(&format!("{} is invalid: {}", path.display(), e));
            Err(e)
        }
    }
}
