//! Status command implementation

use anyhow::Result;

use crate::client::GatewayClient;
use crate::output::{format_status, print_error};

/// Execute the status command
pub async fn status_command(client: &GatewayClient) -> Result<()> {
    let info = match client.service_info().await {
        Ok(i) => i,
        Err(e) => {
            print_error(&format!("Failed to get gateway status: {}", e));
            return Err(e);
        }
    };

    println!("{}", format_status(client.base_url(), &info));

    Ok(())
}
