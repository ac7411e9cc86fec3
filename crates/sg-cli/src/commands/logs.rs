//! Logs command implementation

use anyhow::Result;

use crate::client::GatewayClient;
use crate::output::{format_logs, print_error};

/// Execute the logs command
pub async fn logs_command(client: &GatewayClient, limit: Option<usize>, long: bool) -> Result<()> {
    let records = match client.logs(limit).await {
        Ok(r) => r,
        Err(e) => {
            print_error(&format!("Failed to fetch execution logs: {}", e));
            return Err(e);
        }
    };

    println!("{}", format_logs(&records, long));

    Ok(())
}
