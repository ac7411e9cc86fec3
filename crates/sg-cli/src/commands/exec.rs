//! Exec command implementation

use anyhow::Result;

use sg_core::api::ExecuteRequest;
use sg_protocol::ConnectionSpec;

use crate::client::GatewayClient;
use crate::output::{print_error, print_info};

/// Run a command through the gateway.
///
/// Returns whether the remote command succeeded.
pub async fn exec_command(
    client: &GatewayClient,
    spec: ConnectionSpec,
    button_id: &str,
) -> Result<bool> {
    spec.validate()?;
    print_info(&format!("Running '{}' on {}", spec.command, spec.address()));

    let request = ExecuteRequest {
        ssh: spec,
        button_id: button_id.to_string(),
    };
    let response = match client.execute(&request).await {
        Ok(r) => r,
        Err(e) => {
            print_error(&format!("Failed to execute command: {}", e));
            return Err(e);
        }
    };

    if response.success {
        print!("{}", response.output);
    } else {
        print_error(response.error.as_deref().unwrap_or(&response.output));
    }
    tracing::info!("Finished in {:.2}s", response.execution_time);

    Ok(response.success)
}
