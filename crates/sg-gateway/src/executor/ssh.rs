//! Password-authenticated SSH command execution
//!
//! Every execution opens its own transport, authenticates, runs a single
//! command on a fresh session channel and disconnects. Nothing is pooled
//! or reused between requests.
//!
//! # Trust model
//!
//! Unknown host keys are accepted without pinning or prompting. The
//! gateway is meant for trusted internal networks; the presented key's
//! fingerprint is logged at debug level so it can be audited.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use russh::client::{self, Config, Handle};
use russh::{ChannelMsg, Disconnect};
use russh_keys::key::PublicKey;

use sg_core::config::GatewayConfig;
use sg_core::error::ExecError;
use sg_core::traits::CommandExecutor;
use sg_core::ExecutionResult;
use sg_protocol::ConnectionSpec;

/// Extended-data stream number carrying stderr
const SSH_EXTENDED_DATA_STDERR: u32 = 1;

/// Executes commands over SSH with bounded connect and command phases
#[derive(Clone)]
pub struct SshExecutor {
    /// Bound on TCP connect, handshake and authentication
    connect_timeout: Duration,
    /// Bound on running the command and draining its output
    command_timeout: Duration,
    /// Shared russh client configuration
    ssh_config: Arc<Config>,
}

/// Raw output of a command that ran
struct CommandOutput {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    exit_status: Option<u32>,
}

impl SshExecutor {
    /// Create an executor with explicit timeouts
    pub fn new(connect_timeout: Duration, command_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            command_timeout,
            ssh_config: Arc::new(Config::default()),
        }
    }

    /// Create an executor using the gateway's configured timeouts
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(config.connect_timeout, config.command_timeout)
    }

    /// Connect phase timeout
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Command phase timeout
    pub fn command_timeout(&self) -> Duration {
        self.command_timeout
    }

    /// Connect, run, and always disconnect
    async fn run(&self, spec: &ConnectionSpec) -> Result<CommandOutput, ExecError> {
        let handle = self.open(spec).await?;

        tracing::debug!("Executing command on {}", spec.address());
        let output = match tokio::time::timeout(
            self.command_timeout,
            run_command(&handle, &spec.command),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ExecError::CommandTimeout {
                timeout_secs: self.command_timeout.as_secs(),
            }),
        };

        close(&handle).await;
        output
    }

    /// Open the transport and authenticate within the connect timeout
    async fn open(&self, spec: &ConnectionSpec) -> Result<Handle<AcceptAnyHostKey>, ExecError> {
        let address = spec.address();
        let deadline = tokio::time::Instant::now() + self.connect_timeout;
        let timed_out = || ExecError::ConnectTimeout {
            address: address.clone(),
            timeout_secs: self.connect_timeout.as_secs(),
        };

        tracing::debug!("Connecting to {}", address);
        let mut handle = tokio::time::timeout_at(
            deadline,
            client::connect(
                Arc::clone(&self.ssh_config),
                (spec.host.as_str(), spec.port),
                AcceptAnyHostKey,
            ),
        )
        .await
        .map_err(|_| timed_out())?
        .map_err(|e| ExecError::Connect {
            address: address.clone(),
            message: e.to_string(),
        })?;

        tracing::debug!("Authenticating as user '{}' on {}", spec.username, address);
        let auth = tokio::time::timeout_at(
            deadline,
            handle.authenticate_password(spec.username.as_str(), spec.password.as_str()),
        )
        .await;

        let failure = match auth {
            Ok(Ok(true)) => return Ok(handle),
            Ok(Ok(false)) => ExecError::AuthenticationFailed,
            Ok(Err(e)) => ExecError::Protocol(e.to_string()),
            Err(_) => timed_out(),
        };

        close(&handle).await;
        Err(failure)
    }
}

/// Run `command` on a new session channel and collect everything it writes
async fn run_command(
    handle: &Handle<AcceptAnyHostKey>,
    command: &str,
) -> Result<CommandOutput, ExecError> {
    let mut channel = handle
        .channel_open_session()
        .await
        .map_err(|e| ExecError::Protocol(format!("failed to open session channel: {}", e)))?;

    channel
        .exec(true, command)
        .await
        .map_err(|e| ExecError::Protocol(format!("failed to start command: {}", e)))?;

    let mut output = CommandOutput {
        stdout: Vec::new(),
        stderr: Vec::new(),
        exit_status: None,
    };

    // The exit status may arrive after EOF, so drain until the channel closes.
    loop {
        match channel.wait().await {
            Some(ChannelMsg::Data { data }) => output.stdout.extend_from_slice(&data),
            Some(ChannelMsg::ExtendedData { data, ext }) if ext == SSH_EXTENDED_DATA_STDERR => {
                output.stderr.extend_from_slice(&data)
            }
            Some(ChannelMsg::ExitStatus { exit_status }) => output.exit_status = Some(exit_status),
            Some(ChannelMsg::Failure) => {
                return Err(ExecError::Protocol(
                    "remote host refused to run the command".to_string(),
                ))
            }
            Some(ChannelMsg::Close) | None => break,
            Some(_) => {}
        }
    }

    Ok(output)
}

/// Best-effort disconnect; the transport is gone either way once the handle drops
async fn close(handle: &Handle<AcceptAnyHostKey>) {
    if let Err(e) = handle
        .disconnect(Disconnect::ByApplication, "", "en")
        .await
    {
        tracing::debug!("SSH disconnect failed: {}", e);
    }
}

#[async_trait]
impl CommandExecutor for SshExecutor {
    async fn execute(&self, spec: &ConnectionSpec) -> ExecutionResult {
        let started = Instant::now();
        let outcome = self.run(spec).await;
        let elapsed = started.elapsed().as_secs_f64();

        match outcome {
            Ok(output) => {
                let exit_status = output.exit_status.map(|s| s as i32);
                tracing::info!(
                    "Command on {} finished with exit status {:?} in {:.2}s",
                    spec.address(),
                    exit_status,
                    elapsed
                );
                ExecutionResult::completed(
                    String::from_utf8_lossy(&output.stdout).into_owned(),
                    String::from_utf8_lossy(&output.stderr).into_owned(),
                    exit_status,
                    elapsed,
                )
            }
            Err(e) => {
                tracing::warn!("Execution on {} failed: {}", spec.address(), e);
                ExecutionResult::failed(e.to_string(), elapsed)
            }
        }
    }
}

/// Run one command with the given timeouts
pub async fn execute(
    spec: &ConnectionSpec,
    connect_timeout: Duration,
    command_timeout: Duration,
) -> ExecutionResult {
    SshExecutor::new(connect_timeout, command_timeout)
        .execute(spec)
        .await
}

/// Client handler that accepts every server key
pub struct AcceptAnyHostKey;

#[async_trait]
impl client::Handler for AcceptAnyHostKey {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> Result<bool, Self::Error> {
        tracing::debug!(
            "Accepting server host key {} without verification",
            server_public_key.fingerprint()
        );
        Ok(true)
    }
}
