//! sshgate CLI
//!
//! Command-line client for a running sshgate gateway:
//! - run a command on a remote host
//! - browse the execution audit log
//! - fetch and validate control-panel documents

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sg_protocol::{ConnectionSpec, DEFAULT_SSH_PORT};
use sshgate::client::{GatewayClient, DEFAULT_GATEWAY_URL};
use sshgate::commands;

#[derive(Parser)]
#[command(name = "sshgate")]
#[command(author, version, about = "Remote command gateway client")]
#[command(propagate_version = true)]
struct Cli {
    /// Gateway base URL
    #[arg(short, long, global = true, env = "SSHGATE_URL", default_value = DEFAULT_GATEWAY_URL)]
    gateway: String,

    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a command on a remote host over SSH
    Exec {
        /// Remote host name or address
        #[arg(long)]
        host: String,
        /// SSH port
        #[arg(long, default_value_t = DEFAULT_SSH_PORT)]
        port: u16,
        /// Login user
        #[arg(short, long)]
        user: String,
        /// Login password
        #[arg(long, env = "SSHGATE_PASSWORD", hide_env_values = true)]
        password: String,
        /// Button identifier recorded in the audit log
        #[arg(long, default_value = "cli")]
        button_id: String,
        /// Command line to run
        #[arg(required = true, trailing_var_arg = true)]
        command: Vec<String>,
    },

    /// Show recent executions
    Logs {
        /// Maximum number of records
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Include captured output
        #[arg(short, long)]
        long: bool,
    },

    /// Work with control-panel documents
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show gateway status
    Status,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print a document served by the gateway
    Get { name: String },
    /// Validate a local document file
    Validate { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let client = GatewayClient::new(&cli.gateway)?;

    match cli.command {
        Commands::Exec {
            host,
            port,
            user,
            password,
            button_id,
            command,
        } => {
            let spec = ConnectionSpec::new(host, user, password, command.join(" ")).with_port(port);
            if !commands::exec_command(&client, spec, &button_id).await? {
                std::process::exit(1);
            }
        }

        Commands::Logs { limit, long } => {
            commands::logs_command(&client, limit, long).await?;
        }

        Commands::Config { action } => match action {
            ConfigAction::Get { name } => {
                commands::config_get(&client, &name).await?;
            }
            ConfigAction::Validate { file } => {
                commands::config_validate(&client, &file).await?;
            }
        },

        Commands::Status => {
            commands::status_command(&client).await?;
        }
    }

    Ok(())
}
