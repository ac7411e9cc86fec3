//! Shared fixtures for gateway integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use russh::server::{Auth, Handler, Msg, Session};
use russh::{Channel, ChannelId, CryptoVec};
use russh_keys::key::KeyPair;
use tokio::net::TcpListener;

use sg_core::config::GatewayConfig;
use sg_gateway::audit::MemoryAuditSink;
use sg_gateway::delivery::DirectoryDelivery;
use sg_gateway::executor::SshExecutor;
use sg_gateway::GatewayState;

/// Password accepted by [`ScriptedSshServer`]
pub const PASSWORD: &str = "correct-horse";

/// Port counter for tests that need a port nothing listens on
static PORT_COUNTER: AtomicU16 = AtomicU16::new(29_500);

/// A loopback port that is very unlikely to be bound
pub fn unused_port() -> u16 {
    PORT_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// In-process SSH server with a fixed set of commands:
///
/// - `echo hello` writes `hello\n` and exits 0
/// - `fail` writes `boom\n` to stderr and exits 3
/// - `hang` never answers
/// - anything else exits 127
pub struct ScriptedSshServer {
    pub port: u16,
}

impl ScriptedSshServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let mut config = russh::server::Config::default();
        config.keys.push(KeyPair::generate_ed25519().unwrap());
        config.auth_rejection_time = Duration::from_millis(10);
        config.auth_rejection_time_initial = Some(Duration::from_secs(0));
        let config = Arc::new(config);

        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                let config = Arc::clone(&config);
                tokio::spawn(async move {
                    let _ = russh::server::run_stream(config, socket, ScriptedHandler).await;
                });
            }
        });

        Self { port }
    }
}

struct ScriptedHandler;

#[async_trait]
impl Handler for ScriptedHandler {
    type Error = anyhow::Error;

    async fn auth_password(&mut self, _user: &str, password: &str) -> Result<Auth, Self::Error> {
        if password == PASSWORD {
            Ok(Auth::Accept)
        } else {
            Ok(Auth::Reject {
                proceed_with_methods: None,
            })
        }
    }

    async fn channel_open_session(
        &mut self,
        _channel: Channel<Msg>,
        _session: &mut Session,
    ) -> Result<bool, Self::Error> {
        Ok(true)
    }

    async fn exec_request(
        &mut self,
        channel: ChannelId,
        data: &[u8],
        session: &mut Session,
    ) -> Result<(), Self::Error> {
        let exit_status = match data {
            b"echo hello" => {
                session.data(channel, CryptoVec::from_slice(b"hello\n"));
                0
            }
            b"fail" => {
                session.extended_data(channel, 1, CryptoVec::from_slice(b"boom\n"));
                3
            }
            b"hang" => return Ok(()),
            _ => 127,
        };

        session.exit_status_request(channel, exit_status);
        session.eof(channel);
        session.close(channel);
        Ok(())
    }
}

/// Gateway config with short timeouts suitable for tests
pub fn test_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.bind_address = "127.0.0.1:0".to_string();
    config.connect_timeout = Duration::from_secs(3);
    config.command_timeout = Duration::from_secs(2);
    config
}

/// State backed by the real SSH executor, an in-memory audit sink and
/// documents read from `documents_dir`
pub fn test_state(config: GatewayConfig) -> (Arc<GatewayState>, Arc<MemoryAuditSink>) {
    let audit = Arc::new(MemoryAuditSink::new(100));
    let executor = Arc::new(SshExecutor::from_config(&config));
    let delivery = Arc::new(DirectoryDelivery::new(config.documents_dir.clone()));
    let state = GatewayState::new(config, executor, audit.clone(), delivery);
    (Arc::new(state), audit)
}
