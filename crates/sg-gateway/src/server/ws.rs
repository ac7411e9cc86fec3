//! WebSocket session channel
//!
//! One socket is one session. Outbound events are queued on an unbounded
//! channel registered with the [`SessionRegistry`](crate::session::SessionRegistry)
//! and written by a dedicated task, so dispatch workers never touch the
//! socket directly.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use sg_core::{ExecutionRequest, SessionId};
use sg_protocol::{ClientMessage, GatewayEvent, ProtocolError};

use crate::state::GatewayState;

/// `GET /api/ws/:client_id`
pub(super) async fn session_channel(
    State(state): State<Arc<GatewayState>>,
    Path(client_id): Path<String>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, SessionId::new(client_id), state))
}

async fn handle_socket(socket: WebSocket, session_id: SessionId, state: Arc<GatewayState>) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<GatewayEvent>();
    let ticket = state.registry.connect(session_id.clone(), tx);

    let mut writer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let text = match event.to_json() {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!("Failed to encode {} event: {}", event.kind(), e);
                    continue;
                }
            };
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            frame = stream.next() => {
                let Some(Ok(frame)) = frame else { break };
                match frame {
                    Message::Text(text) => handle_text(&state, &session_id, &text),
                    Message::Binary(_) => {
                        state.registry.send(
                            &session_id,
                            GatewayEvent::rejected(ProtocolError::UnsupportedFrame.to_string()),
                        );
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            _ = &mut writer => {
                tracing::debug!("Writer for session {} stopped", session_id);
                break;
            }
        }
    }

    state.registry.release(&ticket);
    writer.abort();
}

/// Decode one text frame and act on it.
///
/// Replies go through the registry like every other session event.
fn handle_text(state: &GatewayState, session_id: &SessionId, text: &str) {
    match ClientMessage::parse(text) {
        Ok(ClientMessage::ExecuteSsh { ssh, request_id }) => {
            if let Err(e) = ssh.validate() {
                tracing::warn!("Rejected request {} from session {}: {}", request_id, session_id, e);
                state
                    .registry
                    .send(session_id, GatewayEvent::error(&request_id, e.to_string()));
                state
                    .registry
                    .send(session_id, GatewayEvent::complete(&request_id, false));
                return;
            }

            tracing::info!(
                "Session {} requested '{}' on {} (request {})",
                session_id,
                ssh.command,
                ssh.address(),
                request_id
            );
            state
                .dispatcher
                .dispatch(ExecutionRequest::new(ssh, request_id, session_id.clone()));
        }
        Ok(ClientMessage::Unknown) => {
            tracing::debug!("Ignoring unknown message type from session {}", session_id);
        }
        Err(e) => {
            tracing::warn!("Malformed message from session {}: {}", session_id, e);
            state.registry.send(session_id, GatewayEvent::rejected(e.to_string()));
        }
    }
}
