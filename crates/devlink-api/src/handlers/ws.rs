//! WebSocket upgrade handler.

use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{info, warn};

use devlink_auth::claims::Claims;
use devlink_core::types::ConnectionId;
use devlink_realtime::connection::handle::ConnectionHandle;
use devlink_realtime::message::{InboundFrame, OutboundFrame};

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameter for WebSocket authentication.
#[derive(Debug, serde::Deserialize)]
pub struct WsQuery {
    /// JWT access token.
    pub token: String,
}

/// GET /ws?token={jwt} — WebSocket upgrade.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
) -> Result<Response, ApiError> {
    // Authenticate before upgrade.
    let claims = state.jwt_decoder.decode(&query.token)?;

    Ok(ws.on_upgrade(move |socket| handle_ws_connection(state, claims, socket)))
}

/// Handles an established WebSocket connection.
async fn handle_ws_connection(state: AppState, claims: Claims, socket: WebSocket) {
    let user_id = claims.user_id();
    let conn_id = ConnectionId::new();

    let (handle, mut outbound_rx) = match state.realtime.registry.register(user_id, conn_id) {
        Ok(pair) => pair,
        Err(e) => {
            // Duplicate registration is harmless for the peer; just drop.
            warn!(conn_id = %conn_id, user_id = %user_id, error = %e, "Registration refused");
            return;
        }
    };

    info!(conn_id = %conn_id, user_id = %user_id, "WebSocket connection established");

    let (mut ws_tx, mut ws_rx) = socket.split();

    // Forward the outbound queue to the socket.
    let outbound_task = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            if ws_tx.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    let push_timeout = Duration::from_millis(state.config.realtime.push_timeout_ms);

    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => {
                handle_frame(&handle, &text, push_timeout).await;
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    outbound_task.abort();
    state.realtime.registry.unregister(&conn_id);

    info!(conn_id = %conn_id, user_id = %user_id, "WebSocket connection closed");
}

/// Processes one inbound control frame.
async fn handle_frame(handle: &ConnectionHandle, text: &str, push_timeout: Duration) {
    let reply = match serde_json::from_str::<InboundFrame>(text) {
        Ok(InboundFrame::Ping { timestamp }) => OutboundFrame::Pong { timestamp },
        Err(e) => OutboundFrame::Error {
            code: "INVALID_MESSAGE".to_string(),
            message: format!("Failed to parse message: {e}"),
        },
    };
    let _ = handle
        .push(
            serde_json::to_string(&reply).unwrap_or_default(),
            push_timeout,
        )
        .await;
}
