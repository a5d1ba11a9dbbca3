//! WebSocket connection handlers.
//!
//! One task per connection. Inbound frames are processed serially and to
//! completion; a frame is never abandoned halfway through a room update.
//! Outbound frames are written by a separate pusher task that drains the
//! connection's bounded queue.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{ConnectionId, MessageText},
    infrastructure::dto::websocket::ClientMessage,
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that drains the outbound queue into the WebSocket sink.
///
/// The task ends when the queue is closed (the connection was unregistered)
/// or when writing to the socket fails.
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if let Err(e) = sender.send(Message::Text(frame.into())).await {
                tracing::debug!("Failed to write frame to socket: {}", e);
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    let (tx, rx) = mpsc::channel(state.outbound_buffer);
    let connection_id = state.connect_participant_usecase.execute(tx).await;
    let mut send_task = pusher_loop(rx, sender);

    loop {
        let frame = tokio::select! {
            biased;
            _ = &mut send_task => {
                tracing::debug!("Outbound stream of '{}' ended", connection_id);
                break;
            }
            frame = receiver.next() => frame,
        };

        match frame {
            Some(Ok(Message::Text(text))) => {
                dispatch_frame(&state, connection_id, text.as_str()).await;
            }
            Some(Ok(Message::Close(_))) => {
                tracing::info!("Client '{}' requested close", connection_id);
                break;
            }
            Some(Ok(Message::Binary(_))) => {
                tracing::debug!("Ignoring binary frame from '{}'", connection_id);
            }
            // Ping/pong is handled automatically by the WebSocket protocol
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                break;
            }
            None => break,
        }
    }

    send_task.abort();
    state
        .disconnect_participant_usecase
        .execute(&connection_id)
        .await;
}

/// Decode one inbound text frame and run the matching use case.
///
/// Malformed frames and frames the connection is not allowed to send in its
/// current state are logged and dropped; the connection stays open.
async fn dispatch_frame(state: &AppState, connection_id: ConnectionId, text: &str) {
    let message = match ClientMessage::parse(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Ignoring malformed frame from '{}': {}", connection_id, e);
            return;
        }
    };

    match message {
        ClientMessage::JoinRoom(payload) => {
            let (room_id, display_name) = match payload.into_domain() {
                Ok(values) => values,
                Err(e) => {
                    tracing::warn!("Rejected JOIN_ROOM from '{}': {}", connection_id, e);
                    return;
                }
            };
            if let Err(e) = state
                .join_room_usecase
                .execute(connection_id, room_id, display_name)
                .await
            {
                tracing::warn!("Failed to join room: {}", e);
            }
        }
        ClientMessage::Signal(payload) => {
            let to = match ConnectionId::parse(&payload.to) {
                Ok(to) => to,
                Err(e) => {
                    tracing::warn!("Dropped SIGNAL from '{}': {}", connection_id, e);
                    return;
                }
            };
            match state
                .relay_signal_usecase
                .execute(&connection_id, &to, payload.signal.into())
                .await
            {
                Ok(delivery) if !delivery.is_delivered() => {
                    tracing::debug!("SIGNAL from '{}' to '{}' was dropped", connection_id, to);
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("Dropped SIGNAL: {}", e),
            }
        }
        ClientMessage::SendMessage(payload) => {
            if let Err(e) = state
                .send_message_usecase
                .execute(&connection_id, MessageText::from(payload.text))
                .await
            {
                tracing::warn!("Dropped SEND_MESSAGE: {}", e);
            }
        }
        ClientMessage::StateChange(payload) => {
            let state_payload = match payload.into_state() {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!("Dropped STATE_CHANGE from '{}': {}", connection_id, e);
                    return;
                }
            };
            if let Err(e) = state
                .change_state_usecase
                .execute(&connection_id, state_payload.into())
                .await
            {
                tracing::warn!("Dropped STATE_CHANGE: {}", e);
            }
        }
        ClientMessage::LeaveRoom => {
            if state
                .leave_room_usecase
                .execute(&connection_id)
                .await
                .is_none()
            {
                tracing::debug!("LEAVE_ROOM from '{}' ignored: not in a room", connection_id);
            }
        }
    }
}
