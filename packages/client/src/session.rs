//! WebSocket client session management.

use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

use huddle_server::infrastructure::dto::websocket::ServerMessage;

use super::{
    domain::{Command, Roster, encode_command, join_frame, parse_command},
    error::ClientError,
    formatter::MessageFormatter,
    runner::ClientConfig,
    ui::redisplay_prompt,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How a session ended without a connection error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// `/quit`
    Quit,
    /// Ctrl+C or Ctrl+D at the prompt
    InputClosed,
}

/// Run one connected session: join the room, then relay prompt input and
/// print server events until the user quits or the connection drops.
pub async fn run_client_session(
    config: &ClientConfig,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<SessionEnd, ClientError> {
    let (ws_stream, _response) = connect_async(config.url.as_str())
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    tracing::info!("Connected to signaling relay!");

    let (mut write, read) = ws_stream.split();

    let join = join_frame(&config.room, &config.username)
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    send_text(&mut write, join).await?;

    println!(
        "\nYou are '{}' in room '{}'. Type messages and press Enter to send. /help lists commands.\n",
        config.username, config.room
    );

    let mut read_task = tokio::spawn(read_loop(
        read,
        config.room.clone(),
        config.username.clone(),
    ));

    loop {
        tokio::select! {
            _ = &mut read_task => {
                return Err(ClientError::ConnectionError("Connection lost".to_string()));
            }
            line = input_rx.recv() => {
                let Some(line) = line else {
                    close(&mut write).await;
                    read_task.abort();
                    return Ok(SessionEnd::InputClosed);
                };

                let command = parse_command(&line);
                match &command {
                    Command::Quit => {
                        close(&mut write).await;
                        read_task.abort();
                        return Ok(SessionEnd::Quit);
                    }
                    Command::Help => {
                        println!("{}", MessageFormatter::format_help());
                    }
                    Command::Unknown(input) => {
                        println!("Unknown command: {} (try /help)", input);
                    }
                    Command::Leave => {
                        println!("Left room '{}'. /quit to exit.", config.room);
                    }
                    Command::Chat(_) | Command::SetMedia { .. } => {}
                }

                match encode_command(&command) {
                    Ok(Some(frame)) => {
                        if let Err(e) = send_text(&mut write, frame).await {
                            read_task.abort();
                            return Err(e);
                        }
                    }
                    Ok(None) => {}
                    Err(e) => tracing::error!("Failed to serialize command: {}", e),
                }
                redisplay_prompt(&config.username);
            }
        }
    }
}

async fn send_text(
    write: &mut SplitSink<WsStream, Message>,
    text: String,
) -> Result<(), ClientError> {
    write.send(Message::Text(text.into())).await.map_err(|e| {
        tracing::warn!("Failed to send message: {}", e);
        ClientError::ConnectionError(e.to_string())
    })
}

async fn close(write: &mut SplitSink<WsStream, Message>) {
    if let Err(e) = write.send(Message::Close(None)).await {
        tracing::debug!("Failed to send close frame: {}", e);
    }
}

/// Print every frame received from the relay until the connection ends.
async fn read_loop(mut read: SplitStream<WsStream>, room: String, username: String) {
    let mut roster = Roster::default();

    while let Some(message) = read.next().await {
        let output = match message {
            Ok(Message::Text(text)) => describe_frame(&mut roster, &room, text.as_str()),
            Ok(Message::Binary(data)) => MessageFormatter::format_binary_message(data.len()),
            Ok(Message::Close(_)) => {
                tracing::info!("Server closed the connection");
                break;
            }
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!("WebSocket read error: {}", e);
                break;
            }
        };
        print!("{}", output);
        redisplay_prompt(&username);
    }
}

/// Render one server frame, updating the roster along the way.
fn describe_frame(roster: &mut Roster, room: &str, text: &str) -> String {
    let message = match ServerMessage::parse(text) {
        Ok(message) => message,
        Err(_) => return MessageFormatter::format_raw_message(text),
    };

    match message {
        ServerMessage::ExistingParticipants(payload) => {
            roster.reset(&payload.participants, &payload.self_id);
            MessageFormatter::format_room_joined(room, &payload.participants)
        }
        ServerMessage::NewParticipant(participant) => {
            roster.insert(&participant);
            tracing::debug!("{} other participant(s) in room", roster.len());
            MessageFormatter::format_participant_joined(&participant)
        }
        ServerMessage::ParticipantLeft(payload) => {
            let name = roster.remove(&payload.id).unwrap_or(payload.id);
            MessageFormatter::format_participant_left(&name)
        }
        ServerMessage::NewMessage(message) => {
            let is_me = roster.is_self(&message.sender_id);
            MessageFormatter::format_chat_message(&message, is_me)
        }
        ServerMessage::ParticipantStateChanged(payload) => MessageFormatter::format_state_changed(
            &roster.name_of(&payload.participant_id),
            payload.state.get(),
        ),
        ServerMessage::Signal(payload) => {
            MessageFormatter::format_signal(&roster.name_of(&payload.from), payload.signal.get())
        }
    }
}
