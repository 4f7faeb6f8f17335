//! One WebSocket connection to the server.
//!
//! Inbound frames are folded into the [`SessionMirror`] and printed; input
//! lines are turned into commands and, when the mirror allows it, sent.

use futures_util::{SinkExt, StreamExt};
use roomcast_server::infrastructure::dto::websocket::{ClientFrame, ServerFrame};
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, protocol::Message},
};

use crate::{
    command::{Command, parse_command},
    error::ClientError,
    formatter::MessageFormatter,
    mirror::SessionMirror,
    ui::redisplay_prompt,
};

/// What to do with one line of user input
#[derive(Debug, Clone, PartialEq)]
pub enum InputAction {
    Send(ClientFrame),
    Print(String),
}

/// Turn an input line into a frame to send or text to show locally
pub fn handle_input(line: &str, mirror: &mut SessionMirror) -> InputAction {
    let command = match parse_command(line) {
        Ok(command) => command,
        Err(e) => return InputAction::Print(MessageFormatter::format_local_error(&e)),
    };

    let intent = match command {
        Command::Rooms => mirror.request_rooms(),
        Command::Create(name) => mirror.create_room(&name, None),
        Command::Join(room_id) => mirror.join_room(&room_id),
        Command::Move { x, y } => mirror.move_to(x, y),
        Command::Leave => mirror.leave_room(),
        Command::Chat(content) => mirror.send_chat(&content),
        Command::Who => return InputAction::Print(MessageFormatter::format_who(mirror)),
        Command::Dismiss => {
            let count = mirror.dismiss_all_notices();
            return InputAction::Print(format!("\nDismissed {} notice(s)\n", count));
        }
    };

    match intent {
        Ok(frame) => InputAction::Send(frame),
        Err(e) => InputAction::Print(MessageFormatter::format_local_error(&e)),
    }
}

/// Run the WebSocket client session until the user exits or the link fails.
///
/// Returns `Ok(())` when the input channel closes.
pub async fn run_client_session(
    url: &str,
    mirror: &mut SessionMirror,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url).await.map_err(|e| match e {
        tungstenite::Error::Url(_) => ClientError::InvalidUrl(url.to_string()),
        other => ClientError::ConnectionError(other.to_string()),
    })?;

    tracing::info!("Connected to room server!");
    println!(
        "\nYou are '{}'. Type /rooms, /create <name>, /join <room_id>, /move <x> <y>, /leave, /who, /dismiss or a chat message. Press Ctrl+C to exit.\n",
        mirror.player_name()
    );

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            message = read.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    match ServerFrame::decode(&text) {
                        Ok(frame) => {
                            for event in mirror.apply(frame) {
                                print!("{}", MessageFormatter::format_event(&event, mirror));
                            }
                        }
                        Err(e) => tracing::warn!("Ignoring unreadable frame: {}", e),
                    }
                    redisplay_prompt(mirror.player_name());
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Server closed the connection");
                    return Err(ClientError::ConnectionLost);
                }
                Some(Err(e)) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    return Err(ClientError::ConnectionLost);
                }
                Some(Ok(_)) => {}
            },
            line = input_rx.recv() => {
                let Some(line) = line else {
                    write.send(Message::Close(None)).await.ok();
                    return Ok(());
                };
                match handle_input(&line, mirror) {
                    InputAction::Send(frame) => {
                        let json = match frame.encode() {
                            Ok(json) => json,
                            Err(e) => {
                                tracing::error!("Failed to serialize frame: {}", e);
                                continue;
                            }
                        };
                        if let Err(e) = write.send(Message::Text(json.into())).await {
                            tracing::warn!("Failed to send frame: {}", e);
                            return Err(ClientError::ConnectionLost);
                        }
                    }
                    InputAction::Print(text) => {
                        print!("{}", text);
                        redisplay_prompt(mirror.player_name());
                    }
                }
            }
        }
    }
}
