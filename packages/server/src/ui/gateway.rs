//! Connection Gateway
//!
//! One task owns every connection's state and processes commands strictly in
//! arrival order. Each command runs its use case and enqueues the resulting
//! frames before the next command starts, which keeps per-room delivery
//! order equal to the order in which mutations happened.
//!
//! WebSocket handlers and the idle reaper talk to the gateway only through a
//! [`GatewayHandle`].

use std::{collections::HashMap, sync::Arc, time::Duration};

use roomcast_shared::time::Clock;
use thiserror::Error;
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};

use crate::{
    domain::{ConnectionId, PusherChannel, RegistryError, RoomId, RoomRepository, ValueObjectError},
    infrastructure::dto::websocket::{
        ClientFrame, CloseReason, ErrorCode, PlayerSnapshot, RoomListing, RoomSnapshot,
        ServerFrame,
    },
    usecase::{
        Audience, BroadcastRouter, ConnectConnectionUseCase, CreateRoomUseCase,
        DisconnectConnectionUseCase, JoinRoomUseCase, LeaveRoomUseCase, ListRoomsUseCase,
        MovePlayerUseCase, ReapIdleRoomsUseCase, SendChatUseCase,
    },
};

/// Request-level failures, reported to the requesting connection only
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("not in room '{0}'")]
    NotInRoom(String),

    #[error("already in room '{0}'")]
    AlreadyInRoom(String),

    #[error("malformed frame: {0}")]
    Malformed(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl GatewayError {
    pub fn code(&self) -> ErrorCode {
        match self {
            GatewayError::NotInRoom(_) => ErrorCode::NotInRoom,
            GatewayError::AlreadyInRoom(_) => ErrorCode::AlreadyInRoom,
            GatewayError::Malformed(_) => ErrorCode::InvalidInput,
            GatewayError::Registry(RegistryError::RoomNotFound(_)) => ErrorCode::RoomNotFound,
            GatewayError::Registry(RegistryError::RoomFull(_)) => ErrorCode::RoomFull,
            GatewayError::Registry(RegistryError::PlayerNotFound(_)) => ErrorCode::PlayerNotFound,
            GatewayError::Registry(RegistryError::InvalidInput(_)) => ErrorCode::InvalidInput,
        }
    }
}

/// The gateway task is no longer running
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayUnavailable {
    #[error("gateway has stopped")]
    Stopped,

    #[error("could not assign a connection id: {0}")]
    Identity(#[from] ValueObjectError),
}

/// Room membership of one connection, as seen by the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    NoRoom,
    InRoom(RoomId),
}

impl ConnectionState {
    fn require_no_room(&self) -> Result<(), GatewayError> {
        match self {
            ConnectionState::NoRoom => Ok(()),
            ConnectionState::InRoom(current) => {
                Err(GatewayError::AlreadyInRoom(current.as_str().to_string()))
            }
        }
    }

    /// The current room, provided it is the one the frame names
    fn require_room(&self, requested: &str) -> Result<RoomId, GatewayError> {
        match self {
            ConnectionState::InRoom(current) if current.as_str() == requested => {
                Ok(current.clone())
            }
            _ => Err(GatewayError::NotInRoom(requested.to_string())),
        }
    }
}

pub enum Command {
    Connect {
        sender: PusherChannel,
        reply: oneshot::Sender<Result<ConnectionId, ValueObjectError>>,
    },
    Inbound {
        connection_id: ConnectionId,
        text: String,
    },
    /// A frame the transport could not hand over as text
    Reject {
        connection_id: ConnectionId,
        reason: String,
    },
    Disconnect {
        connection_id: ConnectionId,
    },
    Sweep {
        reply: Option<oneshot::Sender<usize>>,
    },
    Stop,
}

/// Cloneable front door to the gateway task
#[derive(Clone)]
pub struct GatewayHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl GatewayHandle {
    /// Register a new connection; its first frame will be `connected`
    pub async fn connect(&self, sender: PusherChannel) -> Result<ConnectionId, GatewayUnavailable> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Connect { sender, reply })?;
        let connection_id = response.await.map_err(|_| GatewayUnavailable::Stopped)??;
        Ok(connection_id)
    }

    pub fn inbound(&self, connection_id: ConnectionId, text: String) -> Result<(), GatewayUnavailable> {
        self.send(Command::Inbound {
            connection_id,
            text,
        })
    }

    pub fn reject(&self, connection_id: ConnectionId, reason: String) -> Result<(), GatewayUnavailable> {
        self.send(Command::Reject {
            connection_id,
            reason,
        })
    }

    pub fn disconnect(&self, connection_id: ConnectionId) -> Result<(), GatewayUnavailable> {
        self.send(Command::Disconnect { connection_id })
    }

    /// Queue a sweep and wait until it has run; returns the number of rooms removed
    pub async fn sweep(&self) -> Result<usize, GatewayUnavailable> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Sweep { reply: Some(reply) })?;
        response.await.map_err(|_| GatewayUnavailable::Stopped)
    }

    pub fn stop(&self) -> Result<(), GatewayUnavailable> {
        self.send(Command::Stop)
    }

    fn send(&self, command: Command) -> Result<(), GatewayUnavailable> {
        self.tx
            .send(command)
            .map_err(|_| GatewayUnavailable::Stopped)
    }
}

pub struct Gateway {
    connections: HashMap<ConnectionId, ConnectionState>,
    router: Arc<BroadcastRouter>,
    connect: ConnectConnectionUseCase,
    create_room: CreateRoomUseCase,
    join_room: JoinRoomUseCase,
    move_player: MovePlayerUseCase,
    leave_room: LeaveRoomUseCase,
    send_chat: SendChatUseCase,
    list_rooms: ListRoomsUseCase,
    disconnect: DisconnectConnectionUseCase,
    reap: ReapIdleRoomsUseCase,
}

impl Gateway {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        router: Arc<BroadcastRouter>,
        clock: Arc<dyn Clock>,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            connections: HashMap::new(),
            connect: ConnectConnectionUseCase::new(router.clone()),
            create_room: CreateRoomUseCase::new(repository.clone(), clock.clone()),
            join_room: JoinRoomUseCase::new(repository.clone(), clock.clone()),
            move_player: MovePlayerUseCase::new(repository.clone()),
            leave_room: LeaveRoomUseCase::new(repository.clone()),
            send_chat: SendChatUseCase::new(repository.clone(), clock.clone()),
            list_rooms: ListRoomsUseCase::new(repository.clone()),
            disconnect: DisconnectConnectionUseCase::new(repository.clone(), router.clone()),
            reap: ReapIdleRoomsUseCase::new(repository, clock, idle_timeout),
            router,
        }
    }

    /// Start the gateway task
    pub fn spawn(self) -> (GatewayHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(self.run(rx));
        (GatewayHandle { tx }, task)
    }

    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Command>) {
        tracing::debug!("Gateway started");
        while let Some(command) = rx.recv().await {
            if matches!(command, Command::Stop) {
                break;
            }
            self.handle_command(command).await;
        }
        tracing::info!(
            "Gateway stopped with {} open connection(s)",
            self.connections.len()
        );
    }

    pub async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Connect { sender, reply } => {
                let result = self.accept(sender).await;
                if let Err(e) = &result {
                    tracing::error!("Failed to accept connection: {}", e);
                }
                if let Err(Ok(connection_id)) = reply.send(result) {
                    // the socket went away before it learned its id
                    self.close(&connection_id).await;
                }
            }
            Command::Inbound {
                connection_id,
                text,
            } => self.handle_inbound(&connection_id, &text).await,
            Command::Reject {
                connection_id,
                reason,
            } => {
                self.reply_error(&connection_id, &GatewayError::Malformed(reason))
                    .await
            }
            Command::Disconnect { connection_id } => self.close(&connection_id).await,
            Command::Sweep { reply } => {
                let removed = self.sweep().await;
                if let Some(reply) = reply {
                    let _ = reply.send(removed);
                }
            }
            Command::Stop => {}
        }
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn state_of(&self, connection_id: &ConnectionId) -> Option<&ConnectionState> {
        self.connections.get(connection_id)
    }

    pub async fn accept(&mut self, sender: PusherChannel) -> Result<ConnectionId, ValueObjectError> {
        let connection_id = self.connect.execute(sender).await?;
        self.connections
            .insert(connection_id.clone(), ConnectionState::NoRoom);
        self.send(
            &connection_id,
            &ServerFrame::Connected {
                connection_id: connection_id.as_str().to_string(),
            },
        )
        .await;
        Ok(connection_id)
    }

    pub async fn handle_inbound(&mut self, connection_id: &ConnectionId, text: &str) {
        let frame = match ClientFrame::decode(text) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::debug!("Malformed frame from '{}': {}", connection_id, e);
                self.reply_error(connection_id, &GatewayError::Malformed(e.to_string()))
                    .await;
                return;
            }
        };
        if let Err(e) = self.dispatch(connection_id, frame).await {
            self.reply_error(connection_id, &e).await;
        }
    }

    async fn dispatch(
        &mut self,
        connection_id: &ConnectionId,
        frame: ClientFrame,
    ) -> Result<(), GatewayError> {
        let Some(state) = self.connections.get(connection_id).cloned() else {
            tracing::debug!("Ignoring frame from closed connection '{}'", connection_id);
            return Ok(());
        };

        match frame {
            ClientFrame::CreateRoom {
                room_name,
                player_name,
                max_players,
            } => {
                state.require_no_room()?;
                let room = self
                    .create_room
                    .execute(connection_id.clone(), room_name, player_name, max_players)
                    .await?;
                self.set_state(connection_id, ConnectionState::InRoom(room.id.clone()));
                self.send(
                    connection_id,
                    &ServerFrame::RoomCreated {
                        room_id: room.id.as_str().to_string(),
                        room: RoomSnapshot::from(&room),
                    },
                )
                .await;
            }
            ClientFrame::JoinRoom {
                room_id,
                player_name,
            } => {
                state.require_no_room()?;
                let outcome = self
                    .join_room
                    .execute(connection_id.clone(), room_id, player_name)
                    .await?;
                self.set_state(
                    connection_id,
                    ConnectionState::InRoom(outcome.room.id.clone()),
                );
                self.send(
                    connection_id,
                    &ServerFrame::RoomJoined {
                        room_id: outcome.room.id.as_str().to_string(),
                        room: RoomSnapshot::from(&outcome.room),
                    },
                )
                .await;
                self.broadcast(
                    &outcome.room.member_ids(),
                    Audience::AllExcept(connection_id.clone()),
                    &ServerFrame::PlayerJoined {
                        player: PlayerSnapshot::from(&outcome.player),
                    },
                )
                .await;
            }
            ClientFrame::PlayerMove { room_id, x, y } => {
                let room_id = state.require_room(&room_id)?;
                let outcome = self
                    .move_player
                    .execute(&room_id, connection_id, x, y)
                    .await
                    .map_err(|e| self.forget_stale_room(connection_id, e))?;
                self.broadcast(
                    &outcome.peers,
                    Audience::Everyone,
                    &ServerFrame::PlayerMoved {
                        player_id: outcome.player.id.as_str().to_string(),
                        x: outcome.player.position.x,
                        y: outcome.player.position.y,
                    },
                )
                .await;
            }
            ClientFrame::LeaveRoom { room_id } => {
                let room_id = state.require_room(&room_id)?;
                let removal = self
                    .leave_room
                    .execute(&room_id, connection_id)
                    .await
                    .map_err(|e| self.forget_stale_room(connection_id, e))?;
                self.set_state(connection_id, ConnectionState::NoRoom);
                self.send(
                    connection_id,
                    &ServerFrame::RoomLeft {
                        room_id: room_id.as_str().to_string(),
                    },
                )
                .await;
                self.broadcast(
                    &removal.remaining,
                    Audience::Everyone,
                    &ServerFrame::PlayerLeft {
                        player_id: removal.player.id.as_str().to_string(),
                        player_name: removal.player.name.as_str().to_string(),
                    },
                )
                .await;
            }
            ClientFrame::GetRooms => {
                let rooms = self
                    .list_rooms
                    .execute()
                    .await
                    .into_iter()
                    .map(RoomListing::from)
                    .collect();
                self.send(connection_id, &ServerFrame::RoomsList { rooms })
                    .await;
            }
            ClientFrame::ChatMessage { room_id, content } => {
                let room_id = state.require_room(&room_id)?;
                let posted = self
                    .send_chat
                    .execute(&room_id, connection_id, content)
                    .await
                    .map_err(|e| self.forget_stale_room(connection_id, e))?;
                self.broadcast(
                    &posted.members,
                    Audience::Everyone,
                    &ServerFrame::ChatMessage {
                        room_id: room_id.as_str().to_string(),
                        player_id: posted.sender.id.as_str().to_string(),
                        player_name: posted.sender.name.as_str().to_string(),
                        content: posted.content.into_string(),
                        sent_at: posted.sent_at.value(),
                    },
                )
                .await;
            }
        }
        Ok(())
    }

    /// Tolerant cleanup of one connection; repeated calls are no-ops
    pub async fn close(&mut self, connection_id: &ConnectionId) {
        self.connections.remove(connection_id);
        if let Some(removal) = self.disconnect.execute(connection_id).await {
            self.broadcast(
                &removal.remaining,
                Audience::Everyone,
                &ServerFrame::PlayerLeft {
                    player_id: removal.player.id.as_str().to_string(),
                    player_name: removal.player.name.as_str().to_string(),
                },
            )
            .await;
        }
    }

    /// Evict idle rooms and tell their remaining members
    pub async fn sweep(&mut self) -> usize {
        let removed = self.reap.execute().await;
        for room in &removed {
            let members = room.member_ids();
            if members.is_empty() {
                continue;
            }
            for member in &members {
                if self.connections.get(member) == Some(&ConnectionState::InRoom(room.id.clone())) {
                    self.set_state(member, ConnectionState::NoRoom);
                }
            }
            self.broadcast(
                &members,
                Audience::Everyone,
                &ServerFrame::RoomClosed {
                    room_id: room.id.as_str().to_string(),
                    reason: CloseReason::IdleTimeout,
                },
            )
            .await;
        }
        removed.len()
    }

    fn set_state(&mut self, connection_id: &ConnectionId, state: ConnectionState) {
        if let Some(current) = self.connections.get_mut(connection_id) {
            *current = state;
        }
    }

    /// The registry no longer knows this membership; fall back to no room
    fn forget_stale_room(&mut self, connection_id: &ConnectionId, error: RegistryError) -> GatewayError {
        if matches!(
            error,
            RegistryError::RoomNotFound(_) | RegistryError::PlayerNotFound(_)
        ) {
            self.set_state(connection_id, ConnectionState::NoRoom);
        }
        GatewayError::from(error)
    }

    async fn reply_error(&self, connection_id: &ConnectionId, error: &GatewayError) {
        tracing::debug!("Request from '{}' failed: {}", connection_id, error);
        self.send(connection_id, &ServerFrame::error(error.code(), error.to_string()))
            .await;
    }

    async fn send(&self, connection_id: &ConnectionId, frame: &ServerFrame) {
        if let Some(encoded) = encode(frame) {
            self.router.send_to(connection_id, &encoded).await;
        }
    }

    async fn broadcast(&self, members: &[ConnectionId], audience: Audience, frame: &ServerFrame) {
        if let Some(encoded) = encode(frame) {
            self.router.to_room(members, audience, &encoded).await;
        }
    }
}

fn encode(frame: &ServerFrame) -> Option<String> {
    match frame.encode() {
        Ok(encoded) => Some(encoded),
        Err(e) => {
            tracing::error!("Failed to encode frame: {}", e);
            None
        }
    }
}
