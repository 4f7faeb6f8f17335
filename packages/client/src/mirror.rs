//! Session Mirror
//!
//! クライアント側で「自分のルーム」と「現在のメンバー」を保持するレプリカです。
//! 状態はサーバーから届いたフレームによってのみ変化します（楽観的更新はしません）。
//! インテントはローカルの前提条件を確認し、送信すべきフレームを返すだけです。

use std::collections::VecDeque;

use roomcast_server::{
    domain::{ChatContent, PlayerName, Position, RoomName, ValueObjectError},
    infrastructure::dto::websocket::{
        ClientFrame, CloseReason, ErrorCode, PlayerSnapshot, RoomListing, RoomSnapshot, ServerFrame,
    },
};
use thiserror::Error;

/// Chat entries kept for `/who` style redraws
pub const CHAT_LOG_CAPACITY: usize = 100;

/// Undismissed notices kept; older ones are dropped first
pub const NOTICE_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    InRoom,
}

/// Local preconditions that failed before anything was sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    #[error("not connected to the server")]
    NotConnected,

    #[error("already in a room; leave it first")]
    AlreadyInRoom,

    #[error("not in a room")]
    NotInRoom,

    #[error("room id must not be empty")]
    EmptyRoomId,

    #[error(transparent)]
    Invalid(#[from] ValueObjectError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MirroredRoom {
    pub id: String,
    pub name: String,
    pub max_players: u32,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MirroredPlayer {
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
}

impl From<PlayerSnapshot> for MirroredPlayer {
    fn from(player: PlayerSnapshot) -> Self {
        Self {
            id: player.id,
            name: player.name,
            x: player.x,
            y: player.y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub player_id: String,
    pub player_name: String,
    pub content: String,
    pub sent_at: i64,
}

/// An error frame waiting to be dismissed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub code: ErrorCode,
    pub message: String,
}

/// What changed after applying a frame; consumed by the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum MirrorEvent {
    Connected {
        player_id: String,
    },
    EnteredRoom {
        room: MirroredRoom,
        players: Vec<MirroredPlayer>,
        created: bool,
    },
    PlayerJoined(MirroredPlayer),
    PlayerMoved {
        player_id: String,
        player_name: String,
        x: f64,
        y: f64,
    },
    PlayerLeft {
        player_id: String,
        player_name: String,
    },
    LeftRoom {
        room_id: String,
    },
    RoomClosed {
        room_id: String,
        reason: CloseReason,
    },
    RoomsListed(Vec<RoomListing>),
    Chat(ChatEntry),
    Notice(Notice),
}

pub struct SessionMirror {
    player_name: String,
    status: ConnectionStatus,
    my_player_id: Option<String>,
    room: Option<MirroredRoom>,
    players: Vec<MirroredPlayer>,
    rooms: Vec<RoomListing>,
    chat_log: VecDeque<ChatEntry>,
    notices: Vec<Notice>,
    next_notice_id: u64,
}

impl SessionMirror {
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            status: ConnectionStatus::Disconnected,
            my_player_id: None,
            room: None,
            players: Vec::new(),
            rooms: Vec::new(),
            chat_log: VecDeque::new(),
            notices: Vec::new(),
            next_notice_id: 1,
        }
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn my_player_id(&self) -> Option<&str> {
        self.my_player_id.as_deref()
    }

    pub fn room(&self) -> Option<&MirroredRoom> {
        self.room.as_ref()
    }

    /// Members of the current room in arrival order
    pub fn players(&self) -> &[MirroredPlayer] {
        &self.players
    }

    /// Last rooms list received
    pub fn rooms(&self) -> &[RoomListing] {
        &self.rooms
    }

    pub fn chat_log(&self) -> impl Iterator<Item = &ChatEntry> {
        self.chat_log.iter()
    }

    /// Undismissed notices, oldest first
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn is_me(&self, player_id: &str) -> bool {
        self.my_player_id.as_deref() == Some(player_id)
    }

    // ---- transport lifecycle ----

    pub fn on_connecting(&mut self) {
        self.status = ConnectionStatus::Connecting;
    }

    /// Connection dropped; room state is stale until the server says otherwise
    pub fn on_connection_lost(&mut self) {
        self.status = ConnectionStatus::Connecting;
        self.my_player_id = None;
        self.rooms.clear();
        self.clear_room();
    }

    pub fn on_disconnected(&mut self) {
        self.on_connection_lost();
        self.status = ConnectionStatus::Disconnected;
    }

    // ---- notices ----

    /// Remove one notice; returns false if it was already gone
    pub fn dismiss_notice(&mut self, id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|notice| notice.id != id);
        self.notices.len() != before
    }

    /// Remove every notice and return how many there were
    pub fn dismiss_all_notices(&mut self) -> usize {
        let count = self.notices.len();
        self.notices.clear();
        count
    }

    // ---- intents ----

    pub fn create_room(
        &self,
        room_name: &str,
        max_players: Option<u32>,
    ) -> Result<ClientFrame, IntentError> {
        self.require_lobby()?;
        let room_name = RoomName::new(room_name.to_string())?;
        let player_name = PlayerName::new(self.player_name.clone())?;
        Ok(ClientFrame::CreateRoom {
            room_name: room_name.into_string(),
            player_name: player_name.into_string(),
            max_players,
        })
    }

    pub fn join_room(&self, room_id: &str) -> Result<ClientFrame, IntentError> {
        self.require_lobby()?;
        let room_id = room_id.trim();
        if room_id.is_empty() {
            return Err(IntentError::EmptyRoomId);
        }
        let player_name = PlayerName::new(self.player_name.clone())?;
        Ok(ClientFrame::JoinRoom {
            room_id: room_id.to_string(),
            player_name: player_name.into_string(),
        })
    }

    pub fn leave_room(&self) -> Result<ClientFrame, IntentError> {
        let room_id = self.require_room()?;
        Ok(ClientFrame::LeaveRoom { room_id })
    }

    pub fn move_to(&self, x: f64, y: f64) -> Result<ClientFrame, IntentError> {
        let room_id = self.require_room()?;
        let position = Position::new(x, y)?;
        Ok(ClientFrame::PlayerMove {
            room_id,
            x: position.x,
            y: position.y,
        })
    }

    pub fn send_chat(&self, content: &str) -> Result<ClientFrame, IntentError> {
        let room_id = self.require_room()?;
        let content = ChatContent::new(content.to_string())?;
        Ok(ClientFrame::ChatMessage {
            room_id,
            content: content.into_string(),
        })
    }

    pub fn request_rooms(&self) -> Result<ClientFrame, IntentError> {
        match self.status {
            ConnectionStatus::Connected | ConnectionStatus::InRoom => Ok(ClientFrame::GetRooms),
            _ => Err(IntentError::NotConnected),
        }
    }

    fn require_lobby(&self) -> Result<(), IntentError> {
        match self.status {
            ConnectionStatus::Connected => Ok(()),
            ConnectionStatus::InRoom => Err(IntentError::AlreadyInRoom),
            _ => Err(IntentError::NotConnected),
        }
    }

    fn require_room(&self) -> Result<String, IntentError> {
        match (&self.status, &self.room) {
            (ConnectionStatus::InRoom, Some(room)) => Ok(room.id.clone()),
            (ConnectionStatus::Disconnected | ConnectionStatus::Connecting, _) => {
                Err(IntentError::NotConnected)
            }
            _ => Err(IntentError::NotInRoom),
        }
    }

    // ---- inbound frames ----

    /// Fold one server frame into the mirror
    pub fn apply(&mut self, frame: ServerFrame) -> Vec<MirrorEvent> {
        match frame {
            ServerFrame::Connected { connection_id } => {
                self.status = ConnectionStatus::Connected;
                self.my_player_id = Some(connection_id.clone());
                vec![MirrorEvent::Connected {
                    player_id: connection_id,
                }]
            }
            ServerFrame::RoomCreated { room, .. } => self.enter_room(room, true),
            ServerFrame::RoomJoined { room, .. } => self.enter_room(room, false),
            ServerFrame::PlayerJoined { player } => {
                if !self.in_room(&player.room_id) {
                    return Vec::new();
                }
                let player = MirroredPlayer::from(player);
                match self.players.iter_mut().find(|p| p.id == player.id) {
                    Some(existing) => *existing = player.clone(),
                    None => self.players.push(player.clone()),
                }
                vec![MirrorEvent::PlayerJoined(player)]
            }
            ServerFrame::PlayerMoved { player_id, x, y } => {
                let Some(player) = self.players.iter_mut().find(|p| p.id == player_id) else {
                    return Vec::new();
                };
                player.x = x;
                player.y = y;
                vec![MirrorEvent::PlayerMoved {
                    player_name: player.name.clone(),
                    player_id,
                    x,
                    y,
                }]
            }
            ServerFrame::PlayerLeft {
                player_id,
                player_name,
            } => {
                let before = self.players.len();
                self.players.retain(|p| p.id != player_id);
                if self.players.len() == before {
                    return Vec::new();
                }
                vec![MirrorEvent::PlayerLeft {
                    player_id,
                    player_name,
                }]
            }
            ServerFrame::RoomLeft { room_id } => {
                if !self.in_room(&room_id) {
                    return Vec::new();
                }
                self.clear_room();
                self.status = ConnectionStatus::Connected;
                vec![MirrorEvent::LeftRoom { room_id }]
            }
            ServerFrame::RoomsList { rooms } => {
                self.rooms = rooms.clone();
                vec![MirrorEvent::RoomsListed(rooms)]
            }
            ServerFrame::ChatMessage {
                room_id,
                player_id,
                player_name,
                content,
                sent_at,
            } => {
                if !self.in_room(&room_id) {
                    return Vec::new();
                }
                let entry = ChatEntry {
                    player_id,
                    player_name,
                    content,
                    sent_at,
                };
                if self.chat_log.len() == CHAT_LOG_CAPACITY {
                    self.chat_log.pop_front();
                }
                self.chat_log.push_back(entry.clone());
                vec![MirrorEvent::Chat(entry)]
            }
            ServerFrame::RoomClosed { room_id, reason } => {
                if !self.in_room(&room_id) {
                    return Vec::new();
                }
                self.clear_room();
                self.status = ConnectionStatus::Connected;
                vec![MirrorEvent::RoomClosed { room_id, reason }]
            }
            ServerFrame::Error { code, message } => {
                let notice = Notice {
                    id: self.next_notice_id,
                    code,
                    message,
                };
                self.next_notice_id += 1;
                if self.notices.len() == NOTICE_CAPACITY {
                    self.notices.remove(0);
                }
                self.notices.push(notice.clone());
                vec![MirrorEvent::Notice(notice)]
            }
        }
    }

    fn enter_room(&mut self, room: RoomSnapshot, created: bool) -> Vec<MirrorEvent> {
        let mirrored = MirroredRoom {
            id: room.id,
            name: room.name,
            max_players: room.max_players,
            created_at: room.created_at,
        };
        self.chat_log.clear();
        self.players = room.players.into_iter().map(MirroredPlayer::from).collect();
        self.room = Some(mirrored.clone());
        self.status = ConnectionStatus::InRoom;
        vec![MirrorEvent::EnteredRoom {
            room: mirrored,
            players: self.players.clone(),
            created,
        }]
    }

    fn in_room(&self, room_id: &str) -> bool {
        self.room.as_ref().is_some_and(|room| room.id == room_id)
    }

    fn clear_room(&mut self) {
        self.room = None;
        self.players.clear();
        self.chat_log.clear();
    }
}
