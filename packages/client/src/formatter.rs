//! Message formatting utilities for client display.

use roomcast_server::infrastructure::dto::websocket::{CloseReason, RoomListing};
use roomcast_shared::time::timestamp_to_rfc3339;

use crate::mirror::{
    ChatEntry, MirrorEvent, MirroredPlayer, MirroredRoom, Notice, SessionMirror,
};

const SEPARATOR: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Render one mirror event, marking the caller's own entries with "(me)"
    pub fn format_event(event: &MirrorEvent, mirror: &SessionMirror) -> String {
        match event {
            MirrorEvent::Connected { player_id } => {
                format!("\nConnected as player '{}'\n", player_id)
            }
            MirrorEvent::EnteredRoom {
                room,
                players,
                created,
            } => Self::format_entered_room(room, players, *created, mirror.my_player_id()),
            MirrorEvent::PlayerJoined(player) => {
                format!("\n+ {} joined at ({}, {})\n", player.name, player.x, player.y)
            }
            MirrorEvent::PlayerMoved {
                player_name, x, y, ..
            } => format!("\n~ {} moved to ({}, {})\n", player_name, x, y),
            MirrorEvent::PlayerLeft { player_name, .. } => format!("\n- {} left\n", player_name),
            MirrorEvent::LeftRoom { room_id } => format!("\nYou left room {}\n", room_id),
            MirrorEvent::RoomClosed { room_id, reason } => {
                Self::format_room_closed(room_id, *reason)
            }
            MirrorEvent::RoomsListed(rooms) => Self::format_rooms_list(rooms),
            MirrorEvent::Chat(entry) => {
                Self::format_chat_message(entry, mirror.is_me(&entry.player_id))
            }
            MirrorEvent::Notice(notice) => Self::format_notice(notice),
        }
    }

    /// Format the room header and member list shown on entering a room
    pub fn format_entered_room(
        room: &MirroredRoom,
        players: &[MirroredPlayer],
        created: bool,
        my_player_id: Option<&str>,
    ) -> String {
        let verb = if created { "Created" } else { "Joined" };
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", SEPARATOR));
        output.push_str(&format!(
            "{} room '{}' ({}) - created at {}\n",
            verb,
            room.name,
            room.id,
            timestamp_to_rfc3339(room.created_at)
        ));
        output.push_str(&Self::format_players(players, room.max_players, my_player_id));
        output.push_str(&format!("{}\n", SEPARATOR));
        output
    }

    /// Format the member list with the caller marked
    pub fn format_players(
        players: &[MirroredPlayer],
        max_players: u32,
        my_player_id: Option<&str>,
    ) -> String {
        let mut output = format!("Players ({}/{}):\n", players.len(), max_players);
        if players.is_empty() {
            output.push_str("(No players)\n");
        }
        for player in players {
            let me_suffix = if Some(player.id.as_str()) == my_player_id {
                " (me)"
            } else {
                ""
            };
            output.push_str(&format!(
                "{}{} at ({}, {})\n",
                player.name, me_suffix, player.x, player.y
            ));
        }
        output
    }

    /// Format the answer to `/who`
    pub fn format_who(mirror: &SessionMirror) -> String {
        match mirror.room() {
            Some(room) => format!(
                "\nRoom '{}' ({})\n{}",
                room.name,
                room.id,
                Self::format_players(mirror.players(), room.max_players, mirror.my_player_id())
            ),
            None => "\nYou are not in a room. Use /create <name> or /join <room_id>.\n"
                .to_string(),
        }
    }

    pub fn format_rooms_list(rooms: &[RoomListing]) -> String {
        let mut output = format!("\n{}\nRooms:\n", SEPARATOR);
        if rooms.is_empty() {
            output.push_str("(No rooms)\n");
        }
        for room in rooms {
            output.push_str(&format!(
                "{} - {} ({}/{})\n",
                room.id, room.name, room.player_count, room.max_players
            ));
        }
        output.push_str(&format!("{}\n", SEPARATOR));
        output
    }

    /// Format a chat message
    pub fn format_chat_message(entry: &ChatEntry, is_me: bool) -> String {
        let me_suffix = if is_me { " (me)" } else { "" };
        format!(
            "\n@{}{}: {}\nsent at {}\n",
            entry.player_name,
            me_suffix,
            entry.content,
            timestamp_to_rfc3339(entry.sent_at)
        )
    }

    pub fn format_room_closed(room_id: &str, reason: CloseReason) -> String {
        let reason = match reason {
            CloseReason::IdleTimeout => "idle timeout",
        };
        format!("\nRoom {} was closed ({})\n", room_id, reason)
    }

    /// Format an error notice; `/dismiss` clears them
    pub fn format_notice(notice: &Notice) -> String {
        format!("\n! [{}] {}\n", notice.code, notice.message)
    }

    /// Format a problem detected locally before sending
    pub fn format_local_error(error: &dyn std::error::Error) -> String {
        format!("\n! {}\n", error)
    }
}

#[cfg(test)]
mod tests {
    use roomcast_server::infrastructure::dto::websocket::{ErrorCode, RoomSnapshot, ServerFrame};

    use super::*;

    fn mirror_with_room() -> SessionMirror {
        let mut mirror = SessionMirror::new("Alice");
        mirror.on_connecting();
        mirror.apply(ServerFrame::Connected {
            connection_id: "alice".to_string(),
        });
        mirror.apply(ServerFrame::RoomCreated {
            room_id: "r1".to_string(),
            room: RoomSnapshot {
                id: "r1".to_string(),
                name: "Algebra".to_string(),
                players: Vec::new(),
                max_players: 4,
                created_at: 0,
            },
        });
        mirror
    }

    #[test]
    fn test_format_entered_room_marks_me() {
        // テスト項目: 入室時のメンバー一覧で自分に "(me)" が付く
        // given (前提条件):
        let room = MirroredRoom {
            id: "r1".to_string(),
            name: "Algebra".to_string(),
            max_players: 4,
            created_at: 0,
        };
        let players = vec![
            MirroredPlayer {
                id: "alice".to_string(),
                name: "Alice".to_string(),
                x: 400.0,
                y: 300.0,
            },
            MirroredPlayer {
                id: "bob".to_string(),
                name: "Bob".to_string(),
                x: 10.0,
                y: 20.0,
            },
        ];

        // when (操作):
        let result = MessageFormatter::format_entered_room(&room, &players, false, Some("bob"));

        // then (期待する結果):
        assert!(result.contains("Joined room 'Algebra' (r1)"));
        assert!(result.contains("Players (2/4):"));
        assert!(result.contains("Alice at (400, 300)\n"));
        assert!(result.contains("Bob (me) at (10, 20)\n"));
        assert!(result.contains(SEPARATOR));
    }

    #[test]
    fn test_format_rooms_list() {
        // テスト項目: ルーム一覧は ID・名前・人数を表示し、空の場合はその旨を表示する
        // given (前提条件):
        let rooms = vec![RoomListing {
            id: "r1".to_string(),
            name: "Algebra".to_string(),
            player_count: 2,
            max_players: 10,
        }];

        // when (操作):
        let listed = MessageFormatter::format_rooms_list(&rooms);
        let empty = MessageFormatter::format_rooms_list(&[]);

        // then (期待する結果):
        assert!(listed.contains("r1 - Algebra (2/10)\n"));
        assert!(empty.contains("(No rooms)\n"));
    }

    #[test]
    fn test_format_chat_message() {
        // テスト項目: チャットは送信者名・本文・送信時刻を表示する
        // given (前提条件):
        let entry = ChatEntry {
            player_id: "alice".to_string(),
            player_name: "Alice".to_string(),
            content: "hello".to_string(),
            sent_at: 0,
        };

        // when (操作):
        let result = MessageFormatter::format_chat_message(&entry, true);

        // then (期待する結果):
        assert_eq!(
            result,
            "\n@Alice (me): hello\nsent at 1970-01-01T00:00:00+00:00\n"
        );
    }

    #[test]
    fn test_format_notice_and_room_closed() {
        // テスト項目: エラー通知とルーム閉鎖の表示
        // given (前提条件):
        let notice = Notice {
            id: 1,
            code: ErrorCode::RoomFull,
            message: "room 'r1' is full".to_string(),
        };

        // when (操作):
        let notice_text = MessageFormatter::format_notice(&notice);
        let closed_text = MessageFormatter::format_room_closed("r1", CloseReason::IdleTimeout);

        // then (期待する結果):
        assert_eq!(notice_text, "\n! [room-full] room 'r1' is full\n");
        assert_eq!(closed_text, "\nRoom r1 was closed (idle timeout)\n");
    }

    #[test]
    fn test_format_who() {
        // テスト項目: /who はルーム内ではメンバー一覧、ルーム外では案内を表示する
        // given (前提条件):
        let in_room = mirror_with_room();
        let lobby = SessionMirror::new("Bob");

        // when (操作):
        let who = MessageFormatter::format_who(&in_room);
        let nobody = MessageFormatter::format_who(&lobby);

        // then (期待する結果):
        assert!(who.contains("Room 'Algebra' (r1)"));
        assert!(who.contains("(No players)"));
        assert!(nobody.contains("You are not in a room"));
    }

    #[test]
    fn test_format_event_dispatches_by_kind() {
        // テスト項目: format_event はイベント種別ごとの表示に振り分ける
        // given (前提条件):
        let mirror = mirror_with_room();
        let event = MirrorEvent::PlayerMoved {
            player_id: "bob".to_string(),
            player_name: "Bob".to_string(),
            x: 1.5,
            y: 2.0,
        };

        // when (操作):
        let result = MessageFormatter::format_event(&event, &mirror);

        // then (期待する結果):
        assert_eq!(result, "\n~ Bob moved to (1.5, 2)\n");
    }
}
