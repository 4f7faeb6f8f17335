//! Parsing of terminal input lines.
//!
//! Lines starting with `/` are commands; anything else is a chat message.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `/rooms`
    Rooms,
    /// `/create <name>`; the name may contain spaces
    Create(String),
    /// `/join <room_id>`
    Join(String),
    /// `/move <x> <y>`
    Move { x: f64, y: f64 },
    /// `/leave`
    Leave,
    /// `/who`
    Who,
    /// `/dismiss`
    Dismiss,
    Chat(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("unknown command '/{0}' (try /rooms, /create, /join, /move, /leave, /who, /dismiss)")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    MissingArgument(&'static str),

    #[error("'{0}' is not a number")]
    InvalidNumber(String),
}

pub fn parse_command(line: &str) -> Result<Command, CommandParseError> {
    let Some(rest) = line.trim().strip_prefix('/') else {
        return Ok(Command::Chat(line.to_string()));
    };
    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    match name {
        "rooms" => Ok(Command::Rooms),
        "create" => {
            if args.is_empty() {
                return Err(CommandParseError::MissingArgument("/create <name>"));
            }
            Ok(Command::Create(args.to_string()))
        }
        "join" => match args.split_whitespace().next() {
            Some(room_id) => Ok(Command::Join(room_id.to_string())),
            None => Err(CommandParseError::MissingArgument("/join <room_id>")),
        },
        "move" => {
            let mut coords = args.split_whitespace();
            let (Some(x), Some(y)) = (coords.next(), coords.next()) else {
                return Err(CommandParseError::MissingArgument("/move <x> <y>"));
            };
            Ok(Command::Move {
                x: parse_coordinate(x)?,
                y: parse_coordinate(y)?,
            })
        }
        "leave" => Ok(Command::Leave),
        "who" => Ok(Command::Who),
        "dismiss" => Ok(Command::Dismiss),
        other => Err(CommandParseError::UnknownCommand(other.to_string())),
    }
}

fn parse_coordinate(value: &str) -> Result<f64, CommandParseError> {
    value
        .parse::<f64>()
        .map_err(|_| CommandParseError::InvalidNumber(value.to_string()))
}
