//! Normalization of the server's loosely-shaped JSON into the fixed snapshot
//! types. Responses vary between endpoints and server versions (`current_hp`
//! vs `hp`, `id` vs `character_id`, `round_number` vs `round`); everything
//! behind the gateway boundary sees one shape only.

use serde_json::Value;

use crate::gateway::{CombatRecord, LogEvent, StartReply};
use crate::snapshot::{CharacterSnapshot, GameSnapshot, GameStatus, GridPos, MatchSnapshot};

fn string_of(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| value.get(k).and_then(Value::as_str))
        .map(str::to_string)
}

fn int_of(value: &Value, keys: &[&str], default: i32) -> i32 {
    keys.iter()
        .find_map(|k| value.get(k).and_then(Value::as_i64))
        .map(|n| n as i32)
        .unwrap_or(default)
}

fn position_of(value: &Value) -> GridPos {
    let coords = value.get("position").and_then(Value::as_array);
    match coords.map(Vec::as_slice) {
        Some([x, y, ..]) => GridPos::new(
            x.as_i64().unwrap_or(0) as i32,
            y.as_i64().unwrap_or(0) as i32,
        ),
        _ => GridPos::new(0, 0),
    }
}

pub fn status(value: &Value) -> GameStatus {
    match value.get("status").and_then(Value::as_str) {
        Some("active") => GameStatus::Active,
        Some("completed") => GameStatus::Completed,
        _ => GameStatus::Waiting,
    }
}

pub fn winner_id(value: &Value) -> Option<String> {
    value
        .get("winner_id")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn round_of(value: &Value) -> u32 {
    int_of(value, &["round_number", "round"], 0).max(0) as u32
}

/// A character entry; `None` when there is no usable id.
pub fn character(value: &Value) -> Option<CharacterSnapshot> {
    let id = string_of(value, &["id", "character_id"])?;
    let current_hp = int_of(value, &["current_hp", "hp"], 0);
    Some(CharacterSnapshot {
        id,
        name: string_of(value, &["name"]).unwrap_or_else(|| "?".to_string()),
        position: position_of(value),
        current_hp,
        max_hp: int_of(value, &["max_hp"], current_hp),
        speed: int_of(value, &["speed"], 30),
    })
}

fn characters_of(value: &Value, key: &str) -> Vec<CharacterSnapshot> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(character).collect())
        .unwrap_or_default()
}

pub fn game_snapshot(value: &Value) -> GameSnapshot {
    GameSnapshot {
        status: status(value),
        round: round_of(value),
        is_your_turn: value
            .get("is_your_turn")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        your_character: value.get("your_character").and_then(character),
        visible_characters: characters_of(value, "visible_characters"),
        winner_id: winner_id(value),
    }
}

pub fn match_snapshot(value: &Value) -> MatchSnapshot {
    MatchSnapshot {
        status: status(value),
        round: round_of(value),
        winner_id: winner_id(value),
        characters: characters_of(value, "characters"),
    }
}

pub fn start_reply(value: &Value) -> StartReply {
    let initiative_order = value
        .get("initiative_order")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().map(display_string).collect())
        .unwrap_or_default();
    StartReply {
        message: string_of(value, &["message"]),
        initiative_order,
    }
}

pub fn log_event(value: &Value) -> LogEvent {
    LogEvent {
        round: round_of(value),
        description: string_of(value, &["description", "message"])
            .unwrap_or_else(|| value.to_string()),
        action_type: string_of(value, &["action_type"]).unwrap_or_default(),
        hit: value.get("hit").and_then(Value::as_bool),
    }
}

/// Archived combats keep their events under `events` or `log`.
pub fn combat_record(value: &Value) -> CombatRecord {
    let events = ["events", "log"]
        .iter()
        .find_map(|k| value.get(k).and_then(Value::as_array))
        .map(|entries| entries.iter().map(log_event).collect())
        .unwrap_or_default();
    CombatRecord { events }
}

fn display_string(value: &Value) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}
