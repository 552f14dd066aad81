use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of a match as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Waiting,
    Active,
    Completed,
}

impl GameStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            GameStatus::Waiting => "waiting",
            GameStatus::Active => "active",
            GameStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Integer grid cell. On the wire the server uses `[x, y]` pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<[i32; 2]> for GridPos {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<GridPos> for [i32; 2] {
    fn from(pos: GridPos) -> Self {
        [pos.x, pos.y]
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Point-in-time view of one character, copied out of a state response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterSnapshot {
    pub id: String,
    pub name: String,
    pub position: GridPos,
    pub current_hp: i32,
    pub max_hp: i32,
    pub speed: i32,
}

impl CharacterSnapshot {
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }
}

/// The server archives finished games back to `waiting`, keeping the winner
/// id set. A `waiting` status with a winner therefore means the game is over,
/// and every consumer must branch on this effective status, not the raw one.
pub fn effective_status(status: GameStatus, winner_id: Option<&str>) -> GameStatus {
    if status == GameStatus::Waiting && winner_id.is_some() {
        GameStatus::Completed
    } else {
        status
    }
}

/// State response for one queried character (`is_your_turn` is relative to it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub status: GameStatus,
    pub round: u32,
    pub is_your_turn: bool,
    pub your_character: Option<CharacterSnapshot>,
    pub visible_characters: Vec<CharacterSnapshot>,
    pub winner_id: Option<String>,
}

impl GameSnapshot {
    pub fn effective_status(&self) -> GameStatus {
        effective_status(self.status, self.winner_id.as_deref())
    }

    pub fn is_over(&self) -> bool {
        self.effective_status() == GameStatus::Completed
    }

    /// Own character plus visible characters, deduplicated by id.
    pub fn all_characters(&self) -> Vec<&CharacterSnapshot> {
        let mut characters: Vec<&CharacterSnapshot> = Vec::new();
        if let Some(mine) = &self.your_character {
            characters.push(mine);
        }
        for other in &self.visible_characters {
            if characters.iter().any(|c| c.id == other.id) {
                continue;
            }
            characters.push(other);
        }
        characters
    }
}

/// Coarse whole-match view (no turn information).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSnapshot {
    pub status: GameStatus,
    pub round: u32,
    pub winner_id: Option<String>,
    pub characters: Vec<CharacterSnapshot>,
}

impl MatchSnapshot {
    pub fn effective_status(&self) -> GameStatus {
        effective_status(self.status, self.winner_id.as_deref())
    }

    pub fn is_over(&self) -> bool {
        self.effective_status() == GameStatus::Completed
    }
}
