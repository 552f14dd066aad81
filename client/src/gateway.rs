use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::presets::CharacterSheet;
use crate::snapshot::{GameSnapshot, GridPos, MatchSnapshot};

/// Classified failure of a gateway call. `Transport` covers network and
/// timeout trouble; `Api` is the server rejecting the request.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("[{status}] {message}")]
    Api { status: u16, message: String },
}

impl GatewayError {
    /// Server-supplied message without the status prefix, for display.
    pub fn message(&self) -> &str {
        match self {
            GatewayError::Transport(message) => message,
            GatewayError::Api { message, .. } => message,
        }
    }
}

/// One action submission. Serializes to the server's tagged shape, e.g.
/// `{"action_type": "move", "character_id": ..., "target_position": [x, y]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action_type", rename_all = "snake_case")]
pub enum ActionRequest {
    Move {
        character_id: String,
        target_position: GridPos,
    },
    Dash {
        character_id: String,
        target_position: GridPos,
    },
    Attack {
        character_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        target_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        weapon_name: Option<String>,
    },
    Dodge {
        character_id: String,
    },
    Disengage {
        character_id: String,
    },
    EndTurn {
        character_id: String,
    },
}

fn default_true() -> bool {
    true
}

/// Server's resolution of a submitted action. Pass-through display data;
/// only `success`, `action_type` and `hit` feed back into control flow.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionResult {
    #[serde(default)]
    pub action_type: String,
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub hit: Option<bool>,
    #[serde(default)]
    pub damage_dealt: Option<i32>,
    #[serde(default)]
    pub target_hp_remaining: Option<i32>,
    #[serde(default)]
    pub attack_roll: Option<i32>,
    #[serde(default)]
    pub movement_path: Vec<GridPos>,
}

impl Default for ActionResult {
    fn default() -> Self {
        Self {
            action_type: String::new(),
            success: true,
            description: String::new(),
            error: None,
            hit: None,
            damage_dealt: None,
            target_hp_remaining: None,
            attack_roll: None,
            movement_path: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JoinReply {
    pub character_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct StartReply {
    pub message: Option<String>,
    pub initiative_order: Vec<String>,
}

/// One battle-log entry, already normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub round: u32,
    pub description: String,
    pub action_type: String,
    pub hit: Option<bool>,
}

/// Archived combat from the server's history endpoint.
#[derive(Debug, Clone, Default)]
pub struct CombatRecord {
    pub events: Vec<LogEvent>,
}

/// The single abstraction point for talking to the server. One blocking
/// request at a time; implementations classify failures as `GatewayError`.
pub trait Gateway {
    fn ping(&self) -> Result<ServerInfo, GatewayError>;
    fn join_game(&self, sheet: &CharacterSheet) -> Result<JoinReply, GatewayError>;
    fn start_game(&self) -> Result<StartReply, GatewayError>;
    fn query_match(&self) -> Result<MatchSnapshot, GatewayError>;
    fn query_state(&self, character_id: &str) -> Result<GameSnapshot, GatewayError>;
    fn submit_action(&self, request: &ActionRequest) -> Result<ActionResult, GatewayError>;
    fn query_log(&self) -> Result<Vec<LogEvent>, GatewayError>;
    fn query_history(&self) -> Result<Vec<CombatRecord>, GatewayError>;
}
