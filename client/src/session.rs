use indexmap::IndexMap;
use thiserror::Error;

use crate::snapshot::{GameSnapshot, GameStatus};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no character with owner id '{0}'")]
    UnknownOwner(String),
}

/// A locally-controlled character. Volatile combat state (HP, position) is
/// deliberately not cached here; it is re-fetched from the server every time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownCharacter {
    pub character_id: String,
    pub name: String,
    pub owner_id: String,
}

/// Client-side record of the current run: which characters we joined, which
/// one single-shot commands target, and the last game status we saw.
#[derive(Debug, Default)]
pub struct Session {
    characters: IndexMap<String, KnownCharacter>,
    active: Option<String>,
    status: Option<GameStatus>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a joined character. The first character joined becomes the
    /// active one; re-joining an owner overwrites their record.
    pub fn add_character(&mut self, owner_id: &str, character_id: &str, name: &str) {
        self.characters.insert(
            owner_id.to_string(),
            KnownCharacter {
                character_id: character_id.to_string(),
                name: name.to_string(),
                owner_id: owner_id.to_string(),
            },
        );
        if self.active.is_none() {
            self.active = Some(character_id.to_string());
        }
    }

    /// Character ids in join order.
    pub fn all_character_ids(&self) -> Vec<String> {
        self.characters
            .values()
            .map(|c| c.character_id.clone())
            .collect()
    }

    pub fn switch_active(&mut self, owner_id: &str) -> Result<&KnownCharacter, SessionError> {
        match self.characters.get(owner_id) {
            Some(character) => {
                self.active = Some(character.character_id.clone());
                Ok(character)
            }
            None => Err(SessionError::UnknownOwner(owner_id.to_string())),
        }
    }

    pub fn update_status(&mut self, status: GameStatus) {
        self.status = Some(status);
    }

    /// Store the snapshot's effective status (idempotent).
    pub fn update_status_from(&mut self, snapshot: &GameSnapshot) {
        self.status = Some(snapshot.effective_status());
    }

    /// Forget everything; used before a scripted demo starts a fresh match.
    pub fn reset(&mut self) {
        self.characters.clear();
        self.active = None;
        self.status = None;
    }

    pub fn active_character_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Active character if set, else the first joined one. This is the id
    /// info queries run against.
    pub fn default_character_id(&self) -> Option<&str> {
        self.active
            .as_deref()
            .or_else(|| self.characters.values().next().map(|c| c.character_id.as_str()))
    }

    pub fn status(&self) -> Option<GameStatus> {
        self.status
    }

    pub fn has_characters(&self) -> bool {
        !self.characters.is_empty()
    }

    pub fn roster(&self) -> impl Iterator<Item = &KnownCharacter> {
        self.characters.values()
    }
}
