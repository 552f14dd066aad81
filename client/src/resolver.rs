//! Finds which locally-controlled character, if any, currently owns the turn.

use crate::gateway::Gateway;
use crate::snapshot::{CharacterSnapshot, GameSnapshot, MatchSnapshot};

/// Terminal state as observed either through a per-character state query or
/// the coarse whole-match fallback.
#[derive(Debug, Clone)]
pub enum EndState {
    Character(GameSnapshot),
    Match(MatchSnapshot),
}

impl EndState {
    pub fn round(&self) -> u32 {
        match self {
            EndState::Character(s) => s.round,
            EndState::Match(m) => m.round,
        }
    }

    pub fn winner_id(&self) -> Option<&str> {
        match self {
            EndState::Character(s) => s.winner_id.as_deref(),
            EndState::Match(m) => m.winner_id.as_deref(),
        }
    }

    pub fn characters(&self) -> Vec<&CharacterSnapshot> {
        match self {
            EndState::Character(s) => s.all_characters(),
            EndState::Match(m) => m.characters.iter().collect(),
        }
    }
}

#[derive(Debug)]
pub enum TurnResolution {
    /// The first candidate whose snapshot claims the turn.
    Turn {
        snapshot: GameSnapshot,
        character_id: String,
    },
    GameOver(EndState),
    NoTurn,
}

/// Scan `candidates` in caller order, one state query each, stopping at the
/// first that owns the turn. Callers order the active character first so the
/// common single-character case costs one round trip.
///
/// `observe` is invoked with every snapshot seen, before any branching, so
/// the session's cached status stays current.
///
/// A failed per-character query is not fatal: the character may have been
/// dropped by a match reset, so the coarse match status decides between
/// game-over and skipping the candidate.
pub fn resolve_turn(
    gateway: &dyn Gateway,
    candidates: &[String],
    mut observe: impl FnMut(&GameSnapshot),
) -> TurnResolution {
    for character_id in candidates {
        let snapshot = match gateway.query_state(character_id) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::debug!(character_id = %character_id, error = %err, "state query failed");
                if let Ok(game) = gateway.query_match() {
                    if game.winner_id.is_some() {
                        return TurnResolution::GameOver(EndState::Match(game));
                    }
                }
                continue;
            }
        };

        observe(&snapshot);

        if snapshot.is_over() {
            return TurnResolution::GameOver(EndState::Character(snapshot));
        }
        if snapshot.is_your_turn {
            return TurnResolution::Turn {
                snapshot,
                character_id: character_id.clone(),
            };
        }
    }
    TurnResolution::NoTurn
}
