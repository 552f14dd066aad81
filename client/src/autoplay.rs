//! The autonomous play loop: poll for turn ownership, run the tactical
//! decision procedure, submit the action, end the turn, repeat until the
//! game ends, the iteration cap runs out, or the user cancels.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::gateway::{ActionRequest, ActionResult, Gateway, GatewayError};
use crate::presets;
use crate::resolver::{EndState, TurnResolution, resolve_turn};
use crate::session::Session;
use crate::snapshot::{GameSnapshot, GameStatus, GridPos};
use crate::tactics::{self, TacticalAction};

#[derive(Debug, Clone)]
pub struct AutoPlayConfig {
    /// Pause between polling iterations and after each submission.
    pub delay: Duration,
    /// Hard cap on polling iterations. Exhausting it ends the loop with
    /// `PlayOutcome::GaveUp`; a guard against desync spinning forever, not
    /// a game-over condition.
    pub max_iterations: u32,
}

impl Default for AutoPlayConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(300),
            max_iterations: 200,
        }
    }
}

impl AutoPlayConfig {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }
}

/// Who won, for the final announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOutcome {
    pub winner_name: String,
    pub winner_hp: i32,
    pub winner_max_hp: i32,
    pub rounds: u32,
}

/// Determine the winner from a terminal state: `winner_id` match first, then
/// the first character still standing, else unknown with 0/0 HP.
pub fn resolve_game_over(end: &EndState) -> GameOutcome {
    let characters = end.characters();
    let winner = end
        .winner_id()
        .and_then(|wid| characters.iter().copied().find(|c| c.id == wid))
        .or_else(|| characters.iter().copied().find(|c| c.is_alive()));

    match winner {
        Some(w) => GameOutcome {
            winner_name: w.name.clone(),
            winner_hp: w.current_hp,
            winner_max_hp: w.max_hp,
            rounds: end.round(),
        },
        None => GameOutcome {
            winner_name: "Unknown".to_string(),
            winner_hp: 0,
            winner_max_hp: 0,
            rounds: end.round(),
        },
    }
}

/// Advisory notifications for the rendering collaborator. Never required
/// for correctness.
#[derive(Debug, Clone)]
pub enum PlayEvent {
    Joined {
        name: String,
        character_id: String,
        message: Option<String>,
    },
    CombatStarted {
        message: Option<String>,
        initiative: Vec<String>,
    },
    RoundStarted {
        round: u32,
        snapshot: GameSnapshot,
    },
    Moving {
        name: String,
        to: GridPos,
    },
    Attacking {
        attacker: String,
        target: String,
    },
    ActionResolved(ActionResult),
    ActionFailed(String),
    /// Emitted exactly once per terminating transition.
    GameEnded(GameOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    GameOver(GameOutcome),
    /// Iteration cap exhausted without resolution.
    GaveUp,
    Cancelled,
}

/// Drive the candidate characters until the game ends. Blocking; the only
/// suspension points are the fixed inter-iteration delay and the gateway
/// calls themselves. `cancel` is honored at every sleep point.
pub fn run_auto_play(
    gateway: &dyn Gateway,
    session: &mut Session,
    candidates: &[String],
    cfg: &AutoPlayConfig,
    cancel: &AtomicBool,
    mut notify: impl FnMut(PlayEvent),
) -> PlayOutcome {
    let mut last_round = 0u32;

    for iteration in 0..cfg.max_iterations {
        if cancel.load(Ordering::Relaxed) {
            return PlayOutcome::Cancelled;
        }

        let resolution = resolve_turn(gateway, candidates, |s| session.update_status_from(s));
        let (snapshot, turn_char_id) = match resolution {
            TurnResolution::GameOver(end) => {
                let outcome = resolve_game_over(&end);
                session.update_status(GameStatus::Completed);
                notify(PlayEvent::GameEnded(outcome.clone()));
                return PlayOutcome::GameOver(outcome);
            }
            TurnResolution::NoTurn => {
                if !pause(cfg.delay, cancel) {
                    return PlayOutcome::Cancelled;
                }
                continue;
            }
            TurnResolution::Turn {
                snapshot,
                character_id,
            } => (snapshot, character_id),
        };

        tracing::debug!(
            iteration,
            character_id = %turn_char_id,
            round = snapshot.round,
            "turn resolved"
        );

        if snapshot.round > last_round {
            last_round = snapshot.round;
            notify(PlayEvent::RoundStarted {
                round: snapshot.round,
                snapshot: snapshot.clone(),
            });
        }

        let my_name = snapshot
            .your_character
            .as_ref()
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "?".to_string());
        let enemies = tactics::living_enemies(&snapshot, &turn_char_id);

        match tactics::decide(snapshot.your_character.as_ref(), &enemies) {
            TacticalAction::EndTurn => {
                end_turn(gateway, &turn_char_id);
            }
            TacticalAction::Attack { target_id } => {
                notify(PlayEvent::Attacking {
                    attacker: my_name,
                    target: name_of(&snapshot, &target_id),
                });
                let request = ActionRequest::Attack {
                    character_id: turn_char_id.clone(),
                    target_id: Some(target_id),
                    weapon_name: None,
                };
                submit(gateway, &request, &mut notify);
                if !pause(cfg.delay, cancel) {
                    return PlayOutcome::Cancelled;
                }
                end_turn(gateway, &turn_char_id);
            }
            TacticalAction::Move { to } => {
                notify(PlayEvent::Moving {
                    name: my_name,
                    to,
                });
                let request = ActionRequest::Move {
                    character_id: turn_char_id.clone(),
                    target_position: to,
                };
                if submit(gateway, &request, &mut notify) {
                    if !pause(cfg.delay, cancel) {
                        return PlayOutcome::Cancelled;
                    }
                    attack_after_move(gateway, session, &turn_char_id, &mut notify);
                }
                end_turn(gateway, &turn_char_id);
            }
        }

        if !pause(cfg.delay, cancel) {
            return PlayOutcome::Cancelled;
        }
    }

    tracing::debug!("iteration cap reached without resolution");
    PlayOutcome::GaveUp
}

/// Full scripted demo: fresh session, join fighter and rogue, start combat,
/// then auto-play both sides to the end.
pub fn run_scripted_demo(
    gateway: &dyn Gateway,
    session: &mut Session,
    cancel: &AtomicBool,
    mut notify: impl FnMut(PlayEvent),
) -> Result<PlayOutcome, GatewayError> {
    session.reset();

    for sheet in [presets::fighter(), presets::rogue()] {
        let reply = gateway.join_game(&sheet)?;
        session.add_character(&sheet.owner_id, &reply.character_id, &sheet.name);
        notify(PlayEvent::Joined {
            name: sheet.name.clone(),
            character_id: reply.character_id,
            message: reply.message,
        });
    }

    let start = gateway.start_game()?;
    session.update_status(GameStatus::Active);
    notify(PlayEvent::CombatStarted {
        message: start.message,
        initiative: start.initiative_order,
    });

    let candidates = session.all_character_ids();
    let cfg = AutoPlayConfig::with_delay(Duration::from_millis(500));
    Ok(run_auto_play(
        gateway, session, &candidates, &cfg, cancel, notify,
    ))
}

/// Attack-after-move-in-same-turn: re-query once and, if the move closed the
/// gap and we still hold the turn, land the follow-up attack.
fn attack_after_move(
    gateway: &dyn Gateway,
    session: &mut Session,
    character_id: &str,
    notify: &mut impl FnMut(PlayEvent),
) {
    let Ok(snapshot) = gateway.query_state(character_id) else {
        return;
    };
    session.update_status_from(&snapshot);
    if snapshot.is_over() || !snapshot.is_your_turn {
        return;
    }

    let enemies = tactics::living_enemies(&snapshot, character_id);
    if let TacticalAction::Attack { target_id } =
        tactics::decide(snapshot.your_character.as_ref(), &enemies)
    {
        let attacker = snapshot
            .your_character
            .as_ref()
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "?".to_string());
        notify(PlayEvent::Attacking {
            attacker,
            target: name_of(&snapshot, &target_id),
        });
        let request = ActionRequest::Attack {
            character_id: character_id.to_string(),
            target_id: Some(target_id),
            weapon_name: None,
        };
        submit(gateway, &request, notify);
    }
}

/// Submit an action and route the result or failure to the notifier.
/// Returns whether the submission succeeded.
fn submit(
    gateway: &dyn Gateway,
    request: &ActionRequest,
    notify: &mut impl FnMut(PlayEvent),
) -> bool {
    match gateway.submit_action(request) {
        Ok(result) => {
            notify(PlayEvent::ActionResolved(result));
            true
        }
        Err(err) => {
            notify(PlayEvent::ActionFailed(err.message().to_string()));
            false
        }
    }
}

/// Best-effort turn cleanup; a rejected end-turn must never abort the loop.
fn end_turn(gateway: &dyn Gateway, character_id: &str) {
    let request = ActionRequest::EndTurn {
        character_id: character_id.to_string(),
    };
    if let Err(err) = gateway.submit_action(&request) {
        tracing::debug!(character_id = %character_id, error = %err, "end_turn rejected");
    }
}

/// Sleep for `delay`, reporting false if cancellation was requested before
/// or during the wait.
fn pause(delay: Duration, cancel: &AtomicBool) -> bool {
    if cancel.load(Ordering::Relaxed) {
        return false;
    }
    if !delay.is_zero() {
        thread::sleep(delay);
    }
    !cancel.load(Ordering::Relaxed)
}

fn name_of(snapshot: &GameSnapshot, character_id: &str) -> String {
    snapshot
        .all_characters()
        .into_iter()
        .find(|c| c.id == character_id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| "?".to_string())
}
