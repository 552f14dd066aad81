//! Scripted tactical decisions: nearest-enemy targeting and the capped-step
//! approach. Pure functions, no network side effects.

use crate::snapshot::{CharacterSnapshot, GameSnapshot, GridPos};

/// Grid range within which a melee attack can land; 1.5 so diagonal
/// neighbors (distance ~1.41) count as adjacent. Server grid constant,
/// not a tunable heuristic.
pub const ADJACENT_RANGE: f64 = 1.5;

/// Server grid scale: one square of movement per 5 feet of speed.
pub const FEET_PER_SQUARE: i32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TacticalAction {
    Attack { target_id: String },
    Move { to: GridPos },
    EndTurn,
}

/// Straight-line distance between grid cells.
pub fn distance(a: GridPos, b: GridPos) -> f64 {
    let dx = f64::from(a.x - b.x);
    let dy = f64::from(a.y - b.y);
    (dx * dx + dy * dy).sqrt()
}

/// Advance from `from` toward `to` by at most `max_squares`, stopping one
/// unit short of the target when it is reachable this turn. Within one unit
/// the move is a no-op. The exact point on the line is rounded to the
/// nearest grid cell.
pub fn step_toward(from: GridPos, to: GridPos, max_squares: i32) -> GridPos {
    let dx = f64::from(to.x - from.x);
    let dy = f64::from(to.y - from.y);
    let dist = (dx * dx + dy * dy).sqrt();

    if dist <= f64::from(max_squares) {
        if dist <= 1.0 {
            return from;
        }
        let ratio = (dist - 1.0) / dist;
        GridPos::new(
            (f64::from(from.x) + dx * ratio).round() as i32,
            (f64::from(from.y) + dy * ratio).round() as i32,
        )
    } else {
        let ratio = f64::from(max_squares) / dist;
        GridPos::new(
            (f64::from(from.x) + dx * ratio).round() as i32,
            (f64::from(from.y) + dy * ratio).round() as i32,
        )
    }
}

/// Opposing characters still standing, from this character's point of view.
pub fn living_enemies<'a>(snapshot: &'a GameSnapshot, self_id: &str) -> Vec<&'a CharacterSnapshot> {
    snapshot
        .all_characters()
        .into_iter()
        .filter(|c| c.id != self_id && c.is_alive())
        .collect()
}

/// Pick one action for this turn: attack the nearest living enemy when
/// adjacent, otherwise step toward it, otherwise (nothing to fight, or no
/// view of ourselves) end the turn. Distance ties go to the first enemy in
/// input order.
pub fn decide(me: Option<&CharacterSnapshot>, enemies: &[&CharacterSnapshot]) -> TacticalAction {
    let Some(me) = me else {
        return TacticalAction::EndTurn;
    };

    let nearest = enemies
        .iter()
        .copied()
        .filter(|e| e.is_alive() && e.id != me.id)
        .min_by(|a, b| {
            distance(me.position, a.position).total_cmp(&distance(me.position, b.position))
        });
    let Some(nearest) = nearest else {
        return TacticalAction::EndTurn;
    };

    if distance(me.position, nearest.position) <= ADJACENT_RANGE {
        return TacticalAction::Attack {
            target_id: nearest.id.clone(),
        };
    }

    let max_squares = me.speed / FEET_PER_SQUARE;
    TacticalAction::Move {
        to: step_toward(me.position, nearest.position, max_squares),
    }
}
