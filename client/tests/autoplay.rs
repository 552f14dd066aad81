mod common;

use std::sync::atomic::AtomicBool;
use std::time::Duration;

use client::autoplay::{
    AutoPlayConfig, PlayEvent, PlayOutcome, resolve_game_over, run_auto_play, run_scripted_demo,
};
use client::gateway::{ActionRequest, GatewayError};
use client::resolver::EndState;
use client::session::Session;
use client::snapshot::{GameStatus, GridPos, MatchSnapshot};
use common::{FakeGateway, character, state};

fn instant_config(max_iterations: u32) -> AutoPlayConfig {
    AutoPlayConfig {
        delay: Duration::ZERO,
        max_iterations,
    }
}

fn one_character_session() -> (Session, Vec<String>) {
    let mut session = Session::new();
    session.add_character("p1", "a", "Gronk");
    session.update_status(GameStatus::Active);
    let candidates = session.all_character_ids();
    (session, candidates)
}

#[test]
fn gives_up_after_the_iteration_cap() {
    let gateway = FakeGateway::new();
    gateway.push_state(
        "a",
        Ok(state(GameStatus::Active, 1, false, None, Vec::new(), None)),
    );
    let (mut session, candidates) = one_character_session();
    let cancel = AtomicBool::new(false);

    let outcome = run_auto_play(
        &gateway,
        &mut session,
        &candidates,
        &instant_config(3),
        &cancel,
        |_| {},
    );

    assert_eq!(outcome, PlayOutcome::GaveUp);
    assert_eq!(gateway.state_query_count(), 3);
    assert!(gateway.actions.borrow().is_empty());
}

#[test]
fn cancellation_before_the_first_poll_is_honored() {
    let gateway = FakeGateway::new();
    let (mut session, candidates) = one_character_session();
    let cancel = AtomicBool::new(true);

    let outcome = run_auto_play(
        &gateway,
        &mut session,
        &candidates,
        &instant_config(10),
        &cancel,
        |_| {},
    );

    assert_eq!(outcome, PlayOutcome::Cancelled);
    assert_eq!(gateway.state_query_count(), 0);
}

#[test]
fn adjacent_enemy_gets_attacked_then_the_turn_ends() {
    let gateway = FakeGateway::new();
    let me = character("a", "Gronk", 0, 0, 30, 30);
    let enemy = character("e", "Shadow", 1, 0, 22, 22);
    gateway.push_state(
        "a",
        Ok(state(
            GameStatus::Active,
            1,
            true,
            Some(me.clone()),
            vec![enemy.clone()],
            None,
        )),
    );
    gateway.push_state(
        "a",
        Ok(state(
            GameStatus::Completed,
            1,
            false,
            Some(me),
            vec![character("e", "Shadow", 1, 0, 0, 22)],
            Some("a"),
        )),
    );
    let (mut session, candidates) = one_character_session();
    let cancel = AtomicBool::new(false);
    let mut ended = 0u32;

    let outcome = run_auto_play(
        &gateway,
        &mut session,
        &candidates,
        &instant_config(10),
        &cancel,
        |event| {
            if let PlayEvent::GameEnded(_) = event {
                ended += 1;
            }
        },
    );

    let actions = gateway.actions.borrow();
    assert!(matches!(
        actions[0],
        ActionRequest::Attack {
            ref target_id,
            ..
        } if target_id.as_deref() == Some("e")
    ));
    assert!(matches!(actions[1], ActionRequest::EndTurn { .. }));
    assert_eq!(actions.len(), 2);
    assert_eq!(ended, 1);
    match outcome {
        PlayOutcome::GameOver(result) => assert_eq!(result.winner_name, "Gronk"),
        other => panic!("expected GameOver, got {other:?}"),
    }
    assert_eq!(session.status(), Some(GameStatus::Completed));
}

#[test]
fn move_closes_the_gap_and_lands_a_followup_attack() {
    let gateway = FakeGateway::new();
    let enemy = character("e", "Shadow", 4, 0, 22, 22);
    // Turn snapshot: 4 squares away, so decide picks Move to (3, 0).
    gateway.push_state(
        "a",
        Ok(state(
            GameStatus::Active,
            1,
            true,
            Some(character("a", "Gronk", 0, 0, 30, 30)),
            vec![enemy.clone()],
            None,
        )),
    );
    // Re-query after the move: now adjacent, still our turn.
    gateway.push_state(
        "a",
        Ok(state(
            GameStatus::Active,
            1,
            true,
            Some(character("a", "Gronk", 3, 0, 30, 30)),
            vec![enemy],
            None,
        )),
    );
    gateway.push_state(
        "a",
        Ok(state(
            GameStatus::Completed,
            2,
            false,
            Some(character("a", "Gronk", 3, 0, 30, 30)),
            vec![character("e", "Shadow", 4, 0, 0, 22)],
            Some("a"),
        )),
    );
    let (mut session, candidates) = one_character_session();
    let cancel = AtomicBool::new(false);

    let outcome = run_auto_play(
        &gateway,
        &mut session,
        &candidates,
        &instant_config(10),
        &cancel,
        |_| {},
    );

    let actions = gateway.actions.borrow();
    assert!(matches!(
        actions[0],
        ActionRequest::Move { ref target_position, .. } if *target_position == GridPos::new(3, 0)
    ));
    assert!(matches!(actions[1], ActionRequest::Attack { .. }));
    assert!(matches!(actions[2], ActionRequest::EndTurn { .. }));
    assert_eq!(actions.len(), 3);
    assert!(matches!(outcome, PlayOutcome::GameOver(_)));
}

#[test]
fn action_failures_do_not_halt_the_loop() {
    let gateway = FakeGateway::new();
    let me = character("a", "Gronk", 0, 0, 30, 30);
    let enemy = character("e", "Shadow", 1, 0, 22, 22);
    let turn = state(
        GameStatus::Active,
        1,
        true,
        Some(me.clone()),
        vec![enemy.clone()],
        None,
    );
    gateway.push_state("a", Ok(turn.clone()));
    gateway.push_state("a", Ok(turn));
    gateway.push_state(
        "a",
        Ok(state(
            GameStatus::Completed,
            2,
            false,
            Some(me),
            vec![character("e", "Shadow", 1, 0, 0, 22)],
            Some("a"),
        )),
    );
    // First turn: the attack is rejected and reported, the end_turn is
    // rejected and swallowed. Second turn goes through cleanly.
    let rejected = GatewayError::Api {
        status: 409,
        message: "not your turn".to_string(),
    };
    gateway.push_action_result(Err(rejected.clone()));
    gateway.push_action_result(Err(rejected));
    gateway.push_action_result(Ok(client::gateway::ActionResult::default()));
    let (mut session, candidates) = one_character_session();
    let cancel = AtomicBool::new(false);
    let mut failures = 0u32;

    let outcome = run_auto_play(
        &gateway,
        &mut session,
        &candidates,
        &instant_config(10),
        &cancel,
        |event| {
            if let PlayEvent::ActionFailed(_) = event {
                failures += 1;
            }
        },
    );

    assert!(matches!(outcome, PlayOutcome::GameOver(_)));
    // The end_turn rejection is silent; only the attack failure surfaces.
    assert_eq!(failures, 1);
    let actions = gateway.actions.borrow();
    assert!(matches!(actions[0], ActionRequest::Attack { .. }));
    assert!(matches!(actions[1], ActionRequest::EndTurn { .. }));
    assert!(matches!(actions[2], ActionRequest::Attack { .. }));
    assert!(matches!(actions[3], ActionRequest::EndTurn { .. }));
    assert_eq!(actions.len(), 4);
}

#[test]
fn followup_attack_targets_the_now_nearest_enemy() {
    let gateway = FakeGateway::new();
    // Turn snapshot: "far" is nearest at distance 6, so we step to (5, 0).
    gateway.push_state(
        "a",
        Ok(state(
            GameStatus::Active,
            1,
            true,
            Some(character("a", "Gronk", 0, 0, 30, 30)),
            vec![
                character("far", "Shadow", 6, 0, 22, 22),
                character("flank", "Ragna", 20, 20, 38, 38),
            ],
            None,
        )),
    );
    // Re-query: "flank" has closed in and is now the adjacent one.
    gateway.push_state(
        "a",
        Ok(state(
            GameStatus::Active,
            1,
            true,
            Some(character("a", "Gronk", 5, 0, 30, 30)),
            vec![
                character("far", "Shadow", 9, 0, 22, 22),
                character("flank", "Ragna", 5, 1, 38, 38),
            ],
            None,
        )),
    );
    gateway.push_state(
        "a",
        Ok(state(
            GameStatus::Completed,
            2,
            false,
            Some(character("a", "Gronk", 5, 0, 30, 30)),
            Vec::new(),
            Some("a"),
        )),
    );
    let (mut session, candidates) = one_character_session();
    let cancel = AtomicBool::new(false);

    run_auto_play(
        &gateway,
        &mut session,
        &candidates,
        &instant_config(10),
        &cancel,
        |_| {},
    );

    let actions = gateway.actions.borrow();
    assert!(matches!(
        actions[1],
        ActionRequest::Attack {
            ref target_id,
            ..
        } if target_id.as_deref() == Some("flank")
    ));
}

#[test]
fn round_started_fires_once_per_new_round() {
    let gateway = FakeGateway::new();
    gateway.push_state(
        "a",
        Ok(state(
            GameStatus::Active,
            1,
            true,
            Some(character("a", "Gronk", 0, 0, 30, 30)),
            Vec::new(),
            None,
        )),
    );
    gateway.push_state(
        "a",
        Ok(state(
            GameStatus::Active,
            1,
            true,
            Some(character("a", "Gronk", 0, 0, 30, 30)),
            Vec::new(),
            None,
        )),
    );
    gateway.push_state(
        "a",
        Ok(state(
            GameStatus::Active,
            2,
            true,
            Some(character("a", "Gronk", 0, 0, 30, 30)),
            Vec::new(),
            None,
        )),
    );
    let (mut session, candidates) = one_character_session();
    let cancel = AtomicBool::new(false);
    let mut rounds = Vec::new();

    run_auto_play(
        &gateway,
        &mut session,
        &candidates,
        &instant_config(4),
        &cancel,
        |event| {
            if let PlayEvent::RoundStarted { round, .. } = event {
                rounds.push(round);
            }
        },
    );

    assert_eq!(rounds, vec![1, 2]);
}

#[test]
fn game_over_with_no_winner_id_falls_back_to_the_survivor() {
    let end = EndState::Match(MatchSnapshot {
        status: GameStatus::Completed,
        round: 7,
        winner_id: None,
        characters: vec![
            character("dead", "Shadow", 0, 0, 0, 22),
            character("alive", "Gronk", 1, 1, 12, 30),
        ],
    });
    let outcome = resolve_game_over(&end);
    assert_eq!(outcome.winner_name, "Gronk");
    assert_eq!(outcome.winner_hp, 12);
    assert_eq!(outcome.winner_max_hp, 30);
    assert_eq!(outcome.rounds, 7);
}

#[test]
fn game_over_with_an_empty_roster_reports_unknown() {
    let end = EndState::Match(MatchSnapshot {
        status: GameStatus::Completed,
        round: 1,
        winner_id: None,
        characters: Vec::new(),
    });
    let outcome = resolve_game_over(&end);
    assert_eq!(outcome.winner_name, "Unknown");
    assert_eq!(outcome.winner_hp, 0);
    assert_eq!(outcome.winner_max_hp, 0);
}

#[test]
fn game_over_prefers_the_declared_winner() {
    let end = EndState::Match(MatchSnapshot {
        status: GameStatus::Completed,
        round: 3,
        winner_id: Some("b".to_string()),
        characters: vec![
            character("a", "Gronk", 0, 0, 5, 30),
            character("b", "Shadow", 1, 0, 2, 22),
        ],
    });
    assert_eq!(resolve_game_over(&end).winner_name, "Shadow");
}

#[test]
fn scripted_demo_joins_two_presets_and_plays_out() {
    let gateway = FakeGateway::new();
    // The first joined character immediately sees a decided game.
    gateway.push_state(
        "char-1",
        Ok(state(
            GameStatus::Waiting,
            1,
            false,
            Some(character("char-1", "Gronk", 0, 0, 30, 30)),
            vec![character("char-2", "Shadow", 5, 5, 0, 22)],
            Some("char-1"),
        )),
    );
    let mut session = Session::new();
    let cancel = AtomicBool::new(false);
    let mut joined = Vec::new();
    let mut started = 0u32;

    let outcome = run_scripted_demo(&gateway, &mut session, &cancel, |event| match event {
        PlayEvent::Joined { name, .. } => joined.push(name),
        PlayEvent::CombatStarted { .. } => started += 1,
        _ => {}
    });

    assert_eq!(joined, vec!["Gronk the Fighter", "Shadow the Rogue"]);
    assert_eq!(started, 1);
    assert_eq!(session.all_character_ids(), vec!["char-1", "char-2"]);
    assert!(matches!(outcome, Ok(PlayOutcome::GameOver(_))));
}
