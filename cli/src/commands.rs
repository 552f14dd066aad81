//! Command parsing and dispatch for the interactive REPL.

use std::io::{self, BufRead, Write};
use std::sync::atomic::AtomicBool;

use client::autoplay::{self, AutoPlayConfig, PlayEvent, PlayOutcome};
use client::gateway::{ActionRequest, Gateway, GatewayError};
use client::presets::{self, AbilityScores, AttackSpec, CharacterSheet};
use client::resolver::EndState;
use client::session::Session;
use client::snapshot::{GameStatus, GridPos};
use owo_colors::OwoColorize;

use crate::display;

/// Parse and dispatch one command. Returns false to quit the REPL.
pub fn handle_command(
    line: &str,
    gateway: &dyn Gateway,
    session: &mut Session,
    cancel: &AtomicBool,
) -> bool {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return true;
    };
    let verb = verb.to_lowercase();
    let args: Vec<&str> = parts.collect();

    let result = match verb.as_str() {
        "quit" | "exit" | "q" => return false,
        "help" | "h" | "?" => {
            display::print_help();
            Ok(())
        }
        "join" => cmd_join(&args, gateway, session),
        "start" => cmd_start(gateway, session),
        "game" | "games" => cmd_game_info(gateway, session),
        "status" | "s" => cmd_status(gateway, session),
        "map" | "m" => cmd_map(gateway, session),
        "log" => cmd_log(gateway),
        "move" => cmd_move(&args, gateway, session),
        "attack" => cmd_attack(&args, gateway, session),
        "dodge" => cmd_dodge(gateway, session),
        "dash" => cmd_dash(&args, gateway, session),
        "disengage" => cmd_disengage(gateway, session),
        "end" | "done" => cmd_end_turn(gateway, session),
        "switch" => cmd_switch(&args, session),
        "auto" => cmd_auto(gateway, session, cancel),
        "demo" => cmd_demo(gateway, session, cancel),
        _ => {
            display::print_error(&format!(
                "Unknown command: '{verb}'. Type 'help' for commands."
            ));
            Ok(())
        }
    };

    if let Err(err) = result {
        display::print_error(err.message());
    }
    true
}

// ── Game setup ──────────────────────────────────────────────────────────────

fn cmd_join(
    args: &[&str],
    gateway: &dyn Gateway,
    session: &mut Session,
) -> Result<(), GatewayError> {
    let Some(&preset_name) = args.first() else {
        display::print_error("Usage: join <fighter|rogue|barbarian|monk|custom>");
        return Ok(());
    };

    let sheet = if preset_name.eq_ignore_ascii_case("custom") {
        build_custom_character()
    } else {
        match presets::preset(preset_name) {
            Some(sheet) => sheet,
            None => {
                display::print_error(&format!(
                    "Unknown preset '{}'. Options: {}, custom",
                    preset_name,
                    presets::PRESET_NAMES.join(", ")
                ));
                return Ok(());
            }
        }
    };

    display::print_info(&format!("Joining as {}...", sheet.name));
    let reply = gateway.join_game(&sheet)?;
    session.add_character(&sheet.owner_id, &reply.character_id, &sheet.name);
    match reply.message {
        Some(message) if !message.is_empty() => display::print_success(&message),
        _ => display::print_success(&format!("Joined! Character ID: {}", reply.character_id)),
    }
    Ok(())
}

fn build_custom_character() -> CharacterSheet {
    println!("\n{}\n", "Custom Character Builder".bold());
    let name = ask_or("  Name: ", "Custom Hero");
    let owner_id = ask_or("  Owner ID: ", "custom_player");
    let max_hp = ask_int("Max HP", 25);
    let armor_class = ask_int("Armor Class", 14);
    let speed = ask_int("Speed", 30);

    println!("\n  {}", "Ability Scores (default 10):".dimmed());
    let ability_scores = AbilityScores {
        strength: ask_int("  Strength", 10),
        dexterity: ask_int("  Dexterity", 10),
        constitution: ask_int("  Constitution", 10),
        intelligence: ask_int("  Intelligence", 10),
        wisdom: ask_int("  Wisdom", 10),
        charisma: ask_int("  Charisma", 10),
    };

    println!("\n  {}", "Weapon:".dimmed());
    let weapon_name = ask_or("  Weapon name [Shortsword]: ", "Shortsword");
    let attack_bonus = ask_int("Attack bonus", 4);
    let damage_dice = ask_or("  Damage dice [1d6]: ", "1d6");
    let damage_bonus = ask_int("Damage bonus", 2);
    let damage_type = ask_or("  Damage type [slashing]: ", "slashing");

    CharacterSheet {
        name,
        owner_id,
        max_hp,
        armor_class,
        speed,
        ability_scores,
        attacks: vec![AttackSpec {
            name: weapon_name,
            attack_bonus,
            damage_dice,
            damage_bonus,
            damage_type,
            reach: 5,
        }],
    }
}

fn ask(prompt: &str) -> String {
    print!("{prompt}");
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
    line.trim().to_string()
}

fn ask_or(prompt: &str, default: &str) -> String {
    let answer = ask(prompt);
    if answer.is_empty() {
        default.to_string()
    } else {
        answer
    }
}

fn ask_int(label: &str, default: i32) -> i32 {
    let answer = ask(&format!("  {label} [{default}]: "));
    answer.parse().unwrap_or(default)
}

fn cmd_start(gateway: &dyn Gateway, session: &mut Session) -> Result<(), GatewayError> {
    display::print_info("Starting combat...");
    let start = gateway.start_game()?;
    session.update_status(GameStatus::Active);
    display::print_success(start.message.as_deref().unwrap_or("Combat started!"));
    if !start.initiative_order.is_empty() {
        println!("  Initiative: {}", start.initiative_order.join(", "));
    }
    show_current_state(gateway, session);
    Ok(())
}

fn cmd_game_info(gateway: &dyn Gateway, session: &mut Session) -> Result<(), GatewayError> {
    let game = gateway.query_match()?;
    println!("\n{} {}", "Game Status:".bold(), game.status);
    session.update_status(game.effective_status());

    if let Some(winner_id) = &game.winner_id {
        println!("  Winner: {winner_id}");
    }
    if !game.characters.is_empty() {
        println!("  Characters: {}", game.characters.len());
        for character in &game.characters {
            println!("    - {} (ID: {})", character.name, character.id);
        }
    }
    println!();
    Ok(())
}

// ── Combat ──────────────────────────────────────────────────────────────────

/// Active character id, or a printed error.
fn require_active(session: &Session) -> Option<String> {
    match session.active_character_id() {
        Some(id) => Some(id.to_string()),
        None => {
            display::print_error("No active character. Join a game first.");
            None
        }
    }
}

fn parse_coords(args: &[&str], usage: &str) -> Option<GridPos> {
    if args.len() < 2 {
        display::print_error(usage);
        return None;
    }
    match (args[0].parse(), args[1].parse()) {
        (Ok(x), Ok(y)) => Some(GridPos::new(x, y)),
        _ => {
            display::print_error("Coordinates must be integers.");
            None
        }
    }
}

fn submit_and_report(
    gateway: &dyn Gateway,
    session: &mut Session,
    request: &ActionRequest,
) -> Result<(), GatewayError> {
    let result = gateway.submit_action(request)?;
    display::print_action_result(&result);
    check_game_over(gateway, session);
    Ok(())
}

fn cmd_move(
    args: &[&str],
    gateway: &dyn Gateway,
    session: &mut Session,
) -> Result<(), GatewayError> {
    let Some(character_id) = require_active(session) else {
        return Ok(());
    };
    let Some(target_position) = parse_coords(args, "Usage: move X Y") else {
        return Ok(());
    };
    submit_and_report(
        gateway,
        session,
        &ActionRequest::Move {
            character_id,
            target_position,
        },
    )
}

fn cmd_attack(
    args: &[&str],
    gateway: &dyn Gateway,
    session: &mut Session,
) -> Result<(), GatewayError> {
    let Some(character_id) = require_active(session) else {
        return Ok(());
    };
    submit_and_report(
        gateway,
        session,
        &ActionRequest::Attack {
            character_id,
            target_id: args.first().map(|s| s.to_string()),
            weapon_name: args.get(1).map(|s| s.to_string()),
        },
    )
}

fn cmd_dodge(gateway: &dyn Gateway, session: &mut Session) -> Result<(), GatewayError> {
    let Some(character_id) = require_active(session) else {
        return Ok(());
    };
    submit_and_report(gateway, session, &ActionRequest::Dodge { character_id })
}

fn cmd_dash(
    args: &[&str],
    gateway: &dyn Gateway,
    session: &mut Session,
) -> Result<(), GatewayError> {
    let Some(character_id) = require_active(session) else {
        return Ok(());
    };
    let Some(target_position) = parse_coords(args, "Usage: dash X Y") else {
        return Ok(());
    };
    submit_and_report(
        gateway,
        session,
        &ActionRequest::Dash {
            character_id,
            target_position,
        },
    )
}

fn cmd_disengage(gateway: &dyn Gateway, session: &mut Session) -> Result<(), GatewayError> {
    let Some(character_id) = require_active(session) else {
        return Ok(());
    };
    submit_and_report(gateway, session, &ActionRequest::Disengage { character_id })
}

fn cmd_end_turn(gateway: &dyn Gateway, session: &mut Session) -> Result<(), GatewayError> {
    let Some(character_id) = require_active(session) else {
        return Ok(());
    };
    submit_and_report(gateway, session, &ActionRequest::EndTurn { character_id })
}

// ── Info ────────────────────────────────────────────────────────────────────

fn cmd_status(gateway: &dyn Gateway, session: &mut Session) -> Result<(), GatewayError> {
    let Some(character_id) = session.default_character_id().map(str::to_string) else {
        display::print_error("No characters joined yet.");
        return Ok(());
    };
    let snapshot = gateway.query_state(&character_id)?;
    session.update_status_from(&snapshot);
    display::print_state(&snapshot);
    Ok(())
}

fn cmd_map(gateway: &dyn Gateway, session: &mut Session) -> Result<(), GatewayError> {
    let Some(character_id) = session.default_character_id().map(str::to_string) else {
        display::print_error("No characters joined yet.");
        return Ok(());
    };
    let snapshot = gateway.query_state(&character_id)?;
    session.update_status_from(&snapshot);
    display::print_map(&snapshot);
    Ok(())
}

fn cmd_log(gateway: &dyn Gateway) -> Result<(), GatewayError> {
    let mut events = gateway.query_log()?;
    if events.is_empty() {
        // The live log is archived once combat ends; show the latest record.
        if let Ok(history) = gateway.query_history() {
            if let Some(latest) = history.last() {
                if !latest.events.is_empty() {
                    println!("{}", "(Showing last combat log)".dimmed());
                    events = latest.events.clone();
                }
            }
        }
    }
    display::print_log(&events);
    Ok(())
}

// ── Utility ─────────────────────────────────────────────────────────────────

fn cmd_switch(args: &[&str], session: &mut Session) -> Result<(), GatewayError> {
    let Some(&owner_id) = args.first() else {
        display::print_error("Usage: switch OWNER_ID");
        println!("  Available owners:");
        let active = session.active_character_id().map(str::to_string);
        for character in session.roster() {
            let marker = if active.as_deref() == Some(character.character_id.as_str()) {
                " <-- active"
            } else {
                ""
            };
            println!("    {}: {}{}", character.owner_id, character.name, marker);
        }
        return Ok(());
    };

    match session.switch_active(owner_id) {
        Ok(character) => {
            let message = format!("Switched to {}", character.name);
            display::print_success(&message);
        }
        Err(_) => display::print_error(&format!(
            "No character with owner_id '{owner_id}'. Use 'switch' to list."
        )),
    }
    Ok(())
}

fn cmd_auto(
    gateway: &dyn Gateway,
    session: &mut Session,
    cancel: &AtomicBool,
) -> Result<(), GatewayError> {
    let Some(character_id) = require_active(session) else {
        return Ok(());
    };
    display::print_info("Auto-playing... (Ctrl+C to stop)");

    let outcome = autoplay::run_auto_play(
        gateway,
        session,
        &[character_id],
        &AutoPlayConfig::default(),
        cancel,
        |event| display::render_event(&event),
    );
    if outcome == PlayOutcome::Cancelled {
        println!("\n{}", "Auto-play stopped.".yellow());
    }
    Ok(())
}

fn cmd_demo(
    gateway: &dyn Gateway,
    session: &mut Session,
    cancel: &AtomicBool,
) -> Result<(), GatewayError> {
    println!();
    let mut first_joined: Option<String> = None;

    let outcome = autoplay::run_scripted_demo(gateway, session, cancel, |event| {
        if let PlayEvent::Joined {
            name, character_id, ..
        } = &event
        {
            display::print_info(&format!("Joining {name}..."));
            if first_joined.is_none() {
                first_joined = Some(character_id.clone());
            }
        }
        display::render_event(&event);
        if let PlayEvent::CombatStarted { .. } = &event {
            // Initial state + map before the loop takes over.
            if let Some(id) = &first_joined {
                if let Ok(snapshot) = gateway.query_state(id) {
                    display::print_state(&snapshot);
                    display::print_map(&snapshot);
                }
            }
            println!();
        }
    })?;

    if outcome == PlayOutcome::Cancelled {
        println!("\n{}", "Demo stopped.".yellow());
    }
    Ok(())
}

// ── Internal helpers ────────────────────────────────────────────────────────

/// Fetch and display current state + map, tolerating failures.
fn show_current_state(gateway: &dyn Gateway, session: &mut Session) {
    let Some(character_id) = session.default_character_id().map(str::to_string) else {
        return;
    };
    if let Ok(snapshot) = gateway.query_state(&character_id) {
        session.update_status_from(&snapshot);
        display::print_state(&snapshot);
        display::print_map(&snapshot);
    }
}

/// After a one-shot action, check whether the game just ended and announce
/// the winner if so.
fn check_game_over(gateway: &dyn Gateway, session: &mut Session) {
    let Some(character_id) = session.default_character_id().map(str::to_string) else {
        return;
    };
    let Ok(snapshot) = gateway.query_state(&character_id) else {
        return;
    };
    session.update_status_from(&snapshot);
    if snapshot.is_over() {
        let outcome = autoplay::resolve_game_over(&EndState::Character(snapshot));
        println!();
        display::print_winner(&outcome);
    }
}
