//! Terminal rendering: banner, HP bars, ASCII map, action results, help.

use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};

use client::autoplay::{GameOutcome, PlayEvent};
use client::gateway::{ActionResult, LogEvent, ServerInfo};
use client::snapshot::{CharacterSnapshot, GameSnapshot};
use owo_colors::OwoColorize;

const HP_BAR_WIDTH: usize = 25;
const MAP_MAX: i32 = 19;
const MAP_PADDING: i32 = 3;

pub fn print_banner(info: &ServerInfo) {
    let name = if info.name.is_empty() {
        "Tendrils Server"
    } else {
        &info.name
    };
    let status = if info.status.is_empty() {
        "unknown"
    } else {
        &info.status
    };
    let title = format!("{:^40}", name.to_uppercase());
    let subtitle = format!("{:^40}", format!("v{} — {}", info.version, status));
    println!("{}", format!("╭{}╮", "─".repeat(42)).cyan());
    println!("{} {} {}", "│".cyan(), title.bold(), "│".cyan());
    println!("{} {} {}", "│".cyan(), subtitle.dimmed(), "│".cyan());
    println!("{}", format!("╰{}╯", "─".repeat(42)).cyan());
}

/// Current turn info plus an HP bar per visible character.
pub fn print_state(snapshot: &GameSnapshot) {
    let my_name = snapshot
        .your_character
        .as_ref()
        .map(|c| c.name.as_str())
        .unwrap_or("?");
    if snapshot.is_your_turn {
        println!(
            "\n{} — {}'s turn\n",
            format!("Round {}", snapshot.round).bold(),
            my_name
        );
    } else {
        println!(
            "\n{} — Waiting for opponent's turn\n",
            format!("Round {}", snapshot.round).bold()
        );
    }

    for character in snapshot.all_characters() {
        print_hp_bar(character);
    }
    println!();
}

fn print_hp_bar(character: &CharacterSnapshot) {
    let ratio = if character.max_hp > 0 {
        f64::from(character.current_hp) / f64::from(character.max_hp)
    } else {
        0.0
    };
    let filled = (ratio * HP_BAR_WIDTH as f64) as usize;
    let empty = HP_BAR_WIDTH.saturating_sub(filled);

    let bar = "█".repeat(filled);
    let colored_bar = if ratio > 0.5 {
        bar.green().to_string()
    } else if ratio > 0.25 {
        bar.yellow().to_string()
    } else {
        bar.red().to_string()
    };

    println!(
        "  {:<22} {}{}  {}/{} HP  {}",
        character.name,
        colored_bar,
        "░".repeat(empty).dimmed(),
        character.current_hp,
        character.max_hp,
        character.position
    );
}

/// Color-coded combat results.
pub fn print_action_result(result: &ActionResult) {
    if !result.success {
        let error = result.error.as_deref().unwrap_or(&result.description);
        println!("  {} {}", "Failed:".red(), error);
        return;
    }

    match result.action_type.as_str() {
        "attack" => {
            println!("  {}", result.description);
            if result.attack_roll.is_some() {
                if result.hit == Some(true) {
                    let damage = result.damage_dealt.unwrap_or(0);
                    print!("  {} {} damage dealt", "HIT!".green(), damage);
                    match result.target_hp_remaining {
                        Some(hp) if hp <= 0 => println!(" — {}", "TARGET SLAIN!".red().bold()),
                        Some(hp) => println!(" — Target: {hp} HP remaining"),
                        None => println!(),
                    }
                } else {
                    println!("  {}", "MISS!".red());
                }
            }
        }
        "move" | "dash" => match result.movement_path.last() {
            Some(dest) => println!("  {}", format!("Moved to {dest}").cyan()),
            None => println!("  {}", result.description.cyan()),
        },
        "end_turn" => println!("  {}", result.description.dimmed()),
        _ => println!("  {}", result.description.yellow()),
    }
}

/// Formatted battle log.
pub fn print_log(events: &[LogEvent]) {
    if events.is_empty() {
        println!("{}", "No events yet.".dimmed());
        return;
    }
    for event in events {
        let tag = format!("R{}", event.round);
        let line = match event.action_type.as_str() {
            "attack" if event.hit == Some(true) => event.description.green().to_string(),
            "attack" => event.description.red().to_string(),
            "move" | "dash" => event.description.cyan().to_string(),
            _ => event.description.clone(),
        };
        println!("  {} {}", tag.dimmed(), line);
    }
}

/// ASCII grid zoomed to the area the characters occupy, with a legend.
pub fn print_map(snapshot: &GameSnapshot) {
    let characters = snapshot.all_characters();
    if characters.is_empty() {
        println!("{}", "No characters to display.".dimmed());
        return;
    }

    let mut positions: BTreeMap<(i32, i32), char> = BTreeMap::new();
    let mut legend: Vec<(char, &CharacterSnapshot)> = Vec::new();
    for character in &characters {
        let label = pick_label(&character.name, &positions);
        positions.insert((character.position.x, character.position.y), label);
        legend.push((label, character));
    }

    let min_x = (positions.keys().map(|p| p.0).min().unwrap_or(0) - MAP_PADDING).max(0);
    let max_x = (positions.keys().map(|p| p.0).max().unwrap_or(0) + MAP_PADDING).min(MAP_MAX);
    let min_y = (positions.keys().map(|p| p.1).min().unwrap_or(0) - MAP_PADDING).max(0);
    let max_y = (positions.keys().map(|p| p.1).max().unwrap_or(0) + MAP_PADDING).min(MAP_MAX);

    let mut header = String::from("    ");
    for x in min_x..=max_x {
        header.push_str(&format!("{x:>4}"));
    }
    println!("{header}");

    for y in min_y..=max_y {
        let mut row = format!("{y:>3} ");
        for x in min_x..=max_x {
            match positions.get(&(x, y)) {
                Some(label) => row.push_str(&format!(" {}  ", label.to_string().yellow().bold())),
                None => row.push_str(" .  "),
            }
        }
        println!("{row}");
    }

    println!();
    for (label, character) in legend {
        println!(
            "  {} = {} ({}/{} HP)",
            label.to_string().yellow().bold(),
            character.name,
            character.current_hp,
            character.max_hp
        );
    }
    println!();
}

/// First letter of the name, falling back to the first character not yet
/// used as a label so two names starting alike stay distinguishable.
fn pick_label(name: &str, positions: &BTreeMap<(i32, i32), char>) -> char {
    let used: Vec<char> = positions.values().copied().collect();
    let mut label = name
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('?');
    if used.contains(&label) {
        for c in name.to_uppercase().chars() {
            if c != ' ' && !used.contains(&c) {
                label = c;
                break;
            }
        }
    }
    label
}

pub fn print_help() {
    let sections: &[(&str, &[(&str, &str)])] = &[
        (
            "Game Setup",
            &[
                ("join <preset>", "Join as fighter, rogue, barbarian, or monk"),
                ("join custom", "Interactive character builder"),
                ("start", "Start combat"),
                ("game", "Show current game info"),
            ],
        ),
        (
            "Combat",
            &[
                ("move X Y", "Move to grid position"),
                ("attack", "Attack nearest enemy"),
                ("attack TARGET WEAPON", "Attack specific target with weapon"),
                ("dodge", "Take the Dodge action"),
                ("dash X Y", "Dash to position"),
                ("disengage", "Take Disengage action"),
                ("end / done", "End turn"),
            ],
        ),
        (
            "Info",
            &[
                ("status / s", "Show game state and HP"),
                ("map / m", "Show ASCII map"),
                ("log", "Show battle log"),
                ("help / h / ?", "This help"),
                ("quit / exit / q", "Exit client"),
            ],
        ),
        (
            "Utility",
            &[
                ("switch OWNER_ID", "Switch active character"),
                ("auto", "Auto-play current character"),
                ("demo", "Full automated demo game"),
            ],
        ),
    ];

    println!();
    for (section, rows) in sections {
        println!("{}", section.bold());
        for (command, description) in *rows {
            println!("  {:<24} {}", command.bold(), description);
        }
        println!();
    }
}

pub fn print_error(message: &str) {
    println!("{} {}", "Error:".red().bold(), message);
}

pub fn print_success(message: &str) {
    println!("{}", message.green());
}

pub fn print_info(message: &str) {
    println!("{}", message.cyan());
}

pub fn print_round_header(round: u32) {
    println!("\n{}\n", format!("══════ Round {round} ══════").bold());
}

pub fn print_winner(outcome: &GameOutcome) {
    let title = format!("{:^40}", format!("WINNER: {}", outcome.winner_name));
    let hp_line = format!(
        "{:^40}",
        format!(
            "Survived with {}/{} HP",
            outcome.winner_hp, outcome.winner_max_hp
        )
    );
    let rounds_line = format!("{:^40}", format!("{} rounds of combat", outcome.rounds));
    println!("{}", format!("╭{}╮", "─".repeat(42)).yellow());
    println!("{} {} {}", "│".yellow(), title.bold(), "│".yellow());
    println!("{} {} {}", "│".yellow(), hp_line, "│".yellow());
    println!("{} {} {}", "│".yellow(), rounds_line.dimmed(), "│".yellow());
    println!("{}", format!("╰{}╯", "─".repeat(42)).yellow());
}

/// Render a play-loop notification.
pub fn render_event(event: &PlayEvent) {
    match event {
        PlayEvent::Joined {
            character_id,
            message,
            ..
        } => match message {
            Some(message) => print_success(message),
            None => print_success(&format!("Joined! (ID: {character_id})")),
        },
        PlayEvent::CombatStarted {
            message,
            initiative,
        } => {
            print_success(message.as_deref().unwrap_or("Combat started!"));
            if !initiative.is_empty() {
                println!("  Initiative: {}", initiative.join(", "));
            }
        }
        PlayEvent::RoundStarted { round, snapshot } => {
            print_round_header(*round);
            print_state(snapshot);
        }
        PlayEvent::Moving { name, to } => println!("  [{name}] Moves to {to}"),
        PlayEvent::Attacking { attacker, target } => println!("  [{attacker}] Attacks {target}!"),
        PlayEvent::ActionResolved(result) => print_action_result(result),
        PlayEvent::ActionFailed(message) => print_error(message),
        PlayEvent::GameEnded(outcome) => {
            println!();
            print_winner(outcome);
        }
    }
}

/// Print the prompt and read one line; `None` on EOF.
pub fn prompt_line(prefix: &str) -> Option<String> {
    print!("{prefix}> ");
    let _ = io::stdout().flush();
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}
