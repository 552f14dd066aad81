mod commands;
mod display;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use client::gateway::Gateway;
use client::http::HttpGateway;
use client::session::Session;
use client::snapshot::GameStatus;
use tracing_subscriber::EnvFilter;

const DEFAULT_SERVER: &str = "https://web-production-969c8.up.railway.app";

#[derive(Parser)]
#[command(name = "tendrils")]
#[command(about = "Tendrils arena terminal client")]
struct Cli {
    /// Server base URL
    #[arg(long, default_value = DEFAULT_SERVER)]
    server: String,

    /// API key for authentication (e.g. sk_...)
    #[arg(long)]
    token: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if cli.token.is_none() {
        display::print_error("--token is required. Ask the server operator for an API key.");
        std::process::exit(1);
    }
    let gateway = HttpGateway::new(&cli.server, cli.token.as_deref())
        .context("failed to build HTTP client")?;
    let mut session = Session::new();

    let info = match gateway.ping() {
        Ok(info) => info,
        Err(err) => {
            display::print_error(&format!(
                "Cannot reach server at {}. Is it running?",
                cli.server
            ));
            display::print_error(&err.to_string());
            std::process::exit(1);
        }
    };

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        ctrlc::set_handler(move || cancel.store(true, Ordering::Relaxed))
            .context("failed to install interrupt handler")?;
    }

    println!();
    display::print_banner(&info);
    println!("\nConnected to {}", cli.server);
    println!("Type 'help' for commands.\n");

    loop {
        cancel.store(false, Ordering::Relaxed);
        let prefix = prompt_prefix(&gateway, &mut session);
        let Some(line) = display::prompt_line(&prefix) else {
            break;
        };
        if !commands::handle_command(&line, &gateway, &mut session, &cancel) {
            break;
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// Context-aware prompt: once combat is running, show the round and whose
/// turn it is. Query failures fall back to the plain prompt.
fn prompt_prefix(gateway: &HttpGateway, session: &mut Session) -> String {
    if session.status() != Some(GameStatus::Active) || !session.has_characters() {
        return "tendrils".to_string();
    }
    let Some(character_id) = session.default_character_id().map(str::to_string) else {
        return "tendrils".to_string();
    };
    let Ok(state) = gateway.query_state(&character_id) else {
        return "tendrils".to_string();
    };
    session.update_status_from(&state);
    if state.is_over() {
        return "tendrils".to_string();
    }

    let name = state
        .your_character
        .as_ref()
        .map(|c| c.name.as_str())
        .unwrap_or("?");
    if state.is_your_turn {
        format!("[R{} -- {}'s turn]", state.round, name)
    } else {
        format!("[R{} -- {}'s turn (waiting)]", state.round, name)
    }
}
