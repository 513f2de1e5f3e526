// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pawmatch chat` command implementation.
//!
//! Loads the live catalog, then runs the matchmaking chat in a readline
//! REPL. Both sides of every exchange are saved to the messages table.

use std::sync::Arc;

use colored::Colorize;
use pawmatch_app::{AppContext, SendOutcome, SharedGenerator};
use pawmatch_config::PawmatchConfig;
use pawmatch_core::{GenerationAdapter, PawError};
use pawmatch_gemini::GeminiGenerator;
use pawmatch_services::Services;
use pawmatch_store::{Gateway, PostgrestStore};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{info, warn};

pub async fn run_chat(config: PawmatchConfig) -> Result<(), PawError> {
    let store = Arc::new(PostgrestStore::new(&config.store)?);
    let services = Services::new(Gateway::new(store));
    let generator: SharedGenerator = GeminiGenerator::from_config(&config)?
        .map(|g| Arc::new(g) as Arc<dyn GenerationAdapter>);
    let ctx = AppContext::new(config, services, generator);

    if !ctx.ai_enabled() {
        eprintln!(
            "{}",
            "no Gemini API key set (config gemini.api_key or GEMINI_API_KEY); replies will be fallback text"
                .yellow()
        );
    }

    let catalog = ctx.pets(None);
    catalog.mount().await;
    let pets = catalog.snapshot();
    if let Some(err) = pets.error {
        warn!(error = %err, "catalog not loaded, chatting without it");
    }
    info!(pets = pets.data.len(), "catalog loaded");

    let history = Arc::new(ctx.messages());
    history.mount().await;

    let session = ctx.chat(Some(history));
    session.set_catalog(pets.data).await;

    let mut rl = DefaultEditor::new()
        .map_err(|e| PawError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "pawmatch chat".bold().green());
    if let Some(greeting) = session.snapshot().entries.first() {
        println!("{}\n", greeting.content);
    }
    println!("Type {} to start over, {} to exit.\n", "/clear".yellow(), "/quit".yellow());

    let prompt = format!("{}> ", "you".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                match trimmed {
                    "/quit" | "/exit" => break,
                    "" => continue,
                    "/clear" => {
                        session.clear().await;
                        println!("{}", "conversation cleared".dimmed());
                        continue;
                    }
                    _ => {}
                }
                let _ = rl.add_history_entry(&line);

                match session.send(trimmed).await {
                    SendOutcome::Replied(reply) => println!("{}\n", reply),
                    SendOutcome::Fallback(reply) => println!("{}\n", reply.yellow()),
                    SendOutcome::Ignored | SendOutcome::Closed | SendOutcome::Discarded => {}
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    session.close();
    Ok(())
}
