//! Quill application binary.
//!
//! 1. Parse CLI arguments
//! 2. Load configuration from TOML
//! 3. Initialize tracing (stderr, so stdout carries only output)
//! 4. Run the requested command

mod cli;
mod replay;

use std::io::Read;

use clap::Parser;

use quill_core::config::QuillConfig;
use quill_dictation::normalize;

use cli::{CliArgs, Command};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config is read before tracing is up so its log level can apply.
    let config_file = args.resolve_config_path();
    let config = QuillConfig::load_or_default(&config_file);
    let log_level = args.resolve_log_level(&config.general.log_level);

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .init();

    tracing::debug!(
        path = %config_file.display(),
        language = %config.speech.language,
        "Configuration resolved"
    );

    match args.command {
        Command::Normalize { text } => {
            let input = if text.is_empty() {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            } else {
                text.join(" ")
            };
            println!("{}", normalize(&input));
        }
        Command::Replay {
            script,
            initial,
            events,
        } => {
            let content = std::fs::read_to_string(&script)?;
            let outcome = replay::replay(&content, &initial, &config)?;

            print!("{}", outcome.document);
            if !outcome.document.ends_with('\n') {
                println!();
            }
            if events {
                for event in &outcome.events {
                    println!("{}", serde_json::to_string(event)?);
                }
            }
            tracing::info!(
                chars = outcome.document.chars().count(),
                events = outcome.events.len(),
                "Replay finished"
            );
        }
    }

    Ok(())
}
