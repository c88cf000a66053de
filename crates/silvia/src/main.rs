// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SilvIA+ - a Telegram assistant with alert escalation, history replay,
//! LLM replies, and voice transcription.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use silvia_config::{ConfigError, SilviaConfig};

/// SilvIA+ - a Telegram assistant.
#[derive(Parser, Debug)]
#[command(name = "silvia", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the bot until SIGINT or SIGTERM.
    Serve,
    /// Load and validate configuration, then report the result.
    CheckConfig,
}

fn load(path: Option<&PathBuf>) -> Result<SilviaConfig, Vec<ConfigError>> {
    match path {
        Some(path) => silvia_config::load_and_validate_path(path),
        None => silvia_config::load_and_validate(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load(cli.config.as_ref()) {
        Ok(config) => config,
        Err(errors) => {
            silvia_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("silvia: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::CheckConfig) => {
            println!("{}", summarize(&config));
        }
        None => {
            println!("silvia: use --help for available commands");
        }
    }
}

/// One-screen report printed by `check-config`.
fn summarize(config: &SilviaConfig) -> String {
    let configured = |present: bool| if present { "configured" } else { "missing" };
    [
        "configuration OK".to_string(),
        format!("  agent.name           = {}", config.agent.name),
        format!("  agent.default_locale = {}", config.agent.default_locale),
        format!("  dispatch.mode        = {:?}", config.dispatch.mode),
        format!(
            "  telegram.bot_token   = {}",
            configured(config.telegram.bot_token.is_some())
        ),
        format!(
            "  telegram.admin_chat  = {}",
            configured(config.telegram.admin_chat_id.is_some())
        ),
        format!("  openai.model         = {}", config.openai.model),
        format!("  knowledge.enabled    = {}", config.knowledge.enabled),
        format!("  storage.database     = {}", config.storage.database_path),
    ]
    .join("\n")
}
