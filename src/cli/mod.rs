//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod ask;
pub mod maintenance;

use std::error::Error;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::api::ApiClient;
use crate::cli::ask::{run_ask, run_batch};
use crate::cli::maintenance::{run_clear_cache, run_health, run_stats};
use crate::core::config::{Config, ResolvedSettings, SettingOverrides, SETTING_KEYS};
use crate::core::constants::{LOG_FILTER_ENV, QUERY_TIMEOUT};
use crate::ui::chat_loop::run_chat;

const DEFAULT_LOG_FILTER: &str = "tubechat=debug";

#[derive(Parser)]
#[command(name = "tubechat", version)]
#[command(about = "A terminal chat client for a YouTube-analysis AI agent")]
#[command(
    long_about = "tubechat is a full-screen terminal chat interface for an AI agent that \
summarizes YouTube videos, searches YouTube and fetches video metadata. It talks to the \
agent's HTTP API and keeps an eye on the connection while you chat.\n\n\
Environment Variables:\n\
  TUBECHAT_API_URL  Base URL of the agent API (overrides the config file)\n\
  TUBECHAT_LOG      tracing filter used with --debug-log (default: tubechat=debug)\n\n\
Controls:\n\
  Enter             Send the question\n\
  Alt+Enter         Insert a newline\n\
  Ctrl+L            Start a new conversation\n\
  Ctrl+S            Show or hide the cache sidebar\n\
  Ctrl+R            Check the backend connection now\n\
  Ctrl+E            Cycle through example questions\n\
  Esc               Dismiss the error banner\n\
  Ctrl+C            Quit the application\n\n\
Commands:\n\
  /help             Show extended help with keyboard shortcuts\n\
  /log <filename>   Enable logging to specified file\n\
  /log              Toggle logging pause/resume"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the agent API
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Ask the backend to bypass its response cache
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Show replies at once instead of typing them out
    #[arg(long, global = true)]
    pub no_typing: bool,

    /// Enable transcript logging to specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<String>,

    /// Write diagnostic tracing output to specified file
    #[arg(long, global = true, value_name = "FILE")]
    pub debug_log: Option<PathBuf>,
}

impl Args {
    pub fn overrides(&self) -> SettingOverrides {
        SettingOverrides {
            api_url: self.api_url.clone(),
            no_cache: self.no_cache,
            no_typing: self.no_typing,
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Ask one question and print the answer
    Ask {
        /// The question; multiple words are joined with spaces
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        query: Vec<String>,
    },
    /// Run several questions in one request and print each answer
    Batch {
        /// One argument per question
        #[arg(required = true)]
        queries: Vec<String>,
    },
    /// Check whether the agent API is reachable
    Health,
    /// Show response cache statistics
    Stats,
    /// Clear the backend response cache
    ClearCache,
    /// Show the config file and the effective settings
    Config,
    /// Set configuration values
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(args.debug_log.as_deref())?;
    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

/// Routes `tracing` output to `path`. Without a path nothing is installed,
/// since the TUI owns the terminal.
fn init_tracing(path: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| err as Box<dyn Error>)?;
    Ok(())
}

fn resolve_settings(overrides: &SettingOverrides) -> Result<ResolvedSettings, Box<dyn Error>> {
    let config = Config::load()?;
    Ok(ResolvedSettings::resolve(&config, overrides)?)
}

pub fn client_for(settings: &ResolvedSettings) -> ApiClient {
    ApiClient::new(&settings.api_url).with_timeouts(QUERY_TIMEOUT, settings.request_timeout)
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let overrides = args.overrides();

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let settings = resolve_settings(&overrides)?;
            run_chat(settings, args.log).await
        }
        Commands::Ask { query } => {
            let settings = resolve_settings(&overrides)?;
            run_ask(&client_for(&settings), &query.join(" "), settings.use_cache).await
        }
        Commands::Batch { queries } => {
            let settings = resolve_settings(&overrides)?;
            run_batch(&client_for(&settings), queries, settings.use_cache).await
        }
        Commands::Health => {
            let settings = resolve_settings(&overrides)?;
            run_health(&client_for(&settings)).await
        }
        Commands::Stats => {
            let settings = resolve_settings(&overrides)?;
            run_stats(&client_for(&settings)).await
        }
        Commands::ClearCache => {
            let settings = resolve_settings(&overrides)?;
            run_clear_cache(&client_for(&settings)).await
        }
        Commands::Config => {
            let config = Config::load()?;
            config.print_all();
            println!();
            ResolvedSettings::resolve(&config, &overrides)?.print_all();
            Ok(())
        }
        Commands::Set { key, value } => {
            if value.is_empty() {
                eprintln!("Usage: tubechat set <key> <value>");
                eprintln!("Available keys: {}", SETTING_KEYS.join(", "));
                std::process::exit(1);
            }
            let value = value.join(" ");
            Config::mutate(|config| config.set_value(&key, &value))?;
            println!("✅ Set {key} to: {value}");
            Ok(())
        }
        Commands::Unset { key } => {
            Config::mutate(|config| config.unset_value(&key))?;
            println!("✅ Unset {key}");
            Ok(())
        }
    }
}
