//! tubechat is a full-screen terminal client for a YouTube-analysis AI agent
//! served over HTTP.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`api`] defines the wire types and the HTTP client for the agent server.
//! - [`core`] owns the conversation state machine, the typing animation,
//!   connection monitoring, the cache panel, and configuration.
//! - [`ui`] renders the terminal interface and runs the event loop.
//! - [`commands`] implements slash-command parsing.
//! - [`cli`] parses arguments and runs the one-shot subcommands.
//!
//! The binary (`src/main.rs`) only calls [`cli::main`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
