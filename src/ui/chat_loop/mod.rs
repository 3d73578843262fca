//! The interactive chat session: terminal setup, key handling and the
//! event loop that ties the background services to the [`App`].
//!
//! [`App`]: crate::core::app::App

mod event_loop;
mod keybindings;
mod lifecycle;

pub use event_loop::run_chat;
