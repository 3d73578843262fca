//! Terminal UI layer for the interactive chat session.
//!
//! - [`chat_loop`]: terminal setup and the event loop that feeds input to
//!   [`crate::core::app`] and runs the commands it returns.
//! - [`renderer`]: frame layout for the header, transcript, sidebar and input.
//! - [`markdown`] and [`wrap`]: assistant replies to wrapped, styled lines.
//! - [`theme`]: the color palette.

pub mod chat_loop;
pub mod markdown;
pub mod renderer;
pub mod theme;
pub mod wrap;
