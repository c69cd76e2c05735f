//! Chat conversations with the UNIBOT responder.
//!
//! - [`config`]: CLI argument parsing and session configuration
//! - [`session`]: the chat session state machine
//! - [`export`]: transcript export to json, txt and pdf
//! - [`commands`]: slash command parsing for the terminal front end

mod commands;
mod config;
mod export;
mod session;

pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig, DEFAULT_GREETING, DEFAULT_TYPING_DELAY};
pub use export::{Export, export_conversation};
pub use session::{
    CategoryFilter, ChatSession, ChatSummary, FALLBACK_REPLY, Feedback, PendingReply,
};
