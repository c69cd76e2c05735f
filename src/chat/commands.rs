//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the session without sending messages to the
//! chat service.

use crate::chat::session::CategoryFilter;
use crate::types::{Category, ExportFormat, Theme};

/// A parsed chat command.
///
/// These commands control the client and are not sent as chat messages.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Sign in; the password is prompted for separately.
    Login(String),

    /// Create an account; the password is prompted for separately.
    Signup {
        /// Account name.
        username: String,
        /// Contact address.
        email: String,
    },

    /// Sign out and forget stored credentials.
    Logout,

    /// Select a theme, or toggle when `None`.
    Theme(Option<Theme>),

    /// Toggle reading replies aloud.
    Speak,

    /// Toggle voice capture.
    Listen,

    /// Write the transcript to disk.
    Export {
        /// Output format.
        format: ExportFormat,
        /// Destination; defaults to the format's file name.
        path: Option<String>,
    },

    /// Fetch and show the analytics dashboard.
    Stats,

    /// List follow-up suggestions and quick replies.
    Suggest,

    /// Send the numbered suggestion from the last `/suggest` listing.
    Pick(usize),

    /// Rate the latest bot reply from one to five stars.
    Rate(u8),

    /// Restrict the transcript view to one category.
    Filter(CategoryFilter),

    /// Show message and rating counts for this session.
    Summary,

    /// Discard the draft input.
    ClearInput,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a valid command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use unibot::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/export json").is_some());
/// assert!(parse_command("When is the library open?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    let rest = input.strip_prefix('/')?;
    let mut parts = rest.splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        "login" => match argument {
            Some(username) if !username.contains(' ') => ChatCommand::Login(username.to_string()),
            Some(_) => ChatCommand::Invalid("/login takes a single username".to_string()),
            None => ChatCommand::Invalid("/login requires a username".to_string()),
        },
        "signup" => parse_signup(argument),
        "logout" => ChatCommand::Logout,
        "theme" => match argument {
            None => ChatCommand::Theme(None),
            Some(arg) if arg.eq_ignore_ascii_case("toggle") => ChatCommand::Theme(None),
            Some(arg) => match arg.to_lowercase().parse::<Theme>() {
                Ok(theme) => ChatCommand::Theme(Some(theme)),
                Err(_) => ChatCommand::Invalid("/theme expects 'light', 'dark' or 'toggle'".to_string()),
            },
        },
        "speak" => ChatCommand::Speak,
        "listen" | "mic" => ChatCommand::Listen,
        "export" => parse_export(argument),
        "stats" | "dashboard" => ChatCommand::Stats,
        "suggest" | "suggestions" => ChatCommand::Suggest,
        "pick" => match argument.map(str::parse::<usize>) {
            Some(Ok(n)) if n >= 1 => ChatCommand::Pick(n),
            Some(_) => ChatCommand::Invalid("/pick expects a suggestion number".to_string()),
            None => ChatCommand::Invalid("/pick requires a suggestion number".to_string()),
        },
        "rate" => match argument.map(str::parse::<u8>) {
            Some(Ok(n)) if (1..=5).contains(&n) => ChatCommand::Rate(n),
            Some(_) => ChatCommand::Invalid("/rate expects 1 to 5 stars".to_string()),
            None => ChatCommand::Invalid("/rate requires a rating".to_string()),
        },
        "filter" => match argument {
            None => ChatCommand::Filter(CategoryFilter::All),
            Some(arg) if arg.eq_ignore_ascii_case("all") => ChatCommand::Filter(CategoryFilter::All),
            Some(arg) => match arg.to_lowercase().parse::<Category>() {
                Ok(category) => ChatCommand::Filter(CategoryFilter::Only(category)),
                Err(err) => ChatCommand::Invalid(format!("/filter {err}")),
            },
        },
        "summary" => ChatCommand::Summary,
        "clear-input" | "clear" => ChatCommand::ClearInput,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

fn parse_signup(argument: Option<&str>) -> ChatCommand {
    let Some(arg) = argument else {
        return ChatCommand::Invalid("/signup requires a username and email".to_string());
    };
    let words: Vec<&str> = arg.split_whitespace().collect();
    match words.as_slice() {
        [username, email] if email.contains('@') => ChatCommand::Signup {
            username: username.to_string(),
            email: email.to_string(),
        },
        [_, _] => ChatCommand::Invalid("/signup expects a valid email address".to_string()),
        _ => ChatCommand::Invalid("/signup requires a username and email".to_string()),
    }
}

fn parse_export(argument: Option<&str>) -> ChatCommand {
    let Some(arg) = argument else {
        return ChatCommand::Invalid("/export requires a format (pdf, txt or json)".to_string());
    };
    let mut parts = arg.splitn(2, ' ');
    let format = parts.next().unwrap_or_default();
    let path = parts
        .next()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());
    match format.to_lowercase().parse::<ExportFormat>() {
        Ok(format) => ChatCommand::Export { format, path },
        Err(_) => ChatCommand::Invalid(format!("/export does not support '{format}'")),
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /login <username>         Sign in (password is prompted)
  /signup <username> <email> Create an account
  /logout                   Sign out
  /theme [light|dark]       Select a theme (no argument toggles)
  /speak                    Toggle reading replies aloud
  /listen                   Toggle voice input
  /export <pdf|txt|json> [file]
                            Save the conversation
  /stats                    Show the analytics dashboard
  /suggest                  List suggested follow-ups
  /pick <n>                 Send suggestion number n
  /rate <1-5>               Rate the latest reply
  /filter [category|all]    Show only one category of messages
  /summary                  Show session counts
  /clear-input              Discard the draft input
  /help                     Show this help message
  /quit                     Exit the chat"#
}
