//! Interactive terminal client for the UNIBOT university assistant.
//!
//! # Usage
//!
//! ```bash
//! # Talk to the backend on http://127.0.0.1:8001/
//! unibot-chat
//!
//! # Point at another server and keep state elsewhere
//! unibot-chat --api-url https://unibot.example.edu/ --state-file ~/.unibot.json
//!
//! # Disable colors (useful for piping output)
//! unibot-chat --no-color
//! ```
//!
//! Plain lines are sent as chat messages; lines starting with `/` are
//! commands (see `/help`). Set `UNIBOT_LOG=debug` for request logging.

use std::sync::Arc;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use unibot::chat::{ChatArgs, ChatCommand, ChatConfig, ChatSession, help_text, parse_command};
use unibot::{
    AppState, Dashboard, FileStore, NoSpeech, PlainTextRenderer, QUICK_REPLIES, Renderer,
    StatsFetcher,
};

const DEFAULT_STATE_FILE: &str = "unibot-state.json";

/// Main entry point for the unibot-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_env("UNIBOT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let (args, _) = ChatArgs::from_command_line_relaxed("unibot-chat [OPTIONS]");
    let config = ChatConfig::from(&args);
    let state_file = args
        .state_file
        .clone()
        .unwrap_or_else(|| DEFAULT_STATE_FILE.to_string());

    let store = Arc::new(FileStore::new(state_file));
    let mut app = AppState::new(args.client_config(), store)?;
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    renderer.set_theme(app.theme().theme());

    let fetcher = app.stats_fetcher();
    let mut dashboard = app.dashboard();
    let mut session = app.chat_session(config, Box::new(NoSpeech));
    let mut rl = DefaultEditor::new()?;
    let mut offered: Vec<String> = Vec::new();

    println!("UniBot (server: {})", app.config().base_url);
    match app.auth().current_user() {
        Some(user) => println!("Signed in as {}", user.username),
        None => println!("Not signed in; use /login or /signup for the dashboard"),
    }
    println!("Type /help for commands, /quit to exit\n");
    for message in session.messages() {
        renderer.print_message(message);
    }

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                let Some(cmd) = parse_command(line) else {
                    send(&mut session, &mut renderer, line).await;
                    continue;
                };
                match cmd {
                    ChatCommand::Quit => {
                        println!("Goodbye!");
                        break;
                    }
                    ChatCommand::Help => {
                        for line in help_text().lines() {
                            println!("    {}", line);
                        }
                    }
                    ChatCommand::Login(username) => {
                        let password = match rl.readline("Password: ") {
                            Ok(password) => password,
                            Err(_) => continue,
                        };
                        match app.auth_mut().login(&username, password.trim()).await {
                            Ok(user) => renderer.print_info(&format!("Welcome back, {}!", user.username)),
                            Err(err) => renderer.print_error(err.user_message()),
                        }
                    }
                    ChatCommand::Signup { username, email } => {
                        let password = match rl.readline("Choose a password: ") {
                            Ok(password) => password,
                            Err(_) => continue,
                        };
                        match app
                            .auth_mut()
                            .signup(&username, &email, password.trim())
                            .await
                        {
                            Ok(user) => renderer.print_info(&format!("Welcome, {}!", user.username)),
                            Err(err) => renderer.print_error(err.user_message()),
                        }
                    }
                    ChatCommand::Logout => match app.auth_mut().logout() {
                        Ok(()) => renderer.print_info("Signed out."),
                        Err(err) => renderer.print_error(&err.to_string()),
                    },
                    ChatCommand::Theme(choice) => {
                        let theme = match choice {
                            Some(theme) => app.theme_mut().set(theme),
                            None => app.theme_mut().toggle(),
                        };
                        match theme {
                            Ok(theme) => {
                                renderer.set_theme(theme);
                                renderer.print_info(&format!("Theme set to {theme}."));
                            }
                            Err(err) => renderer.print_error(&err.to_string()),
                        }
                    }
                    ChatCommand::Speak => {
                        if session.toggle_speech_playback() {
                            if session.speech_available() {
                                renderer.print_info("Replies will be read aloud.");
                            } else {
                                renderer.print_info(
                                    "Read-aloud turned on, but speech output is unavailable here.",
                                );
                            }
                        } else {
                            renderer.print_info("Replies will no longer be read aloud.");
                        }
                    }
                    ChatCommand::Listen => match session.toggle_voice_capture() {
                        Ok(true) => renderer.print_info("Listening..."),
                        Ok(false) => renderer.print_info("Stopped listening."),
                        Err(err) => renderer.print_error(err.user_message()),
                    },
                    ChatCommand::Export { format, path } => {
                        let result = session.export_conversation(format).and_then(|export| {
                            let path = path.unwrap_or(export.file_name);
                            std::fs::write(&path, &export.bytes)?;
                            Ok(path)
                        });
                        match result {
                            Ok(path) => renderer.print_info(&format!("Conversation saved to {path}")),
                            Err(err) => renderer.print_error(&format!("Export failed: {err}")),
                        }
                    }
                    ChatCommand::Stats => {
                        show_dashboard(&mut dashboard, &fetcher, &app, &mut renderer).await;
                    }
                    ChatCommand::Suggest => {
                        offered = session
                            .suggestions()
                            .iter()
                            .map(|s| s.text.to_string())
                            .collect();
                        let numbered = offered.len();
                        if numbered > 0 {
                            renderer.print_info("Suggestions:");
                            renderer.print_suggestions(&session.suggestions());
                        }
                        renderer.print_info("Quick replies:");
                        for (index, reply) in QUICK_REPLIES.iter().enumerate() {
                            println!("  {}. {}", numbered + index + 1, reply);
                        }
                        offered.extend(QUICK_REPLIES.iter().map(|r| r.to_string()));
                    }
                    ChatCommand::Pick(n) => match offered.get(n - 1).cloned() {
                        Some(text) => {
                            session.apply_suggestion(&text);
                            println!("You: {text}");
                            let text = session.input().to_string();
                            send(&mut session, &mut renderer, &text).await;
                        }
                        None => renderer.print_error("No such suggestion; run /suggest first."),
                    },
                    ChatCommand::Rate(stars) => {
                        let Some(id) = session.last_bot_message().map(|m| m.id.clone()) else {
                            renderer.print_error("Nothing to rate yet.");
                            continue;
                        };
                        match session.rate_message(&id, stars) {
                            Ok(()) => renderer.print_info("Thanks for the feedback!"),
                            Err(err) => renderer.print_error(err.user_message()),
                        }
                    }
                    ChatCommand::Filter(filter) => {
                        for message in session.messages_in(filter) {
                            renderer.print_message(message);
                        }
                    }
                    ChatCommand::Summary => renderer.print_summary(&session.summary()),
                    ChatCommand::ClearInput => {
                        session.set_input("");
                        renderer.print_info("Draft cleared.");
                    }
                    ChatCommand::Invalid(message) => renderer.print_error(&message),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    session.shutdown();
    Ok(())
}

async fn send(session: &mut ChatSession, renderer: &mut PlainTextRenderer, text: &str) {
    renderer.print_typing();
    match session.submit(text).await {
        Ok(reply) => renderer.print_message(reply),
        Err(err) => renderer.print_error(err.user_message()),
    }
}

async fn show_dashboard(
    dashboard: &mut Dashboard,
    fetcher: &StatsFetcher,
    app: &AppState,
    renderer: &mut PlainTextRenderer,
) {
    renderer.print_info("Loading dashboard...");
    // The error is kept on the dashboard and rendered from there.
    let _ = dashboard.refresh(fetcher, app.auth()).await;
    renderer.print_dashboard(dashboard);
}
