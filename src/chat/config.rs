//! Configuration types for the chat front end.
//!
//! This module provides CLI argument parsing via `arrrg` and the
//! [`ChatConfig`] that controls how a [`ChatSession`](super::ChatSession)
//! behaves.

use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::client::ClientConfig;

/// Greeting shown as the first bot message of a new session.
pub const DEFAULT_GREETING: &str = "Hello! How can I help you today?";

/// Pause between receiving a reply and showing it.
pub const DEFAULT_TYPING_DELAY: Duration = Duration::from_millis(500);

/// Command-line arguments for the unibot-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Backend base URL.
    #[arrrg(optional, "Backend base URL (default: $UNIBOT_API_URL or http://127.0.0.1:8001/)", "URL")]
    pub api_url: Option<String>,

    /// Where to keep the signed-in user and preferences.
    #[arrrg(optional, "Path of the client state file (default: ./unibot-state.json)", "PATH")]
    pub state_file: Option<String>,

    /// Typing pause in milliseconds.
    #[arrrg(optional, "Typing pause before replies in milliseconds (default: 500)", "MS")]
    pub typing_delay_ms: Option<u64>,

    /// Read replies aloud from the start.
    #[arrrg(flag, "Read bot replies aloud")]
    pub speak: bool,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

impl ChatArgs {
    /// Connection settings implied by the arguments and environment.
    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::from_env();
        match &self.api_url {
            Some(url) => config.with_base_url(url.clone()),
            None => config,
        }
    }
}

/// Configuration for a chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Opening bot message; `None` starts with an empty transcript.
    pub greeting: Option<String>,

    /// Pause between a successful reply arriving and it being appended.
    pub typing_delay: Duration,

    /// Whether new bot replies are read aloud.
    pub speak_replies: bool,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Greeting: "Hello! How can I help you today?"
    /// - Typing delay: 500 ms
    /// - Speak replies: disabled
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            greeting: Some(DEFAULT_GREETING.to_string()),
            typing_delay: DEFAULT_TYPING_DELAY,
            speak_replies: false,
            use_color: true,
        }
    }

    /// Sets or clears the greeting.
    pub fn with_greeting(mut self, greeting: Option<String>) -> Self {
        self.greeting = greeting;
        self
    }

    /// Sets the typing delay.
    pub fn with_typing_delay(mut self, delay: Duration) -> Self {
        self.typing_delay = delay;
        self
    }

    /// Sets whether replies are read aloud.
    pub fn with_speak_replies(mut self, speak: bool) -> Self {
        self.speak_replies = speak;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&ChatArgs> for ChatConfig {
    fn from(args: &ChatArgs) -> Self {
        ChatConfig {
            typing_delay: args
                .typing_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_TYPING_DELAY),
            speak_replies: args.speak,
            use_color: !args.no_color,
            ..ChatConfig::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert_eq!(config.greeting.as_deref(), Some(DEFAULT_GREETING));
        assert_eq!(config.typing_delay, Duration::from_millis(500));
        assert!(!config.speak_replies);
        assert!(config.use_color);
    }

    #[test]
    fn config_from_args_defaults() {
        let config = ChatConfig::from(&ChatArgs::default());
        assert_eq!(config, ChatConfig::new());
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            api_url: Some("http://10.0.0.5:8001".to_string()),
            state_file: None,
            typing_delay_ms: Some(0),
            speak: true,
            no_color: true,
        };
        let config = ChatConfig::from(&args);
        assert!(config.typing_delay.is_zero());
        assert!(config.speak_replies);
        assert!(!config.use_color);
        assert_eq!(args.client_config().base_url, "http://10.0.0.5:8001");
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_greeting(None)
            .with_typing_delay(Duration::from_millis(20))
            .with_speak_replies(true)
            .without_color();
        assert!(config.greeting.is_none());
        assert_eq!(config.typing_delay, Duration::from_millis(20));
        assert!(config.speak_replies);
        assert!(!config.use_color);
    }
}
