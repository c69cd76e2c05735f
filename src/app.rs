//! Client-wide state built once at start-up.

use std::sync::Arc;

use crate::auth::AuthSession;
use crate::chat::{ChatConfig, ChatSession};
use crate::client::{ClientConfig, HttpTransport, Transport};
use crate::error::Result;
use crate::speech::SpeechCapability;
use crate::stats::{Dashboard, StatsFetcher};
use crate::storage::KeyValueStore;
use crate::theme::ThemeSession;

/// The transport, signed-in identity and theme shared by every view.
///
/// Views receive what they need from here instead of reaching for globals.
pub struct AppState {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    auth: AuthSession,
    theme: ThemeSession,
}

impl AppState {
    /// Connects to the configured server and restores persisted state.
    pub fn new(config: ClientConfig, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(&config)?);
        Self::with_transport(config, transport, store)
    }

    /// Like [`new`](Self::new), but with a caller-supplied transport.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self> {
        let auth = AuthSession::restore(Arc::clone(&store), Arc::clone(&transport))?;
        let theme = ThemeSession::load(store)?;
        tracing::debug!(
            base_url = %config.base_url,
            signed_in = auth.is_authenticated(),
            theme = %theme.theme(),
            "client state ready"
        );
        Ok(Self {
            config,
            transport,
            auth,
            theme,
        })
    }

    /// Starts a new conversation.
    pub fn chat_session(
        &self,
        config: ChatConfig,
        speech: Box<dyn SpeechCapability>,
    ) -> ChatSession {
        ChatSession::new(Arc::clone(&self.transport), speech, config)
    }

    /// A stats fetcher sharing this client's transport.
    pub fn stats_fetcher(&self) -> StatsFetcher {
        StatsFetcher::new(Arc::clone(&self.transport))
    }

    /// A fresh dashboard with default filters.
    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new()
    }

    /// The connection settings.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The authentication state.
    pub fn auth(&self) -> &AuthSession {
        &self.auth
    }

    /// Mutable authentication state, for login and logout.
    pub fn auth_mut(&mut self) -> &mut AuthSession {
        &mut self.auth
    }

    /// The theme preference.
    pub fn theme(&self) -> &ThemeSession {
        &self.theme
    }

    /// Mutable theme preference.
    pub fn theme_mut(&mut self) -> &mut ThemeSession {
        &mut self.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, THEME_KEY};
    use crate::types::Theme;

    #[test]
    fn restores_theme_from_store() {
        let store = Arc::new(MemoryStore::new());
        store.set(THEME_KEY, "dark").unwrap();
        let app = AppState::new(ClientConfig::new(), store).unwrap();
        assert_eq!(app.theme().theme(), Theme::Dark);
        assert!(!app.auth().is_authenticated());
    }

    #[test]
    fn rejects_invalid_base_url() {
        let config = ClientConfig::new().with_base_url("not a url");
        let result = AppState::new(config, Arc::new(MemoryStore::new()));
        assert!(result.is_err());
    }
}
