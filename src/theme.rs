//! Light/dark preference, persisted under [`THEME_KEY`].

use std::sync::Arc;

use crate::error::Result;
use crate::storage::{KeyValueStore, THEME_KEY};
use crate::types::Theme;

/// The active colour scheme.
pub struct ThemeSession {
    store: Arc<dyn KeyValueStore>,
    theme: Theme,
}

impl ThemeSession {
    /// Loads the stored preference; anything unrecognised means light.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let theme = store
            .get(THEME_KEY)?
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();
        Ok(Self { store, theme })
    }

    /// The active theme.
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Returns true when the dark scheme is active.
    pub fn is_dark(&self) -> bool {
        self.theme == Theme::Dark
    }

    /// Switches between light and dark.
    pub fn toggle(&mut self) -> Result<Theme> {
        self.set(self.theme.toggled())
    }

    /// Selects a theme and persists it.
    pub fn set(&mut self, theme: Theme) -> Result<Theme> {
        self.store.set(THEME_KEY, theme.as_str())?;
        self.theme = theme;
        Ok(theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn defaults_to_light() {
        let session = ThemeSession::load(Arc::new(MemoryStore::new())).unwrap();
        assert_eq!(session.theme(), Theme::Light);
        assert!(!session.is_dark());
    }

    #[test]
    fn unknown_value_reads_as_light() {
        let store = Arc::new(MemoryStore::new());
        store.set(THEME_KEY, "sepia").unwrap();
        let session = ThemeSession::load(store).unwrap();
        assert_eq!(session.theme(), Theme::Light);
    }

    #[test]
    fn toggle_persists() {
        let store = Arc::new(MemoryStore::new());
        let mut session = ThemeSession::load(store.clone()).unwrap();
        assert_eq!(session.toggle().unwrap(), Theme::Dark);
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));

        let reloaded = ThemeSession::load(store.clone()).unwrap();
        assert!(reloaded.is_dark());

        session.set(Theme::Light).unwrap();
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("light"));
    }
}
