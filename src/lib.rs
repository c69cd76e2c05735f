// Public modules
pub mod app;
pub mod auth;
pub mod chat;
pub mod classify;
pub mod client;
pub mod error;
pub mod observability;
pub mod render;
pub mod speech;
pub mod stats;
pub mod storage;
pub mod suggestions;
pub mod theme;
pub mod types;

// Re-exports
pub use app::AppState;
pub use auth::AuthSession;
pub use chat::{ChatConfig, ChatSession, FALLBACK_REPLY};
pub use classify::classify;
pub use client::{ClientConfig, HttpResponse, HttpTransport, Transport};
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use render::{PlainTextRenderer, Renderer};
pub use speech::{CaptureEvent, NoSpeech, SpeechCapability};
pub use stats::{Dashboard, StatsFetcher};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use suggestions::{QUICK_REPLIES, Suggestion, contextual_suggestions};
pub use theme::ThemeSession;
pub use types::*;
