// Public modules
pub mod auth_response;
pub mod category;
pub mod date_range;
pub mod export_format;
pub mod message;
pub mod sender;
pub mod stats_payload;
pub mod theme;
pub mod time_filter;
pub mod user;

// Re-exports
pub use auth_response::{AuthResponse, Credentials, SignupRequest};
pub use category::{Category, CategoryParseError};
pub use date_range::DateRange;
pub use export_format::{ExportFormat, ExportFormatParseError};
pub use message::Message;
pub use sender::Sender;
pub use stats_payload::{DailyActivity, IntentCount, REQUIRED_STATS_FIELDS, StatsPayload};
pub use theme::{Theme, ThemeParseError};
pub use time_filter::{TimeFilter, TimeFilterParseError};
pub use user::User;
