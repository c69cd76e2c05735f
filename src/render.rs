//! Terminal output for the chat client.
//!
//! This module provides a renderer trait and a plain-text implementation
//! that tags each reply with its category and, when colour is enabled,
//! colours it according to the category and the active theme.

use std::io::{self, Stdout, Write};

use time::macros::format_description;

use crate::chat::ChatSummary;
use crate::stats::Dashboard;
use crate::suggestions::Suggestion;
use crate::types::{Category, Message, Theme};

/// ANSI escape code for dim text (used for timestamps and the typing line).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for bold text (used for author labels).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Foreground colour for a category under a theme.
///
/// Dark terminals get the bright palette so tags stay legible.
pub fn category_color(category: Option<Category>, theme: Theme) -> &'static str {
    let Some(category) = category else {
        return ANSI_RED;
    };
    match (category, theme) {
        (Category::Academic, Theme::Light) => "\x1b[34m",
        (Category::Academic, Theme::Dark) => "\x1b[94m",
        (Category::Administrative, Theme::Light) => "\x1b[35m",
        (Category::Administrative, Theme::Dark) => "\x1b[95m",
        (Category::Technical, Theme::Light) => "\x1b[33m",
        (Category::Technical, Theme::Dark) => "\x1b[93m",
        (Category::Personal, Theme::Light) => "\x1b[32m",
        (Category::Personal, Theme::Dark) => "\x1b[92m",
        (Category::Campus, Theme::Light) => "\x1b[36m",
        (Category::Campus, Theme::Dark) => "\x1b[96m",
        (Category::General | Category::User, Theme::Light) => "\x1b[30m",
        (Category::General | Category::User, Theme::Dark) => "\x1b[97m",
    }
}

/// Trait for rendering chat output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
pub trait Renderer: Send {
    /// Switches the colour palette.
    fn set_theme(&mut self, theme: Theme);

    /// Print one transcript entry.
    fn print_message(&mut self, message: &Message);

    /// Show that a reply is on its way.
    fn print_typing(&mut self);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Print a numbered list of follow-up prompts.
    fn print_suggestions(&mut self, suggestions: &[Suggestion]);

    /// Print the analytics dashboard.
    fn print_dashboard(&mut self, dashboard: &Dashboard);

    /// Print session counts.
    fn print_summary(&mut self, summary: &ChatSummary);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer<W: Write + Send = Stdout> {
    out: W,
    use_color: bool,
    theme: Theme,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer on stdout with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer on stdout with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self::to_writer(io::stdout(), use_color)
    }
}

impl<W: Write + Send> PlainTextRenderer<W> {
    /// Creates a renderer writing to `out`.
    pub fn to_writer(out: W, use_color: bool) -> Self {
        Self {
            out,
            use_color,
            theme: Theme::default(),
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn styled(&self, style: &str, text: &str) -> String {
        if self.use_color {
            format!("{style}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }

    fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> Renderer for PlainTextRenderer<W> {
    fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    fn print_message(&mut self, message: &Message) {
        let time = message
            .timestamp
            .format(format_description!("[hour]:[minute]"))
            .unwrap_or_default();
        let time = self.styled(ANSI_DIM, &time);
        let line = if message.is_user() {
            format!("{time} {} {}", self.styled(ANSI_BOLD, "You:"), message.text)
        } else {
            let tag = match message.category {
                Some(category) => format!("[{category}]"),
                None => "[error]".to_string(),
            };
            let color = category_color(message.category, self.theme);
            format!(
                "{time} {} {} {}",
                self.styled(ANSI_BOLD, "UniBot:"),
                self.styled(color, &tag),
                message.text
            )
        };
        self.line(&line);
    }

    fn print_typing(&mut self) {
        let text = self.styled(ANSI_DIM, "UniBot is typing...");
        self.line(&text);
    }

    fn print_error(&mut self, error: &str) {
        let text = self.styled(ANSI_RED, &format!("Error: {error}"));
        self.line(&text);
    }

    fn print_info(&mut self, info: &str) {
        self.line(info);
    }

    fn print_suggestions(&mut self, suggestions: &[Suggestion]) {
        for (index, suggestion) in suggestions.iter().enumerate() {
            let line = format!("  {}. {} {}", index + 1, suggestion.icon, suggestion.text);
            self.line(&line);
        }
    }

    fn print_dashboard(&mut self, dashboard: &Dashboard) {
        if let Some(err) = dashboard.error() {
            self.print_error(err.user_message());
            return;
        }
        let query = dashboard.query();
        let stats = dashboard.stats();
        self.line(&self.styled(ANSI_BOLD, "Dashboard"));
        self.line(&format!(
            "  Period: {} ({} to {})",
            query.time_filter, query.date_range.start, query.date_range.end
        ));
        self.line(&format!("  Conversations:      {}", stats.total_conversations));
        self.line(&format!("  Messages:           {}", stats.total_messages));
        self.line(&format!("  Avg. satisfaction:  {:.1}", stats.avg_satisfaction));
        self.line(&format!("  Intents:            {}", stats.total_intents));
        if !stats.intent_distribution.is_empty() {
            self.line("  Top intents:");
            for intent in &stats.intent_distribution {
                self.line(&format!("    {:<24} {}", intent.name, intent.count));
            }
        }
        if !stats.daily_activity.is_empty() {
            self.line("  Daily activity:");
            for day in &stats.daily_activity {
                self.line(&format!("    {:<24} {}", day.date, day.count));
            }
        }
    }

    fn print_summary(&mut self, summary: &ChatSummary) {
        self.line(&format!(
            "{} messages ({} from you, {} from UniBot, {} failed)",
            summary.message_count, summary.user_messages, summary.bot_messages, summary.failed_replies
        ));
        for (category, count) in &summary.categories {
            self.line(&format!("  {:<16} {count}", category.to_string()));
        }
        if let Some(rating) = summary.average_rating {
            self.line(&format!("  Average rating: {rating:.1} / 5"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(f: impl FnOnce(&mut PlainTextRenderer<Vec<u8>>)) -> String {
        let mut renderer = PlainTextRenderer::to_writer(Vec::new(), false);
        f(&mut renderer);
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn renderer_default_has_color() {
        let renderer = PlainTextRenderer::new();
        assert!(renderer.use_color);
    }

    #[test]
    fn bot_message_carries_category_tag() {
        let out = rendered(|r| {
            r.print_message(&Message::bot("1", "Reset it online.", Some(Category::Technical)))
        });
        assert!(out.contains("UniBot: [technical] Reset it online."));
        assert!(!out.contains('\x1b'));
    }

    #[test]
    fn fallback_reply_is_tagged_error() {
        let out = rendered(|r| r.print_message(&Message::bot("1", "Sorry", None)));
        assert!(out.contains("[error] Sorry"));
    }

    #[test]
    fn user_message_has_no_tag() {
        let out = rendered(|r| r.print_message(&Message::user("1", "hi")));
        assert!(out.contains("You: hi"));
        assert!(!out.contains("[user]"));
    }

    #[test]
    fn suggestions_are_numbered() {
        let out = rendered(|r| {
            r.print_suggestions(crate::suggestions::suggestions_for(Category::Technical))
        });
        assert!(out.contains("1. 🔑 How do I reset my password?"));
        assert_eq!(out.lines().count(), 3);
    }

    #[test]
    fn theme_changes_palette() {
        assert_ne!(
            category_color(Some(Category::Academic), Theme::Light),
            category_color(Some(Category::Academic), Theme::Dark)
        );
        let mut renderer = PlainTextRenderer::to_writer(Vec::new(), true);
        renderer.set_theme(Theme::Dark);
        renderer.print_message(&Message::bot("1", "x", Some(Category::Campus)));
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(out.contains("\x1b[96m[campus]"));
    }

    #[test]
    fn empty_dashboard_shows_zeroes() {
        let out = rendered(|r| r.print_dashboard(&Dashboard::new()));
        assert!(out.contains("Conversations:      0"));
    }
}
