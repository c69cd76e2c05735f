//! Follow-up prompts derived from the latest bot reply.

use crate::classify::classify;
use crate::types::{Category, Message};

/// A short prompt the user can send with one click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion {
    /// Prompt text.
    pub text: &'static str,
    /// Decorative icon.
    pub icon: &'static str,
    /// Bucket the prompt belongs to.
    pub category: Category,
}

const fn suggestion(text: &'static str, icon: &'static str, category: Category) -> Suggestion {
    Suggestion {
        text,
        icon,
        category,
    }
}

static ACADEMIC: [Suggestion; 3] = [
    suggestion("Show me my course schedule", "📚", Category::Academic),
    suggestion("How do I register for classes?", "✏️", Category::Academic),
    suggestion("When are final exams?", "📝", Category::Academic),
];

static ADMINISTRATIVE: [Suggestion; 3] = [
    suggestion("Where do I submit this form?", "📋", Category::Administrative),
    suggestion("What is the deadline?", "⏰", Category::Administrative),
    suggestion("Who should I contact for help?", "👨‍💼", Category::Administrative),
];

static CAMPUS: [Suggestion; 3] = [
    suggestion("What events are happening this week?", "🎭", Category::Campus),
    suggestion("How do I join a student club?", "🤝", Category::Campus),
    suggestion("Where is the student center located?", "🏢", Category::Campus),
];

static TECHNICAL: [Suggestion; 3] = [
    suggestion("How do I reset my password?", "🔑", Category::Technical),
    suggestion("I can't access my account", "🔒", Category::Technical),
    suggestion("Where do I find my student ID?", "🪪", Category::Technical),
];

static PERSONAL: [Suggestion; 3] = [
    suggestion("How do I book a counseling session?", "💬", Category::Personal),
    suggestion("Who is my academic advisor?", "🧭", Category::Personal),
    suggestion("What wellness resources are available?", "🌱", Category::Personal),
];

static GENERAL: [Suggestion; 3] = [
    suggestion("Tell me more about that", "🔍", Category::General),
    suggestion("Can you explain in simpler terms?", "🔄", Category::General),
    suggestion("What other options do I have?", "📊", Category::General),
];

/// Starter prompts offered below an empty or idle chat.
pub const QUICK_REPLIES: [&str; 6] = [
    "Tell me about the university",
    "How do I register for classes?",
    "What are the library hours?",
    "When is the next campus event?",
    "How do I contact student services?",
    "What dining options are available?",
];

/// Prompts for one category bucket.
pub fn suggestions_for(category: Category) -> &'static [Suggestion] {
    match category {
        Category::Academic => &ACADEMIC,
        Category::Administrative => &ADMINISTRATIVE,
        Category::Campus => &CAMPUS,
        Category::Technical => &TECHNICAL,
        Category::Personal => &PERSONAL,
        Category::General | Category::User => &GENERAL,
    }
}

/// Follow-up prompts for the most recent message of a transcript.
///
/// Only a trailing bot message produces suggestions; an empty transcript or
/// one waiting on a reply yields none.
pub fn contextual_suggestions(messages: &[Message]) -> Vec<Suggestion> {
    match messages.last() {
        Some(last) if last.is_bot() => suggestions_for(classify(&last.text)).to_vec(),
        _ => Vec::new(),
    }
}
