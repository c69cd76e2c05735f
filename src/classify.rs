//! Keyword classification of chat text.
//!
//! Categories are checked in table order and the first set with a
//! case-insensitive substring hit wins. Text that matches nothing is
//! [`Category::General`].

use crate::types::Category;

/// Keyword sets in priority order.
pub const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Academic, &["class", "course", "study", "academic"]),
    (
        Category::Administrative,
        &["form", "application", "deadline", "submit"],
    ),
    (Category::Campus, &["event", "campus", "activity", "club"]),
    (
        Category::Technical,
        &["password", "login", "account", "access"],
    ),
    (Category::Personal, &["personal", "help", "advice"]),
];

/// Returns the category of `text` according to [`CATEGORY_KEYWORDS`].
pub fn classify(text: &str) -> Category {
    classify_with(CATEGORY_KEYWORDS, text)
}

/// Classifies `text` against an arbitrary ordered keyword table.
pub fn classify_with(table: &[(Category, &[&str])], text: &str) -> Category {
    let lower = text.to_lowercase();
    table
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::General)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_bucket_matches() {
        assert_eq!(classify("Your COURSE starts Monday"), Category::Academic);
        assert_eq!(classify("The deadline is Friday"), Category::Administrative);
        assert_eq!(classify("The chess club meets at noon"), Category::Campus);
        assert_eq!(classify("Reset your password here"), Category::Technical);
        assert_eq!(classify("Here is some advice"), Category::Personal);
        assert_eq!(classify("Hello there"), Category::General);
        assert_eq!(classify(""), Category::General);
    }

    #[test]
    fn priority_order_respected() {
        assert_eq!(
            classify("Your course password was sent"),
            Category::Academic
        );
        assert_eq!(
            classify("Submit the form before the campus event"),
            Category::Administrative
        );
        assert_eq!(
            classify("Campus login help desk"),
            Category::Campus
        );
        assert_eq!(classify("I need help with my account"), Category::Technical);
    }

    #[test]
    fn substring_matching() {
        // "classroom" contains "class".
        assert_eq!(classify("Find your classroom"), Category::Academic);
    }

    #[test]
    fn custom_table() {
        let table: &[(Category, &[&str])] = &[(Category::Campus, &["dining"])];
        assert_eq!(classify_with(table, "Dining hall hours"), Category::Campus);
        assert_eq!(classify_with(table, "course list"), Category::General);
    }
}
