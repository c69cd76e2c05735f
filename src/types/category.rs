use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Topic tag attached to chat messages for grouping and suggestions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Classes, courses, studying.
    Academic,

    /// Forms, applications, deadlines.
    Administrative,

    /// Passwords, logins, account access.
    Technical,

    /// Personal help and advice.
    Personal,

    /// Events, clubs, campus life.
    Campus,

    /// Nothing more specific matched.
    General,

    /// Marker carried by every user-authored message.
    User,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 7] = [
        Category::Academic,
        Category::Administrative,
        Category::Technical,
        Category::Personal,
        Category::Campus,
        Category::General,
        Category::User,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Academic => write!(f, "academic"),
            Category::Administrative => write!(f, "administrative"),
            Category::Technical => write!(f, "technical"),
            Category::Personal => write!(f, "personal"),
            Category::Campus => write!(f, "campus"),
            Category::General => write!(f, "general"),
            Category::User => write!(f, "user"),
        }
    }
}

/// Error returned when parsing an invalid category string.
#[derive(Debug)]
pub struct CategoryParseError {
    /// The invalid string value that could not be parsed.
    pub invalid_value: String,
}

impl fmt::Display for CategoryParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown category: {}", self.invalid_value)
    }
}

impl std::error::Error for CategoryParseError {}

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "academic" => Ok(Category::Academic),
            "administrative" => Ok(Category::Administrative),
            "technical" => Ok(Category::Technical),
            "personal" => Ok(Category::Personal),
            "campus" => Ok(Category::Campus),
            "general" => Ok(Category::General),
            "user" => Ok(Category::User),
            _ => Err(CategoryParseError {
                invalid_value: s.to_string(),
            }),
        }
    }
}
