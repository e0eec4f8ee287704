//! Question value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Maximum accepted question length, in characters, after trimming.
pub const MAX_QUESTION_CHARS: usize = 4000;

/// A question submitted to one experiment run (Value Object)
///
/// Validation happens here, before any backend work: the content is trimmed,
/// must be non-empty and must stay under [`MAX_QUESTION_CHARS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    content: String,
}

impl Question {
    /// Create a validated question from raw user input
    pub fn new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidQuestion(
                "question is empty after trimming".to_string(),
            ));
        }
        let chars = trimmed.chars().count();
        if chars > MAX_QUESTION_CHARS {
            return Err(DomainError::InvalidQuestion(format!(
                "question is {} characters, limit is {}",
                chars, MAX_QUESTION_CHARS
            )));
        }
        Ok(Self {
            content: trimmed.to_string(),
        })
    }

    /// Get the question content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the inner content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<&str> for Question {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Question::new(s)
    }
}

impl TryFrom<String> for Question {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Question::new(s)
    }
}
