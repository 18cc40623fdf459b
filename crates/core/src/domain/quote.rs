use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuoteId(pub u64);

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub id: QuoteId,
    pub author: String,
    pub text: String,
    pub likes: u64,
}

impl QuoteRecord {
    pub fn metrics(&self) -> TextMetrics {
        TextMetrics::of(&self.text)
    }

    pub fn metric(&self, kind: MetricKind) -> usize {
        let metrics = self.metrics();
        match kind {
            MetricKind::CharsWithSpaces => metrics.chars_with_spaces,
            MetricKind::CharsWithoutSpaces => metrics.chars_without_spaces,
            MetricKind::Words => metrics.words,
        }
    }
}

/// Author and text that passed input validation, trimmed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewQuote {
    author: String,
    text: String,
}

impl NewQuote {
    pub fn new(author: &str, text: &str) -> Result<Self, DomainError> {
        let author = author.trim();
        let text = text.trim();

        let missing: Vec<&str> = [("author", author), ("text", text)]
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(field, _)| field)
            .collect();
        if !missing.is_empty() {
            return Err(DomainError::Validation(format!(
                "{} must not be empty",
                missing.join(" and ")
            )));
        }

        Ok(Self { author: author.to_owned(), text: text.to_owned() })
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn into_record(self, id: QuoteId) -> QuoteRecord {
        QuoteRecord { id, author: self.author, text: self.text, likes: 0 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TextMetrics {
    pub chars_with_spaces: usize,
    pub chars_without_spaces: usize,
    pub words: usize,
}

impl TextMetrics {
    pub fn of(text: &str) -> Self {
        Self {
            chars_with_spaces: text.chars().count(),
            chars_without_spaces: text.chars().filter(|ch| !ch.is_whitespace()).count(),
            words: text.split_whitespace().count(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    CharsWithSpaces,
    CharsWithoutSpaces,
    Words,
}

impl MetricKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::CharsWithSpaces => "Characters (with spaces)",
            Self::CharsWithoutSpaces => "Characters (no spaces)",
            Self::Words => "Words",
        }
    }
}
