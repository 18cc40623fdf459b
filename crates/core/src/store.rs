use std::collections::BTreeSet;

use crate::domain::quote::{NewQuote, QuoteId, QuoteRecord};
use crate::errors::DomainError;

/// Insertion-ordered collection of quotes. Records are never removed or
/// reordered, so an index stays valid for the life of the store.
#[derive(Clone, Debug, Default)]
pub struct QuoteStore {
    records: Vec<QuoteRecord>,
    next_id: u64,
}

impl QuoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<QuoteRecord>) -> Result<Self, DomainError> {
        let mut seen = BTreeSet::new();
        let mut validated = Vec::with_capacity(records.len());
        for record in records {
            if !seen.insert(record.id) {
                return Err(DomainError::InvariantViolation(format!(
                    "duplicate quote id {} in seed records",
                    record.id
                )));
            }
            let mut trimmed = NewQuote::new(&record.author, &record.text)?.into_record(record.id);
            trimmed.likes = record.likes;
            validated.push(trimmed);
        }

        let next_id = seen.last().map_or(0, |&QuoteId(max)| max + 1);
        Ok(Self { records: validated, next_id })
    }

    pub fn add(&mut self, author: &str, text: &str) -> Result<QuoteRecord, DomainError> {
        let quote = NewQuote::new(author, text)?;
        Ok(self.insert(quote))
    }

    pub fn insert(&mut self, quote: NewQuote) -> QuoteRecord {
        let record = quote.into_record(QuoteId(self.next_id));
        self.next_id += 1;
        self.records.push(record.clone());

        tracing::debug!(
            event_name = "store.quote_added",
            quote_id = record.id.0,
            author = %record.author,
            size = self.records.len(),
            "quote appended to store"
        );
        record
    }

    pub fn record_at(&self, index: usize) -> Result<&QuoteRecord, DomainError> {
        self.records
            .get(index)
            .ok_or(DomainError::IndexOutOfRange { index, len: self.records.len() })
    }

    pub fn increment_likes(&mut self, index: usize) -> Result<u64, DomainError> {
        let len = self.records.len();
        let record =
            self.records.get_mut(index).ok_or(DomainError::IndexOutOfRange { index, len })?;
        record.likes = record.likes.saturating_add(1);
        Ok(record.likes)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuoteRecord> {
        self.records.iter()
    }

    /// Case-insensitive substring match on author, in store order. An empty
    /// query matches nothing; clearing a filter is a separate operation.
    pub fn find_indices_by_author_substring(&self, query: &str) -> Vec<usize> {
        if query.is_empty() {
            return Vec::new();
        }

        let needle = query.to_lowercase();
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.author.to_lowercase().contains(&needle))
            .map(|(index, _)| index)
            .collect()
    }
}
