use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::config::CatalogConfig;
use crate::domain::quote::{NewQuote, QuoteId, QuoteRecord};
use crate::errors::{ApplicationError, DomainError};
use crate::store::QuoteStore;

const BUILTIN: [(&str, &str); 5] = [
    (
        "Marcus Aurelius",
        "The impediment to action advances action. What stands in the way becomes the way.",
    ),
    ("Maya Angelou", "You will face many defeats in life, but never let yourself be defeated."),
    ("Oscar Wilde", "Be yourself; everyone else is already taken."),
    ("Yoda", "Do. Or do not. There is no try."),
    (
        "Albert Einstein",
        "Life is like riding a bicycle. To keep your balance, you must keep moving.",
    ),
];

/// The starter quotes, ids `0..=4`.
pub fn builtin_quotes() -> Vec<QuoteRecord> {
    BUILTIN
        .iter()
        .zip(0u64..)
        .map(|(&(author, text), id)| QuoteRecord {
            id: QuoteId(id),
            author: author.to_owned(),
            text: text.to_owned(),
            likes: 0,
        })
        .collect()
}

pub fn builtin_store() -> Result<QuoteStore, DomainError> {
    QuoteStore::from_records(builtin_quotes())
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    quotes: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    author: String,
    text: String,
}

/// Reads a TOML file of `[[quotes]]` tables with `author` and `text` keys.
pub fn load_catalog(path: &Path) -> Result<Vec<NewQuote>, ApplicationError> {
    let raw = fs::read_to_string(path).map_err(|error| {
        ApplicationError::Catalog(format!("could not read `{}`: {error}", path.display()))
    })?;
    let file: CatalogFile = toml::from_str(&raw).map_err(|error| {
        ApplicationError::Catalog(format!("could not parse `{}`: {error}", path.display()))
    })?;

    file.quotes
        .iter()
        .enumerate()
        .map(|(position, entry)| {
            NewQuote::new(&entry.author, &entry.text).map_err(|error| {
                ApplicationError::Catalog(format!(
                    "entry {} in `{}`: {error}",
                    position + 1,
                    path.display()
                ))
            })
        })
        .collect()
}

pub fn build_store(config: &CatalogConfig) -> Result<QuoteStore, ApplicationError> {
    let mut store = if config.include_builtin { builtin_store()? } else { QuoteStore::new() };

    if let Some(path) = &config.seed_path {
        let quotes = load_catalog(path)?;
        let loaded = quotes.len();
        for quote in quotes {
            store.insert(quote);
        }
        tracing::info!(
            event_name = "catalog.seed_loaded",
            path = %path.display(),
            loaded,
            "seed catalog loaded"
        );
    }

    Ok(store)
}
