use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::quote::QuoteRecord;
use crate::errors::DomainError;
use crate::store::QuoteStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionMode {
    Unfiltered,
    Filtered,
}

/// Author filter and its derived match list. A filter whose query matched
/// nothing is kept so that later additions can populate it, but it cannot be
/// navigated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveFilter {
    query: String,
    matches: Vec<usize>,
    cursor: usize,
}

impl ActiveFilter {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self) -> &[usize] {
        &self.matches
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_navigable(&self) -> bool {
        !self.matches.is_empty()
    }

    pub fn current_match(&self) -> Option<usize> {
        self.matches.get(self.cursor).copied()
    }

    fn step(&mut self, forward: bool) -> Option<usize> {
        let len = self.matches.len();
        if len == 0 {
            return None;
        }
        self.cursor = if forward { (self.cursor + 1) % len } else { (self.cursor + len - 1) % len };
        self.current_match()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterOutcome {
    pub match_count: usize,
    pub first: Option<QuoteRecord>,
}

pub struct SelectionEngine<R = StdRng> {
    store: QuoteStore,
    rng: R,
    current_index: Option<usize>,
    last_random_index: Option<usize>,
    filter: Option<ActiveFilter>,
}

impl SelectionEngine<StdRng> {
    pub fn from_entropy(store: QuoteStore) -> Self {
        Self::new(store, StdRng::from_entropy())
    }

    pub fn seeded(store: QuoteStore, seed: u64) -> Self {
        Self::new(store, StdRng::seed_from_u64(seed))
    }
}

impl<R> SelectionEngine<R>
where
    R: Rng,
{
    pub fn new(store: QuoteStore, rng: R) -> Self {
        let current_index = (!store.is_empty()).then_some(0);
        Self { store, rng, current_index, last_random_index: None, filter: None }
    }

    pub fn store(&self) -> &QuoteStore {
        &self.store
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn last_random_index(&self) -> Option<usize> {
        self.last_random_index
    }

    pub fn current(&self) -> Option<&QuoteRecord> {
        self.current_index.and_then(|index| self.store.record_at(index).ok())
    }

    pub fn filter(&self) -> Option<&ActiveFilter> {
        self.filter.as_ref()
    }

    pub fn mode(&self) -> SelectionMode {
        match &self.filter {
            Some(filter) if filter.is_navigable() => SelectionMode::Filtered,
            _ => SelectionMode::Unfiltered,
        }
    }

    /// Shows a random quote other than the previous random pick. Ignores any
    /// active filter and leaves its cursor where it was.
    pub fn pick_random(&mut self) -> Result<QuoteRecord, DomainError> {
        let len = self.store.len();
        let index = match (len, self.last_random_index) {
            (0, _) => return Err(DomainError::EmptyStore),
            (1, _) => 0,
            (_, Some(previous)) if previous < len => {
                let draw = self.rng.gen_range(0..len - 1);
                if draw >= previous {
                    draw + 1
                } else {
                    draw
                }
            }
            _ => self.rng.gen_range(0..len),
        };

        self.last_random_index = Some(index);
        self.current_index = Some(index);
        tracing::debug!(
            event_name = "selection.random_picked",
            index,
            size = len,
            "random quote picked"
        );
        self.store.record_at(index).cloned()
    }

    pub fn apply_filter(&mut self, query: &str) -> FilterOutcome {
        let query = query.trim();
        let matches = self.store.find_indices_by_author_substring(query);
        let match_count = matches.len();
        let first_index = matches.first().copied();

        self.filter = Some(ActiveFilter { query: query.to_owned(), matches, cursor: 0 });
        if first_index.is_some() {
            self.current_index = first_index;
        }

        tracing::info!(
            event_name = "selection.filter_applied",
            query,
            match_count,
            "author filter applied"
        );
        FilterOutcome {
            match_count,
            first: first_index.and_then(|index| self.store.record_at(index).ok().cloned()),
        }
    }

    pub fn clear_filter(&mut self) {
        if self.filter.take().is_some() {
            tracing::info!(event_name = "selection.filter_cleared", "author filter cleared");
        }
    }

    /// Moves to the next filtered match, wrapping around. Returns `None`
    /// without side effects when no navigable filter is active.
    pub fn next(&mut self) -> Option<QuoteRecord> {
        self.navigate(true)
    }

    pub fn previous(&mut self) -> Option<QuoteRecord> {
        self.navigate(false)
    }

    fn navigate(&mut self, forward: bool) -> Option<QuoteRecord> {
        let index = self.filter.as_mut()?.step(forward)?;
        self.current_index = Some(index);
        self.store.record_at(index).ok().cloned()
    }

    pub fn like_current(&mut self) -> Result<u64, DomainError> {
        let index = self.current_index.ok_or(DomainError::EmptyStore)?;
        let likes = self.store.increment_likes(index)?;
        tracing::debug!(event_name = "selection.quote_liked", index, likes, "quote liked");
        Ok(likes)
    }

    /// Appends a quote and makes it current. An active filter is re-run so
    /// the new quote becomes reachable by navigation when it matches.
    pub fn add_and_show(&mut self, author: &str, text: &str) -> Result<QuoteRecord, DomainError> {
        let record = match self.store.add(author, text) {
            Ok(record) => record,
            Err(error) => {
                tracing::warn!(event_name = "selection.add_rejected", %error, "quote rejected");
                return Err(error);
            }
        };

        let index = self.store.len() - 1;
        self.current_index = Some(index);
        self.last_random_index = Some(index);

        if let Some(filter) = self.filter.as_mut() {
            filter.matches = self.store.find_indices_by_author_substring(&filter.query);
            if let Some(position) = filter.matches.iter().position(|&matched| matched == index) {
                filter.cursor = position;
            } else if filter.cursor >= filter.matches.len() {
                filter.cursor = 0;
            }
        }

        tracing::info!(
            event_name = "selection.quote_added",
            quote_id = record.id.0,
            size = self.store.len(),
            "quote added and shown"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::{SelectionEngine, SelectionMode};
    use crate::domain::quote::QuoteId;
    use crate::errors::DomainError;
    use crate::store::QuoteStore;

    fn engine_with_authors(authors: &[&str], seed: u64) -> SelectionEngine {
        let mut store = QuoteStore::new();
        for author in authors {
            store.add(author, &format!("a quote by {author}")).expect("valid quote");
        }
        SelectionEngine::new(store, StdRng::seed_from_u64(seed))
    }

    #[test]
    fn starts_unfiltered_on_the_first_record() {
        let engine = engine_with_authors(&["Yoda", "Oscar Wilde"], 1);
        assert_eq!(engine.mode(), SelectionMode::Unfiltered);
        assert_eq!(engine.current_index(), Some(0));
        assert_eq!(engine.last_random_index(), None);

        let empty = engine_with_authors(&[], 1);
        assert_eq!(empty.current_index(), None);
        assert!(empty.current().is_none());
    }

    #[test]
    fn random_pick_never_repeats_the_previous_index() {
        let mut transitions = BTreeSet::new();
        for seed in 0..8 {
            let mut engine = engine_with_authors(&["A", "B", "C", "D"], seed);
            let mut previous = None;
            for _ in 0..200 {
                engine.pick_random().expect("non-empty store");
                let index = engine.current_index().expect("current set");
                assert!(index < 4);
                assert_ne!(Some(index), previous);
                assert_eq!(engine.last_random_index(), Some(index));
                if let Some(from) = previous {
                    transitions.insert((from, index));
                }
                previous = Some(index);
            }
        }

        // Every other index stays reachable from each previous pick.
        let expected: BTreeSet<(usize, usize)> = (0..4)
            .flat_map(|from| (0..4).filter(move |&to| to != from).map(move |to| (from, to)))
            .collect();
        assert_eq!(transitions, expected);
    }

    #[test]
    fn random_pick_alternates_between_two_records() {
        let mut engine = engine_with_authors(&["Marcus Aurelius", "Maya Angelou"], 42);
        let first = engine.pick_random().expect("pick");
        let second = engine.pick_random().expect("pick");
        let third = engine.pick_random().expect("pick");

        assert_ne!(first.id, second.id);
        assert_eq!(first.id, third.id);
    }

    #[test]
    fn single_record_store_always_returns_that_record() {
        let mut engine = engine_with_authors(&["Yoda"], 3);
        for _ in 0..5 {
            let record = engine.pick_random().expect("single record");
            assert_eq!(record.id, QuoteId(0));
        }
    }

    #[test]
    fn empty_store_random_pick_fails() {
        let mut engine = engine_with_authors(&[], 3);
        assert_eq!(engine.pick_random(), Err(DomainError::EmptyStore));
        assert_eq!(engine.like_current(), Err(DomainError::EmptyStore));
    }

    #[test]
    fn filter_navigation_wraps_in_both_directions() {
        let mut engine = engine_with_authors(&["Yoda", "Oscar Wilde", "Yoda Jr"], 5);

        let outcome = engine.apply_filter("yoda");
        assert_eq!(outcome.match_count, 2);
        assert_eq!(outcome.first.map(|record| record.author), Some("Yoda".to_owned()));
        assert_eq!(engine.mode(), SelectionMode::Filtered);
        assert_eq!(engine.filter().map(|filter| filter.matches().to_vec()), Some(vec![0, 2]));

        assert_eq!(engine.next().map(|record| record.author), Some("Yoda Jr".to_owned()));
        assert_eq!(engine.current_index(), Some(2));
        assert_eq!(engine.next().map(|record| record.author), Some("Yoda".to_owned()));
        assert_eq!(engine.previous().map(|record| record.author), Some("Yoda Jr".to_owned()));
        assert_eq!(engine.filter().map(|filter| filter.cursor()), Some(1));
    }

    #[test]
    fn unmatched_filter_disables_navigation() {
        let mut engine = engine_with_authors(&["Yoda", "Oscar Wilde"], 5);
        engine.pick_random().expect("pick");
        let before = engine.current_index();

        let outcome = engine.apply_filter("xyz-no-match");
        assert_eq!(outcome.match_count, 0);
        assert!(outcome.first.is_none());
        assert_eq!(engine.mode(), SelectionMode::Unfiltered);
        assert!(engine.next().is_none());
        assert!(engine.previous().is_none());
        assert_eq!(engine.current_index(), before);
    }

    #[test]
    fn blank_filter_query_matches_nothing() {
        let mut engine = engine_with_authors(&["Yoda"], 5);
        assert_eq!(engine.apply_filter("   ").match_count, 0);
        assert!(engine.next().is_none());
    }

    #[test]
    fn navigation_without_a_filter_is_a_no_op() {
        let mut engine = engine_with_authors(&["Yoda", "Oscar Wilde"], 5);
        assert!(engine.next().is_none());
        assert!(engine.previous().is_none());
        assert_eq!(engine.current_index(), Some(0));
    }

    #[test]
    fn clearing_the_filter_returns_to_unfiltered() {
        let mut engine = engine_with_authors(&["Yoda", "Yoda Jr"], 5);
        engine.apply_filter("yoda");
        engine.clear_filter();

        assert_eq!(engine.mode(), SelectionMode::Unfiltered);
        assert!(engine.filter().is_none());
        assert!(engine.next().is_none());
    }

    #[test]
    fn random_pick_keeps_the_filter_cursor() {
        let mut engine = engine_with_authors(&["Yoda", "Oscar Wilde", "Yoda Jr", "Maya"], 11);
        engine.apply_filter("yoda");
        engine.next();
        engine.pick_random().expect("pick");

        assert_eq!(engine.mode(), SelectionMode::Filtered);
        assert_eq!(engine.filter().map(|filter| filter.cursor()), Some(1));
        assert_eq!(engine.next().map(|record| record.author), Some("Yoda".to_owned()));
    }

    #[test]
    fn likes_survive_navigation() {
        let mut engine = engine_with_authors(&["Yoda", "Oscar Wilde", "Yoda Jr"], 5);
        engine.apply_filter("yoda");
        for _ in 0..3 {
            engine.like_current().expect("like");
        }
        engine.next();
        let back = engine.next().expect("wrapped back");

        assert_eq!(back.likes, 3);
        assert_eq!(engine.like_current(), Ok(4));
    }

    #[test]
    fn added_quote_becomes_current_and_joins_matching_filter() {
        let mut engine = engine_with_authors(&["Yoda", "Oscar Wilde"], 5);
        engine.apply_filter("yoda");

        let record = engine.add_and_show("Yoda Jr", "Try not.").expect("add");
        assert_eq!(record.id, QuoteId(2));
        assert_eq!(engine.current_index(), Some(2));
        assert_eq!(engine.last_random_index(), Some(2));

        let filter = engine.filter().expect("filter kept");
        assert_eq!(filter.matches(), &[0, 2]);
        assert_eq!(filter.cursor(), 1);
        assert_eq!(engine.next().map(|record| record.author), Some("Yoda".to_owned()));
    }

    #[test]
    fn added_quote_populates_a_previously_empty_filter() {
        let mut engine = engine_with_authors(&["Oscar Wilde"], 5);
        engine.apply_filter("einstein");
        assert_eq!(engine.mode(), SelectionMode::Unfiltered);

        engine.add_and_show("Albert Einstein", "Keep moving.").expect("add");
        assert_eq!(engine.mode(), SelectionMode::Filtered);
        assert_eq!(engine.filter().map(|filter| filter.matches().to_vec()), Some(vec![1]));
    }

    #[test]
    fn non_matching_addition_keeps_the_filter_cursor() {
        let mut engine = engine_with_authors(&["Yoda", "Yoda Jr"], 5);
        engine.apply_filter("yoda");
        engine.next();

        engine.add_and_show("Oscar Wilde", "Be yourself.").expect("add");
        assert_eq!(engine.current_index(), Some(2));
        let filter = engine.filter().expect("filter kept");
        assert_eq!(filter.matches(), &[0, 1]);
        assert_eq!(filter.cursor(), 1);
    }

    #[test]
    fn invalid_addition_changes_nothing() {
        let mut engine = engine_with_authors(&["Yoda"], 5);
        let error = engine.add_and_show("  ", "text").expect_err("blank author");

        assert!(matches!(error, DomainError::Validation(_)));
        assert_eq!(engine.store().len(), 1);
        assert_eq!(engine.current_index(), Some(0));
    }

    #[test]
    fn two_quote_walkthrough() {
        let mut engine = engine_with_authors(&["Marcus Aurelius", "Maya Angelou"], 2024);

        let first = engine.pick_random().expect("pick");
        let second = engine.pick_random().expect("pick");
        assert_ne!(first.id, second.id);

        let outcome = engine.apply_filter("maya");
        assert_eq!(outcome.match_count, 1);
        let maya = outcome.first.expect("maya matches");
        assert_eq!(maya.author, "Maya Angelou");
        assert_eq!(engine.previous(), Some(maya.clone()));
        assert_eq!(engine.next(), Some(maya));
    }

    #[test]
    fn seeded_engines_are_reproducible() {
        let store = engine_with_authors(&["A", "B", "C", "D", "E"], 0).store().clone();
        let mut left = SelectionEngine::seeded(store.clone(), 99);
        let mut right = SelectionEngine::seeded(store, 99);

        for _ in 0..10 {
            assert_eq!(left.pick_random(), right.pick_random());
        }
    }
}
