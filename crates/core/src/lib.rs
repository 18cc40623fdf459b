pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod presentation;
pub mod selection;
pub mod session;
pub mod store;

pub use catalog::{build_store, builtin_quotes, builtin_store, load_catalog};
pub use domain::quote::{MetricKind, NewQuote, QuoteId, QuoteRecord, TextMetrics};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use presentation::{Frame, InMemoryPresentationSink, PresentationSink, StatusLine};
pub use selection::{ActiveFilter, FilterOutcome, SelectionEngine, SelectionMode};
pub use session::{Action, BrowserSession, SessionError};
pub use store::QuoteStore;
