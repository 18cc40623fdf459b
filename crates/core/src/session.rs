use rand::Rng;
use thiserror::Error;

use crate::domain::quote::MetricKind;
use crate::errors::{DomainError, InterfaceError};
use crate::presentation::{Frame, PresentationSink, StatusLine};
use crate::selection::SelectionEngine;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Show,
    Random,
    Like,
    Metric(MetricKind),
    Add { author: String, text: String },
    Filter(String),
    ClearFilter,
    Previous,
    Next,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

impl Action {
    /// Parses one line of the browse protocol, e.g. `filter yoda` or
    /// `add Oscar Wilde | Be yourself.`.
    pub fn parse(line: &str) -> Result<Self, SessionError> {
        let line = line.trim();
        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match command.to_ascii_lowercase().as_str() {
            "show" => Ok(Self::Show),
            "random" | "r" => Ok(Self::Random),
            "like" => Ok(Self::Like),
            "chars" => Ok(Self::Metric(MetricKind::CharsWithSpaces)),
            "chars-nospace" => Ok(Self::Metric(MetricKind::CharsWithoutSpaces)),
            "words" => Ok(Self::Metric(MetricKind::Words)),
            "add" => {
                let (author, text) =
                    rest.split_once('|').ok_or(SessionError::Usage("add <author> | <text>"))?;
                Ok(Self::Add { author: author.trim().to_owned(), text: text.trim().to_owned() })
            }
            "filter" => Ok(Self::Filter(rest.to_owned())),
            "clear" => Ok(Self::ClearFilter),
            "prev" | "previous" => Ok(Self::Previous),
            "next" => Ok(Self::Next),
            other => Err(SessionError::UnknownCommand(other.to_owned())),
        }
    }
}

/// Drives a [`SelectionEngine`] from host actions and pushes one frame to the
/// sink per action.
pub struct BrowserSession<S, R> {
    engine: SelectionEngine<R>,
    sink: S,
    metric: Option<String>,
}

impl<S, R> BrowserSession<S, R>
where
    S: PresentationSink,
    R: Rng,
{
    pub fn new(engine: SelectionEngine<R>, sink: S) -> Self {
        Self { engine, sink, metric: None }
    }

    pub fn engine(&self) -> &SelectionEngine<R> {
        &self.engine
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_parts(self) -> (SelectionEngine<R>, S) {
        (self.engine, self.sink)
    }

    pub fn handle(&mut self, action: Action) -> Result<Frame, DomainError> {
        match self.apply(action) {
            Ok(()) => Ok(self.present()),
            Err(error) => {
                let interface = InterfaceError::from(error.clone());
                tracing::warn!(
                    event_name = "session.action_rejected",
                    %error,
                    user_message = interface.user_message(),
                    "browser action rejected"
                );
                self.metric = Some(interface.user_message().to_owned());
                self.present();
                Err(error)
            }
        }
    }

    fn apply(&mut self, action: Action) -> Result<(), DomainError> {
        match action {
            Action::Show => {}
            Action::Random => {
                self.engine.pick_random()?;
                self.metric = None;
            }
            Action::Like => {
                self.engine.like_current()?;
            }
            Action::Metric(kind) => {
                let value = self.engine.current().ok_or(DomainError::EmptyStore)?.metric(kind);
                self.metric = Some(format!("{}: {value}", kind.label()));
            }
            Action::Add { author, text } => {
                self.engine.add_and_show(&author, &text)?;
                self.metric = Some("New quote added.".to_owned());
            }
            Action::Filter(query) => {
                self.engine.apply_filter(&query);
                self.metric = None;
            }
            Action::ClearFilter => self.engine.clear_filter(),
            Action::Previous => {
                if self.engine.previous().is_some() {
                    self.metric = None;
                }
            }
            Action::Next => {
                if self.engine.next().is_some() {
                    self.metric = None;
                }
            }
        }
        Ok(())
    }

    pub fn frame(&self) -> Frame {
        let store = self.engine.store();
        let (status, can_navigate) = match self.engine.filter() {
            None => (StatusLine::NoActiveFilter, false),
            Some(filter) => match filter.matches().first() {
                None => (StatusLine::NoMatches, false),
                Some(&first) => {
                    let author = store
                        .record_at(first)
                        .map(|record| record.author.clone())
                        .unwrap_or_default();
                    let status = StatusLine::Filtered {
                        author,
                        position: filter.cursor() + 1,
                        total: filter.matches().len(),
                    };
                    (status, true)
                }
            },
        };

        Frame {
            record: self.engine.current().cloned(),
            status,
            metric: self.metric.clone(),
            can_navigate,
        }
    }

    fn present(&self) -> Frame {
        let frame = self.frame();
        self.sink.present(frame.clone());
        frame
    }
}
