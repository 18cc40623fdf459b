use std::fmt;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::domain::quote::QuoteRecord;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatusLine {
    NoActiveFilter,
    NoMatches,
    Filtered { author: String, position: usize, total: usize },
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoActiveFilter => f.write_str("No active filter."),
            Self::NoMatches => f.write_str("No quotes match that author."),
            Self::Filtered { author, position, total } => {
                write!(f, "Filtered by author: {author} ({position} of {total})")
            }
        }
    }
}

/// Everything a host needs to redraw after one operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub record: Option<QuoteRecord>,
    pub status: StatusLine,
    pub metric: Option<String>,
    pub can_navigate: bool,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.record {
            Some(record) => {
                writeln!(f, "\"{}\"", record.text)?;
                writeln!(f, "  - {} [likes: {}]", record.author, record.likes)?;
            }
            None => writeln!(f, "(no quote to show)")?,
        }
        write!(f, "{}", self.status)?;
        if let Some(metric) = &self.metric {
            write!(f, "\n{metric}")?;
        }
        Ok(())
    }
}

pub trait PresentationSink {
    fn present(&self, frame: Frame);
}

#[derive(Clone, Default)]
pub struct InMemoryPresentationSink {
    frames: Arc<Mutex<Vec<Frame>>>,
}

impl InMemoryPresentationSink {
    pub fn frames(&self) -> Vec<Frame> {
        match self.frames.lock() {
            Ok(frames) => frames.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn last(&self) -> Option<Frame> {
        self.frames().pop()
    }
}

impl PresentationSink for InMemoryPresentationSink {
    fn present(&self, frame: Frame) {
        match self.frames.lock() {
            Ok(mut frames) => frames.push(frame),
            Err(poisoned) => poisoned.into_inner().push(frame),
        }
    }
}
