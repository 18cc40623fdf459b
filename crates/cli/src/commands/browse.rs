use std::cell::RefCell;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{Context, Result};
use quoteboard_core::catalog::build_store;
use quoteboard_core::config::{AppConfig, LoadOptions};
use quoteboard_core::presentation::{Frame, PresentationSink};
use quoteboard_core::selection::SelectionEngine;
use quoteboard_core::session::{Action, BrowserSession};
use serde::Serialize;

use crate::commands::CommandResult;

const HELP: &str = "commands:
  random | r                 show a random quote
  like                       like the current quote
  chars | chars-nospace      count characters of the current quote
  words                      count words of the current quote
  add <author> | <text>      add a quote and show it
  filter <author>            filter by author (case-insensitive)
  next | prev                move within the filtered quotes
  clear                      clear the author filter
  show                       redraw the current quote
  help                       show this help
  quit | exit                end the session";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BrowseSummary {
    pub actions: usize,
    pub rejected: usize,
}

/// Renders each frame to a writer, separated by a blank line. The first
/// failed write is kept until [`WriterSink::take_error`] collects it.
pub struct WriterSink<W: Write> {
    writer: RefCell<W>,
    failure: RefCell<Option<io::Error>>,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer: RefCell::new(writer), failure: RefCell::new(None) }
    }

    pub fn take_error(&self) -> Option<io::Error> {
        self.failure.borrow_mut().take()
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn line(&self, text: &str) -> io::Result<()> {
        let mut writer = self.writer.borrow_mut();
        writeln!(writer, "{text}")?;
        writer.flush()
    }
}

impl<W: Write> PresentationSink for WriterSink<W> {
    fn present(&self, frame: Frame) {
        if let Err(error) = self.line(&format!("{frame}\n")) {
            tracing::warn!(
                event_name = "browse.render_failed",
                %error,
                "frame could not be written"
            );
            self.failure.borrow_mut().get_or_insert(error);
        }
    }
}

pub fn run(options: LoadOptions, script: Option<&Path>) -> CommandResult {
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("browse", "config_validation", error.to_string(), 2)
        }
    };

    let outcome = match script {
        Some(path) => File::open(path)
            .with_context(|| format!("could not open script `{}`", path.display()))
            .and_then(|file| run_session(&config, BufReader::new(file), io::stdout())),
        None => run_session(&config, io::stdin().lock(), io::stdout()),
    };

    match outcome {
        Ok((summary, _)) => {
            CommandResult::success_with_details("browse", "session ended", &summary)
        }
        Err(error) => CommandResult::failure("browse", "session", format!("{error:#}"), 3),
    }
}

/// Runs one browse session over `input`, rendering to `output`. Returns the
/// summary and the writer so callers can inspect what was rendered.
pub fn run_session<I, W>(config: &AppConfig, input: I, output: W) -> Result<(BrowseSummary, W)>
where
    I: BufRead,
    W: Write,
{
    let store = build_store(&config.catalog).context("could not load quote catalog")?;
    let engine = match config.selection.rng_seed {
        Some(seed) => SelectionEngine::seeded(store, seed),
        None => SelectionEngine::from_entropy(store),
    };
    let mut session = BrowserSession::new(engine, WriterSink::new(output));
    let mut summary = BrowseSummary::default();

    tracing::info!(
        event_name = "browse.session_started",
        quotes = session.engine().store().len(),
        seeded = config.selection.rng_seed.is_some(),
        "browse session started"
    );
    let _ = session.handle(Action::Show);
    check_rendered(session.sink())?;

    for line in input.lines() {
        let line = line.context("could not read session input")?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "quit" | "exit" => break,
            "help" => {
                session.sink().line(HELP).context("could not write help")?;
                continue;
            }
            _ => {}
        }

        let action = match Action::parse(trimmed) {
            Ok(action) => action,
            Err(error) => {
                session.sink().line(&format!("error: {error}")).context("could not write error")?;
                summary.rejected += 1;
                continue;
            }
        };

        summary.actions += 1;
        if session.handle(action).is_err() {
            summary.rejected += 1;
        }
        check_rendered(session.sink())?;
    }

    tracing::info!(
        event_name = "browse.session_ended",
        actions = summary.actions,
        rejected = summary.rejected,
        "browse session ended"
    );
    let (_, sink) = session.into_parts();
    Ok((summary, sink.into_inner()))
}

fn check_rendered<W: Write>(sink: &WriterSink<W>) -> Result<()> {
    match sink.take_error() {
        Some(error) => Err(error).context("could not render frame"),
        None => Ok(()),
    }
}
