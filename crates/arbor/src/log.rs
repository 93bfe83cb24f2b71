//! An in-memory log sink.
//!
//! A terminal UI owns the screen, so log output cannot go to stderr while
//! the program runs. [`LogSink`] collects formatted `tracing` output in
//! memory. The runtime can turn new lines into [`Event::Log`] events and
//! writes everything to stderr once the terminal has been restored.
//!
//! [`Event::Log`]: crate::event::Event::Log

use std::{
    io::{self, Result as IoResult, Write},
    sync::{Arc, Mutex},
};

use tracing::Level;
use tracing_subscriber::fmt::{self, MakeWriter};

use crate::error::{Error, Result};

/// A cloneable handle on a shared list of log lines.
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    /// Shared log buffer.
    buf: Arc<Mutex<Vec<String>>>,
}

impl LogSink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a global `tracing` subscriber that writes into this sink.
    /// Fails if a global subscriber is already set.
    pub fn install(&self, level: Level) -> Result<()> {
        let format = fmt::format()
            .with_level(true)
            .with_target(false)
            .with_ansi(false)
            .without_time()
            .compact();
        fmt::fmt()
            .with_writer(self.clone())
            .with_max_level(level)
            .event_format(format)
            .try_init()
            .map_err(|e| Error::RunLoop(e.to_string()))
    }

    /// Append a line directly.
    pub fn push(&self, line: impl Into<String>) {
        if let Ok(mut buf) = self.buf.lock() {
            buf.push(line.into());
        }
    }

    /// Number of lines captured so far.
    pub fn len(&self) -> usize {
        self.buf.lock().map_or(0, |b| b.len())
    }

    /// Has nothing been captured?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All captured lines.
    pub fn lines(&self) -> Vec<String> {
        self.since(0)
    }

    /// Lines captured at or after a cursor.
    pub fn since(&self, cursor: usize) -> Vec<String> {
        self.buf
            .lock()
            .map(|b| b.iter().skip(cursor).cloned().collect())
            .unwrap_or_default()
    }

    /// Write every captured line to stderr.
    pub fn flush_to_stderr(&self) -> Result<()> {
        let mut stderr = io::stderr().lock();
        for line in self.lines() {
            writeln!(stderr, "{line}")?;
        }
        Ok(())
    }
}

/// Log writer that appends to a shared buffer.
pub struct LogWriter {
    /// Shared log buffer.
    buf: Arc<Mutex<Vec<String>>>,
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> IoResult<usize> {
        let text = String::from_utf8_lossy(buf);
        if let Ok(mut lines) = self.buf.lock() {
            lines.extend(
                text.lines()
                    .map(str::trim_end)
                    .filter(|l| !l.is_empty())
                    .map(String::from),
            );
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogSink {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            buf: self.buf.clone(),
        }
    }
}
