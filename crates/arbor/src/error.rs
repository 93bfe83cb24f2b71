//! The crate error type and its `Result` alias.

use std::{io, result::Result as StdResult};

use thiserror::Error;
use tokio::sync::mpsc::error::SendError;

use crate::geom;

/// Result type for arbor operations.
pub type Result<T> = StdResult<T, Error>;

/// Framework error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("backend: {0}")]
    /// Terminal setup, teardown or I/O failure.
    Backend(String),
    #[error("render: {0}")]
    /// Rendering failure.
    Render(String),
    #[error("geometry: {0}")]
    /// Geometry failure.
    Geometry(String),
    #[error("layout: {0}")]
    /// Layout failure.
    Layout(String),
    #[error("runloop: {0}")]
    /// Run loop failure.
    RunLoop(String),
    #[error("command: {0}")]
    /// Background command pool failure.
    Command(String),
    #[error(transparent)]
    /// An error raised by application code, usually from a `QuitAndRun` closure.
    App(#[from] anyhow::Error),
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Backend(e.to_string())
    }
}

impl From<geom::Error> for Error {
    fn from(e: geom::Error) -> Self {
        Self::Geometry(e.to_string())
    }
}

impl<T> From<SendError<T>> for Error {
    fn from(e: SendError<T>) -> Self {
        Self::RunLoop(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        let e: Error = io::Error::other("gone").into();
        assert!(matches!(e, Error::Backend(_)));
        let e: Error = geom::Error::Geometry("bad".into()).into();
        assert_eq!(e.to_string(), "geometry: bad");
        let e: Error = anyhow::anyhow!("boom").into();
        assert_eq!(e.to_string(), "boom");
    }
}
