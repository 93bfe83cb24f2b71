//! Terminal backends.
//!
//! A [`Backend`] owns the terminal for the duration of a run: it reports the
//! screen size, polls input and presents finished frames. Presenting usually
//! goes through [`TermBuf::diff`], which talks to the lower-level
//! [`RenderBackend`] interface.

use std::time::Duration;

use crate::{
    buffer::TermBuf,
    error::Result,
    event::Event,
    geom::{Expanse, Point},
    style::Style,
};

/// Crossterm backend implementation.
pub mod crossterm;
/// Scripted backend for tests.
#[cfg(any(test, feature = "testing"))]
pub mod test;

/// A sink for styled text runs.
pub trait RenderBackend {
    /// Apply a style to subsequent output.
    fn style(&mut self, s: &Style) -> Result<()>;

    /// Write text at a screen position.
    fn text(&mut self, loc: Point, txt: &str) -> Result<()>;

    /// Flush pending output.
    fn flush(&mut self) -> Result<()>;
}

/// A terminal the runtime can drive.
pub trait Backend {
    /// Current screen size.
    fn size(&mut self) -> Result<Expanse>;

    /// Take control of the terminal.
    fn setup(&mut self) -> Result<()>;

    /// Release the terminal. Must be safe to call after a failed setup.
    fn teardown(&mut self) -> Result<()>;

    /// Wait up to `timeout` for an input event.
    fn poll_event(&mut self, timeout: Duration) -> Result<Option<Event>>;

    /// Show a finished frame.
    fn present(&mut self, grid: &TermBuf) -> Result<()>;
}

/// Guard that pairs backend setup with teardown for a run.
pub(crate) struct Session<'a, B: Backend> {
    /// The backend under control.
    backend: &'a mut B,
    /// Whether teardown is still owed.
    active: bool,
}

impl<'a, B: Backend> Session<'a, B> {
    /// Set up the backend and create a guard for it.
    pub(crate) fn new(backend: &'a mut B) -> Result<Self> {
        if let Err(e) = backend.setup() {
            drop(backend.teardown());
            return Err(e);
        }
        Ok(Self {
            backend,
            active: true,
        })
    }

    /// The backend under control.
    pub(crate) fn backend(&mut self) -> &mut B {
        self.backend
    }

    /// Tear the backend down, reporting any failure.
    pub(crate) fn finish(mut self) -> Result<()> {
        self.active = false;
        self.backend.teardown()
    }
}

impl<B: Backend> Drop for Session<'_, B> {
    fn drop(&mut self) {
        if self.active {
            drop(self.backend.teardown());
            self.active = false;
        }
    }
}
