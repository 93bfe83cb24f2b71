use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

use super::Backend;
use crate::{
    buffer::TermBuf,
    error::{Error, Result},
    event::Event,
    geom::Expanse,
};

/// Frames captured by a [`TestBackend`].
pub type Frames = Arc<Mutex<Vec<TermBuf>>>;

/// A backend that replays scripted input and records every presented frame.
///
/// Each poll consumes one script entry: `Some(event)` is returned at once,
/// `None` sleeps for the poll timeout and reports no input. Polling past the
/// end of the script is an error, so a program that never quits fails
/// instead of hanging.
pub struct TestBackend {
    /// Screen size.
    size: Expanse,
    /// Remaining input.
    script: VecDeque<Option<Event>>,
    /// Presented frames.
    frames: Frames,
    /// Has setup run?
    pub setup: bool,
    /// Has teardown run?
    pub teardown: bool,
}

impl TestBackend {
    /// A backend with an empty script.
    pub fn new(size: impl Into<Expanse>) -> Self {
        Self {
            size: size.into(),
            script: VecDeque::new(),
            frames: Frames::default(),
            setup: false,
            teardown: false,
        }
    }

    /// Append input to the script.
    pub fn script(mut self, input: impl IntoIterator<Item = Option<Event>>) -> Self {
        self.script.extend(input);
        self
    }

    /// Append events to the script.
    pub fn events(self, events: impl IntoIterator<Item = Event>) -> Self {
        self.script(events.into_iter().map(Some))
    }

    /// Append idle polls to the script.
    pub fn idle(self, polls: usize) -> Self {
        self.script((0..polls).map(|_| None))
    }

    /// A handle on the presented frames.
    pub fn frames(&self) -> Frames {
        self.frames.clone()
    }

    /// The last presented frame.
    pub fn last_frame(&self) -> Option<TermBuf> {
        self.frames.lock().ok()?.last().cloned()
    }
}

impl Backend for TestBackend {
    fn size(&mut self) -> Result<Expanse> {
        Ok(self.size)
    }

    fn setup(&mut self) -> Result<()> {
        self.setup = true;
        Ok(())
    }

    fn teardown(&mut self) -> Result<()> {
        self.teardown = true;
        Ok(())
    }

    fn poll_event(&mut self, timeout: Duration) -> Result<Option<Event>> {
        match self.script.pop_front() {
            Some(Some(e)) => {
                if let Event::Resize(size) = e {
                    self.size = size;
                }
                Ok(Some(e))
            }
            Some(None) => {
                thread::sleep(timeout);
                Ok(None)
            }
            None => Err(Error::Backend("script exhausted".into())),
        }
    }

    fn present(&mut self, grid: &TermBuf) -> Result<()> {
        self.frames
            .lock()
            .map_err(|_| Error::Backend("frame log poisoned".into()))?
            .push(grid.clone());
        Ok(())
    }
}
