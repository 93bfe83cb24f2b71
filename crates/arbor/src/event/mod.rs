//! The event vocabulary delivered to views.

use std::time::Duration;

use crate::geom::Expanse;

/// Keyboard input.
pub mod key;
/// Mouse input.
pub mod mouse;

/// An input or runtime event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key press.
    Key(key::Key),
    /// A mouse action.
    Mouse(mouse::MouseEvent),
    /// The terminal was resized.
    Resize(Expanse),
    /// Wall-clock time elapsed since the previous tick.
    Tick(Duration),
    /// A line written to the injected log sink.
    Log(String),
    /// Re-render without rebuilding the view tree.
    Redraw,
    /// An event with no effect.
    Ignore,
}

impl Event {
    /// Is this a redraw request?
    pub fn is_redraw(&self) -> bool {
        matches!(self, Self::Redraw)
    }
}

impl From<key::Key> for Event {
    fn from(k: key::Key) -> Self {
        Self::Key(k)
    }
}

impl From<mouse::MouseEvent> for Event {
    fn from(m: mouse::MouseEvent) -> Self {
        Self::Mouse(m)
    }
}
