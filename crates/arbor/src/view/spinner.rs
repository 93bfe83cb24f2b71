use std::time::Duration;

use super::{Node, Outcome, View};
use crate::{
    buffer::{Buffer, Viewport},
    error::Result,
    event::Event,
    geom::{Expanse, Point},
    key::ViewKey,
    style::Style,
    text,
};

/// Default frame sequence.
const DOTS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Scope name for animation state.
const SCOPE: &str = "Spinner";

/// Animation state carried between frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Phase {
    /// Current frame index.
    index: usize,
    /// Time accumulated toward the next frame.
    elapsed: Duration,
}

/// A cyclic animation. Each tick adds to the accumulated time; once it
/// reaches the interval the spinner moves to its next frame and asks for a
/// redraw. Ticks are always forwarded so siblings keep animating.
#[derive(Debug, Clone)]
pub struct Spinner {
    /// Frames, shown in order.
    frames: Vec<String>,
    /// Time per frame.
    interval: Duration,
    /// Style.
    style: Style,
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new(DOTS.iter().copied(), Duration::from_millis(80))
    }
}

impl Spinner {
    /// A spinner cycling through `frames`.
    pub fn new<S: Into<String>>(frames: impl IntoIterator<Item = S>, interval: Duration) -> Self {
        Self {
            frames: frames.into_iter().map(Into::into).collect(),
            interval,
            style: Style::default(),
        }
    }

    /// Set the style.
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// The current phase.
    fn phase(buf: &mut Buffer) -> Phase {
        buf.scope(&ViewKey::name(SCOPE), |b| b.retrieve().unwrap_or_default())
    }
}

impl<M> Node<M> for Spinner {
    fn measure(&self, available: Expanse) -> Expanse {
        let w = self.frames.iter().map(|f| text::width(f)).max().unwrap_or(0);
        let h = u32::from(!self.frames.is_empty());
        Expanse::new(w as u32, h).min(available)
    }

    fn render(&self, _vp: Viewport, buf: &mut Buffer) -> Result<()> {
        let phase = Self::phase(buf);
        if let Some(frame) = self.frames.get(phase.index % self.frames.len().max(1)) {
            buf.text(Point::zero(), frame, self.style);
        }
        buf.scope(&ViewKey::name(SCOPE), |b| b.store(phase));
        Ok(())
    }

    fn handle_event(&self, event: &Event, buf: &mut Buffer) -> Outcome<M> {
        let Event::Tick(dt) = event else {
            return Outcome::pass(event.clone());
        };
        let mut phase = Self::phase(buf);
        phase.elapsed += *dt;
        let advanced = phase.elapsed >= self.interval && !self.frames.is_empty();
        if advanced {
            phase.index = (phase.index + 1) % self.frames.len();
            phase.elapsed = Duration::ZERO;
        }
        buf.scope(&ViewKey::name(SCOPE), |b| b.store(phase));
        let out = Outcome::pass(event.clone());
        if advanced { out.redraw() } else { out }
    }
}

impl<M: 'static> From<Spinner> for View<M> {
    fn from(s: Spinner) -> Self {
        Self::new(s)
    }
}

/// A spinner with the default frames.
pub fn spinner<M: 'static>() -> View<M> {
    Spinner::default().into()
}
