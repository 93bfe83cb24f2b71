//! Drive a view through frames without a terminal.

use std::{mem, time::Duration};

use super::BufTest;
use crate::{
    buffer::{Buffer, TermBuf},
    error::Result,
    event::{Event, mouse::MouseEvent},
    geom::{Expanse, Point},
    view::{Outcome, View},
};

/// Renders views into consecutive frames, carrying the store forward the
/// way the runtime does, and delivers events against the latest frame.
pub struct Harness {
    /// The latest frame.
    buf: Buffer,
    /// Screen size for the next frame.
    size: Expanse,
}

impl Harness {
    /// A harness with an empty store.
    pub fn new(size: impl Into<Expanse>) -> Self {
        let size = size.into();
        Self {
            buf: Buffer::new(size),
            size,
        }
    }

    /// Change the screen size for subsequent frames.
    pub fn resize(&mut self, size: impl Into<Expanse>) {
        self.size = size.into();
    }

    /// Render a new frame.
    pub fn render<M: 'static>(&mut self, view: &View<M>) -> Result<&TermBuf> {
        let prev = mem::replace(&mut self.buf, Buffer::new(Expanse::default()));
        self.buf = prev.next_frame(self.size);
        view.render_root(&mut self.buf)?;
        Ok(self.buf.grid())
    }

    /// Deliver an event to the view against the latest frame.
    pub fn event<M: 'static>(&mut self, view: &View<M>, event: impl Into<Event>) -> Outcome<M> {
        view.handle_event(&event.into(), &mut self.buf)
    }

    /// Press and release the left button at a screen point.
    pub fn click<M: 'static>(&mut self, view: &View<M>, at: impl Into<Point>) -> Outcome<M> {
        let at = at.into();
        let mut out = self.event(view, MouseEvent::down(at));
        out.extend(self.event(view, MouseEvent::up(at)));
        out
    }

    /// Deliver a tick.
    pub fn tick<M: 'static>(&mut self, view: &View<M>, dt: Duration) -> Outcome<M> {
        self.event(view, Event::Tick(dt))
    }

    /// The latest frame.
    pub fn buffer(&self) -> &Buffer {
        &self.buf
    }

    /// Assertions over the latest frame.
    pub fn grid(&self) -> BufTest<'_> {
        BufTest::new(self.buf.grid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        buf,
        view::{column, text},
    };

    #[test]
    fn frames_carry_state() {
        let v = column(vec![text("go").on_click(1u8), text("x")]);
        let mut h = Harness::new((4, 2));
        h.render(&v).unwrap();
        h.grid().assert_matches(buf!["goXX" "xXXX"]);
        let out = h.click(&v, (0, 0));
        assert_eq!(out.messages, vec![1]);
        assert_eq!(h.click(&v, (0, 1)).messages, Vec::<u8>::new());
    }
}
