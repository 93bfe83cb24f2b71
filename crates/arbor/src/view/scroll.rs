use super::{Node, Outcome, View};
use crate::{
    buffer::{Buffer, Viewport},
    error::Result,
    event::{
        Event,
        mouse::{Action, Button},
    },
    geom::{Expanse, Point, PointI32},
    key::ViewKey,
};

/// Upper bound on a measured content extent.
const CAP: u32 = 1 << 16;

/// Scope name for scroll state.
const SCOPE: &str = "Scroll";

/// Scroll position and the sizes it was last clamped against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ScrollState {
    /// Offset of the view into the content.
    offset: Point,
    /// Content size.
    content: Expanse,
    /// View size.
    view: Expanse,
}

impl ScrollState {
    /// Largest permitted offset.
    fn max_offset(&self) -> Point {
        Point::new(
            self.content.w.saturating_sub(self.view.w),
            self.content.h.saturating_sub(self.view.h),
        )
    }

    /// Move by a delta, staying within range.
    fn scroll_by(&mut self, x: i32, y: i32) -> bool {
        let max = self.max_offset();
        let next = self.offset.scroll(x, y);
        let next = Point::new(next.x.min(max.x), next.y.min(max.y));
        let moved = next != self.offset;
        self.offset = next;
        moved
    }
}

/// A view onto content larger than itself. The wheel scrolls it; the
/// position is kept in the store, so it survives rebuilding the view tree.
///
/// Content is measured at the view's width and unbounded height, unless
/// horizontal scrolling is enabled, in which case both axes are unbounded.
pub struct Scroll<M> {
    /// Content.
    content: View<M>,
    /// Allow horizontal scrolling?
    horizontal: bool,
}

impl<M: 'static> Scroll<M> {
    /// A vertically scrolling view of `content`.
    pub fn new(content: View<M>) -> Self {
        Self {
            content,
            horizontal: false,
        }
    }

    /// Also scroll horizontally.
    pub fn horizontal(mut self) -> Self {
        self.horizontal = true;
        self
    }

    /// The content size for a given view size. Content that takes all of an
    /// unbounded axis is sized to the view on that axis instead.
    fn content_size(&self, view: Expanse) -> Expanse {
        let bound = Expanse::new(if self.horizontal { CAP } else { view.w }, CAP);
        let mut size = self
            .content
            .desired()
            .resolve(bound, self.content.measure(bound));
        if size.h >= CAP {
            size.h = view.h;
        }
        if self.horizontal && size.w >= CAP {
            size.w = view.w;
        }
        size
    }
}

impl<M: 'static> Node<M> for Scroll<M> {
    fn measure(&self, available: Expanse) -> Expanse {
        self.content_size(available).min(available)
    }

    fn render(&self, vp: Viewport, buf: &mut Buffer) -> Result<()> {
        let view = vp.size();
        let content = self.content_size(view);
        let mask = buf.mask();
        let mut state = buf
            .scope(&ViewKey::name(SCOPE), |b| b.retrieve::<ScrollState>())
            .unwrap_or_default();
        state.content = content;
        state.view = view;
        state.scroll_by(0, 0);

        let origin = PointI32::zero() - PointI32::from(state.offset);
        self.content.render(vp.child_at(origin, content), buf)?;

        buf.scope(&ViewKey::name(SCOPE), |b| {
            let key = b.key();
            b.claim_mouse(&key, vp.local(), mask, &[Button::None]);
            b.store(state);
        });
        Ok(())
    }

    fn handle_event(&self, event: &Event, buf: &mut Buffer) -> Outcome<M> {
        let first = self.content.handle_event(event, buf);
        let mut out = Outcome {
            messages: first.messages,
            events: vec![],
        };
        for e in first.events {
            let Event::Mouse(m) = &e else {
                out.events.push(e);
                continue;
            };
            if !m.action.is_scroll() {
                out.events.push(e);
                continue;
            }
            let taken = buf.scope(&ViewKey::name(SCOPE), |b| {
                let key = b.key();
                if !b.check_mouse(&key, m) {
                    return false;
                }
                let mut state = b.retrieve::<ScrollState>().unwrap_or_default();
                let moved = match m.action {
                    Action::ScrollDown => state.scroll_by(0, 1),
                    Action::ScrollUp => state.scroll_by(0, -1),
                    Action::ScrollRight if self.horizontal => state.scroll_by(1, 0),
                    Action::ScrollLeft if self.horizontal => state.scroll_by(-1, 0),
                    _ => false,
                };
                b.store(state);
                if moved && !out.events.iter().any(Event::is_redraw) {
                    out.events.push(Event::Redraw);
                }
                true
            });
            if !taken {
                out.events.push(e);
            }
        }
        out
    }
}

impl<M: 'static> From<Scroll<M>> for View<M> {
    fn from(s: Scroll<M>) -> Self {
        Self::new(s)
    }
}

/// A vertically scrolling view.
pub fn scroll<M: 'static>(content: View<M>) -> View<M> {
    Scroll::new(content).into()
}
