//! Wrappers that adjust a view's size, placement or message type. All of
//! them delegate event handling to the wrapped view.

use super::{Node, Outcome, View};
use crate::{
    buffer::{Buffer, Viewport},
    error::Result,
    event::Event,
    geom::{Expanse, Rect},
    layout::{Align, DesiredSize, Edges},
};

/// Attaches size hints. The hints are resolved by the parent, which hands
/// back a viewport of the resolved size.
pub struct SizeHint<M> {
    /// Wrapped view.
    inner: View<M>,
    /// Hints.
    hints: DesiredSize,
}

impl<M> SizeHint<M> {
    /// Wrap `inner` with `hints`.
    pub fn new(inner: View<M>, hints: DesiredSize) -> Self {
        Self { inner, hints }
    }
}

impl<M: 'static> Node<M> for SizeHint<M> {
    fn measure(&self, available: Expanse) -> Expanse {
        self.hints
            .resolve(available, self.inner.measure(available))
    }

    fn desired(&self) -> DesiredSize {
        self.inner.desired().overlay(&self.hints)
    }

    fn flex(&self) -> Option<u32> {
        self.inner.flex_weight()
    }

    fn render(&self, vp: Viewport, buf: &mut Buffer) -> Result<()> {
        self.inner.render(vp, buf)
    }

    fn handle_event(&self, event: &Event, buf: &mut Buffer) -> Outcome<M> {
        self.inner.handle_event(event, buf)
    }
}

/// Clamps the wrapped view's size between optional bounds.
pub struct MinMax<M> {
    /// Wrapped view.
    inner: View<M>,
    /// Lower bound.
    min: Option<Expanse>,
    /// Upper bound.
    max: Option<Expanse>,
}

impl<M> MinMax<M> {
    /// Wrap `inner` with bounds.
    pub fn new(inner: View<M>, min: Option<Expanse>, max: Option<Expanse>) -> Self {
        Self { inner, min, max }
    }

    /// Apply the upper bound.
    fn cap(&self, e: Expanse) -> Expanse {
        self.max.map_or(e, |m| e.min(m))
    }
}

impl<M: 'static> Node<M> for MinMax<M> {
    fn measure(&self, available: Expanse) -> Expanse {
        let inner = self.inner.measure(self.cap(available));
        self.min
            .map_or(inner, |m| inner.max(m))
            .min(self.cap(available))
    }

    fn desired(&self) -> DesiredSize {
        self.inner.desired()
    }

    fn flex(&self) -> Option<u32> {
        self.inner.flex_weight()
    }

    fn render(&self, vp: Viewport, buf: &mut Buffer) -> Result<()> {
        let size = self.cap(vp.size());
        self.inner.render(vp.child(size.rect()), buf)
    }

    fn handle_event(&self, event: &Event, buf: &mut Buffer) -> Outcome<M> {
        self.inner.handle_event(event, buf)
    }
}

/// Insets the wrapped view. Measure grows by the insets, render shrinks.
pub struct Padded<M> {
    /// Wrapped view.
    inner: View<M>,
    /// Insets.
    edges: Edges,
}

impl<M> Padded<M> {
    /// Wrap `inner` with insets.
    pub fn new(inner: View<M>, edges: Edges) -> Self {
        Self { inner, edges }
    }
}

impl<M: 'static> Node<M> for Padded<M> {
    fn measure(&self, available: Expanse) -> Expanse {
        let content = self.inner.measure(self.edges.shrink(available));
        self.edges.grow(content).min(available)
    }

    fn desired(&self) -> DesiredSize {
        let d = self.inner.desired();
        DesiredSize {
            width: d.width.map(|w| w.grown(self.edges.horizontal())),
            height: d.height.map(|h| h.grown(self.edges.vertical())),
        }
    }

    fn flex(&self) -> Option<u32> {
        self.inner.flex_weight()
    }

    fn render(&self, vp: Viewport, buf: &mut Buffer) -> Result<()> {
        self.inner
            .render(vp.child(self.edges.inset(vp.local())), buf)
    }

    fn handle_event(&self, event: &Event, buf: &mut Buffer) -> Outcome<M> {
        self.inner.handle_event(event, buf)
    }
}

/// Gives the wrapped view a flex weight.
pub struct Flexed<M> {
    /// Wrapped view.
    inner: View<M>,
    /// Weight.
    weight: u32,
}

impl<M> Flexed<M> {
    /// Wrap `inner` with a weight.
    pub fn new(inner: View<M>, weight: u32) -> Self {
        Self { inner, weight }
    }
}

impl<M: 'static> Node<M> for Flexed<M> {
    fn measure(&self, available: Expanse) -> Expanse {
        self.inner.measure(available)
    }

    fn desired(&self) -> DesiredSize {
        self.inner.desired()
    }

    fn flex(&self) -> Option<u32> {
        Some(self.weight)
    }

    fn render(&self, vp: Viewport, buf: &mut Buffer) -> Result<()> {
        self.inner.render(vp, buf)
    }

    fn handle_event(&self, event: &Event, buf: &mut Buffer) -> Outcome<M> {
        self.inner.handle_event(event, buf)
    }
}

/// Takes all offered space and places the wrapped view within it.
pub struct Aligned<M> {
    /// Wrapped view.
    inner: View<M>,
    /// Horizontal alignment.
    h: Align,
    /// Vertical alignment.
    v: Align,
}

impl<M> Aligned<M> {
    /// Wrap `inner` with alignments.
    pub fn new(inner: View<M>, h: Align, v: Align) -> Self {
        Self { inner, h, v }
    }
}

impl<M: 'static> Node<M> for Aligned<M> {
    fn measure(&self, available: Expanse) -> Expanse {
        available
    }

    fn render(&self, vp: Viewport, buf: &mut Buffer) -> Result<()> {
        let space = vp.size();
        let size = self
            .inner
            .desired()
            .resolve(space, self.inner.measure(space));
        let rect = Rect::new(
            self.h.offset(space.w, size.w),
            self.v.offset(space.h, size.h),
            size.w,
            size.h,
        );
        self.inner.render(vp.child(rect), buf)
    }

    fn handle_event(&self, event: &Event, buf: &mut Buffer) -> Outcome<M> {
        self.inner.handle_event(event, buf)
    }
}

/// Converts the wrapped view's messages.
pub struct Mapped<M, N> {
    /// Wrapped view.
    inner: View<M>,
    /// Conversion.
    f: Box<dyn Fn(M) -> N>,
}

impl<M, N> Mapped<M, N> {
    /// Wrap `inner` with a conversion.
    pub fn new(inner: View<M>, f: impl Fn(M) -> N + 'static) -> Self {
        Self {
            inner,
            f: Box::new(f),
        }
    }
}

impl<M: 'static, N> Node<N> for Mapped<M, N> {
    fn measure(&self, available: Expanse) -> Expanse {
        self.inner.measure(available)
    }

    fn desired(&self) -> DesiredSize {
        self.inner.desired()
    }

    fn flex(&self) -> Option<u32> {
        self.inner.flex_weight()
    }

    fn render(&self, vp: Viewport, buf: &mut Buffer) -> Result<()> {
        self.inner.render(vp, buf)
    }

    fn handle_event(&self, event: &Event, buf: &mut Buffer) -> Outcome<N> {
        self.inner.handle_event(event, buf).map(&self.f)
    }
}
