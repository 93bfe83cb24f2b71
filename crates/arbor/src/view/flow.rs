use super::{Node, Outcome, View, deliver, indexed};
use crate::{
    buffer::{Buffer, Viewport},
    error::Result,
    event::Event,
    geom::{Expanse, Rect},
    key::ViewKey,
};

/// Children placed left to right at their measured size, wrapping to a new
/// line when the next child would cross the right edge.
pub struct Flow<M> {
    /// Children, in render order.
    children: Vec<View<M>>,
    /// Horizontal gap between children on a line.
    spacing: u32,
}

impl<M: 'static> Flow<M> {
    /// A flow of children.
    pub fn new(children: impl IntoIterator<Item = View<M>>) -> Self {
        Self {
            children: children.into_iter().collect(),
            spacing: 0,
        }
    }

    /// Set the gap between children on a line.
    pub fn spacing(mut self, spacing: u32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Child rectangles within `space`.
    fn place(&self, space: Expanse) -> Vec<Rect> {
        let (mut x, mut y, mut line) = (0u32, 0u32, 0u32);
        let mut rects = Vec::with_capacity(self.children.len());
        for child in &self.children {
            let size = child.measure(space);
            if x > 0 && x.saturating_add(size.w) > space.w {
                x = 0;
                y = y.saturating_add(line);
                line = 0;
            }
            rects.push(Rect::new(x, y, size.w, size.h));
            x = x.saturating_add(size.w).saturating_add(self.spacing);
            line = line.max(size.h);
        }
        rects
    }
}

impl<M: 'static> Node<M> for Flow<M> {
    fn measure(&self, available: Expanse) -> Expanse {
        let rects = self.place(available);
        let w = rects.iter().map(Rect::right).max().unwrap_or(0);
        let h = rects.iter().map(Rect::bottom).max().unwrap_or(0);
        Expanse::new(w, h).min(available)
    }

    fn render(&self, vp: Viewport, buf: &mut Buffer) -> Result<()> {
        for (i, (child, rect)) in self.children.iter().zip(self.place(vp.size())).enumerate() {
            child.render_keyed(&ViewKey::Index(i), vp.child(rect), buf)?;
        }
        Ok(())
    }

    fn handle_event(&self, event: &Event, buf: &mut Buffer) -> Outcome<M> {
        deliver(indexed(&self.children), event, buf)
    }
}

impl<M: 'static> From<Flow<M>> for View<M> {
    fn from(f: Flow<M>) -> Self {
        Self::new(f)
    }
}

/// A wrapping flow with single-cell gaps.
pub fn flow<M: 'static>(children: impl IntoIterator<Item = View<M>>) -> View<M> {
    Flow::new(children).spacing(1).into()
}
