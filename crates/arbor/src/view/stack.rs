use super::{Node, Outcome, View, deliver, indexed};
use crate::{
    buffer::{Buffer, Viewport},
    error::Result,
    event::Event,
    geom::Expanse,
    key::ViewKey,
    layout::{Axis, Slot, allocate},
};

/// A list of children laid out along one axis.
///
/// Along the main axis, a child with a size hint for that axis gets the hint.
/// Children with a flex weight share whatever is left after every other child
/// has been given its hint or, failing that, its measured size against the
/// space still remaining. On the cross axis
/// children are stretched to the full extent unless they carry a hint.
pub struct Stack<M> {
    /// Main axis.
    axis: Axis,
    /// Children, in render order.
    children: Vec<View<M>>,
    /// Gap between adjacent children.
    spacing: u32,
}

impl<M: 'static> Stack<M> {
    /// An empty stack along `axis`.
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            children: vec![],
            spacing: 0,
        }
    }

    /// Add a child.
    pub fn push(mut self, child: impl Into<View<M>>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Add several children.
    pub fn extend(mut self, children: impl IntoIterator<Item = View<M>>) -> Self {
        self.children.extend(children);
        self
    }

    /// Set the gap between children.
    pub fn spacing(mut self, spacing: u32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Total gap along the main axis.
    fn gaps(&self) -> u32 {
        let n = self.children.len() as u32;
        self.spacing.saturating_mul(n.saturating_sub(1))
    }

    /// Main-axis sizes for each child within `space`.
    fn sizes(&self, space: Expanse) -> Vec<u32> {
        let total = self.axis.of(space).saturating_sub(self.gaps());
        let cross = self.axis.cross().of(space);
        let mut remaining = total;
        let slots: Vec<Slot> = self
            .children
            .iter()
            .map(|c| {
                let n = match (c.desired().on(self.axis), c.flex_weight()) {
                    (Some(d), _) => d.resolve(total, self.axis),
                    (None, Some(w)) => return Slot::Weighted(w),
                    (None, None) => self
                        .axis
                        .of(c.measure(self.axis.expanse(remaining, cross))),
                }
                .min(remaining);
                remaining -= n;
                Slot::Fixed(n)
            })
            .collect();
        allocate(total, &slots)
    }

    /// Cross-axis extent of a child given its main-axis size.
    fn cross_of(&self, child: &View<M>, main: u32, cross: u32) -> u32 {
        let axis = self.axis.cross();
        match child.desired().on(axis) {
            Some(d) => d.resolve(cross, axis),
            None => axis.of(child.measure(self.axis.expanse(main, cross))),
        }
    }
}

impl<M: 'static> Node<M> for Stack<M> {
    fn measure(&self, available: Expanse) -> Expanse {
        let cross = self.axis.cross().of(available);
        let sizes = self.sizes(available);
        let main = sizes.iter().sum::<u32>().saturating_add(self.gaps());
        let cross_used = self
            .children
            .iter()
            .zip(&sizes)
            .map(|(c, m)| self.cross_of(c, *m, cross))
            .max()
            .unwrap_or(0);
        self.axis.expanse(main, cross_used).min(available)
    }

    fn render(&self, vp: Viewport, buf: &mut Buffer) -> Result<()> {
        let space = vp.size();
        let cross = self.axis.cross().of(space);
        let mut offset = 0;
        for (i, (child, main)) in self.children.iter().zip(self.sizes(space)).enumerate() {
            let c = match child.desired().on(self.axis.cross()) {
                Some(d) => d.resolve(cross, self.axis.cross()),
                None => cross,
            };
            let rect = self.axis.rect(offset, 0, main, c);
            child.render_keyed(&ViewKey::Index(i), vp.child(rect), buf)?;
            offset = offset.saturating_add(main).saturating_add(self.spacing);
        }
        Ok(())
    }

    fn handle_event(&self, event: &Event, buf: &mut Buffer) -> Outcome<M> {
        deliver(indexed(&self.children), event, buf)
    }
}

impl<M: 'static> From<Stack<M>> for View<M> {
    fn from(s: Stack<M>) -> Self {
        Self::new(s)
    }
}

/// Children left to right.
pub fn row<M: 'static>(children: impl IntoIterator<Item = View<M>>) -> View<M> {
    Stack::new(Axis::Horizontal).extend(children).into()
}

/// Children top to bottom.
pub fn column<M: 'static>(children: impl IntoIterator<Item = View<M>>) -> View<M> {
    Stack::new(Axis::Vertical).extend(children).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        buf,
        event::key::Key,
        layout::Dimension,
        style::Style,
        testing::BufTest,
        view::{fill, space, text},
    };

    fn draw(view: &View<u8>, size: Expanse) -> Buffer {
        let mut b = Buffer::new(size);
        view.render_root(&mut b).unwrap();
        b
    }

    #[test]
    fn equal_weights_split_exactly() {
        let v = row(vec![
            fill::<u8>('a', Style::default()),
            fill('b', Style::default()),
            fill('c', Style::default()),
        ]);
        let b = draw(&v, Expanse::new(10, 1));
        BufTest::new(b.grid()).assert_matches(buf!["aaaabbbccc"]);
    }

    #[test]
    fn fixed_then_weighted() {
        let v = row(vec![
            text::<u8>("ab"),
            fill('.', Style::default()).flex(2),
            fill('-', Style::default()),
            text("z").width(Dimension::Fixed(2)),
        ]);
        let b = draw(&v, Expanse::new(10, 1));
        BufTest::new(b.grid()).assert_matches(buf!["ab....--zX"]);
    }

    #[test]
    fn space_pushes_apart() {
        let v = row(vec![text::<u8>("l"), space(), text("r")]);
        let b = draw(&v, Expanse::new(5, 1));
        BufTest::new(b.grid()).assert_matches(buf!["lXXXr"]);
    }

    #[test]
    fn column_measure_and_spacing() {
        let v: View<u8> = Stack::new(Axis::Vertical)
            .push(text("abc"))
            .push(text("d"))
            .spacing(1)
            .into();
        assert_eq!(v.measure(Expanse::new(10, 10)), Expanse::new(3, 3));
        let b = draw(&v, Expanse::new(3, 3));
        BufTest::new(b.grid()).assert_matches(buf!["abc" "XXX" "dXX"]);
    }

    #[test]
    fn huge_spacing_does_not_overflow() {
        // A lone child has no gaps, but the offset still steps past it.
        let v: View<u8> = Stack::new(Axis::Horizontal)
            .push(text("ab"))
            .spacing(u32::MAX)
            .into();
        assert_eq!(v.measure(Expanse::new(5, 1)), Expanse::new(2, 1));
        let b = draw(&v, Expanse::new(5, 1));
        BufTest::new(b.grid()).assert_matches(buf!["abXXX"]);

        // With more children the gaps swallow everything.
        let v: View<u8> = Stack::new(Axis::Horizontal)
            .push(text("a"))
            .push(text("b"))
            .spacing(u32::MAX)
            .into();
        let b = draw(&v, Expanse::new(5, 1));
        BufTest::new(b.grid()).assert_matches(buf!["XXXXX"]);
    }

    #[test]
    fn overflow_is_clipped() {
        let v = column(vec![text::<u8>("a"), text("b"), text("c")]);
        let b = draw(&v, Expanse::new(1, 2));
        BufTest::new(b.grid()).assert_matches(buf!["a" "b"]);
    }

    #[test]
    fn last_child_gets_first_refusal() {
        let v = row(vec![text("a").on_key('x', 1u8), text("b").on_key('x', 2)]);
        let mut b = draw(&v, Expanse::new(2, 1));
        let out = v.handle_event(&Event::Key(Key::from('x')), &mut b);
        assert_eq!(out.messages, vec![2]);
        let out = v.handle_event(&Event::Key(Key::from('y')), &mut b);
        assert_eq!(out.events, vec![Event::Key(Key::from('y'))]);
    }
}
