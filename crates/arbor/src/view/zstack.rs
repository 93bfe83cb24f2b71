use super::{Node, Outcome, View, deliver, indexed};
use crate::{
    buffer::{Buffer, Viewport},
    error::Result,
    event::Event,
    geom::Expanse,
    key::ViewKey,
};

/// Layers drawn over one another in the same area. The last layer is on
/// top: it draws last, receives events first, and its mouse claims beat the
/// claims of every layer beneath it, even where a lower layer claimed first.
pub struct ZStack<M> {
    /// Layers, bottom first.
    layers: Vec<View<M>>,
}

impl<M: 'static> ZStack<M> {
    /// A stack of layers, bottom first.
    pub fn new(layers: impl IntoIterator<Item = View<M>>) -> Self {
        Self {
            layers: layers.into_iter().collect(),
        }
    }
}

impl<M: 'static> Node<M> for ZStack<M> {
    fn measure(&self, available: Expanse) -> Expanse {
        self.layers
            .iter()
            .map(|l| l.measure(available))
            .fold(Expanse::default(), |acc, e| acc.max(e))
    }

    fn render(&self, vp: Viewport, buf: &mut Buffer) -> Result<()> {
        let mut collected = Vec::with_capacity(self.layers.len());
        for (i, layer) in self.layers.iter().enumerate() {
            let (ret, claims) =
                buf.collect_claims(|b| layer.render_keyed(&ViewKey::Index(i), vp, b));
            ret?;
            collected.push(claims);
        }
        for claims in collected.into_iter().rev() {
            buf.merge_claims(claims);
        }
        Ok(())
    }

    fn handle_event(&self, event: &Event, buf: &mut Buffer) -> Outcome<M> {
        deliver(indexed(&self.layers), event, buf)
    }
}

impl<M: 'static> From<ZStack<M>> for View<M> {
    fn from(z: ZStack<M>) -> Self {
        Self::new(z)
    }
}

/// Overlay layers, bottom first.
pub fn zstack<M: 'static>(layers: impl IntoIterator<Item = View<M>>) -> View<M> {
    ZStack::new(layers).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{event::mouse::Button, geom::Point, view::text};

    #[test]
    fn top_layer_claims_win() {
        let v: View<()> = zstack([text("a").on_click(()), text("b").on_click(()).center()]);
        let mut b = Buffer::new(Expanse::new(3, 3));
        v.render_root(&mut b).unwrap();
        let owner = |x, y| {
            b.claims()
                .owner(Point::new(x, y), Button::Left)
                .map(|k| k.canonical().into_owned())
        };
        assert_eq!(owner(1, 1).as_deref(), Some("[1]/OnClick"));
        assert_eq!(owner(0, 0).as_deref(), Some("[0]/OnClick"));
        assert_eq!(owner(2, 2).as_deref(), Some("[0]/OnClick"));
    }

    #[test]
    fn measures_largest_layer() {
        let v: View<()> = zstack([text("abc"), text("d\ne")]);
        assert_eq!(v.measure(Expanse::new(9, 9)), Expanse::new(3, 2));
    }
}
