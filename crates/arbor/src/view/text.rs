use std::borrow::Cow;

use super::{Node, View};
use crate::{
    buffer::{Buffer, Viewport},
    error::Result,
    geom::{Expanse, Point},
    style::{Attr, Style},
    text,
};

/// A block of styled text. Lines break on newlines; with wrapping enabled
/// they also break to fit the available width.
#[derive(Debug, Clone)]
pub struct Text {
    /// The raw content.
    content: String,
    /// Style applied to every cell.
    style: Style,
    /// Wrap to the available width?
    wrap: bool,
}

impl Text {
    /// Unstyled, unwrapped text.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            style: Style::default(),
            wrap: false,
        }
    }

    /// Set the style.
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Add bold.
    pub fn bold(mut self) -> Self {
        self.style = self.style.with_attr(Attr::Bold);
        self
    }

    /// Wrap lines to the available width.
    pub fn wrap(mut self) -> Self {
        self.wrap = true;
        self
    }

    /// The display lines at a given width.
    fn lines(&self, width: u32) -> Vec<Cow<'_, str>> {
        if self.wrap {
            if width == 0 {
                return vec![];
            }
            textwrap::wrap(&self.content, width as usize)
        } else {
            self.content.lines().map(Cow::Borrowed).collect()
        }
    }
}

impl<M> Node<M> for Text {
    fn measure(&self, available: Expanse) -> Expanse {
        let lines = self.lines(available.w);
        let w = lines.iter().map(|l| text::width(l)).max().unwrap_or(0);
        Expanse::new(w as u32, lines.len() as u32).min(available)
    }

    fn render(&self, vp: Viewport, buf: &mut Buffer) -> Result<()> {
        let size = vp.size();
        for (y, line) in self.lines(size.w).iter().take(size.h as usize).enumerate() {
            buf.text(Point::new(0, y as u32), line, self.style);
        }
        Ok(())
    }
}

impl<M: 'static> From<Text> for View<M> {
    fn from(t: Text) -> Self {
        Self::new(t)
    }
}

/// Unstyled text.
pub fn text<M: 'static>(content: impl Into<String>) -> View<M> {
    Text::new(content).into()
}

/// A region filled with one character. Takes all the space it is offered.
#[derive(Debug, Clone, Copy)]
pub struct Fill {
    /// The fill character.
    ch: char,
    /// The fill style.
    style: Style,
}

impl Fill {
    /// A fill of `ch` in `style`.
    pub fn new(ch: char, style: Style) -> Self {
        Self { ch, style }
    }
}

impl<M> Node<M> for Fill {
    fn measure(&self, available: Expanse) -> Expanse {
        available
    }

    fn flex(&self) -> Option<u32> {
        Some(1)
    }

    fn render(&self, vp: Viewport, buf: &mut Buffer) -> Result<()> {
        buf.fill(vp.local(), self.ch, self.style);
        Ok(())
    }
}

impl<M: 'static> From<Fill> for View<M> {
    fn from(f: Fill) -> Self {
        Self::new(f)
    }
}

/// A solid fill.
pub fn fill<M: 'static>(ch: char, style: Style) -> View<M> {
    Fill::new(ch, style).into()
}

/// Empty space that absorbs leftover room in stacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Space;

impl<M> Node<M> for Space {
    fn measure(&self, _available: Expanse) -> Expanse {
        Expanse::default()
    }

    fn flex(&self) -> Option<u32> {
        Some(1)
    }

    fn render(&self, _vp: Viewport, _buf: &mut Buffer) -> Result<()> {
        Ok(())
    }
}

impl<M: 'static> From<Space> for View<M> {
    fn from(s: Space) -> Self {
        Self::new(s)
    }
}

/// Flexible empty space.
pub fn space<M: 'static>() -> View<M> {
    Space.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{buf, testing::BufTest};

    fn draw(view: &View<()>, size: Expanse) -> Buffer {
        let mut b = Buffer::new(size);
        view.render_root(&mut b).unwrap();
        b
    }

    #[test]
    fn measures_lines() {
        let v: View<()> = text("ab\ncde");
        assert_eq!(v.measure(Expanse::new(10, 10)), Expanse::new(3, 2));
        assert_eq!(v.measure(Expanse::new(2, 1)), Expanse::new(2, 1));
    }

    #[test]
    fn wraps_to_width() {
        let v: View<()> = Text::new("one two three").wrap().into();
        assert_eq!(v.measure(Expanse::new(7, 10)), Expanse::new(7, 2));
        let b = draw(&v, Expanse::new(7, 3));
        BufTest::new(b.grid()).assert_matches(buf!["one two" "threeXX" "XXXXXXX"]);
    }

    #[test]
    fn clips_to_viewport() {
        let b = draw(&text("hello"), Expanse::new(3, 1));
        BufTest::new(b.grid()).assert_matches(buf!["hel"]);
    }

    #[test]
    fn fill_and_space() {
        let f: View<()> = fill('.', Style::default());
        assert_eq!(f.measure(Expanse::new(4, 2)), Expanse::new(4, 2));
        assert_eq!(f.flex_weight(), Some(1));
        assert_eq!(text::<()>("a").flex(3).flex_weight(), Some(3));
        let s: View<()> = space();
        assert_eq!(s.measure(Expanse::new(4, 2)), Expanse::default());
        let b = draw(&f, Expanse::new(2, 2));
        BufTest::new(b.grid()).assert_matches(buf![".." ".."]);
    }
}
