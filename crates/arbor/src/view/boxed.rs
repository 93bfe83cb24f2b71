use super::{Node, Outcome, View};
use crate::{
    buffer::{Buffer, SKIP, Viewport},
    error::Result,
    event::Event,
    geom::{Expanse, Frame, Point},
    layout::DesiredSize,
    style::Style,
    text,
};

/// Defines the set of glyphs used to draw the box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoxGlyphs {
    /// Top-left corner glyph.
    pub topleft: char,
    /// Top-right corner glyph.
    pub topright: char,
    /// Bottom-left corner glyph.
    pub bottomleft: char,
    /// Bottom-right corner glyph.
    pub bottomright: char,
    /// Horizontal border glyph.
    pub horizontal: char,
    /// Vertical border glyph.
    pub vertical: char,
}

impl BoxGlyphs {
    /// Draw a box border using these glyphs.
    pub(crate) fn draw(&self, buf: &mut Buffer, style: Style, frame: Frame) {
        buf.fill(frame.topleft, self.topleft, style);
        buf.fill(frame.topright, self.topright, style);
        buf.fill(frame.bottomleft, self.bottomleft, style);
        buf.fill(frame.bottomright, self.bottomright, style);
        buf.fill(frame.top, self.horizontal, style);
        buf.fill(frame.bottom, self.horizontal, style);
        buf.fill(frame.left, self.vertical, style);
        buf.fill(frame.right, self.vertical, style);
    }
}

/// Single line thin Unicode box drawing set.
pub const SINGLE: BoxGlyphs = BoxGlyphs {
    topleft: '┌',
    topright: '┐',
    bottomleft: '└',
    bottomright: '┘',
    horizontal: '─',
    vertical: '│',
};

/// Double line Unicode box drawing set.
pub const DOUBLE: BoxGlyphs = BoxGlyphs {
    topleft: '╔',
    topright: '╗',
    bottomleft: '╚',
    bottomright: '╝',
    horizontal: '═',
    vertical: '║',
};

/// Single line thick Unicode box drawing set.
pub const SINGLE_THICK: BoxGlyphs = BoxGlyphs {
    topleft: '┏',
    topright: '┓',
    bottomleft: '┗',
    bottomright: '┛',
    horizontal: '━',
    vertical: '┃',
};

/// Round corner thin Unicode box drawing set.
pub const ROUND: BoxGlyphs = BoxGlyphs {
    topleft: '╭',
    topright: '╮',
    bottomleft: '╰',
    bottomright: '╯',
    horizontal: '─',
    vertical: '│',
};

/// A border around a view, with an optional title set into the top edge.
///
/// The interior is painted with [`SKIP`] after the content renders, so the
/// fill style shows through only where the content left cells blank.
pub struct Boxed<M> {
    /// Content.
    content: View<M>,
    /// Glyph set.
    glyphs: BoxGlyphs,
    /// Border style.
    style: Style,
    /// Interior style.
    fill: Style,
    /// Title.
    title: Option<String>,
}

impl<M: 'static> Boxed<M> {
    /// A single-line box around `content`.
    pub fn new(content: View<M>) -> Self {
        Self {
            content,
            glyphs: SINGLE,
            style: Style::default(),
            fill: Style::default(),
            title: None,
        }
    }

    /// Build a box with a specified glyph set.
    pub fn glyphs(mut self, glyphs: BoxGlyphs) -> Self {
        self.glyphs = glyphs;
        self
    }

    /// Set the border style.
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Set the interior style.
    pub fn fill(mut self, style: Style) -> Self {
        self.fill = style;
        self
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl<M: 'static> Node<M> for Boxed<M> {
    fn measure(&self, available: Expanse) -> Expanse {
        let inner = self.content.measure(available.shrink(2, 2));
        let title = self
            .title
            .as_ref()
            .map_or(0, |t| text::width(t) as u32 + 4);
        let size = inner.grow(2, 2);
        Expanse::new(size.w.max(title), size.h).min(available)
    }

    fn desired(&self) -> DesiredSize {
        let d = self.content.desired();
        DesiredSize {
            width: d.width.map(|w| w.grown(2)),
            height: d.height.map(|h| h.grown(2)),
        }
    }

    fn flex(&self) -> Option<u32> {
        self.content.flex_weight()
    }

    fn render(&self, vp: Viewport, buf: &mut Buffer) -> Result<()> {
        let frame = Frame::new(vp.local(), 1);
        let inner = frame.inner();
        if !inner.is_zero() {
            self.content.render(vp.child(inner), buf)?;
            buf.fill(inner, SKIP, self.fill);
        }
        self.glyphs.draw(buf, self.style, frame);
        if let Some(title) = &self.title {
            let room = frame.top.w.saturating_sub(2) as usize;
            if room > 0 {
                let t = format!(" {} ", text::truncate(title, room.saturating_sub(2)));
                buf.text(Point::new(frame.top.tl.x + 1, 0), text::truncate(&t, room), self.style);
            }
        }
        Ok(())
    }

    fn handle_event(&self, event: &Event, buf: &mut Buffer) -> Outcome<M> {
        self.content.handle_event(event, buf)
    }
}

impl<M: 'static> From<Boxed<M>> for View<M> {
    fn from(b: Boxed<M>) -> Self {
        Self::new(b)
    }
}

/// A single-line box around `content`.
pub fn boxed<M: 'static>(content: View<M>) -> View<M> {
    Boxed::new(content).into()
}
