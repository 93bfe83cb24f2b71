//! The per-frame render target.
//!
//! A [`Buffer`] combines a character grid, a stack of viewport transforms,
//! the mouse-claim registry and the keyed state store. It is created fresh
//! for every frame; only the store is carried forward, via
//! [`Buffer::next_frame`].

/// Mouse claim registry.
mod claims;
/// Keyed state store.
mod store;
/// Terminal cell grid.
mod termbuf;
/// Viewport transforms.
mod viewport;

use std::mem;

use scopeguard::guard;
use unicode_segmentation::UnicodeSegmentation;

pub use self::{
    claims::Claims,
    store::Store,
    termbuf::{Cell, TermBuf},
    viewport::{Mask, Viewport},
};
use crate::{
    event::mouse::{Button, MouseEvent},
    geom::{Expanse, Point, Rect},
    key::ViewKey,
    style::Style,
    text,
};

/// A character that paints a blank only over cells that are still blank.
/// Decorative layers use it so they never erase content drawn before them.
pub const SKIP: char = '\u{1}';

/// The per-frame render target.
pub struct Buffer {
    /// The character grid.
    grid: TermBuf,
    /// Active viewports, innermost last.
    stack: Vec<Viewport>,
    /// Active key paths, innermost last.
    scopes: Vec<ViewKey>,
    /// Mouse claims registered this frame.
    claims: Claims,
    /// Typed state.
    store: Store,
}

impl Buffer {
    /// An empty buffer with an empty store.
    pub fn new(size: Expanse) -> Self {
        Self {
            grid: TermBuf::empty(size),
            stack: vec![],
            scopes: vec![],
            claims: Claims::default(),
            store: Store::default(),
        }
    }

    /// A fresh buffer for the following frame, seeded with this buffer's store.
    pub fn next_frame(self, size: Expanse) -> Self {
        Self {
            store: Store::seeded(self.store),
            ..Self::new(size)
        }
    }

    /// Screen size.
    pub fn size(&self) -> Expanse {
        self.grid.size()
    }

    /// The rendered grid.
    pub fn grid(&self) -> &TermBuf {
        &self.grid
    }

    /// The active viewport; the whole screen when nothing is pushed.
    pub fn viewport(&self) -> Viewport {
        self.stack
            .last()
            .copied()
            .unwrap_or_else(|| Viewport::screen(self.size()))
    }

    /// The current key path.
    pub fn key(&self) -> ViewKey {
        self.scopes.last().cloned().unwrap_or_default()
    }

    /// Run `body` with a viewport active. The prior transform is restored on
    /// every exit path.
    pub fn push<T>(&mut self, vp: Viewport, body: impl FnOnce(&mut Self) -> T) -> T {
        let depth = self.stack.len();
        self.stack.push(vp);
        let mut this = guard(self, move |b| b.stack.truncate(depth));
        body(&mut **this)
    }

    /// Run `body` with `key` appended to the current key path.
    pub fn scope<T>(&mut self, key: &ViewKey, body: impl FnOnce(&mut Self) -> T) -> T {
        let depth = self.scopes.len();
        let path = self.key().append(key);
        self.scopes.push(path);
        let mut this = guard(self, move |b| b.scopes.truncate(depth));
        body(&mut **this)
    }

    /// Write a character at a local point. Writes outside the active visible
    /// region are dropped. [`SKIP`] writes a blank only over a blank cell.
    pub fn write(&mut self, ch: char, style: Style, at: Point) {
        let Some(abs) = self.viewport().to_screen(at) else {
            return;
        };
        if ch == SKIP {
            if let Some(cell) = self.grid.get(abs)
                && cell.is_blank()
            {
                self.grid.put(abs, ' ', style);
            }
            return;
        }
        self.grid.put(abs, ch, style);
    }

    /// Draw a line of text at a local point, clipped to the active visible
    /// region. Returns the number of columns the text occupies.
    pub fn text(&mut self, at: Point, s: &str, style: Style) -> u32 {
        let vp = self.viewport();
        let mut x = at.x;
        for g in s.graphemes(true) {
            let w = text::grapheme_width(g) as u32;
            if w == 0 {
                continue;
            }
            let cells: Vec<Option<Point>> = (0..w)
                .map(|i| vp.to_screen(Point { x: x + i, y: at.y }))
                .collect();
            // Wide glyphs are drawn only when every column they cover is visible.
            if let Some(Some(first)) = cells.first()
                && cells.iter().all(Option::is_some)
            {
                self.grid.put_grapheme(*first, g, style);
                for p in cells.iter().skip(1).flatten() {
                    self.grid.put_continuation(*p, style);
                }
            }
            x = x.saturating_add(w);
        }
        x - at.x
    }

    /// Fill a local rectangle. Only the part inside the active visible region
    /// is visited.
    pub fn fill(&mut self, rect: Rect, ch: char, style: Style) {
        let Some(r) = self
            .viewport()
            .visible_local()
            .and_then(|v| v.intersect(&rect))
        else {
            return;
        };
        for y in r.tl.y..r.bottom() {
            for x in r.tl.x..r.right() {
                self.write(ch, style, Point { x, y });
            }
        }
    }

    /// Store a typed value at the current key path for the next frame.
    pub fn store<T: 'static>(&mut self, value: T) {
        let key = self.key();
        self.store.put(key, value);
    }

    /// Retrieve a typed value at the current key path: what this frame
    /// stored, else what the previous frame stored.
    pub fn retrieve<T: Clone + 'static>(&self) -> Option<T> {
        self.store.get(&self.key())
    }

    /// The clip snapshot of the active viewport.
    pub fn mask(&self) -> Mask {
        self.viewport().mask()
    }

    /// Claim a local rectangle for mouse buttons, restricted to `mask` and the
    /// active visible region. Points already claimed are left alone.
    pub fn claim_mouse(&mut self, key: &ViewKey, rect: Rect, mask: Mask, buttons: &[Button]) {
        let Some(abs) = self
            .viewport()
            .rect_to_screen(rect)
            .and_then(|r| mask.clip(r))
        else {
            return;
        };
        for y in abs.tl.y..abs.bottom() {
            for x in abs.tl.x..abs.right() {
                for b in buttons {
                    self.claims.claim(Point { x, y }, *b, key);
                }
            }
        }
    }

    /// Does `key` own the event's location for the event's button?
    pub fn check_mouse(&self, key: &ViewKey, ev: &MouseEvent) -> bool {
        self.claims.owner(ev.location, ev.button) == Some(key)
    }

    /// Apply a style change to every cell in a local rectangle that lies
    /// within `mask` and the active visible region.
    pub fn restyle(&mut self, rect: Rect, mask: Mask, f: impl Fn(&mut Style)) {
        let Some(abs) = self
            .viewport()
            .rect_to_screen(rect)
            .and_then(|r| mask.clip(r))
        else {
            return;
        };
        for y in abs.tl.y..abs.bottom() {
            for x in abs.tl.x..abs.right() {
                if let Some(cell) = self.grid.get_mut(Point { x, y }) {
                    f(&mut cell.style);
                }
            }
        }
    }

    /// Run `body` against an empty claim registry and return the claims it
    /// made, leaving the outer registry as it was.
    pub fn collect_claims<T>(&mut self, body: impl FnOnce(&mut Self) -> T) -> (T, Claims) {
        let outer = mem::take(&mut self.claims);
        let ret = body(self);
        let collected = mem::replace(&mut self.claims, outer);
        (ret, collected)
    }

    /// Fold claims into the registry. Claims already present keep priority.
    pub fn merge_claims(&mut self, claims: Claims) {
        self.claims.merge(claims);
    }

    /// Claims registered so far this frame.
    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Consume the buffer, returning the grid.
    pub fn into_grid(self) -> TermBuf {
        self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        buf,
        event::mouse::Action,
        geom::PointI32,
        style::Color,
        testing::buf::BufTest,
    };

    fn buffer(w: u32, h: u32) -> Buffer {
        Buffer::new(Expanse::new(w, h))
    }

    #[test]
    fn writes_translate_and_clip() {
        let mut b = buffer(6, 3);
        let outer = b.viewport().child(Rect::new(1, 1, 4, 2));
        b.push(outer, |b| {
            b.write('a', Style::default(), Point::zero());
            let inner = b.viewport().child(Rect::new(2, 0, 5, 1));
            b.push(inner, |b| {
                b.text(Point::zero(), "xyz", Style::default());
            });
            // Outside the clip.
            b.write('q', Style::default(), Point { x: 4, y: 0 });
        });
        assert_eq!(b.viewport(), Viewport::screen(Expanse::new(6, 3)));
        BufTest::new(b.grid()).assert_matches(buf![
            "XXXXXX"
            "XaXxyX"
            "XXXXXX"
        ]);
    }

    #[test]
    fn push_restores_on_early_exit() {
        let mut b = buffer(4, 4);
        let vp = b.viewport().child(Rect::new(1, 1, 2, 2));
        let r: Result<(), &str> = b.push(vp, |b| {
            b.push(vp, |_| Err::<(), _>("bail"))?;
            Ok(())
        });
        assert!(r.is_err());
        assert_eq!(b.viewport(), Viewport::screen(Expanse::new(4, 4)));
    }

    #[test]
    fn skip_only_paints_blank_cells() {
        let mut b = buffer(3, 1);
        let bg = Style::bg(Color::Blue);
        b.write('x', Style::default(), Point::zero());
        b.write(' ', Style::default(), Point { x: 1, y: 0 });
        b.fill(Rect::new(0, 0, 3, 1), SKIP, bg);
        BufTest::new(b.grid()).assert_matches(buf!["x  "]);
        let style_at = |x| b.grid().get(Point { x, y: 0 }).map(|c| c.style);
        assert_eq!(style_at(0), Some(Style::default()));
        assert_eq!(style_at(1), Some(bg));
        assert_eq!(style_at(2), Some(bg));
    }

    #[test]
    fn wide_glyphs_need_both_columns() {
        let mut b = buffer(4, 1);
        let vp = b
            .viewport()
            .child_at(PointI32::new(-1, 0), Expanse::new(5, 1));
        b.push(vp, |b| b.text(Point::zero(), "日x日", Style::default()));
        BufTest::new(b.grid()).assert_matches(buf!["Xx日"]);
    }

    #[test]
    fn store_is_scoped_by_key() {
        let mut b = buffer(1, 1);
        b.scope(&ViewKey::key("a"), |b| b.store(1u8));
        b.scope(&ViewKey::key("b"), |b| b.store(2u8));
        let mut b = b.next_frame(Expanse::new(1, 1));
        assert_eq!(b.retrieve::<u8>(), None);
        let a = b.scope(&ViewKey::key("a"), |b| b.retrieve::<u8>());
        assert_eq!(a, Some(1));
        let nested = b.scope(&ViewKey::key("a"), |b| {
            b.scope(&ViewKey::key("b"), |b| b.retrieve::<u8>())
        });
        assert_eq!(nested, None);
    }

    #[test]
    fn claims_respect_mask_and_order() {
        let mut b = buffer(5, 5);
        let k1 = ViewKey::key("first");
        let k2 = ViewKey::key("second");
        let narrow = b.viewport().child(Rect::new(0, 0, 2, 2)).mask();
        b.claim_mouse(&k1, Rect::new(0, 0, 5, 5), narrow, &[Button::Left]);
        b.claim_mouse(&k2, Rect::new(0, 0, 5, 5), b.mask(), &[Button::Left]);

        let at = |x, y| MouseEvent::down(Point { x, y });
        assert!(b.check_mouse(&k1, &at(1, 1)));
        assert!(!b.check_mouse(&k2, &at(1, 1)));
        assert!(b.check_mouse(&k2, &at(3, 3)));
        assert!(!b.check_mouse(&k1, &at(3, 3)));
        let wheel = MouseEvent::wheel(Action::ScrollUp, Point { x: 3, y: 3 });
        assert!(!b.check_mouse(&k2, &wheel));
    }

    #[test]
    fn collected_claims_merge_behind_existing() {
        let mut b = buffer(2, 1);
        let (_, layer) = b.collect_claims(|b| {
            b.claim_mouse(&ViewKey::key("low"), Rect::new(0, 0, 2, 1), b.mask(), &[Button::Left]);
        });
        assert!(b.claims().is_empty());
        b.claim_mouse(&ViewKey::key("high"), Rect::new(0, 0, 1, 1), b.mask(), &[Button::Left]);
        b.merge_claims(layer);
        assert!(b.check_mouse(&ViewKey::key("high"), &MouseEvent::down(Point::zero())));
        assert!(b.check_mouse(&ViewKey::key("low"), &MouseEvent::down(Point { x: 1, y: 0 })));
    }

    #[test]
    fn fill_visits_only_the_visible_region() {
        let mut b = buffer(4, 3);
        let tall = b.viewport().child_at(PointI32::new(1, -1000), Expanse::new(2, 1 << 20));
        b.push(tall, |b| b.fill(Rect::new(0, 0, 2, 1 << 20), '#', Style::default()));
        BufTest::new(b.grid()).assert_matches(buf![
            "X##X"
            "X##X"
            "X##X"
        ]);

        let hidden = b.viewport().child(Rect::new(10, 10, 5, 5));
        b.push(hidden, |b| b.fill(Rect::new(0, 0, 5, 5), '!', Style::default()));
        assert!(!b.grid().lines().iter().any(|l| l.contains('!')));
    }

    #[test]
    fn restyle_is_masked() {
        let mut b = buffer(3, 1);
        b.fill(Rect::new(0, 0, 3, 1), '-', Style::default());
        let mask = b.viewport().child(Rect::new(1, 0, 1, 1)).mask();
        b.restyle(Rect::new(0, 0, 3, 1), mask, |s| s.attrs.reverse = true);
        let rev = |x| b.grid().get(Point { x, y: 0 }).is_some_and(|c| c.style.attrs.reverse);
        assert!(!rev(0));
        assert!(rev(1));
        assert!(!rev(2));
    }
}
