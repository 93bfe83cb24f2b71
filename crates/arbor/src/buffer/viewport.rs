use crate::geom::{Expanse, Point, PointI32, Rect, RectI32};

/// An opaque snapshot of a clip region, in absolute screen coordinates.
///
/// Decorators capture the mask before rendering a child so that later
/// painting and mouse claims stay within what the child was allowed to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Mask(Option<Rect>);

impl Mask {
    /// A mask that admits nothing.
    pub fn none() -> Self {
        Self(None)
    }

    /// Does the mask admit an absolute point?
    pub fn contains(&self, p: Point) -> bool {
        self.0.is_some_and(|r| r.contains_point(p))
    }

    /// Restrict an absolute rectangle to the mask.
    pub fn clip(&self, r: Rect) -> Option<Rect> {
        self.0.and_then(|m| m.intersect(&r))
    }
}

/// A node's assigned region: an absolute rectangle, which may lie partly or
/// entirely off-screen, plus the visible part of it after all ancestor clips.
/// Coordinates handed to a node are local to `rect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Absolute rectangle in screen coordinates.
    pub rect: RectI32,
    /// The visible portion of `rect`, in screen coordinates.
    pub visible: Option<Rect>,
}

impl Viewport {
    /// The viewport covering a whole screen.
    pub fn screen(size: Expanse) -> Self {
        Self {
            rect: RectI32::sized(size),
            visible: (!size.is_empty()).then(|| size.rect()),
        }
    }

    /// The size of the assigned region.
    pub fn size(&self) -> Expanse {
        self.rect.expanse()
    }

    /// The assigned region in local coordinates.
    pub fn local(&self) -> Rect {
        self.size().rect()
    }

    /// A child viewport at a local rectangle, clipped by this viewport.
    pub fn child(&self, local: Rect) -> Self {
        self.child_at(PointI32::from(local.tl), local.expanse())
    }

    /// A child viewport at a signed local offset. The child may extend past
    /// this viewport on any side; only the overlap stays visible.
    pub fn child_at(&self, offset: PointI32, size: Expanse) -> Self {
        let rect = RectI32 {
            tl: self.rect.tl + offset,
            w: size.w,
            h: size.h,
        };
        let visible = self.visible.and_then(|v| rect.intersect_rect(v));
        Self { rect, visible }
    }

    /// Translate a local point to screen coordinates if it is visible.
    pub fn to_screen(&self, p: Point) -> Option<Point> {
        let abs = (self.rect.tl + PointI32::from(p)).to_point()?;
        self.visible
            .is_some_and(|v| v.contains_point(abs))
            .then_some(abs)
    }

    /// Translate a screen point to local coordinates, if it falls within the
    /// visible region.
    pub fn to_local(&self, p: Point) -> Option<Point> {
        if !self.visible.is_some_and(|v| v.contains_point(p)) {
            return None;
        }
        let local = PointI32::from(p) - self.rect.tl;
        local.to_point()
    }

    /// Translate a local rectangle to screen coordinates, clipped to the
    /// visible region.
    pub fn rect_to_screen(&self, local: Rect) -> Option<Rect> {
        let abs = RectI32 {
            tl: self.rect.tl + PointI32::from(local.tl),
            w: local.w,
            h: local.h,
        };
        self.visible.and_then(|v| abs.intersect_rect(v))
    }

    /// The visible region in local coordinates.
    pub fn visible_local(&self) -> Option<Rect> {
        let v = self.visible?;
        let tl = (PointI32::from(v.tl) - self.rect.tl).to_point()?;
        Some(Rect { tl, w: v.w, h: v.h })
    }

    /// The clip snapshot for this viewport.
    pub fn mask(&self) -> Mask {
        Mask(self.visible)
    }
}
