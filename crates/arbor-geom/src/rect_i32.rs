use super::{Expanse, PointI32, Rect};

/// A rectangle with a signed origin and unsigned size.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct RectI32 {
    /// Top-left corner.
    pub tl: PointI32,
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

impl RectI32 {
    /// Construct a rectangle from coordinates and size.
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self {
            tl: PointI32 { x, y },
            w,
            h,
        }
    }

    /// A rectangle of the given size at the origin.
    pub fn sized(e: Expanse) -> Self {
        Self::new(0, 0, e.w, e.h)
    }

    /// The size of this rectangle.
    pub fn expanse(&self) -> Expanse {
        Expanse::new(self.w, self.h)
    }

    /// Edges as 64-bit values: left, top, exclusive right, exclusive bottom.
    fn edges(&self) -> (i64, i64, i64, i64) {
        let l = self.tl.x as i64;
        let t = self.tl.y as i64;
        (l, t, l + self.w as i64, t + self.h as i64)
    }

    /// Intersect this signed rect with an unsigned rect in the same coordinate space.
    pub fn intersect_rect(&self, other: Rect) -> Option<Rect> {
        let (left, top, right, bottom) = self.edges();

        let other_left = other.tl.x as i64;
        let other_top = other.tl.y as i64;
        let other_right = other_left + other.w as i64;
        let other_bottom = other_top + other.h as i64;

        let inter_left = left.max(other_left);
        let inter_top = top.max(other_top);
        let inter_right = right.min(other_right);
        let inter_bottom = bottom.min(other_bottom);

        if inter_right <= inter_left || inter_bottom <= inter_top {
            return None;
        }

        Some(Rect::new(
            inter_left as u32,
            inter_top as u32,
            (inter_right - inter_left) as u32,
            (inter_bottom - inter_top) as u32,
        ))
    }
}
