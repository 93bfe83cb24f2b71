use super::{Point, Rect};

/// An `Expanse` is a rectangle that has a width and height but no location.
/// This is useful when we want to deal with `Rect`s abstractly, or when we want
/// to mandate that the location of a `Rect` is (0, 0).
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Expanse {
    /// Width in cells.
    pub w: u32,
    /// Height in cells.
    pub h: u32,
}

impl Expanse {
    /// Construct an expanse from a width and height.
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    /// The area of this expanse.
    pub fn area(&self) -> u32 {
        self.w * self.h
    }

    /// Is either dimension zero?
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Return a `Rect` with the same dimensions as the `Expanse`, but a location at (0, 0).
    pub fn rect(&self) -> Rect {
        Rect {
            tl: Point::default(),
            w: self.w,
            h: self.h,
        }
    }

    /// Component-wise minimum.
    pub fn min(&self, other: Self) -> Self {
        Self {
            w: self.w.min(other.w),
            h: self.h.min(other.h),
        }
    }

    /// Component-wise maximum.
    pub fn max(&self, other: Self) -> Self {
        Self {
            w: self.w.max(other.w),
            h: self.h.max(other.h),
        }
    }

    /// Shrink by the given amounts, saturating at zero.
    pub fn shrink(&self, w: u32, h: u32) -> Self {
        Self {
            w: self.w.saturating_sub(w),
            h: self.h.saturating_sub(h),
        }
    }

    /// Grow by the given amounts, saturating at `u32::MAX`.
    pub fn grow(&self, w: u32, h: u32) -> Self {
        Self {
            w: self.w.saturating_add(w),
            h: self.h.saturating_add(h),
        }
    }
}

impl From<Rect> for Expanse {
    fn from(r: Rect) -> Self {
        Self { w: r.w, h: r.h }
    }
}

impl From<(u32, u32)> for Expanse {
    fn from(v: (u32, u32)) -> Self {
        Self { w: v.0, h: v.1 }
    }
}
