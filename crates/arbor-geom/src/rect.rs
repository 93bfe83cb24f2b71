use super::{Error, Expanse, Point, Result};

/// An unsigned rectangle in screen space.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Rect {
    /// Top-left corner.
    pub tl: Point,
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

impl Rect {
    /// Construct a rectangle from coordinates and size.
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            tl: Point { x, y },
            w,
            h,
        }
    }

    /// The zero-sized rectangle at the origin.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Does this rect have a zero size?
    pub fn is_zero(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// The size of this rectangle.
    pub fn expanse(&self) -> Expanse {
        Expanse::new(self.w, self.h)
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.tl.x.saturating_add(self.w)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.tl.y.saturating_add(self.h)
    }

    /// Does this rectangle contain the point?
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.tl.x && p.x < self.right() && p.y >= self.tl.y && p.y < self.bottom()
    }

    /// Does this rectangle completely enclose the other? Zero-sized rectangles
    /// are enclosed if their origin lies within or on the edge of self.
    pub fn contains_rect(&self, other: &Self) -> bool {
        other.tl.x >= self.tl.x
            && other.tl.y >= self.tl.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// The intersection of two rectangles, if they overlap.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let left = self.tl.x.max(other.tl.x);
        let top = self.tl.y.max(other.tl.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            None
        } else {
            Some(Self::new(left, top, right - left, bottom - top))
        }
    }

    /// Extracts an inner rectangle, given a border width.
    pub fn inner(&self, border: u32) -> Result<Self> {
        if self.w < (border * 2) || self.h < (border * 2) {
            return Err(Error::Geometry("rectangle too small".into()));
        }
        Ok(Self {
            tl: Point {
                x: self.tl.x + border,
                y: self.tl.y + border,
            },
            w: self.w - (border * 2),
            h: self.h - (border * 2),
        })
    }
}

impl From<Expanse> for Rect {
    fn from(e: Expanse) -> Self {
        e.rect()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn inner() -> Result<()> {
        let r = Rect::new(0, 0, 10, 10);
        assert_eq!(r.inner(1)?, Rect::new(1, 1, 8, 8));
        assert!(Rect::new(0, 0, 1, 10).inner(1).is_err());
        Ok(())
    }

    #[test]
    fn contains() {
        let r = Rect::new(10, 10, 10, 10);
        assert!(r.contains_point(Point { x: 10, y: 10 }));
        assert!(!r.contains_point(Point { x: 9, y: 10 }));
        assert!(!r.contains_point(Point { x: 20, y: 20 }));
        assert!(r.contains_point(Point { x: 19, y: 19 }));
        assert!(!r.contains_point(Point { x: 20, y: 21 }));

        assert!(r.contains_rect(&Rect::new(10, 10, 10, 10)));
        assert!(r.contains_rect(&Rect::new(12, 12, 2, 2)));
        assert!(!r.contains_rect(&Rect::new(12, 12, 10, 2)));
    }

    #[test]
    fn intersect() {
        let a = Rect::new(0, 0, 10, 10);
        assert_eq!(
            a.intersect(&Rect::new(5, 5, 10, 10)),
            Some(Rect::new(5, 5, 5, 5))
        );
        assert_eq!(a.intersect(&Rect::new(10, 0, 3, 3)), None);
        assert_eq!(a.intersect(&Rect::new(2, 2, 0, 3)), None);
    }

    proptest! {
        #[test]
        fn intersection_is_contained(
            ax in 0u32..50, ay in 0u32..50, aw in 0u32..50, ah in 0u32..50,
            bx in 0u32..50, by in 0u32..50, bw in 0u32..50, bh in 0u32..50,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            if let Some(i) = a.intersect(&b) {
                prop_assert!(a.contains_rect(&i));
                prop_assert!(b.contains_rect(&i));
                prop_assert_eq!(b.intersect(&a), Some(i));
            }
        }
    }
}
