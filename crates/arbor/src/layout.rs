//! Size negotiation.
//!
//! Nodes report a natural size through `measure` and may carry declarative
//! [`Dimension`] hints. Hints are resolved only at render time, against the
//! concrete size of the parent. List combinators split their main axis with
//! [`allocate`]: hinted and measured children first, then the leftover is
//! divided among weighted children by [`distribute`].

use std::{fmt, rc::Rc};

use crate::geom::{Expanse, Rect};

/// A layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Left to right.
    Horizontal,
    /// Top to bottom.
    Vertical,
}

impl Axis {
    /// The extent of a size along this axis.
    pub fn of(self, e: Expanse) -> u32 {
        match self {
            Self::Horizontal => e.w,
            Self::Vertical => e.h,
        }
    }

    /// The perpendicular axis.
    pub fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Build a size from main and cross extents.
    pub fn expanse(self, main: u32, cross: u32) -> Expanse {
        match self {
            Self::Horizontal => Expanse::new(main, cross),
            Self::Vertical => Expanse::new(cross, main),
        }
    }

    /// Build a rectangle from main and cross offsets and extents.
    pub fn rect(self, main_off: u32, cross_off: u32, main: u32, cross: u32) -> Rect {
        match self {
            Self::Horizontal => Rect::new(main_off, cross_off, main, cross),
            Self::Vertical => Rect::new(cross_off, main_off, cross, main),
        }
    }
}

/// A declarative size along one axis.
#[derive(Clone)]
pub enum Dimension {
    /// An absolute number of cells.
    Fixed(u32),
    /// A percentage of the parent.
    Percent(u32),
    /// All of the parent.
    Max,
    /// The largest candidate that fits the parent, or the parent size when
    /// none fits.
    Largest(Vec<u32>),
    /// A function of the parent size and the axis.
    Func(Rc<dyn Fn(u32, Axis) -> u32>),
}

impl Dimension {
    /// Construct a function dimension.
    pub fn func(f: impl Fn(u32, Axis) -> u32 + 'static) -> Self {
        Self::Func(Rc::new(f))
    }

    /// Resolve against a concrete parent extent. The result never exceeds the
    /// parent.
    pub fn resolve(&self, parent: u32, axis: Axis) -> u32 {
        match self {
            Self::Fixed(n) => (*n).min(parent),
            Self::Percent(p) => (u64::from(parent) * u64::from((*p).min(100)) / 100) as u32,
            Self::Max => parent,
            Self::Largest(candidates) => candidates
                .iter()
                .copied()
                .filter(|c| *c <= parent)
                .max()
                .unwrap_or(parent),
            Self::Func(f) => f(parent, axis).min(parent),
        }
    }

    /// Grow a fixed dimension by a constant. Other variants are relative to
    /// the parent and unchanged.
    pub(crate) fn grown(&self, by: u32) -> Self {
        match self {
            Self::Fixed(n) => Self::Fixed(n.saturating_add(by)),
            other => other.clone(),
        }
    }
}

impl fmt::Debug for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(n) => write!(f, "Fixed({n})"),
            Self::Percent(p) => write!(f, "Percent({p})"),
            Self::Max => f.write_str("Max"),
            Self::Largest(c) => write!(f, "Largest({c:?})"),
            Self::Func(_) => f.write_str("Func(..)"),
        }
    }
}

impl From<u32> for Dimension {
    fn from(n: u32) -> Self {
        Self::Fixed(n)
    }
}

/// Optional size hints for both axes. An absent axis defers to the node's
/// measured content size.
#[derive(Debug, Clone, Default)]
pub struct DesiredSize {
    /// Width hint.
    pub width: Option<Dimension>,
    /// Height hint.
    pub height: Option<Dimension>,
}

impl DesiredSize {
    /// The hint on an axis.
    pub fn on(&self, axis: Axis) -> Option<&Dimension> {
        match axis {
            Axis::Horizontal => self.width.as_ref(),
            Axis::Vertical => self.height.as_ref(),
        }
    }

    /// Overlay another set of hints on this one; hints in `outer` win.
    pub fn overlay(self, outer: &Self) -> Self {
        Self {
            width: outer.width.clone().or(self.width),
            height: outer.height.clone().or(self.height),
        }
    }

    /// Resolve against a parent size, falling back to `content` on axes with
    /// no hint.
    pub fn resolve(&self, parent: Expanse, content: Expanse) -> Expanse {
        let w = self
            .width
            .as_ref()
            .map_or(content.w.min(parent.w), |d| d.resolve(parent.w, Axis::Horizontal));
        let h = self
            .height
            .as_ref()
            .map_or(content.h.min(parent.h), |d| d.resolve(parent.h, Axis::Vertical));
        Expanse::new(w, h)
    }
}

/// Alignment along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Left or top.
    #[default]
    Start,
    /// Centered, rounding toward the start.
    Center,
    /// Right or bottom.
    End,
}

impl Align {
    /// Offset of an item of size `item` within `space`.
    pub fn offset(self, space: u32, item: u32) -> u32 {
        let slack = space.saturating_sub(item);
        match self {
            Self::Start => 0,
            Self::Center => slack / 2,
            Self::End => slack,
        }
    }
}

/// Insets on each side of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Edges {
    /// Top inset.
    pub top: u32,
    /// Right inset.
    pub right: u32,
    /// Bottom inset.
    pub bottom: u32,
    /// Left inset.
    pub left: u32,
}

impl Edges {
    /// The same inset on every side.
    pub fn all(n: u32) -> Self {
        Self {
            top: n,
            right: n,
            bottom: n,
            left: n,
        }
    }

    /// Vertical and horizontal insets.
    pub fn symmetric(vertical: u32, horizontal: u32) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Sum of left and right insets.
    pub fn horizontal(&self) -> u32 {
        self.left.saturating_add(self.right)
    }

    /// Sum of top and bottom insets.
    pub fn vertical(&self) -> u32 {
        self.top.saturating_add(self.bottom)
    }

    /// Total inset along an axis.
    pub fn along(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.horizontal(),
            Axis::Vertical => self.vertical(),
        }
    }

    /// Shrink a size by these insets.
    pub fn shrink(&self, e: Expanse) -> Expanse {
        Expanse::new(
            e.w.saturating_sub(self.horizontal()),
            e.h.saturating_sub(self.vertical()),
        )
    }

    /// Grow a size by these insets.
    pub fn grow(&self, e: Expanse) -> Expanse {
        Expanse::new(
            e.w.saturating_add(self.horizontal()),
            e.h.saturating_add(self.vertical()),
        )
    }

    /// The rectangle left inside `r` after applying the insets. Insets that do
    /// not fit collapse the result to zero size.
    pub fn inset(&self, r: Rect) -> Rect {
        let x = r.tl.x.saturating_add(self.left.min(r.w));
        let y = r.tl.y.saturating_add(self.top.min(r.h));
        let size = self.shrink(r.expanse());
        Rect::new(x, y, size.w, size.h)
    }
}

impl From<u32> for Edges {
    fn from(n: u32) -> Self {
        Self::all(n)
    }
}

/// Split `total` among `weights` in proportion. Shares are truncated, then
/// the remainder is handed out one cell at a time to weighted entries in
/// ascending weight order, ties broken by position. The result always sums
/// to `total` unless there are no entries. When every weight is zero the
/// split is even.
pub fn distribute(total: u32, weights: &[u32]) -> Vec<u32> {
    if weights.is_empty() {
        return vec![];
    }
    let weights: Vec<u64> = if weights.iter().all(|w| *w == 0) {
        vec![1; weights.len()]
    } else {
        weights.iter().map(|w| u64::from(*w)).collect()
    };
    let sum: u64 = weights.iter().sum();
    let mut sizes: Vec<u32> = weights
        .iter()
        .map(|w| (u64::from(total) * w / sum) as u32)
        .collect();

    let mut order: Vec<usize> = (0..weights.len()).filter(|i| weights[*i] > 0).collect();
    order.sort_by_key(|i| (weights[*i], *i));

    let mut remainder = total - sizes.iter().sum::<u32>();
    for i in order.iter().cycle() {
        if remainder == 0 {
            break;
        }
        sizes[*i] += 1;
        remainder -= 1;
    }
    sizes
}

/// How a child of a list combinator claims space along the main axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// A resolved fixed extent.
    Fixed(u32),
    /// A share of the leftover, by weight.
    Weighted(u32),
}

/// Allocate a main-axis extent among slots. Fixed slots are granted in order
/// against the shrinking remainder; weighted slots split what is left
/// exactly.
pub fn allocate(total: u32, slots: &[Slot]) -> Vec<u32> {
    let mut remaining = total;
    let mut sizes: Vec<u32> = slots
        .iter()
        .map(|s| match s {
            Slot::Fixed(n) => {
                let n = (*n).min(remaining);
                remaining -= n;
                n
            }
            Slot::Weighted(_) => 0,
        })
        .collect();

    let weighted: Vec<(usize, u32)> = slots
        .iter()
        .enumerate()
        .filter_map(|(i, s)| match s {
            Slot::Weighted(w) => Some((i, *w)),
            Slot::Fixed(_) => None,
        })
        .collect();
    let weights: Vec<u32> = weighted.iter().map(|(_, w)| *w).collect();
    for ((i, _), size) in weighted.iter().zip(distribute(remaining, &weights)) {
        sizes[*i] = size;
    }
    sizes
}
