//! Geometry primitives used across arbor.
//!
//! Screen space is unsigned: cells live at non-negative coordinates. Layout
//! space is signed, because a child can be placed partly above or to the left
//! of the visible screen (for instance inside a scrolled region). The
//! `*I32` types cover the signed case and convert back to unsigned values by
//! intersecting with an unsigned rectangle.

#![warn(missing_docs)]

/// Error types for geometry operations.
mod error;
/// Width/height size type.
mod expanse;
/// Frame and border helpers.
mod frame;
/// Point helpers.
mod point;
/// Signed point helpers.
mod point_i32;
/// Rectangle operations.
mod rect;
/// Signed rectangle operations.
mod rect_i32;

pub use error::{Error, Result};
pub use expanse::Expanse;
pub use frame::Frame;
pub use point::Point;
pub use point_i32::PointI32;
pub use rect::Rect;
pub use rect_i32::RectI32;
