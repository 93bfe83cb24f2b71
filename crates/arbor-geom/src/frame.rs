use super::Rect;

/// A frame extracted from a rectangle.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Frame {
    /// The top of the frame, not including corners.
    pub top: Rect,
    /// The bottom of the frame, not including corners.
    pub bottom: Rect,
    /// The left of the frame, not including corners.
    pub left: Rect,
    /// The right of the frame, not including corners.
    pub right: Rect,
    /// The top left corner.
    pub topleft: Rect,
    /// The top right corner.
    pub topright: Rect,
    /// The bottom left corner.
    pub bottomleft: Rect,
    /// The bottom right corner.
    pub bottomright: Rect,
    /// The original outer rect.
    outer_rect: Rect,
    /// The border width.
    border: u32,
}

impl Frame {
    /// Construct a new frame. If the rect is too small to fit the specified
    /// frame, we return a zero Frame.
    pub fn new(rect: Rect, border: u32) -> Self {
        if rect.w < (border * 2) || rect.h < (border * 2) {
            Self {
                outer_rect: rect,
                border,
                ..Self::default()
            }
        } else {
            Self {
                top: Rect::new(rect.tl.x + border, rect.tl.y, rect.w - 2 * border, border),
                bottom: Rect::new(
                    rect.tl.x + border,
                    rect.tl.y + rect.h - border,
                    rect.w - 2 * border,
                    border,
                ),
                left: Rect::new(rect.tl.x, rect.tl.y + border, border, rect.h - 2 * border),
                right: Rect::new(
                    rect.tl.x + rect.w - border,
                    rect.tl.y + border,
                    border,
                    rect.h - 2 * border,
                ),
                topleft: Rect::new(rect.tl.x, rect.tl.y, border, border),
                topright: Rect::new(rect.tl.x + rect.w - border, rect.tl.y, border, border),
                bottomleft: Rect::new(rect.tl.x, rect.tl.y + rect.h - border, border, border),
                bottomright: Rect::new(
                    rect.tl.x + rect.w - border,
                    rect.tl.y + rect.h - border,
                    border,
                    border,
                ),
                outer_rect: rect,
                border,
            }
        }
    }

    /// Get the inner rect of the frame (the space inside the frame).
    pub fn inner(&self) -> Rect {
        self.outer_rect.inner(self.border).unwrap_or_default()
    }
}
