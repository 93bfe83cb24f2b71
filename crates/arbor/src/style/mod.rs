//! Cell styling.

/// Color values.
mod color;

pub use color::Color;

/// A text attribute.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Attr {
    /// Bold text.
    Bold,
    /// Crossed out text.
    CrossedOut,
    /// Dim text.
    Dim,
    /// Italic text.
    Italic,
    /// Reversed foreground and background.
    Reverse,
    /// Underlined text.
    Underline,
}

/// A set of active text attributes.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Hash)]
pub struct AttrSet {
    /// Bold flag.
    pub bold: bool,
    /// Crossed out flag.
    pub crossedout: bool,
    /// Dim flag.
    pub dim: bool,
    /// Italic flag.
    pub italic: bool,
    /// Reverse flag.
    pub reverse: bool,
    /// Underline flag.
    pub underline: bool,
}

impl AttrSet {
    /// Construct a set of text attributes with a single attribute turned on.
    pub fn new(attr: Attr) -> Self {
        Self::default().with(attr)
    }

    /// Is this attribute set empty?
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// A helper for progressive construction of attribute sets.
    pub fn with(mut self, attr: Attr) -> Self {
        match attr {
            Attr::Bold => self.bold = true,
            Attr::Dim => self.dim = true,
            Attr::Italic => self.italic = true,
            Attr::CrossedOut => self.crossedout = true,
            Attr::Reverse => self.reverse = true,
            Attr::Underline => self.underline = true,
        };
        self
    }

    /// Toggle a single attribute.
    pub fn toggle(mut self, attr: Attr) -> Self {
        let flag = match attr {
            Attr::Bold => &mut self.bold,
            Attr::Dim => &mut self.dim,
            Attr::Italic => &mut self.italic,
            Attr::CrossedOut => &mut self.crossedout,
            Attr::Reverse => &mut self.reverse,
            Attr::Underline => &mut self.underline,
        };
        *flag = !*flag;
        self
    }
}

/// A complete cell style.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Hash)]
pub struct Style {
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Text attributes.
    pub attrs: AttrSet,
}

impl Style {
    /// A style with the given foreground and the default background.
    pub fn fg(fg: Color) -> Self {
        Self {
            fg,
            ..Self::default()
        }
    }

    /// A style with the given background and the default foreground.
    pub fn bg(bg: Color) -> Self {
        Self {
            bg,
            ..Self::default()
        }
    }

    /// Replace the foreground color.
    pub fn with_fg(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    /// Replace the background color.
    pub fn with_bg(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }

    /// Add an attribute.
    pub fn with_attr(mut self, attr: Attr) -> Self {
        self.attrs = self.attrs.with(attr);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attrs() {
        let a = AttrSet::new(Attr::Bold).with(Attr::Reverse);
        assert!(a.bold && a.reverse && !a.italic);
        assert!(!a.is_empty());
        assert!(AttrSet::default().is_empty());
        assert!(!a.toggle(Attr::Reverse).reverse);
    }

    #[test]
    fn builders() {
        let s = Style::fg(Color::Red)
            .with_bg(Color::Blue)
            .with_attr(Attr::Underline);
        assert_eq!(s.fg, Color::Red);
        assert_eq!(s.bg, Color::Blue);
        assert!(s.attrs.underline);
    }
}
