//! Display-width helpers shared by the grid and the text leaves.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Return the display width of a grapheme cluster, clamped to terminal cell widths.
pub fn grapheme_width(grapheme: &str) -> usize {
    if grapheme.is_empty() {
        return 0;
    }
    UnicodeWidthStr::width(grapheme).clamp(1, 2)
}

/// Display width of a string in terminal columns.
pub fn width(s: &str) -> usize {
    s.graphemes(true).map(grapheme_width).sum()
}

/// Truncate a string to at most `max` display columns.
pub fn truncate(s: &str, max: usize) -> &str {
    let mut cols = 0;
    for (idx, g) in s.grapheme_indices(true) {
        let w = grapheme_width(g);
        if cols + w > max {
            return &s[..idx];
        }
        cols += w;
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths() {
        assert_eq!(width("abc"), 3);
        assert_eq!(width("日本"), 4);
        assert_eq!(width("e\u{301}"), 1);
        assert_eq!(width(""), 0);
    }

    #[test]
    fn truncation() {
        assert_eq!(truncate("hello", 3), "hel");
        assert_eq!(truncate("日本語", 3), "日");
        assert_eq!(truncate("hi", 10), "hi");
        assert_eq!(truncate("hi", 0), "");
    }
}
