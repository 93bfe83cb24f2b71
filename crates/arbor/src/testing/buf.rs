//! Utilities for working with TermBufs in tests.
use crate::{buffer::TermBuf, geom::Point, style::Style, text};

/// A helper macro to create buffers for the termbuf match assertions.
#[macro_export]
macro_rules! buf {
    ($($line:literal)*) => {
        &[$($line),*]
    };
}

/// Assertions over a grid. By default 'X' in an expected pattern stands for
/// an empty (never written) cell, which lets tests check partial renders.
pub struct BufTest<'a> {
    /// Reference to the buffer under test.
    buf: &'a TermBuf,
    /// Character used to represent NULL cells.
    null_char: char,
    /// Optional wildcard character.
    any_char: Option<char>,
}

impl<'a> BufTest<'a> {
    /// Create a new BufTest with a reference to a TermBuf.
    pub fn new(buf: &'a TermBuf) -> Self {
        Self {
            buf,
            null_char: 'X',
            any_char: None,
        }
    }

    /// Set the character used to match NULL cells in the buffer.
    pub fn with_null(mut self, null_char: char) -> Self {
        self.null_char = null_char;
        self
    }

    /// Set a character that matches any glyph in the buffer.
    pub fn with_any(mut self, any_char: char) -> Self {
        self.any_char = Some(any_char);
        self
    }

    /// The rows of the grid, rendered with this test's null marker.
    pub fn lines(&self) -> Vec<String> {
        self.buf.lines_with(self.null_char)
    }

    /// Returns true if the buffer content matches the expected lines.
    /// Trailing whitespace on each line is ignored.
    pub fn matches(&self, expected: &[&str]) -> bool {
        let actual = self.lines();
        if expected.len() != actual.len() {
            return false;
        }
        expected.iter().zip(actual.iter()).all(|(e, a)| {
            let e: Vec<char> = e.trim_end().chars().collect();
            let a: Vec<char> = a.trim_end().chars().collect();
            e.len() == a.len()
                && e
                    .iter()
                    .zip(a.iter())
                    .all(|(ec, ac)| Some(*ec) == self.any_char || ec == ac)
        })
    }

    /// Assert that the buffer matches the expected lines with pretty printed output on failure.
    pub fn assert_matches(&self, expected: &[&str]) {
        if self.matches(expected) {
            return;
        }
        let width = expected
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(10)
            .max(self.buf.size().w as usize);

        println!("\nExpected:");
        println!("┌{}┐", "─".repeat(width));
        for line in expected {
            println!("│{line:width$}│");
        }
        println!("└{}┘", "─".repeat(width));

        println!("\nActual:");
        println!("┌{}┐", "─".repeat(width));
        for line in self.lines() {
            println!("│{line:width$}│");
        }
        println!("└{}┘", "─".repeat(width));

        panic!("Buffer contents did not match expected pattern");
    }

    /// Does the buffer contain the supplied substring?
    pub fn contains_text(&self, txt: &str) -> bool {
        self.buf.lines().iter().any(|l| l.contains(txt))
    }

    /// The style of the first cell of the first occurrence of `txt`.
    pub fn style_of(&self, txt: &str) -> Option<Style> {
        self.buf.lines().iter().enumerate().find_map(|(y, l)| {
            let idx = l.find(txt)?;
            let x = text::width(&l[..idx]) as u32;
            self.buf.get(Point { x, y: y as u32 }).map(|c| c.style)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geom::Expanse,
        style::{Color, Style},
    };

    #[test]
    fn matching() {
        let mut tb = TermBuf::empty(Expanse::new(4, 2));
        tb.text(Style::default(), Point::zero(), "ab");
        tb.text(Style::fg(Color::Red), Point { x: 1, y: 1 }, "cd");
        let t = BufTest::new(&tb);
        assert!(t.matches(buf!["abXX" "XcdX"]));
        assert!(!t.matches(buf!["abXX"]));
        assert!(t.with_any('?').matches(buf!["a?XX" "X??X"]));
        assert!(BufTest::new(&tb).with_null('.').matches(buf!["ab.." ".cd."]));

        let t = BufTest::new(&tb);
        assert!(t.contains_text("cd"));
        assert!(!t.contains_text("ac"));
        assert_eq!(t.style_of("cd"), Some(Style::fg(Color::Red)));
    }
}
