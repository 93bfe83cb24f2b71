use unicode_segmentation::UnicodeSegmentation;

use crate::{
    backend::RenderBackend,
    error::Result,
    geom::{Expanse, Point, Rect},
    style::Style,
    text,
};

/// NULL character constant.
const NULL: char = '\0';

/// A terminal cell with glyph and style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Base glyph character.
    pub ch: char,
    /// Additional grapheme characters stored with the base glyph.
    pub suffix: String,
    /// Style applied to the cell.
    pub style: Style,
    /// True when this cell continues a wide glyph from the previous column.
    pub continuation: bool,
}

impl Cell {
    /// Construct a cell containing a single glyph.
    fn new(ch: char, style: Style) -> Self {
        Self {
            ch,
            suffix: String::new(),
            style,
            continuation: false,
        }
    }

    /// Construct an empty cell.
    fn empty() -> Self {
        Self::new(NULL, Style::default())
    }

    /// Return true when nothing has been written to the cell.
    pub fn is_empty(&self) -> bool {
        self.ch == NULL && self.suffix.is_empty() && !self.continuation
    }

    /// Return true when the cell shows no glyph: empty or a plain space.
    pub fn is_blank(&self) -> bool {
        self.is_empty() || (self.ch == ' ' && self.suffix.is_empty() && !self.continuation)
    }

    /// The glyph shown in this cell, for tests and debugging.
    pub fn glyph(&self) -> String {
        if self.continuation {
            return String::new();
        }
        let mut s = String::new();
        self.push_text(&mut s);
        s
    }

    /// Append this cell's renderable text to the output buffer.
    fn push_text(&self, out: &mut String) {
        if self.continuation {
            return;
        }
        if self.is_empty() {
            out.push(' ');
            return;
        }
        out.push(self.ch);
        out.push_str(&self.suffix);
    }
}

/// A dense 2D grid of styled cells. Every frame renders into a fresh one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TermBuf {
    /// Buffer size in cells.
    size: Expanse,
    /// Backing cell storage, row-major.
    cells: Vec<Cell>,
}

impl TermBuf {
    /// Create a buffer of empty cells.
    pub fn empty(size: impl Into<Expanse>) -> Self {
        let size = size.into();
        Self {
            size,
            cells: vec![Cell::empty(); size.area() as usize],
        }
    }

    /// Create a buffer filled with the given character and style.
    pub fn filled(size: impl Into<Expanse>, ch: char, style: Style) -> Self {
        let size = size.into();
        Self {
            size,
            cells: vec![Cell::new(ch, style); size.area() as usize],
        }
    }

    /// Return the buffer size.
    pub fn size(&self) -> Expanse {
        self.size
    }

    /// Return the buffer bounds as a rectangle.
    pub fn rect(&self) -> Rect {
        self.size.rect()
    }

    /// Convert a point into a cell index.
    fn idx(&self, p: Point) -> Option<usize> {
        if self.rect().contains_point(p) {
            Some(p.y as usize * self.size.w as usize + p.x as usize)
        } else {
            None
        }
    }

    /// Get a cell by position.
    pub fn get(&self, p: Point) -> Option<&Cell> {
        self.idx(p).map(|i| &self.cells[i])
    }

    /// Get a mutable cell by position.
    pub(crate) fn get_mut(&mut self, p: Point) -> Option<&mut Cell> {
        self.idx(p).map(|i| &mut self.cells[i])
    }

    /// Write a single character at a point.
    pub fn put(&mut self, p: Point, ch: char, style: Style) {
        if let Some(i) = self.idx(p) {
            self.cells[i] = Cell::new(ch, style);
        }
    }

    /// Write a grapheme cluster at a point.
    pub(crate) fn put_grapheme(&mut self, p: Point, grapheme: &str, style: Style) {
        if let Some(i) = self.idx(p) {
            let mut chars = grapheme.chars();
            let ch = chars.next().unwrap_or(' ');
            self.cells[i] = Cell {
                ch,
                suffix: chars.collect(),
                style,
                continuation: false,
            };
        }
    }

    /// Write a continuation cell for a wide glyph.
    pub(crate) fn put_continuation(&mut self, p: Point, style: Style) {
        if let Some(i) = self.idx(p) {
            self.cells[i] = Cell {
                continuation: true,
                ..Cell::new(NULL, style)
            };
        }
    }

    /// Fill a rectangle with a glyph and style.
    pub fn fill(&mut self, style: Style, r: Rect, ch: char) {
        if let Some(isec) = self.rect().intersect(&r) {
            for y in isec.tl.y..isec.bottom() {
                for x in isec.tl.x..isec.right() {
                    self.put(Point { x, y }, ch, style);
                }
            }
        }
    }

    /// Draw a line of text starting at a point, clipped to the buffer. Returns
    /// the number of columns drawn.
    pub fn text(&mut self, style: Style, at: Point, txt: &str) -> u32 {
        let mut x = at.x;
        for grapheme in txt.graphemes(true) {
            let width = text::grapheme_width(grapheme) as u32;
            if width == 0 {
                continue;
            }
            if x.saturating_add(width) > self.size.w {
                break;
            }
            self.put_grapheme(Point { x, y: at.y }, grapheme, style);
            for i in 1..width {
                self.put_continuation(Point { x: x + i, y: at.y }, style);
            }
            x += width;
        }
        x - at.x
    }

    /// The rows of the buffer as strings, with empty cells shown as `null`.
    pub fn lines_with(&self, null: char) -> Vec<String> {
        (0..self.size.h)
            .map(|y| {
                let mut line = String::new();
                for x in 0..self.size.w {
                    if let Some(cell) = self.get(Point { x, y }) {
                        if cell.continuation {
                            continue;
                        }
                        if cell.is_empty() {
                            line.push(null);
                        } else {
                            line.push(cell.ch);
                            line.push_str(&cell.suffix);
                        }
                    }
                }
                line
            })
            .collect()
    }

    /// The rows of the buffer as strings, with empty cells shown as spaces.
    pub fn lines(&self) -> Vec<String> {
        self.lines_with(' ')
    }

    /// Diff this terminal buffer against a previous state, emitting changed
    /// runs to the provided render backend.
    pub fn diff<R: RenderBackend>(&self, prev: &Self, backend: &mut R) -> Result<()> {
        if self.size != prev.size {
            return self.render(backend);
        }
        let width = self.size.w as usize;
        let mut wrote = false;
        for y in 0..self.size.h {
            let row_start = y as usize * width;
            let current_row = &self.cells[row_start..row_start + width];
            let prev_row = &prev.cells[row_start..row_start + width];
            if current_row == prev_row {
                continue;
            }

            let mut x = 0usize;
            while x < width {
                if current_row[x] == prev_row[x] {
                    x += 1;
                    continue;
                }
                let style = current_row[x].style;
                let start_x = x;
                let mut text = String::new();
                while x < width {
                    let cell = &current_row[x];
                    if cell == &prev_row[x] || cell.style != style {
                        break;
                    }
                    cell.push_text(&mut text);
                    x += 1;
                }
                backend.style(&style)?;
                backend.text(
                    Point {
                        x: start_x as u32,
                        y,
                    },
                    &text,
                )?;
                wrote = true;
            }
        }
        if wrote {
            backend.flush()?;
        }
        Ok(())
    }

    /// Render this terminal buffer in full using the provided backend,
    /// batching runs of text with the same style.
    pub fn render<R: RenderBackend>(&self, backend: &mut R) -> Result<()> {
        let width = self.size.w as usize;
        for y in 0..self.size.h {
            let row = &self.cells[y as usize * width..(y as usize + 1) * width];
            let mut x = 0;
            while x < width {
                let style = row[x].style;
                let start_x = x;
                let mut text = String::new();
                while x < width && row[x].style == style {
                    row[x].push_text(&mut text);
                    x += 1;
                }
                backend.style(&style)?;
                backend.text(
                    Point {
                        x: start_x as u32,
                        y,
                    },
                    &text,
                )?;
            }
        }
        backend.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{buf, style::Color, testing::buf::BufTest};

    /// Records calls made by the diff and render routines.
    #[derive(Default)]
    struct Recorder {
        /// Text runs written, with their positions.
        runs: Vec<(Point, String)>,
        /// Number of flushes.
        flushes: usize,
    }

    impl RenderBackend for Recorder {
        fn style(&mut self, _s: &Style) -> Result<()> {
            Ok(())
        }

        fn text(&mut self, loc: Point, txt: &str) -> Result<()> {
            self.runs.push((loc, txt.to_string()));
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn basic_fill() {
        let mut tb = TermBuf::filled(Expanse::new(4, 2), ' ', Style::default());
        tb.fill(Style::default(), Rect::new(1, 0, 2, 2), 'x');
        BufTest::new(&tb).assert_matches(buf![
            " xx "
            " xx "
        ]);
    }

    #[test]
    fn text_handles_combining_and_wide_graphemes() {
        let mut tb = TermBuf::empty(Expanse::new(6, 1));
        let drawn = tb.text(Style::default(), Point::zero(), "日e\u{301}z");
        assert_eq!(drawn, 4);
        assert_eq!(tb.get(Point { x: 0, y: 0 }).map(Cell::glyph), Some("日".into()));
        assert!(tb.get(Point { x: 1, y: 0 }).is_some_and(|c| c.continuation));
        assert_eq!(
            tb.get(Point { x: 2, y: 0 }).map(Cell::glyph),
            Some("e\u{301}".into())
        );
        assert_eq!(tb.lines_with('X'), vec!["日e\u{301}zXX".to_string()]);
    }

    #[test]
    fn text_clips_at_edge() {
        let mut tb = TermBuf::empty(Expanse::new(3, 1));
        assert_eq!(tb.text(Style::default(), Point { x: 1, y: 0 }, "日本"), 2);
        BufTest::new(&tb).assert_matches(buf!["X日"]);
    }

    #[test]
    fn diff_emits_changed_runs() -> Result<()> {
        let prev = TermBuf::filled(Expanse::new(5, 2), ' ', Style::default());
        let mut cur = prev.clone();
        cur.text(Style::default(), Point { x: 1, y: 1 }, "ab");
        cur.put(Point { x: 4, y: 1 }, 'c', Style::fg(Color::Red));

        let mut rec = Recorder::default();
        cur.diff(&prev, &mut rec)?;
        assert_eq!(
            rec.runs,
            vec![
                (Point { x: 1, y: 1 }, "ab".to_string()),
                (Point { x: 4, y: 1 }, "c".to_string()),
            ]
        );
        assert_eq!(rec.flushes, 1);

        let mut rec = Recorder::default();
        cur.diff(&cur, &mut rec)?;
        assert!(rec.runs.is_empty());
        assert_eq!(rec.flushes, 0);
        Ok(())
    }

    #[test]
    fn diff_size_change_rerenders() -> Result<()> {
        let prev = TermBuf::empty(Expanse::new(2, 2));
        let cur = TermBuf::empty(Expanse::new(3, 1));
        let mut rec = Recorder::default();
        cur.diff(&prev, &mut rec)?;
        assert_eq!(rec.runs, vec![(Point::zero(), "   ".to_string())]);
        Ok(())
    }

    #[test]
    fn blank_cells() {
        let mut tb = TermBuf::empty(Expanse::new(3, 1));
        tb.put(Point { x: 1, y: 0 }, ' ', Style::default());
        tb.put(Point { x: 2, y: 0 }, 'x', Style::default());
        let cell = |x| tb.get(Point { x, y: 0 }).cloned();
        assert!(cell(0).is_some_and(|c| c.is_empty() && c.is_blank()));
        assert!(cell(1).is_some_and(|c| !c.is_empty() && c.is_blank()));
        assert!(cell(2).is_some_and(|c| !c.is_blank()));
    }
}
