use super::{Node, Outcome, View, deliver};
use crate::{
    buffer::{Buffer, Viewport},
    error::Result,
    event::Event,
    geom::{Expanse, Rect},
    key::ViewKey,
    layout::distribute,
};

/// Rows of cells. Takes all offered space, splits the width among columns by
/// weight and the height equally among rows.
pub struct Grid<M> {
    /// Cells, row by row.
    rows: Vec<Vec<View<M>>>,
    /// Column weights. Missing weights count as 1.
    weights: Vec<u32>,
}

impl<M: 'static> Grid<M> {
    /// A grid of rows.
    pub fn new(rows: Vec<Vec<View<M>>>) -> Self {
        Self {
            rows,
            weights: vec![],
        }
    }

    /// Set the column weights.
    pub fn weights(mut self, weights: Vec<u32>) -> Self {
        self.weights = weights;
        self
    }

    /// Number of columns.
    fn columns(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Cells with their keys, in render order.
    fn cells(&self) -> impl DoubleEndedIterator<Item = (ViewKey, &View<M>)> {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(move |(c, v)| (cell_key(r, c), v))
        })
    }
}

/// The structural key of a cell.
fn cell_key(row: usize, col: usize) -> ViewKey {
    ViewKey::Index(row).append(&ViewKey::Index(col))
}

/// Start offsets for a list of sizes.
fn offsets(sizes: &[u32]) -> Vec<u32> {
    sizes
        .iter()
        .scan(0, |acc, s| {
            let at = *acc;
            *acc += s;
            Some(at)
        })
        .collect()
}

impl<M: 'static> Node<M> for Grid<M> {
    fn measure(&self, available: Expanse) -> Expanse {
        available
    }

    fn render(&self, vp: Viewport, buf: &mut Buffer) -> Result<()> {
        let size = vp.size();
        let weights: Vec<u32> = (0..self.columns())
            .map(|i| self.weights.get(i).copied().unwrap_or(1))
            .collect();
        let widths = distribute(size.w, &weights);
        let heights = distribute(size.h, &vec![1; self.rows.len()]);
        let (xs, ys) = (offsets(&widths), offsets(&heights));
        for (r, row) in self.rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let rect = Rect::new(xs[c], ys[r], widths[c], heights[r]);
                cell.render_keyed(&cell_key(r, c), vp.child(rect), buf)?;
            }
        }
        Ok(())
    }

    fn handle_event(&self, event: &Event, buf: &mut Buffer) -> Outcome<M> {
        deliver(self.cells(), event, buf)
    }
}

impl<M: 'static> From<Grid<M>> for View<M> {
    fn from(g: Grid<M>) -> Self {
        Self::new(g)
    }
}

/// A grid with equal columns.
pub fn grid<M: 'static>(rows: Vec<Vec<View<M>>>) -> View<M> {
    Grid::new(rows).into()
}
