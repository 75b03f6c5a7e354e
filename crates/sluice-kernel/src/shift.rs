//! Column ring buffer holding the sliding stencil state of one stage.
//!
//! [`ShiftBuffer`] stores the last `2R + 1` padded columns of the stream.
//! Padded column `pc` lives in slot `pc % (2R + 1)`; writing a cell of
//! column `pc` overwrites the same row of column `pc - (2R + 1)`, which no
//! pending window needs any more. This bounds a stage's state to
//! `(2R + 1) * (H + 2R)` cells regardless of the tile width.

use sluice_core::{Cell, Position, Window};

/// Fixed-capacity ring of padded columns.
#[derive(Clone, Debug)]
pub struct ShiftBuffer<C> {
    /// Slot `s` occupies `cells[s * column_height..(s + 1) * column_height]`.
    cells: Vec<C>,
    radius: usize,
    depth: usize,
    column_height: usize,
}

impl<C: Cell> ShiftBuffer<C> {
    /// Create a ring for stencil radius `radius` over padded columns of
    /// `column_height` cells, pre-filled with `fill`.
    pub fn new(radius: usize, column_height: usize, fill: C) -> Self {
        let depth = 2 * radius + 1;
        Self {
            cells: vec![fill; depth * column_height],
            radius,
            depth,
            column_height,
        }
    }

    /// Number of columns retained (`2R + 1`).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Height of one padded column.
    pub fn column_height(&self) -> usize {
        self.column_height
    }

    /// Store the cell streamed at padded position `at`.
    pub fn store(&mut self, at: Position, cell: C) {
        let slot = at.c % self.depth;
        self.cells[slot * self.column_height + at.r] = cell;
    }

    /// Read back the cell most recently stored at padded position `at`.
    ///
    /// Only meaningful while column `at.c` is still retained.
    pub fn load(&self, at: Position) -> C {
        let slot = at.c % self.depth;
        self.cells[slot * self.column_height + at.r]
    }

    /// Copy the `(2R + 1)^2` neighborhood around padded position `center`
    /// into `window`.
    ///
    /// The caller guarantees that every padded column in
    /// `center.c - R ..= center.c + R` is retained and that
    /// `R <= center.r < column_height - R`.
    pub fn fill_window(&self, center: Position, window: &mut Window<C>) {
        debug_assert_eq!(window.radius(), self.radius);
        debug_assert!(center.c >= self.radius);
        debug_assert!(center.r >= self.radius && center.r + self.radius < self.column_height);
        let first_row = center.r - self.radius;
        let first_col = center.c - self.radius;
        for lc in 0..self.depth {
            let slot = (first_col + lc) % self.depth;
            let start = slot * self.column_height + first_row;
            window
                .column_mut(lc)
                .copy_from_slice(&self.cells[start..start + self.depth]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sluice_core::Offset;

    #[test]
    fn ring_keeps_last_depth_columns() {
        let mut ring = ShiftBuffer::new(1, 3, (0usize, 0usize));
        for c in 0..5 {
            for r in 0..3 {
                ring.store(Position::new(c, r), (c, r));
            }
        }
        assert_eq!(ring.depth(), 3);
        // Columns 2, 3, 4 are retained.
        for c in 2..5 {
            for r in 0..3 {
                assert_eq!(ring.load(Position::new(c, r)), (c, r));
            }
        }
    }

    #[test]
    fn fill_window_reads_neighborhood() {
        let mut ring = ShiftBuffer::new(1, 4, (0usize, 0usize));
        for c in 0..4 {
            for r in 0..4 {
                ring.store(Position::new(c, r), (c, r));
            }
        }
        let mut w = Window::new(1, (0, 0));
        ring.fill_window(Position::new(2, 1), &mut w);
        assert_eq!(w[Offset::ORIGIN], (2, 1));
        assert_eq!(w[Offset::new(-1, -1)], (1, 0));
        assert_eq!(w[Offset::new(1, 1)], (3, 2));
    }

    #[test]
    fn overwrite_replaces_only_the_same_row() {
        let mut ring = ShiftBuffer::new(1, 2, 0u32);
        for c in 0..3u32 {
            for r in 0..2u32 {
                ring.store(Position::new(c as usize, r as usize), c * 10 + r);
            }
        }
        // Column 3 shares slot 0 with column 0; only row 0 is overwritten.
        ring.store(Position::new(3, 0), 30);
        assert_eq!(ring.load(Position::new(3, 0)), 30);
        assert_eq!(ring.load(Position::new(0, 1)), 1);
    }
}
