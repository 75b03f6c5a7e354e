//! Dense column-major 2D cell buffer.
//!
//! [`Grid`] is the buffer format exchanged with the executor: callers seed
//! a tile by handing it a grid and read results back into another one.
//! Storage is column-major (`index = c * height + r`), the same order in
//! which tiles are streamed through the kernel, so streaming a grid is a
//! linear walk over its backing vector.

use std::ops::{Index, IndexMut};

use crate::cell::Cell;
use crate::coord::Position;
use crate::error::GridError;

/// A dense, column-major 2D array of cells with fixed extents.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<C> {
    cells: Vec<C>,
    width: usize,
    height: usize,
}

impl<C: Cell> Grid<C> {
    /// Create a `width x height` grid with every cell set to `value`.
    ///
    /// # Panics
    ///
    /// Panics if `width * height` overflows `usize`.
    pub fn filled(width: usize, height: usize, value: C) -> Self {
        let len = width
            .checked_mul(height)
            .unwrap_or_else(|| panic!("grid extent {width}x{height} overflows usize"));
        Self {
            cells: vec![value; len],
            width,
            height,
        }
    }

    /// Create a grid by evaluating `f` at every position, column by column.
    ///
    /// # Panics
    ///
    /// Panics if `width * height` overflows `usize`.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(Position) -> C) -> Self {
        let len = width
            .checked_mul(height)
            .unwrap_or_else(|| panic!("grid extent {width}x{height} overflows usize"));
        let mut cells = Vec::with_capacity(len);
        for c in 0..width {
            for r in 0..height {
                cells.push(f(Position::new(c, r)));
            }
        }
        Self {
            cells,
            width,
            height,
        }
    }

    /// Wrap an existing column-major cell vector.
    ///
    /// Returns `Err(GridError::LengthMismatch)` if `cells.len()` is not
    /// `width * height`.
    pub fn from_column_major(
        width: usize,
        height: usize,
        cells: Vec<C>,
    ) -> Result<Self, GridError> {
        let extent = Position::new(width, height);
        let expected = width
            .checked_mul(height)
            .ok_or(GridError::ExtentOverflow { extent })?;
        if cells.len() != expected {
            return Err(GridError::LengthMismatch {
                extent,
                actual: cells.len(),
            });
        }
        Ok(Self {
            cells,
            width,
            height,
        })
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)` as a [`Position`].
    pub fn extent(&self) -> Position {
        Position::new(self.width, self.height)
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid has zero cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at `pos`, or `None` if out of bounds.
    pub fn get(&self, pos: Position) -> Option<&C> {
        self.flat_index(pos).map(|i| &self.cells[i])
    }

    /// Mutable cell at `pos`, or `None` if out of bounds.
    pub fn get_mut(&mut self, pos: Position) -> Option<&mut C> {
        self.flat_index(pos).map(move |i| &mut self.cells[i])
    }

    /// All cells in column-major order.
    pub fn as_column_major(&self) -> &[C] {
        &self.cells
    }

    /// All cells in column-major order, mutably.
    pub fn as_column_major_mut(&mut self) -> &mut [C] {
        &mut self.cells
    }

    /// Consume the grid, returning its column-major cell vector.
    pub fn into_column_major(self) -> Vec<C> {
        self.cells
    }

    /// Iterate `(position, cell)` pairs in column-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &C)> + '_ {
        let height = self.height.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (Position::new(i / height, i % height), cell))
    }

    fn flat_index(&self, pos: Position) -> Option<usize> {
        if pos.is_within(self.extent()) {
            Some(pos.c * self.height + pos.r)
        } else {
            None
        }
    }
}

impl<C: Cell> Index<Position> for Grid<C> {
    type Output = C;

    fn index(&self, pos: Position) -> &C {
        match self.get(pos) {
            Some(cell) => cell,
            None => panic!(
                "position {pos} out of bounds for grid of extent {}",
                self.extent()
            ),
        }
    }
}

impl<C: Cell> IndexMut<Position> for Grid<C> {
    fn index_mut(&mut self, pos: Position) -> &mut C {
        let extent = self.extent();
        match self.get_mut(pos) {
            Some(cell) => cell,
            None => panic!("position {pos} out of bounds for grid of extent {extent}"),
        }
    }
}
