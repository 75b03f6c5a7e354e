//! The neighborhood window handed to transition functions.
//!
//! A [`Window`] holds the `(2R+1) x (2R+1)` cells around one center
//! position, as produced by the previous generation. Cells are reachable
//! two ways that always agree:
//!
//! ```text
//! window[Offset::new(dc, dr)] == window[Position::new(dc + R, dr + R)]
//! ```
//!
//! The window is scratch space owned by the kernel. A transition function
//! may overwrite cells while building its result; the kernel refills every
//! cell before the next evaluation, so such writes never reach neighbors.

use std::ops::{Index, IndexMut};

use smallvec::SmallVec;

use crate::cell::Cell;
use crate::coord::{Offset, Position};

/// Windows up to radius 2 (`5 x 5 = 25` cells) are stored inline.
const INLINE_CELLS: usize = 25;

/// A `(2R+1)^2` snapshot of cells around one grid position.
///
/// # Examples
///
/// ```
/// use sluice_core::{Offset, Position, Window};
///
/// let mut w = Window::new(1, 0u32);
/// w[Offset::new(-1, 1)] = 5;
/// assert_eq!(w[Position::new(0, 2)], 5);
/// assert_eq!(w.get(Offset::new(2, 0)), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Window<C> {
    /// Column-major, `index = (dc + R) * diameter + (dr + R)`.
    cells: SmallVec<[C; INLINE_CELLS]>,
    radius: usize,
    diameter: usize,
    /// Generation of the cells held in the window. The transition
    /// function's result belongs to `generation + 1`.
    pub generation: u64,
    /// Index of the pipeline stage evaluating this window, counted from
    /// the start of the current pass.
    pub stage: usize,
    /// Absolute tile position of the center cell.
    pub center: Position,
    /// Extents of the logical grid. Positions outside it hold the halo.
    pub grid_range: Position,
}

impl<C: Cell> Window<C> {
    /// Create a window of the given radius with every cell set to `fill`.
    ///
    /// `generation`, `stage`, `center` and `grid_range` start at zero.
    pub fn new(radius: usize, fill: C) -> Self {
        let diameter = 2 * radius + 1;
        Self {
            cells: SmallVec::from_elem(fill, diameter * diameter),
            radius,
            diameter,
            generation: 0,
            stage: 0,
            center: Position::default(),
            grid_range: Position::default(),
        }
    }

    /// Stencil radius `R`.
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Side length `2R + 1`.
    pub fn diameter(&self) -> usize {
        self.diameter
    }

    /// Cell at a signed offset from the center, or `None` if any
    /// component lies outside `[-R, R]`.
    pub fn get(&self, offset: Offset) -> Option<&C> {
        self.offset_index(offset).map(|i| &self.cells[i])
    }

    /// Mutable cell at a signed offset from the center.
    pub fn get_mut(&mut self, offset: Offset) -> Option<&mut C> {
        self.offset_index(offset).map(move |i| &mut self.cells[i])
    }

    /// Cell at a window-local position, or `None` if any component lies
    /// outside `[0, 2R]`.
    pub fn get_local(&self, local: Position) -> Option<&C> {
        self.local_index(local).map(|i| &self.cells[i])
    }

    /// Mutable cell at a window-local position.
    pub fn get_local_mut(&mut self, local: Position) -> Option<&mut C> {
        self.local_index(local).map(move |i| &mut self.cells[i])
    }

    /// The center cell.
    pub fn center_cell(&self) -> C {
        self[Offset::ORIGIN]
    }

    /// Overwrite every cell with `value`.
    pub fn fill(&mut self, value: C) {
        self.cells.iter_mut().for_each(|cell| *cell = value);
    }

    /// Window-local column `lc` as a slice of `2R + 1` cells, top to bottom.
    ///
    /// # Panics
    ///
    /// Panics if `lc > 2R`.
    pub fn column(&self, lc: usize) -> &[C] {
        assert!(lc < self.diameter, "window column {lc} out of range");
        &self.cells[lc * self.diameter..(lc + 1) * self.diameter]
    }

    /// Mutable window-local column `lc`.
    ///
    /// # Panics
    ///
    /// Panics if `lc > 2R`.
    pub fn column_mut(&mut self, lc: usize) -> &mut [C] {
        assert!(lc < self.diameter, "window column {lc} out of range");
        let d = self.diameter;
        &mut self.cells[lc * d..(lc + 1) * d]
    }

    /// Iterate `(offset, cell)` pairs, column by column.
    pub fn iter(&self) -> impl Iterator<Item = (Offset, &C)> + '_ {
        let d = self.diameter;
        let r = self.radius as isize;
        self.cells.iter().enumerate().map(move |(i, cell)| {
            let dc = (i / d) as isize - r;
            let dr = (i % d) as isize - r;
            (Offset::new(dc, dr), cell)
        })
    }

    fn local_index(&self, local: Position) -> Option<usize> {
        if local.c < self.diameter && local.r < self.diameter {
            Some(local.c * self.diameter + local.r)
        } else {
            None
        }
    }

    fn offset_index(&self, offset: Offset) -> Option<usize> {
        let r = self.radius as isize;
        let lc = usize::try_from(offset.c.checked_add(r)?).ok()?;
        let lr = usize::try_from(offset.r.checked_add(r)?).ok()?;
        self.local_index(Position::new(lc, lr))
    }
}

impl<C: Cell> Index<Offset> for Window<C> {
    type Output = C;

    fn index(&self, offset: Offset) -> &C {
        match self.get(offset) {
            Some(cell) => cell,
            None => panic!("offset {offset} outside stencil radius {}", self.radius),
        }
    }
}

impl<C: Cell> IndexMut<Offset> for Window<C> {
    fn index_mut(&mut self, offset: Offset) -> &mut C {
        let radius = self.radius;
        match self.get_mut(offset) {
            Some(cell) => cell,
            None => panic!("offset {offset} outside stencil radius {radius}"),
        }
    }
}

impl<C: Cell> Index<Position> for Window<C> {
    type Output = C;

    fn index(&self, local: Position) -> &C {
        match self.get_local(local) {
            Some(cell) => cell,
            None => panic!(
                "window-local position {local} outside diameter {}",
                self.diameter
            ),
        }
    }
}

impl<C: Cell> IndexMut<Position> for Window<C> {
    fn index_mut(&mut self, local: Position) -> &mut C {
        let diameter = self.diameter;
        match self.get_local_mut(local) {
            Some(cell) => cell,
            None => panic!("window-local position {local} outside diameter {diameter}"),
        }
    }
}
