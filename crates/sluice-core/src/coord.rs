//! Column/row coordinate pairs.
//!
//! All coordinates are `(column, row)`. Signed coordinates ([`Offset`])
//! describe stencil-relative displacements where negative values point
//! before the origin; unsigned coordinates ([`Position`]) describe
//! absolute tile positions and window-local indices.

use std::fmt;

/// Signed index type used for stencil-relative offsets.
pub type Index = isize;

/// Unsigned index type used for absolute positions and extents.
pub type UIndex = usize;

/// A `(column, row)` pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord<T> {
    /// Column.
    pub c: T,
    /// Row.
    pub r: T,
}

/// A signed, stencil-relative coordinate.
pub type Offset = Coord<Index>;

/// An unsigned coordinate: an absolute tile position, a window-local
/// index, or a `(width, height)` extent.
pub type Position = Coord<UIndex>;

impl<T> Coord<T> {
    /// Create a coordinate from a column and a row.
    pub const fn new(c: T, r: T) -> Self {
        Self { c, r }
    }
}

impl Offset {
    /// The stencil origin `(0, 0)`.
    pub const ORIGIN: Offset = Coord::new(0, 0);
}

impl Position {
    /// Number of cells covered when this position is read as an extent.
    pub fn area(&self) -> usize {
        self.c * self.r
    }

    /// Whether both components are strictly below `extent`'s.
    pub fn is_within(&self, extent: Position) -> bool {
        self.c < extent.c && self.r < extent.r
    }
}

impl<T> From<(T, T)> for Coord<T> {
    fn from((c, r): (T, T)) -> Self {
        Self { c, r }
    }
}

impl<T: fmt::Display> fmt::Display for Coord<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.c, self.r)
    }
}
