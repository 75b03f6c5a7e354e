//! Index arithmetic for the halo-padded tile stream.
//!
//! The stream covers the tile capacity plus a halo ring of radius `R` on
//! every side, column by column:
//!
//! ```text
//!   padded column pc ∈ [0, W + 2R), padded row pr ∈ [0, H + 2R)
//!   stream index  i  = pc * (H + 2R) + pr
//!   tile position    = (pc - R, pr - R)
//! ```
//!
//! Only positions inside the logical grid (which may be smaller than the
//! tile capacity) carry real cells; everything else is halo.

use sluice_core::Position;

/// Geometry of one padded tile stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaddedLayout {
    radius: usize,
    tile: Position,
    grid: Position,
    padded: Position,
}

impl PaddedLayout {
    /// Build the layout for a `grid` living inside a tile of capacity
    /// `tile`, padded by `radius`.
    ///
    /// # Panics
    ///
    /// Panics if `grid` exceeds `tile` on either axis, or if the padded
    /// stream length overflows `usize`. Both are checked by executor
    /// configuration and `set_input` before a layout is ever built.
    pub fn new(radius: usize, tile: Position, grid: Position) -> Self {
        assert!(
            grid.c <= tile.c && grid.r <= tile.r,
            "grid extent {grid} exceeds tile capacity {tile}"
        );
        let padded = Self::padded_extent(radius, tile).unwrap_or_else(|| {
            panic!("padded extent of tile {tile} with radius {radius} overflows")
        });
        Self {
            radius,
            tile,
            grid,
            padded,
        }
    }

    /// Padded extent `(W + 2R, H + 2R)`, or `None` if the padded stream
    /// length would overflow `usize`.
    pub fn padded_extent(radius: usize, tile: Position) -> Option<Position> {
        let margin = radius.checked_mul(2)?;
        let padded = Position::new(tile.c.checked_add(margin)?, tile.r.checked_add(margin)?);
        padded.c.checked_mul(padded.r)?;
        Some(padded)
    }

    /// Stencil radius `R`.
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Tile capacity `(W, H)`.
    pub fn tile_extent(&self) -> Position {
        self.tile
    }

    /// Logical grid extent, `<= tile_extent()` on both axes.
    pub fn grid_extent(&self) -> Position {
        self.grid
    }

    /// Padded extent `(W + 2R, H + 2R)`.
    pub fn padded(&self) -> Position {
        self.padded
    }

    /// Number of cells in one padded stream.
    pub fn stream_len(&self) -> usize {
        self.padded.area()
    }

    /// Number of cells a stage must receive before the window around its
    /// first output position is complete: `R` padded columns plus `R` rows.
    pub fn lag(&self) -> usize {
        self.radius * self.padded.r + self.radius
    }

    /// Padded `(column, row)` of stream index `i`.
    pub fn padded_position(&self, i: usize) -> Position {
        Position::new(i / self.padded.r, i % self.padded.r)
    }

    /// Tile position of stream index `i`, or `None` if `i` lies in the
    /// halo ring or outside the logical grid.
    pub fn grid_position(&self, i: usize) -> Option<Position> {
        let p = self.padded_position(i);
        let c = p.c.checked_sub(self.radius)?;
        let r = p.r.checked_sub(self.radius)?;
        let pos = Position::new(c, r);
        pos.is_within(self.grid).then_some(pos)
    }
}
