//! Reusable transition-function fixtures.
//!
//! - [`CheckingTransition`]: verifies that every window holds exactly the
//!   identity-tagged neighbors it should, and records the verdict.
//! - [`MixTransition`]: an order- and position-sensitive hash of the
//!   window, so any misplaced cell changes the result.
//! - [`Life`]: Conway's Game of Life, for benchmarks and examples.

use sluice_core::{Grid, Offset, Position, TransitionFunction, Window};

/// A cell that records where and when it was computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaggedCell {
    pub c: usize,
    pub r: usize,
    pub generation: u64,
    pub valid: bool,
}

impl TaggedCell {
    /// The halo sentinel. Never equal to a tag produced for a grid cell.
    pub const HALO: TaggedCell = TaggedCell {
        c: usize::MAX,
        r: usize::MAX,
        generation: u64::MAX,
        valid: true,
    };

    /// The valid tag expected at `pos` in `generation`.
    pub fn at(pos: Position, generation: u64) -> Self {
        Self {
            c: pos.c,
            r: pos.r,
            generation,
            valid: true,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.c, self.r)
    }

    pub fn is_halo(&self) -> bool {
        *self == Self::HALO
    }
}

/// A `width x height` grid of generation-0 tags.
pub fn tagged_grid(width: usize, height: usize) -> Grid<TaggedCell> {
    Grid::from_fn(width, height, |pos| TaggedCell::at(pos, 0))
}

/// Advances a [`TaggedCell`] by one generation and clears `valid` when any
/// window cell disagrees with its expected tag.
///
/// A neighbor outside `window.grid_range` must be [`TaggedCell::HALO`]; a
/// neighbor inside must be the valid tag of its own position in
/// `window.generation`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CheckingTransition;

impl CheckingTransition {
    fn expected(window: &Window<TaggedCell>, offset: Offset) -> TaggedCell {
        let c = window.center.c as isize + offset.c;
        let r = window.center.r as isize + offset.r;
        if c < 0 || r < 0 {
            return TaggedCell::HALO;
        }
        let pos = Position::new(c as usize, r as usize);
        if pos.is_within(window.grid_range) {
            TaggedCell::at(pos, window.generation)
        } else {
            TaggedCell::HALO
        }
    }
}

impl TransitionFunction for CheckingTransition {
    type Cell = TaggedCell;

    fn halo(&self) -> TaggedCell {
        TaggedCell::HALO
    }

    fn transition(&self, window: &mut Window<TaggedCell>) -> TaggedCell {
        let consistent = window
            .iter()
            .all(|(offset, &cell)| cell == Self::expected(window, offset));
        TaggedCell {
            c: window.center.c,
            r: window.center.r,
            generation: window.generation + 1,
            valid: consistent,
        }
    }
}

/// Folds every window cell, its offset and the generation into one value.
///
/// Ignores `window.stage`, so results do not depend on how a run is split
/// into passes.
#[derive(Clone, Copy, Debug, Default)]
pub struct MixTransition;

impl MixTransition {
    pub const HALO: u64 = 0xDEAD_BEEF;
}

impl TransitionFunction for MixTransition {
    type Cell = u64;

    fn halo(&self) -> u64 {
        Self::HALO
    }

    fn transition(&self, window: &mut Window<u64>) -> u64 {
        let mut acc = window.generation.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        for (offset, &cell) in window.iter() {
            let weight = (offset.c * 31 + offset.r * 7) as u64;
            acc = acc.rotate_left(5) ^ cell.wrapping_mul(weight | 1);
        }
        acc % 1_000_003
    }
}

/// Conway's Game of Life over the radius-1 neighborhood, dead halo.
///
/// Windows of a larger radius are accepted; the outer rings are ignored.
#[derive(Clone, Copy, Debug, Default)]
pub struct Life;

impl TransitionFunction for Life {
    type Cell = bool;

    fn halo(&self) -> bool {
        false
    }

    fn transition(&self, window: &mut Window<bool>) -> bool {
        let mut alive = 0;
        for dc in -1..=1 {
            for dr in -1..=1 {
                if (dc, dr) != (0, 0) && window[Offset::new(dc, dr)] {
                    alive += 1;
                }
            }
        }
        matches!((window.center_cell(), alive), (true, 2) | (_, 3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window_for(
        grid: &Grid<TaggedCell>,
        center: Position,
        generation: u64,
    ) -> Window<TaggedCell> {
        let mut w = Window::new(1, TaggedCell::HALO);
        w.center = center;
        w.generation = generation;
        w.grid_range = grid.extent();
        for dc in -1isize..=1 {
            for dr in -1isize..=1 {
                let c = center.c as isize + dc;
                let r = center.r as isize + dr;
                if c >= 0 && r >= 0 {
                    if let Some(&cell) = grid.get(Position::new(c as usize, r as usize)) {
                        w[Offset::new(dc, dr)] = cell;
                    }
                }
            }
        }
        w
    }

    #[test]
    fn checking_transition_accepts_consistent_window() {
        let grid = tagged_grid(3, 3);
        let mut w = window_for(&grid, Position::new(0, 1), 0);
        let out = CheckingTransition.transition(&mut w);
        assert_eq!(out, TaggedCell::at(Position::new(0, 1), 1));
    }

    #[test]
    fn checking_transition_flags_misplaced_neighbor() {
        let grid = tagged_grid(3, 3);
        let mut w = window_for(&grid, Position::new(1, 1), 0);
        w[Offset::new(1, 0)] = TaggedCell::at(Position::new(0, 0), 0);
        assert!(!CheckingTransition.transition(&mut w).valid);
    }

    #[test]
    fn checking_transition_flags_stale_generation() {
        let grid = tagged_grid(3, 3);
        let mut w = window_for(&grid, Position::new(1, 1), 1);
        assert!(!CheckingTransition.transition(&mut w).valid);
    }

    #[test]
    fn blinker_oscillates() {
        let mut w = Window::new(1, false);
        w[Offset::new(0, -1)] = true;
        w[Offset::ORIGIN] = true;
        w[Offset::new(0, 1)] = true;
        assert!(Life.transition(&mut w));
        let mut side = Window::new(1, false);
        side[Offset::new(1, -1)] = true;
        side[Offset::new(1, 0)] = true;
        side[Offset::new(1, 1)] = true;
        assert!(Life.transition(&mut side));
    }

    #[test]
    fn mix_depends_on_neighbor_placement() {
        let mut a = Window::new(1, 1u64);
        let mut b = Window::new(1, 1u64);
        a[Offset::new(-1, 0)] = 5;
        b[Offset::new(1, 0)] = 5;
        assert_ne!(
            MixTransition.transition(&mut a),
            MixTransition.transition(&mut b)
        );
    }
}
