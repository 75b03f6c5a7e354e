//! The [`TransitionFunction`] trait.
//!
//! A transition function maps one cell's neighborhood in generation `g`
//! to that cell's value in generation `g + 1`. It is the only piece of
//! user logic the engine runs.

use crate::cell::Cell;
use crate::window::Window;

/// A pure stencil update rule.
///
/// # Contract
///
/// - `transition()` MUST be deterministic: the same window contents,
///   generation, stage and center produce the same result. The kernel
///   evaluates cells in stream order across several generations at once,
///   so any hidden state would observe a different call order than a
///   naive re-scan.
/// - Cells outside the tile carry [`halo()`](Self::halo). Deciding whether
///   a result computed from halo neighbors is degraded is up to the
///   implementer; the kernel does not tag validity.
/// - The window is scratch space. Writes to it are discarded.
///
/// # Examples
///
/// Conway's Game of Life on `bool` cells with a dead halo:
///
/// ```
/// use sluice_core::{Offset, TransitionFunction, Window};
///
/// struct Life;
///
/// impl TransitionFunction for Life {
///     type Cell = bool;
///
///     fn halo(&self) -> bool {
///         false
///     }
///
///     fn transition(&self, window: &mut Window<bool>) -> bool {
///         let alive = window.iter()
///             .filter(|(offset, &cell)| *offset != Offset::ORIGIN && cell)
///             .count();
///         matches!((window.center_cell(), alive), (true, 2) | (_, 3))
///     }
/// }
///
/// let mut w = Window::new(1, false);
/// w[Offset::new(-1, 0)] = true;
/// w[Offset::new(0, -1)] = true;
/// w[Offset::new(1, 1)] = true;
/// assert!(Life.transition(&mut w));
/// ```
pub trait TransitionFunction: Send + Sync {
    /// The cell type this function operates on.
    type Cell: Cell;

    /// The value of cells outside the tile.
    fn halo(&self) -> Self::Cell;

    /// Compute the next-generation value of `window.center`.
    fn transition(&self, window: &mut Window<Self::Cell>) -> Self::Cell;
}

impl<T: TransitionFunction + ?Sized> TransitionFunction for &T {
    type Cell = T::Cell;

    fn halo(&self) -> Self::Cell {
        (**self).halo()
    }

    fn transition(&self, window: &mut Window<Self::Cell>) -> Self::Cell {
        (**self).transition(window)
    }
}

/// Adapter turning a closure and a halo value into a [`TransitionFunction`].
///
/// ```
/// use sluice_core::{transition::FnTransition, Offset, TransitionFunction, Window};
///
/// let shift_right = FnTransition::new(0u8, |w: &mut Window<u8>| w[Offset::new(-1, 0)]);
/// let mut w = Window::new(1, 0u8);
/// w[Offset::new(-1, 0)] = 4;
/// assert_eq!(shift_right.transition(&mut w), 4);
/// assert_eq!(shift_right.halo(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct FnTransition<C, F> {
    halo: C,
    f: F,
}

impl<C, F> FnTransition<C, F>
where
    C: Cell,
    F: Fn(&mut Window<C>) -> C + Send + Sync,
{
    /// Wrap `f`, reporting `halo` as the halo value.
    pub fn new(halo: C, f: F) -> Self {
        Self { halo, f }
    }
}

impl<C, F> TransitionFunction for FnTransition<C, F>
where
    C: Cell,
    F: Fn(&mut Window<C>) -> C + Send + Sync,
{
    type Cell = C;

    fn halo(&self) -> C {
        self.halo
    }

    fn transition(&self, window: &mut Window<C>) -> C {
        (self.f)(window)
    }
}
