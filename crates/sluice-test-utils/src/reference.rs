//! Naive reference stepper and input builders.
//!
//! [`reference_step`] rescans the whole grid once per generation with a
//! freshly assembled window for every cell. It is slow and obviously
//! correct, which makes it the oracle for the pipelined kernel.

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sluice_core::{Cell, Grid, Offset, Position, TransitionFunction, Window};

/// Advance `grid` by one generation, treating everything outside it as
/// `halo`. `stage` is reported to the transition function unchanged.
pub fn reference_step<F: TransitionFunction>(
    grid: &Grid<F::Cell>,
    radius: usize,
    halo: F::Cell,
    transition: &F,
    generation: u64,
    stage: usize,
) -> Grid<F::Cell> {
    let mut window = Window::new(radius, halo);
    let r = radius as isize;
    Grid::from_fn(grid.width(), grid.height(), |center| {
        for dc in -r..=r {
            for dr in -r..=r {
                let c = center.c as isize + dc;
                let row = center.r as isize + dr;
                let cell = if c < 0 || row < 0 {
                    halo
                } else {
                    grid.get(Position::new(c as usize, row as usize))
                        .copied()
                        .unwrap_or(halo)
                };
                window[Offset::new(dc, dr)] = cell;
            }
        }
        window.generation = generation;
        window.stage = stage;
        window.center = center;
        window.grid_range = grid.extent();
        transition.transition(&mut window)
    })
}

/// Advance `grid` from generation `g0` by `n` generations.
///
/// Stages are numbered the way the executor numbers them when it splits
/// the run into passes of `pipeline_length` generations: the `k`-th step
/// reports stage `k % pipeline_length`.
///
/// # Panics
///
/// Panics if `pipeline_length` is zero.
pub fn reference_run<F: TransitionFunction>(
    grid: &Grid<F::Cell>,
    radius: usize,
    halo: F::Cell,
    transition: &F,
    g0: u64,
    n: u64,
    pipeline_length: usize,
) -> Grid<F::Cell> {
    assert!(pipeline_length >= 1, "pipeline_length must be at least 1");
    let mut current = grid.clone();
    for k in 0..n {
        let stage = (k % pipeline_length as u64) as usize;
        current = reference_step(&current, radius, halo, transition, g0 + k, stage);
    }
    current
}

/// The column-major stream of `grid` placed in a `tile` of capacity and
/// padded by a halo ring of `radius` cells, as the kernel consumes it.
pub fn padded_stream<C: Cell>(grid: &Grid<C>, radius: usize, tile: Position, halo: C) -> Vec<C> {
    let wp = tile.c + 2 * radius;
    let hp = tile.r + 2 * radius;
    let mut stream = Vec::with_capacity(wp * hp);
    for pc in 0..wp {
        for pr in 0..hp {
            let cell = match (pc.checked_sub(radius), pr.checked_sub(radius)) {
                (Some(c), Some(r)) => grid.get(Position::new(c, r)).copied().unwrap_or(halo),
                _ => halo,
            };
            stream.push(cell);
        }
    }
    stream
}

/// A deterministic grid of values below `bound`.
pub fn random_grid(width: usize, height: usize, bound: u64, seed: u64) -> Grid<u64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Grid::from_fn(width, height, |_| rng.next_u64() % bound.max(1))
}
