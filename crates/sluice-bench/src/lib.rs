//! Benchmark profiles and utilities for the Sluice stencil engine.
//!
//! Provides pre-built [`ExecutorConfig`] profiles and inputs:
//!
//! - [`reference_profile`]: 64x64 tile, radius 1, pipeline length 4
//! - [`stress_profile`]: 256x256 tile, radius 2, pipeline length 8
//! - [`HeatDiffusion`]: explicit five-point heat equation on `f32` cells
//! - [`hot_spot`]: single hot cell in a cold grid, the heat diffusion input
//! - [`glider_field`]: deterministic Life soup via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use sluice_core::{Grid, Offset, TransitionFunction, Window};
use sluice_engine::ExecutorConfig;
use sluice_test_utils::random_grid;

/// Reference benchmark profile: 64x64 tile (4K cells), radius 1,
/// four generations per pass.
pub fn reference_profile() -> ExecutorConfig {
    ExecutorConfig::default()
        .with_stencil_radius(1)
        .with_pipeline_length(4)
        .with_tile(64, 64)
        .with_channel_capacity(1024)
}

/// Stress benchmark profile: 256x256 tile (64K cells), radius 2,
/// eight generations per pass.
pub fn stress_profile() -> ExecutorConfig {
    ExecutorConfig::default()
        .with_stencil_radius(2)
        .with_pipeline_length(8)
        .with_tile(256, 256)
        .with_channel_capacity(4096)
}

/// Explicit heat diffusion, `u' = u + alpha * laplacian(u)`, with a cold
/// halo.
///
/// Stable for `alpha <= 0.25`.
#[derive(Clone, Copy, Debug)]
pub struct HeatDiffusion {
    pub alpha: f32,
}

impl TransitionFunction for HeatDiffusion {
    type Cell = f32;

    fn halo(&self) -> f32 {
        0.0
    }

    fn transition(&self, w: &mut Window<f32>) -> f32 {
        let u = w.center_cell();
        let laplacian = w[Offset::new(-1, 0)]
            + w[Offset::new(1, 0)]
            + w[Offset::new(0, -1)]
            + w[Offset::new(0, 1)]
            - 4.0 * u;
        u + self.alpha * laplacian
    }
}

/// A `width x height` grid with one hot cell in the middle.
pub fn hot_spot(width: usize, height: usize, temperature: f32) -> Grid<f32> {
    Grid::from_fn(width, height, |p| {
        if p.c == width / 2 && p.r == height / 2 {
            temperature
        } else {
            0.0
        }
    })
}

/// A deterministic Life soup with roughly one live cell in three.
pub fn glider_field(width: usize, height: usize, seed: u64) -> Grid<bool> {
    let noise = random_grid(width, height, 3, seed);
    Grid::from_fn(width, height, |p| noise[p] == 0)
}
