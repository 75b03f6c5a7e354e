//! Heat diffusion on a single tile with a fixed heat source.
//!
//! Run with `RUST_LOG=sluice_engine=debug` to see per-chunk events.

use std::error::Error;

use sluice_core::{Grid, Offset, Position, TransitionFunction, Window};
use sluice_engine::{ExecutorConfig, MonotileExecutor};

const WIDTH: usize = 32;
const HEIGHT: usize = 24;
const SOURCE: Position = Position::new(WIDTH / 4, HEIGHT / 2);

/// Five-point explicit heat step; the source cell is pinned at 100 degrees.
struct Heat {
    alpha: f32,
}

impl TransitionFunction for Heat {
    type Cell = f32;

    fn halo(&self) -> f32 {
        0.0
    }

    fn transition(&self, w: &mut Window<f32>) -> f32 {
        if w.center == SOURCE {
            return 100.0;
        }
        let u = w.center_cell();
        let neighbors = w[Offset::new(-1, 0)]
            + w[Offset::new(1, 0)]
            + w[Offset::new(0, -1)]
            + w[Offset::new(0, 1)];
        u + self.alpha * (neighbors - 4.0 * u)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ExecutorConfig::default()
        .with_stencil_radius(1)
        .with_pipeline_length(8)
        .with_tile(WIDTH, HEIGHT)
        .with_runtime_analysis(true);
    let mut executor = MonotileExecutor::with_default_halo(config, Heat { alpha: 0.2 })?;
    executor.set_input(&Grid::filled(WIDTH, HEIGHT, 0.0))?;

    let mut field = Grid::filled(WIDTH, HEIGHT, 0.0f32);
    for _ in 0..5 {
        executor.run(64)?;
        executor.copy_output(&mut field)?;
        let total: f32 = field.as_column_major().iter().sum();
        println!(
            "generation {:4}: total heat {total:10.2}, center {:6.2}",
            executor.i_generation(),
            field[Position::new(WIDTH / 2, HEIGHT / 2)]
        );
    }

    if let Some(sample) = executor.runtime_sample() {
        println!(
            "{} passes, {:.3} ms total, {:.3} ms per pass",
            sample.n_passes(),
            sample.total_runtime() * 1e3,
            sample.mean_speed() * 1e3
        );
    }
    Ok(())
}
