//! The single-tile executor.
//!
//! [`MonotileExecutor`] owns one tile of cells and advances it through
//! generations with the pipelined kernel. A `run` is split into chunks of at
//! most `pipeline_length` generations; each chunk streams the current tile
//! through the stream stages into a spare buffer, and the two
//! buffers swap roles afterwards. Nothing observable changes until every
//! chunk of the run has succeeded.

use std::fmt;

use sluice_core::{Grid, Position, TransitionFunction};
use sluice_kernel::PaddedLayout;
use tracing::{debug, debug_span};

use crate::clock::{Clock, MonotonicClock};
use crate::config::ExecutorConfig;
use crate::error::ExecutorError;
use crate::runtime::RuntimeSample;
use crate::stream::{run_chunk, Chunk};

/// Executor for grids that fit in a single tile.
///
/// # Examples
///
/// ```
/// use sluice_core::{transition::FnTransition, Grid, Offset, Window};
/// use sluice_engine::{ExecutorConfig, MonotileExecutor};
///
/// // Every cell becomes the sum of its left and right neighbors.
/// let spread = FnTransition::new(0u32, |w: &mut Window<u32>| {
///     w[Offset::new(-1, 0)] + w[Offset::new(1, 0)]
/// });
/// let config = ExecutorConfig::default().with_tile(8, 1);
/// let mut executor = MonotileExecutor::new(config, 0, spread).unwrap();
///
/// executor.set_input(&Grid::from_fn(3, 1, |p| (p.c == 1) as u32)).unwrap();
/// executor.run(2).unwrap();
///
/// let mut out = Grid::filled(3, 1, 0);
/// executor.copy_output(&mut out).unwrap();
/// assert_eq!(out.as_column_major(), &[0, 2, 0]);
/// assert_eq!(executor.i_generation(), 2);
/// ```
pub struct MonotileExecutor<F: TransitionFunction> {
    config: ExecutorConfig,
    halo: F::Cell,
    transition: F,
    tile: Grid<F::Cell>,
    /// Allocation reused as the output of the next chunk.
    spare: Option<Vec<F::Cell>>,
    i_generation: u64,
    runtime_sample: Option<RuntimeSample>,
    clock: Box<dyn Clock>,
}

impl<F: TransitionFunction> MonotileExecutor<F> {
    /// Create an executor timed by a [`MonotonicClock`].
    ///
    /// The tile starts at full capacity, filled with `halo`.
    pub fn new(
        config: ExecutorConfig,
        halo: F::Cell,
        transition: F,
    ) -> Result<Self, ExecutorError> {
        Self::with_clock(config, halo, transition, MonotonicClock::new())
    }

    /// Create an executor whose halo is the transition function's own
    /// [`halo()`](TransitionFunction::halo).
    pub fn with_default_halo(config: ExecutorConfig, transition: F) -> Result<Self, ExecutorError> {
        let halo = transition.halo();
        Self::new(config, halo, transition)
    }

    /// Create an executor that reads compute-stage timings from `clock`.
    pub fn with_clock(
        config: ExecutorConfig,
        halo: F::Cell,
        transition: F,
        clock: impl Clock + 'static,
    ) -> Result<Self, ExecutorError> {
        config.validate()?;
        let tile = Grid::filled(config.tile_width, config.tile_height, halo);
        let runtime_sample = config.runtime_analysis.then(RuntimeSample::new);
        debug!(
            radius = config.stencil_radius,
            pipeline_length = config.pipeline_length,
            tile_width = config.tile_width,
            tile_height = config.tile_height,
            "monotile executor created"
        );
        Ok(Self {
            config,
            halo,
            transition,
            tile,
            spare: None,
            i_generation: 0,
            runtime_sample,
            clock: Box::new(clock),
        })
    }

    /// Replace the tile with a copy of `input`.
    ///
    /// The tile takes `input`'s extents, which may be smaller than the tile
    /// capacity. The generation counter is left alone.
    pub fn set_input(&mut self, input: &Grid<F::Cell>) -> Result<(), ExecutorError> {
        let capacity = self.config.tile_extent();
        let extent = input.extent();
        if extent.c > capacity.c || extent.r > capacity.r {
            return Err(ExecutorError::OversizeInput { extent, capacity });
        }
        self.tile = input.clone();
        Ok(())
    }

    /// Copy the tile into `output`, which must have the tile's extents.
    pub fn copy_output(&self, output: &mut Grid<F::Cell>) -> Result<(), ExecutorError> {
        let expected = self.tile.extent();
        let actual = output.extent();
        if actual != expected {
            return Err(ExecutorError::SizeMismatch { expected, actual });
        }
        output
            .as_column_major_mut()
            .copy_from_slice(self.tile.as_column_major());
        Ok(())
    }

    /// Logical extents of the tile.
    pub fn grid_range(&self) -> Position {
        self.tile.extent()
    }

    /// Advance the tile by `n_generations`.
    ///
    /// Fails with [`ExecutorError::GenerationOverflow`] if the generation
    /// counter cannot reach the target. On error the tile, generation counter
    /// and runtime sample are exactly as they were before the call.
    pub fn run(&mut self, n_generations: u64) -> Result<(), ExecutorError> {
        if n_generations == 0 {
            return Ok(());
        }
        let start_generation = self.i_generation;
        let target = start_generation
            .checked_add(n_generations)
            .ok_or(ExecutorError::GenerationOverflow {
                current: start_generation,
                requested: n_generations,
            })?;
        let span = debug_span!("run", from = start_generation, to = target);
        let _guard = span.enter();

        let layout = PaddedLayout::new(
            self.config.stencil_radius,
            self.config.tile_extent(),
            self.tile.extent(),
        );
        let step = self.config.pipeline_length as u64;

        let mut working: Option<Grid<F::Cell>> = None;
        let mut spare = self.spare.take().unwrap_or_default();
        let mut timings = Vec::new();
        let mut generation = start_generation;

        while generation < target {
            let chunk_end = generation + step.min(target - generation);
            let chunk = Chunk {
                transition: &self.transition,
                layout,
                pipeline_length: self.config.pipeline_length,
                generations: generation..chunk_end,
                halo: self.halo,
                channel_capacity: self.config.channel_capacity,
                clock: &*self.clock,
            };
            let _chunk_span = debug_span!("chunk", from = generation, to = chunk_end).entered();
            let current = working.as_ref().unwrap_or(&self.tile);
            let output = run_chunk(&chunk, current, spare)?;
            debug!(
                evaluations = output.stats.evaluations,
                seconds = output.timing.duration().as_secs_f64(),
                "chunk complete"
            );
            timings.push(output.timing);
            // The previous working tile becomes the next spare; the committed
            // tile is never recycled mid-run.
            spare = match working.replace(output.grid) {
                Some(previous) => previous.into_column_major(),
                None => Vec::new(),
            };
            generation = chunk_end;
        }

        if let Some(next) = working {
            let previous = std::mem::replace(&mut self.tile, next);
            self.spare = Some(previous.into_column_major());
        }
        self.i_generation = target;
        if let Some(sample) = self.runtime_sample.as_mut() {
            timings.into_iter().for_each(|t| sample.add_pass_timing(t));
        }
        debug!(generation = self.i_generation, "run complete");
        Ok(())
    }

    /// Generation index of the tile's current contents.
    pub fn i_generation(&self) -> u64 {
        self.i_generation
    }

    /// Overwrite the generation counter.
    pub fn set_i_generation(&mut self, generation: u64) {
        self.i_generation = generation;
    }

    /// The accumulated runtime sample, if runtime analysis is enabled.
    pub fn runtime_sample(&self) -> Option<&RuntimeSample> {
        self.runtime_sample.as_ref()
    }

    /// Whether compute-stage timings are being recorded.
    pub fn is_runtime_analysis_enabled(&self) -> bool {
        self.runtime_sample.is_some()
    }

    /// Enable or disable runtime analysis. Enabling starts a fresh sample;
    /// disabling discards the current one.
    pub fn set_runtime_analysis(&mut self, enabled: bool) {
        if enabled != self.is_runtime_analysis_enabled() {
            self.runtime_sample = enabled.then(RuntimeSample::new);
        }
        self.config.runtime_analysis = enabled;
    }

    /// The cell value used outside the tile.
    pub fn halo_value(&self) -> F::Cell {
        self.halo
    }

    /// The transition function.
    pub fn transition_function(&self) -> &F {
        &self.transition
    }

    /// Replace the transition function used by subsequent runs.
    pub fn set_transition_function(&mut self, transition: F) {
        self.transition = transition;
    }

    /// The validated configuration.
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }
}

impl<F: TransitionFunction> fmt::Debug for MonotileExecutor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonotileExecutor")
            .field("config", &self.config)
            .field("grid_range", &self.tile.extent())
            .field("i_generation", &self.i_generation)
            .field("runtime_sample", &self.runtime_sample)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::StageKind;
    use sluice_core::transition::FnTransition;
    use sluice_core::Window;
    use sluice_test_utils::{random_grid, reference_run, MixTransition};
    use std::time::Duration;

    fn mix_executor(
        radius: usize,
        pipeline: usize,
        tile: (usize, usize),
    ) -> MonotileExecutor<MixTransition> {
        let config = ExecutorConfig::default()
            .with_stencil_radius(radius)
            .with_pipeline_length(pipeline)
            .with_tile(tile.0, tile.1)
            .with_channel_capacity(16);
        MonotileExecutor::with_default_halo(config, MixTransition).unwrap()
    }

    fn output<F: TransitionFunction>(executor: &MonotileExecutor<F>) -> Grid<F::Cell> {
        let range = executor.grid_range();
        let mut out = Grid::filled(range.c, range.r, executor.halo_value());
        executor.copy_output(&mut out).unwrap();
        out
    }

    #[test]
    fn initial_tile_is_halo_at_capacity() {
        let executor = mix_executor(1, 2, (4, 3));
        assert_eq!(executor.grid_range(), Position::new(4, 3));
        assert!(output(&executor)
            .iter()
            .all(|(_, &c)| c == MixTransition::HALO));
        assert_eq!(executor.i_generation(), 0);
        assert!(!executor.is_runtime_analysis_enabled());
        assert!(executor.runtime_sample().is_none());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ExecutorConfig::default().with_pipeline_length(0);
        let id = FnTransition::new(0u8, |w: &mut Window<u8>| w.center_cell());
        match MonotileExecutor::new(config, 0u8, id) {
            Err(ExecutorError::Config(_)) => {}
            other => panic!("expected config error, got {:?}", other.err()),
        }
    }

    #[test]
    fn run_zero_changes_nothing() {
        let mut executor = mix_executor(1, 2, (4, 4));
        let grid = random_grid(4, 4, 1000, 5);
        executor.set_input(&grid).unwrap();
        executor.set_i_generation(9);
        executor.run(0).unwrap();
        assert_eq!(output(&executor), grid);
        assert_eq!(executor.i_generation(), 9);
    }

    #[test]
    fn multi_chunk_run_matches_reference() {
        let mut executor = mix_executor(2, 3, (6, 6));
        let grid = random_grid(5, 6, 1000, 21);
        executor.set_input(&grid).unwrap();
        executor.run(7).unwrap();
        assert_eq!(executor.i_generation(), 7);
        let expected = reference_run(&grid, 2, MixTransition::HALO, &MixTransition, 0, 7, 3);
        assert_eq!(output(&executor), expected);
    }

    #[test]
    fn stages_restart_in_every_chunk() {
        // Each cell accumulates the stage indices it was evaluated with.
        let stages = FnTransition::new(0u64, |w: &mut Window<u64>| {
            w.center_cell() * 10 + w.stage as u64 + 1
        });
        let config = ExecutorConfig::default()
            .with_pipeline_length(3)
            .with_tile(3, 2);
        let mut executor = MonotileExecutor::new(config, 0, stages.clone()).unwrap();
        let grid = Grid::filled(2, 2, 0u64);
        executor.set_input(&grid).unwrap();
        executor.run(7).unwrap();
        let expected = reference_run(&grid, 1, 0, &stages, 0, 7, 3);
        assert_eq!(output(&executor), expected);
        assert!(expected.iter().all(|(_, &c)| c == 1_231_231));
    }

    #[test]
    fn generation_overflow_is_rejected() {
        let mut executor = mix_executor(1, 2, (4, 4));
        let grid = random_grid(4, 4, 1000, 8);
        executor.set_input(&grid).unwrap();
        executor.set_i_generation(u64::MAX - 1);
        assert_eq!(
            executor.run(5),
            Err(ExecutorError::GenerationOverflow {
                current: u64::MAX - 1,
                requested: 5,
            })
        );
        assert_eq!(executor.i_generation(), u64::MAX - 1);
        assert_eq!(output(&executor), grid);
        executor.run(1).unwrap();
        assert_eq!(executor.i_generation(), u64::MAX);
    }

    #[test]
    fn set_input_does_not_reset_generation() {
        let mut executor = mix_executor(1, 2, (4, 4));
        executor.run(3).unwrap();
        executor.set_input(&random_grid(2, 2, 10, 1)).unwrap();
        assert_eq!(executor.i_generation(), 3);
        assert_eq!(executor.grid_range(), Position::new(2, 2));
    }

    #[test]
    fn oversize_input_in_one_dimension_is_rejected() {
        let mut executor = mix_executor(1, 2, (4, 4));
        let before = output(&executor);
        for (w, h) in [(5, 4), (4, 5), (5, 5)] {
            match executor.set_input(&random_grid(w, h, 10, 0)) {
                Err(ExecutorError::OversizeInput { extent, capacity }) => {
                    assert_eq!(extent, Position::new(w, h));
                    assert_eq!(capacity, Position::new(4, 4));
                }
                other => panic!("expected OversizeInput, got {other:?}"),
            }
        }
        assert_eq!(output(&executor), before);
    }

    #[test]
    fn mismatched_output_is_rejected() {
        let mut executor = mix_executor(1, 2, (4, 4));
        executor.set_input(&random_grid(3, 2, 10, 0)).unwrap();
        let mut wrong = Grid::filled(2, 3, 0u64);
        assert_eq!(
            executor.copy_output(&mut wrong),
            Err(ExecutorError::SizeMismatch {
                expected: Position::new(3, 2),
                actual: Position::new(2, 3),
            })
        );
        assert!(wrong.iter().all(|(_, &c)| c == 0));
    }

    #[test]
    fn runtime_sample_records_one_pass_per_chunk() {
        let clock = ManualClock::stepping(Duration::from_secs(1));
        let config = ExecutorConfig::default()
            .with_pipeline_length(2)
            .with_tile(4, 4)
            .with_runtime_analysis(true);
        let mut executor =
            MonotileExecutor::with_clock(config, 0u64, MixTransition, clock).unwrap();
        executor.run(5).unwrap();
        let sample = executor.runtime_sample().unwrap();
        assert_eq!(sample.n_passes(), 3);
        assert_eq!(sample.total_runtime(), 3.0);
        assert_eq!(sample.mean_speed(), 1.0);
    }

    #[test]
    fn toggling_runtime_analysis() {
        let mut executor = mix_executor(1, 1, (2, 2));
        executor.set_runtime_analysis(true);
        executor.run(2).unwrap();
        assert_eq!(executor.runtime_sample().map(RuntimeSample::n_passes), Some(2));
        executor.set_runtime_analysis(true);
        assert_eq!(executor.runtime_sample().map(RuntimeSample::n_passes), Some(2));
        executor.set_runtime_analysis(false);
        assert!(executor.runtime_sample().is_none());
        assert!(!executor.config().runtime_analysis);
    }

    #[test]
    fn failed_run_leaves_state_intact() {
        let config = ExecutorConfig::default()
            .with_pipeline_length(2)
            .with_tile(3, 3)
            .with_runtime_analysis(true);
        // Panics only in generation 3, i.e. in the second chunk.
        let flaky = FnTransition::new(0u32, |w: &mut Window<u32>| {
            assert!(w.generation != 3, "generation 3 refused");
            w.center_cell() + 1
        });
        let mut executor = MonotileExecutor::new(config, 0, flaky).unwrap();
        let grid = Grid::from_fn(3, 3, |p| (p.c + p.r) as u32);
        executor.set_input(&grid).unwrap();
        executor.set_i_generation(1);

        match executor.run(4) {
            Err(ExecutorError::StageFailed {
                stage: StageKind::Compute,
                reason,
            }) => assert!(reason.contains("generation 3 refused"), "{reason}"),
            other => panic!("expected compute failure, got {other:?}"),
        }
        assert_eq!(executor.i_generation(), 1);
        assert_eq!(output(&executor), grid);
        assert_eq!(executor.runtime_sample().map(RuntimeSample::n_passes), Some(0));

        executor.set_i_generation(4);
        executor.run(2).unwrap();
        let expected = Grid::from_fn(3, 3, |p| (p.c + p.r) as u32 + 2);
        assert_eq!(output(&executor), expected);
    }

    #[test]
    fn transition_function_can_be_replaced() {
        let config = ExecutorConfig::default().with_tile(2, 1);
        let add = |k: u32| FnTransition::new(0u32, move |w: &mut Window<u32>| w.center_cell() + k);
        let mut executor = MonotileExecutor::new(config, 0, add(1)).unwrap();
        executor.set_input(&Grid::filled(2, 1, 0)).unwrap();
        executor.run(1).unwrap();
        executor.set_transition_function(add(10));
        assert_eq!(executor.transition_function().halo(), 0);
        executor.run(1).unwrap();
        assert!(output(&executor).iter().all(|(_, &c)| c == 11));
    }
}
