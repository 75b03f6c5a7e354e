//! The generation-pipelined kernel.
//!
//! [`PipelineKernel`] chains one [`GenerationStage`] per generation of a
//! pass. Every input cell is pushed through the chain immediately: when a
//! stage emits a cell, that cell is the next input of the following stage,
//! so all generations advance in lockstep behind the stream head. After the
//! last stage the halo ring and the unused tile capacity are stripped, and
//! only the logical grid reaches the sink.
//!
//! The kernel signals no errors of its own. Size contract violations panic
//! at construction; errors returned by the sink are propagated unchanged.

use std::ops::Range;

use sluice_core::TransitionFunction;
use tracing::{debug, trace};

use crate::layout::PaddedLayout;
use crate::stage::GenerationStage;

/// Counters reported by a completed kernel pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KernelStats {
    /// Padded input cells consumed.
    pub consumed: usize,
    /// Logical grid cells delivered to the sink.
    pub emitted: usize,
    /// Transition-function evaluations across all stages.
    pub evaluations: u64,
}

/// A multi-generation streaming pass over one tile.
///
/// # Examples
///
/// ```
/// use sluice_core::{transition::FnTransition, Offset, Position, Window};
/// use sluice_kernel::{PaddedLayout, PipelineKernel};
///
/// // Every generation, take the value of the upper neighbor.
/// let fall = FnTransition::new(0u32, |w: &mut Window<u32>| w[Offset::new(0, -1)]);
/// let layout = PaddedLayout::new(1, Position::new(1, 4), Position::new(1, 4));
/// let kernel = PipelineKernel::new(&fall, layout, 2, 0..2, 0);
///
/// let input = (0..layout.stream_len()).map(|i| match layout.grid_position(i) {
///     Some(p) => p.r as u32 + 1,
///     None => 0,
/// });
/// let mut out = Vec::new();
/// kernel.execute(input, |cell| -> Result<(), ()> {
///     out.push(cell);
///     Ok(())
/// }).unwrap();
/// assert_eq!(out, vec![0, 0, 1, 2]);
/// ```
pub struct PipelineKernel<'f, F: TransitionFunction + ?Sized> {
    transition: &'f F,
    layout: PaddedLayout,
    halo: F::Cell,
    stages: Vec<GenerationStage<F::Cell>>,
    target_generation: u64,
    /// Padded positions that have left the last stage.
    drained: usize,
    consumed: usize,
    emitted: usize,
}

impl<'f, F: TransitionFunction + ?Sized> PipelineKernel<'f, F> {
    /// Prepare a pass advancing generation `generations.start` to
    /// `generations.end`.
    ///
    /// # Panics
    ///
    /// Panics if `pipeline_length` is zero, if the generation range is
    /// reversed, or if it spans more than `pipeline_length` generations.
    pub fn new(
        transition: &'f F,
        layout: PaddedLayout,
        pipeline_length: usize,
        generations: Range<u64>,
        halo: F::Cell,
    ) -> Self {
        assert!(pipeline_length >= 1, "pipeline_length must be at least 1");
        assert!(
            generations.start <= generations.end,
            "generation range {generations:?} is reversed"
        );
        let depth = usize::try_from(generations.end - generations.start)
            .ok()
            .filter(|&d| d <= pipeline_length)
            .unwrap_or_else(|| {
                panic!("generation range {generations:?} exceeds pipeline length {pipeline_length}")
            });
        let stages = (0..depth)
            .map(|k| GenerationStage::new(layout, generations.start + k as u64, k, halo))
            .collect();
        Self {
            transition,
            layout,
            halo,
            stages,
            target_generation: generations.end,
            drained: 0,
            consumed: 0,
            emitted: 0,
        }
    }

    /// Stream geometry of this pass.
    pub fn layout(&self) -> &PaddedLayout {
        &self.layout
    }

    /// Number of generations evaluated by this pass.
    pub fn depth(&self) -> usize {
        self.stages.len()
    }

    /// Generation of the cells delivered to the sink.
    pub fn target_generation(&self) -> u64 {
        self.target_generation
    }

    /// Feed the next padded input cell, forwarding any logical-grid output
    /// to `sink`.
    ///
    /// Input at positions outside the logical grid is replaced with the
    /// halo value, so callers may stream arbitrary filler there.
    pub fn push<E>(
        &mut self,
        cell: F::Cell,
        sink: &mut impl FnMut(F::Cell) -> Result<(), E>,
    ) -> Result<(), E> {
        let i = self.consumed;
        self.consumed += 1;
        let cell = if self.layout.grid_position(i).is_some() {
            cell
        } else {
            self.halo
        };
        self.advance(0, cell, sink)
    }

    /// Drain every stage after the input stream has ended and report the
    /// pass counters.
    pub fn finish<E>(
        mut self,
        sink: &mut impl FnMut(F::Cell) -> Result<(), E>,
    ) -> Result<KernelStats, E> {
        if self.consumed != self.layout.stream_len() {
            debug!(
                consumed = self.consumed,
                expected = self.layout.stream_len(),
                "kernel input stream ended early"
            );
        }
        for k in 0..self.stages.len() {
            let tail: Vec<F::Cell> = self.stages[k].flush().collect();
            trace!(stage = k, cells = tail.len(), "flushing stage tail");
            for cell in tail {
                self.advance(k + 1, cell, sink)?;
            }
        }
        let stats = KernelStats {
            consumed: self.consumed,
            emitted: self.emitted,
            evaluations: self.stages.iter().map(GenerationStage::evaluations).sum(),
        };
        debug!(
            depth = self.stages.len(),
            target_generation = self.target_generation,
            consumed = stats.consumed,
            emitted = stats.emitted,
            evaluations = stats.evaluations,
            "kernel pass complete"
        );
        Ok(stats)
    }

    /// Run a whole pass: push every cell of `input`, then finish.
    pub fn execute<I, S, E>(mut self, input: I, mut sink: S) -> Result<KernelStats, E>
    where
        I: IntoIterator<Item = F::Cell>,
        S: FnMut(F::Cell) -> Result<(), E>,
    {
        for cell in input {
            self.push(cell, &mut sink)?;
        }
        self.finish(&mut sink)
    }

    /// Push `cell` into stage `from` and carry it through the rest of the
    /// chain as far as it goes.
    fn advance<E>(
        &mut self,
        from: usize,
        cell: F::Cell,
        sink: &mut impl FnMut(F::Cell) -> Result<(), E>,
    ) -> Result<(), E> {
        let mut carried = Some(cell);
        for stage in &mut self.stages[from..] {
            match carried {
                Some(c) => carried = stage.push(c, self.transition),
                None => return Ok(()),
            }
        }
        match carried {
            Some(c) => self.drain(c, sink),
            None => Ok(()),
        }
    }

    /// Strip the halo from the last stage's output.
    fn drain<E>(
        &mut self,
        cell: F::Cell,
        sink: &mut impl FnMut(F::Cell) -> Result<(), E>,
    ) -> Result<(), E> {
        let j = self.drained;
        self.drained += 1;
        if self.layout.grid_position(j).is_some() {
            self.emitted += 1;
            sink(cell)?;
        }
        Ok(())
    }
}

impl<F: TransitionFunction + ?Sized> std::fmt::Debug for PipelineKernel<'_, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineKernel")
            .field("layout", &self.layout)
            .field("depth", &self.stages.len())
            .field("target_generation", &self.target_generation)
            .field("consumed", &self.consumed)
            .field("emitted", &self.emitted)
            .finish()
    }
}
