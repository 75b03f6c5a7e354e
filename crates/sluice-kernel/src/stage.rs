//! One generation of the systolic pipeline.
//!
//! A [`GenerationStage`] receives the padded stream of generation `g` and
//! emits the padded stream of generation `g + 1`, one output cell per
//! input cell, delayed by [`PaddedLayout::lag`] cells. Output index `j`
//! is produced when input index `j + lag` arrives: that input is the
//! bottom-right corner of the window around `j`, so the window is
//! complete exactly then.
//!
//! Positions outside the logical grid are emitted as halo without calling
//! the transition function. Since the first stage's input already carries
//! halo there, every generation sees halo outside the grid, which is what
//! a one-generation-at-a-time re-scan would see.

use sluice_core::{Cell, TransitionFunction, Window};

use crate::layout::PaddedLayout;
use crate::shift::ShiftBuffer;

/// State of one pipeline stage.
#[derive(Clone, Debug)]
pub struct GenerationStage<C> {
    layout: PaddedLayout,
    shift: ShiftBuffer<C>,
    window: Window<C>,
    halo: C,
    generation: u64,
    stage: usize,
    received: usize,
    emitted: usize,
    evaluations: u64,
}

impl<C: Cell> GenerationStage<C> {
    /// Create the stage that turns generation `generation` into
    /// `generation + 1`. `stage` is its index within the pass.
    pub fn new(layout: PaddedLayout, generation: u64, stage: usize, halo: C) -> Self {
        Self {
            layout,
            shift: ShiftBuffer::new(layout.radius(), layout.padded().r, halo),
            window: Window::new(layout.radius(), halo),
            halo,
            generation,
            stage,
            received: 0,
            emitted: 0,
            evaluations: 0,
        }
    }

    /// Generation of the cells this stage consumes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Index of this stage within the pass.
    pub fn stage(&self) -> usize {
        self.stage
    }

    /// Cells received so far.
    pub fn received(&self) -> usize {
        self.received
    }

    /// Cells emitted so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Number of transition-function evaluations performed so far.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Feed the next input cell; returns the next output cell once the
    /// stage has filled its lag.
    pub fn push<F>(&mut self, cell: C, transition: &F) -> Option<C>
    where
        F: TransitionFunction<Cell = C> + ?Sized,
    {
        let i = self.received;
        self.received += 1;
        self.shift.store(self.layout.padded_position(i), cell);
        let j = i.checked_sub(self.layout.lag())?;
        Some(self.emit(j, transition))
    }

    /// Emit the outputs still owed after the input stream has ended.
    ///
    /// With a complete input these are the trailing halo-ring positions,
    /// whose windows would reach past the end of the stream.
    pub fn flush(&mut self) -> impl Iterator<Item = C> + '_ {
        let owed = self.layout.stream_len().saturating_sub(self.emitted);
        debug_assert!(
            self.received < self.layout.stream_len()
                || (self.emitted..self.layout.stream_len())
                    .all(|j| self.layout.grid_position(j).is_none()),
            "trailing positions of a complete stream must be halo"
        );
        self.emitted += owed;
        std::iter::repeat(self.halo).take(owed)
    }

    fn emit<F>(&mut self, j: usize, transition: &F) -> C
    where
        F: TransitionFunction<Cell = C> + ?Sized,
    {
        self.emitted += 1;
        let Some(center) = self.layout.grid_position(j) else {
            return self.halo;
        };
        self.shift
            .fill_window(self.layout.padded_position(j), &mut self.window);
        self.window.generation = self.generation;
        self.window.stage = self.stage;
        self.window.center = center;
        self.window.grid_range = self.layout.grid_extent();
        self.evaluations += 1;
        transition.transition(&mut self.window)
    }
}
