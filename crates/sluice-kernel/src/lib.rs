//! Generation-pipelined stencil kernel for Sluice.
//!
//! The kernel consumes one tile as a column-major, halo-padded stream and
//! advances it by several generations in a single pass. Each generation is
//! a [`GenerationStage`] that keeps only a [`ShiftBuffer`] of the last
//! `2R + 1` padded columns; stages are chained so that stage `k`'s output
//! stream is stage `k + 1`'s input. [`PaddedLayout`] owns the index
//! arithmetic shared by the kernel and the executor's stream stages.
//!
//! ```text
//!  padded input ──► stage g0 ──► stage g0+1 ──► … ──► stage g1-1 ──► strip halo ──► output
//!  (W+2R)(H+2R)      ring of 2R+1 columns each          W x H cells
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod layout;
pub mod pipeline;
pub mod shift;
pub mod stage;

pub use layout::PaddedLayout;
pub use pipeline::{KernelStats, PipelineKernel};
pub use shift::ShiftBuffer;
pub use stage::GenerationStage;
