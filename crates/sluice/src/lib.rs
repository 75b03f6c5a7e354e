//! Sluice: a streaming, generation-pipelined stencil engine.
//!
//! Sluice advances a 2D grid of cells through generations of a
//! user-supplied [`TransitionFunction`](prelude::TransitionFunction). The
//! grid is streamed column by column through a chain of pipeline stages,
//! one per generation, so several generations are computed in a single
//! pass over memory.
//!
//! This facade re-exports the public API of the workspace crates.
//!
//! # Quick start
//!
//! ```
//! use sluice::prelude::*;
//!
//! struct Blur;
//!
//! impl TransitionFunction for Blur {
//!     type Cell = f32;
//!
//!     fn halo(&self) -> f32 {
//!         0.0
//!     }
//!
//!     fn transition(&self, w: &mut Window<f32>) -> f32 {
//!         w.iter().map(|(_, &v)| v).sum::<f32>() / 9.0
//!     }
//! }
//!
//! let config = ExecutorConfig::default().with_tile(16, 16);
//! let mut executor = MonotileExecutor::with_default_halo(config, Blur).unwrap();
//! executor.set_input(&Grid::filled(16, 16, 9.0)).unwrap();
//! executor.run(3).unwrap();
//!
//! let mut out = Grid::filled(16, 16, 0.0);
//! executor.copy_output(&mut out).unwrap();
//! assert_eq!(out[Position::new(8, 8)], 9.0);
//! assert!(out[Position::new(0, 0)] < 9.0);
//! ```
//!
//! # Crate organization
//!
//! | Module | Source crate | Contents |
//! |--------|-------------|----------|
//! | [`types`] | `sluice-core` | `Cell`, `Coord`, `Grid`, `Window`, `TransitionFunction` |
//! | [`kernel`] | `sluice-kernel` | `PaddedLayout`, `GenerationStage`, `PipelineKernel` |
//! | [`engine`] | `sluice-engine` | `MonotileExecutor`, `ExecutorConfig`, `RuntimeSample`, clocks |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types: coordinates, grids, windows, and the transition contract.
pub mod types {
    pub use sluice_core::*;
}

/// The generation-pipelined kernel and its stream geometry.
pub mod kernel {
    pub use sluice_kernel::*;
}

/// The single-tile executor, configuration, errors, and runtime telemetry.
pub mod engine {
    pub use sluice_engine::*;
}

/// Common imports for typical usage.
///
/// ```
/// use sluice::prelude::*;
/// ```
pub mod prelude {
    pub use sluice_core::transition::FnTransition;
    pub use sluice_core::{Cell, Grid, Offset, Position, TransitionFunction, Window};
    pub use sluice_engine::{
        Clock, ExecutorConfig, ExecutorError, MonotileExecutor, MonotonicClock, RuntimeSample,
    };
}
