//! Single-tile streaming executor for Sluice.
//!
//! [`MonotileExecutor`] holds one tile of cells and advances it through any
//! number of generations. Each run is split into chunks of at most
//! `pipeline_length` generations; every chunk is executed as three stages
//! on scoped threads connected by bounded channels:
//!
//! ```text
//!   stream-in ──► compute (PipelineKernel) ──► stream-out
//! ```
//!
//! Optional runtime analysis records the duration of every compute stage in
//! a [`RuntimeSample`], read from an injectable [`Clock`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod clock;
pub mod config;
pub mod error;
pub mod monotile;
pub mod runtime;
mod stream;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{ConfigError, ExecutorConfig};
pub use error::{ExecutorError, StageKind};
pub use monotile::MonotileExecutor;
pub use runtime::{PassTiming, RuntimeSample};
