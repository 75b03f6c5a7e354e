//! Errors surfaced by the executor.

use std::error::Error;
use std::fmt;

use sluice_core::Position;

use crate::config::ConfigError;

/// The streaming stage a failure originated in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageKind {
    /// Reads the current tile and emits the halo-padded stream.
    StreamIn,
    /// Runs the pipelined kernel.
    Compute,
    /// Collects the kernel output into the spare tile.
    StreamOut,
}

impl StageKind {
    /// Thread name used for this stage.
    pub fn thread_name(self) -> &'static str {
        match self {
            Self::StreamIn => "sluice-stream-in",
            Self::Compute => "sluice-compute",
            Self::StreamOut => "sluice-stream-out",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StreamIn => write!(f, "stream-in"),
            Self::Compute => write!(f, "compute"),
            Self::StreamOut => write!(f, "stream-out"),
        }
    }
}

/// Errors returned by [`MonotileExecutor`](crate::monotile::MonotileExecutor).
///
/// `OversizeInput`, `SizeMismatch` and `GenerationOverflow` are recoverable:
/// the executor state is untouched. `StageFailed` aborts the whole `run`;
/// the executor keeps the tile and generation it had before the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecutorError {
    /// An input buffer exceeds the tile capacity in some dimension.
    OversizeInput {
        /// Extents of the rejected buffer.
        extent: Position,
        /// The tile capacity.
        capacity: Position,
    },
    /// An output buffer's extents differ from the tile's.
    SizeMismatch {
        /// The tile's current extents.
        expected: Position,
        /// Extents of the supplied buffer.
        actual: Position,
    },
    /// A streaming stage panicked, could not start, or lost its peer.
    StageFailed {
        /// The failing stage.
        stage: StageKind,
        /// Description of the failure.
        reason: String,
    },
    /// Advancing by the requested number of generations would overflow the
    /// generation counter.
    GenerationOverflow {
        /// The generation counter before the call.
        current: u64,
        /// Generations requested.
        requested: u64,
    },
    /// The executor configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for ExecutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OversizeInput { extent, capacity } => write!(
                f,
                "input {}x{} exceeds tile capacity {}x{}",
                extent.c, extent.r, capacity.c, capacity.r
            ),
            Self::SizeMismatch { expected, actual } => write!(
                f,
                "output buffer is {}x{}, tile is {}x{}",
                actual.c, actual.r, expected.c, expected.r
            ),
            Self::StageFailed { stage, reason } => write!(f, "{stage} stage failed: {reason}"),
            Self::GenerationOverflow { current, requested } => write!(
                f,
                "advancing generation {current} by {requested} overflows the generation counter"
            ),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl Error for ExecutorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for ExecutorError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
