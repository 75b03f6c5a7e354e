//! Error types for grid construction.

use std::error::Error;
use std::fmt;

use crate::coord::Position;

/// Errors arising when building a [`Grid`](crate::Grid) from raw data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    /// The supplied cell vector does not cover the requested extent.
    LengthMismatch {
        /// The requested `(width, height)`.
        extent: Position,
        /// Number of cells actually supplied.
        actual: usize,
    },
    /// `width * height` does not fit in `usize`.
    ExtentOverflow {
        /// The requested `(width, height)`.
        extent: Position,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch { extent, actual } => write!(
                f,
                "grid of extent {extent} needs {} cells, got {actual}",
                extent.c.saturating_mul(extent.r)
            ),
            Self::ExtentOverflow { extent } => {
                write!(f, "grid extent {extent} overflows usize")
            }
        }
    }
}

impl Error for GridError {}
