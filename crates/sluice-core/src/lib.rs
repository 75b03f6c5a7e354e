//! Core types and traits for the Sluice stencil streaming engine.
//!
//! This is the leaf crate with no internal dependencies. It defines the
//! abstractions shared by the kernel and the executor: coordinates, the
//! dense [`Grid`] buffer, the [`Window`] handed to transition functions,
//! and the [`TransitionFunction`] contract itself.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod coord;
pub mod error;
pub mod grid;
pub mod transition;
pub mod window;

pub use cell::Cell;
pub use coord::{Coord, Index, Offset, Position, UIndex};
pub use error::GridError;
pub use grid::Grid;
pub use transition::TransitionFunction;
pub use window::Window;
