//! Test utilities and fixture transition functions for Sluice development.
//!
//! Provides identity-tagged cells with a self-checking transition
//! ([`TaggedCell`], [`CheckingTransition`]), deterministic mixing and Life
//! rules, seeded random grids, and a naive one-generation-at-a-time
//! [`reference_run`] that the pipelined kernel must agree with exactly.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod reference;

pub use fixtures::{tagged_grid, CheckingTransition, Life, MixTransition, TaggedCell};
pub use reference::{padded_stream, random_grid, reference_run, reference_step};
