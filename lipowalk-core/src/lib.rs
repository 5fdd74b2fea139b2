//! # lipowalk-core
//!
//! Random-walk escape simulation of walkers leaving a one-dimensional liposome.
//!
//! The domain is the interval `(0, 1]`. The wall at `x = 0` reflects: a walker
//! never takes a left step that would reach or cross it. The membrane at
//! `x = 1` absorbs: a walker that ends a step strictly beyond it has escaped
//! and leaves the population for good.
//!
//! ### Key Submodules:
//! - `rng`: per-walker random streams derived from one base seed
//! - `walker`: a single particle and its boundary rules
//! - `engine`: round-by-round population driver (sequential and sharded)
//! - `records`: time series and final-position datasets produced by a run

pub mod config;
pub mod engine;
pub mod error;
pub mod records;
pub mod rng;
pub mod walker;

pub use error::SimulationError;
