//! Shared components and utilities for the canopy simulation crates.
//!
//! Typed physical quantities, sweep ranges and numeric helpers that are not
//! specific to lighting layouts live here so the engine crate stays focused
//! on photometry and optimization.

pub mod algo;
pub mod range_arg;
pub mod units;
