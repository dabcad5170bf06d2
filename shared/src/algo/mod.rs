//! Numeric building blocks for field simulations
//!
//! Single-pass summaries, sample statistics and deterministic parallel
//! evaluation of 2-D sample arrays.

pub mod parallel;
pub mod stats;
pub mod summary_scan;

pub use parallel::fill_rows_in_parallel;
pub use stats::{coefficient_of_variation_pct, mean, population_std_dev};
pub use summary_scan::{SummaryError, SummaryScan};
