//! Parallel evaluation utilities for 2-D sample arrays
//!
//! Rows of the output are filled concurrently, but every cell is produced by
//! a pure function of its (row, col) index, so the result does not depend on
//! how rayon schedules the work.

use ndarray::{Array2, Axis};
use rayon::prelude::*;

/// Build an Array2 by evaluating `cell(row, col)` for every element, rows in parallel
///
/// # Arguments
/// * `shape` - Output shape as (rows, cols)
/// * `cell` - Pure function computing one element from its index
///
/// # Returns
/// The filled array. Identical inputs always produce bit-identical output.
pub fn fill_rows_in_parallel<F>(shape: (usize, usize), cell: F) -> Array2<f64>
where
    F: Fn(usize, usize) -> f64 + Send + Sync,
{
    let mut array = Array2::<f64>::zeros(shape);

    array
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(row, mut lane)| {
            for (col, value) in lane.iter_mut().enumerate() {
                *value = cell(row, col);
            }
        });

    array
}
