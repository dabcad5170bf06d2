//! Regular sample lattice over a room footprint.
//!
//! Axis samples start at 0 and advance by the resolution; when the room
//! extent is not a whole multiple of the resolution the far wall is appended
//! as a final, shorter step, so both boundaries are always sampled. Points are
//! ordered row-major: `y` selects the row, `x` the column.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hardware::room::{Room, RoomError};

/// Largest lattice a single field computation will allocate
pub const MAX_GRID_POINTS: usize = 4_000_000;

/// Steps shorter than this fraction of the resolution are absorbed into the boundary
const BOUNDARY_SNAP: f64 = 1e-9;

/// Error types for grid construction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("grid resolution must be positive and finite, got {0}")]
    InvalidResolution(f64),
    #[error("grid of {points} points exceeds the limit of {limit}")]
    TooManyPoints { points: usize, limit: usize },
    #[error("invalid room: {0}")]
    Room(#[from] RoomError),
}

/// Evenly spaced (x, y) sample positions covering `[0, width] x [0, length]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleGrid {
    xs: Vec<f64>,
    ys: Vec<f64>,
    resolution: f64,
}

impl SampleGrid {
    /// Build the lattice for `room` at the given spacing.
    ///
    /// Deterministic: identical inputs produce an identical point sequence,
    /// which lets fields from different fixture sets be compared sample by
    /// sample.
    pub fn build(room: &Room, resolution: f64) -> Result<Self, GridError> {
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(GridError::InvalidResolution(resolution));
        }
        room.validate()?;

        let nx = axis_len(room.width, resolution);
        let ny = axis_len(room.length, resolution);
        let points = nx.saturating_mul(ny);
        if points > MAX_GRID_POINTS {
            return Err(GridError::TooManyPoints {
                points,
                limit: MAX_GRID_POINTS,
            });
        }

        Ok(Self {
            xs: axis_samples(room.width, resolution),
            ys: axis_samples(room.length, resolution),
            resolution,
        })
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Sample positions along x (columns)
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Sample positions along y (rows)
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// (rows, cols) of the lattice, matching the field array shape
    pub fn shape(&self) -> (usize, usize) {
        (self.ys.len(), self.xs.len())
    }

    pub fn len(&self) -> usize {
        self.xs.len() * self.ys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position of the sample at (row, col), if in range
    pub fn point(&self, row: usize, col: usize) -> Option<(f64, f64)> {
        Some((*self.xs.get(col)?, *self.ys.get(row)?))
    }

    /// All sample positions in row-major order
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.ys
            .iter()
            .flat_map(move |&y| self.xs.iter().map(move |&x| (x, y)))
    }
}

fn axis_len(extent: f64, resolution: f64) -> usize {
    let steps = (extent / resolution + BOUNDARY_SNAP).floor();
    if steps >= (MAX_GRID_POINTS as f64) {
        return MAX_GRID_POINTS + 1;
    }
    let covered = steps * resolution;
    let tail = usize::from(extent - covered > BOUNDARY_SNAP * resolution);
    steps as usize + 1 + tail
}

fn axis_samples(extent: f64, resolution: f64) -> Vec<f64> {
    let n = axis_len(extent, resolution);
    let mut samples: Vec<f64> = (0..n).map(|i| (i as f64 * resolution).min(extent)).collect();
    if let Some(last) = samples.last_mut() {
        *last = extent;
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::room::SurfaceReflectance;

    fn room(width: f64, length: f64) -> Room {
        Room::new(width, length, 3.0, SurfaceReflectance::default()).unwrap()
    }

    #[test]
    fn test_exact_multiple_includes_boundary() {
        let grid = SampleGrid::build(&room(4.0, 2.0), 0.5).unwrap();
        assert_eq!(grid.shape(), (5, 9));
        assert_eq!(grid.xs().first(), Some(&0.0));
        assert_eq!(grid.xs().last(), Some(&4.0));
        assert_eq!(grid.ys(), &[0.0, 0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn test_inexact_extent_appends_wall() {
        let grid = SampleGrid::build(&room(1.1, 1.0), 0.5).unwrap();
        assert_eq!(grid.xs(), &[0.0, 0.5, 1.0, 1.1]);
    }

    #[test]
    fn test_row_major_order() {
        let grid = SampleGrid::build(&room(1.0, 0.5), 0.5).unwrap();
        let points: Vec<_> = grid.points().collect();
        assert_eq!(
            points,
            vec![(0.0, 0.0), (0.5, 0.0), (1.0, 0.0), (0.0, 0.5), (0.5, 0.5), (1.0, 0.5)]
        );
        assert_eq!(grid.point(1, 2), Some((1.0, 0.5)));
        assert_eq!(grid.point(2, 0), None);
        assert_eq!(grid.len(), 6);
    }

    #[test]
    fn test_deterministic() {
        let r = room(7.3, 5.9);
        assert_eq!(SampleGrid::build(&r, 0.15).unwrap(), SampleGrid::build(&r, 0.15).unwrap());
    }

    #[test]
    fn test_resolution_coarser_than_room() {
        let grid = SampleGrid::build(&room(0.4, 0.4), 1.0).unwrap();
        assert_eq!(grid.xs(), &[0.0, 0.4]);
    }

    #[test]
    fn test_rejects_bad_input() {
        let r = room(4.0, 4.0);
        assert_eq!(SampleGrid::build(&r, 0.0), Err(GridError::InvalidResolution(0.0)));
        assert!(SampleGrid::build(&r, f64::NAN).is_err());
        assert!(matches!(
            SampleGrid::build(&room(1000.0, 1000.0), 0.1),
            Err(GridError::TooManyPoints { .. })
        ));

        let flat = Room {
            width: 4.0,
            length: 4.0,
            height: 0.0,
            reflectance: SurfaceReflectance::default(),
        };
        assert!(matches!(SampleGrid::build(&flat, 0.5), Err(GridError::Room(_))));
    }
}
