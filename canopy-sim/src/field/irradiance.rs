//! Dense PPFD field over a sample grid.
//!
//! [`compute_field`] sums every fixture's point-source contribution at every
//! grid point and applies the room's bulk reflectance correction. It is the
//! hot loop of both reporting and layout search: O(points x fixtures).
//!
//! Rows are evaluated in parallel. Within a point the fixtures are folded
//! sequentially in input order, so the field is bit-identical from run to run
//! regardless of thread scheduling.

use log::debug;
use ndarray::{Array2, ArrayView2};
use shared::algo::fill_rows_in_parallel;
use shared::units::Ppfd;
use thiserror::Error;

use super::grid::{GridError, SampleGrid};
use crate::hardware::fixture::{Fixture, FixtureError};
use crate::hardware::room::{Room, RoomError};
use crate::photometry::point_source::{irradiance_contribution, CalibrationError, CalibrationProfile};

/// Error types for field computation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("invalid room: {0}")]
    Room(#[from] RoomError),
    #[error("invalid grid: {0}")]
    Grid(#[from] GridError),
    #[error("invalid fixture #{index}: {source}")]
    Fixture {
        index: usize,
        #[source]
        source: FixtureError,
    },
    #[error("invalid calibration: {0}")]
    Calibration(#[from] CalibrationError),
    #[error("working height must be finite, got {0}")]
    WorkingHeight(f64),
}

/// PPFD sampled at every point of a [`SampleGrid`].
///
/// Built fresh for each fixture configuration and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct IrradianceField {
    grid: SampleGrid,
    values: Array2<f64>,
    working_height: f64,
}

impl IrradianceField {
    pub fn grid(&self) -> &SampleGrid {
        &self.grid
    }

    /// Height of the plane the field was sampled on
    pub fn working_height(&self) -> f64 {
        self.working_height
    }

    /// Raw PPFD values in µmol/m²/s, shape (rows, cols) as [`SampleGrid::shape`]
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// PPFD at grid index (row, col)
    pub fn ppfd_at(&self, row: usize, col: usize) -> Option<Ppfd> {
        self.values.get((row, col)).copied().map(Ppfd::new)
    }

    /// PPFD values in row-major order
    pub fn iter(&self) -> impl Iterator<Item = Ppfd> + '_ {
        self.values.iter().copied().map(Ppfd::new)
    }

    /// Values flattened into a row-major vector
    pub fn to_vec(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }

    /// `(x, y, ppfd)` triples in row-major order, for heat-map consumers
    pub fn samples(&self) -> impl Iterator<Item = (f64, f64, Ppfd)> + '_ {
        self.grid
            .points()
            .zip(self.values.iter())
            .map(|((x, y), &v)| (x, y, Ppfd::new(v)))
    }
}

/// Aggregate all fixture contributions on the plane z = `working_height`.
///
/// An empty fixture list is valid and yields an all-zero field.
///
/// # Arguments
/// * `room` - Room supplying the reflectance correction; must be valid
/// * `fixtures` - Fixtures to sum, in any order
/// * `grid` - Sample lattice, normally built from the same room
/// * `working_height` - Height of the canopy plane
/// * `calibration` - Point-source model constants
pub fn compute_field(
    room: &Room,
    fixtures: &[Fixture],
    grid: &SampleGrid,
    working_height: f64,
    calibration: &CalibrationProfile,
) -> Result<IrradianceField, FieldError> {
    room.validate()?;
    calibration.validate()?;
    if !working_height.is_finite() {
        return Err(FieldError::WorkingHeight(working_height));
    }
    for (index, fixture) in fixtures.iter().enumerate() {
        fixture
            .validate()
            .map_err(|source| FieldError::Fixture { index, source })?;
    }

    let correction = room.reflectance.bulk_correction();
    let xs = grid.xs();
    let ys = grid.ys();

    debug!(
        "Computing field: {}x{} points, {} fixtures, correction {:.3}",
        ys.len(),
        xs.len(),
        fixtures.len(),
        correction
    );

    let values = fill_rows_in_parallel(grid.shape(), |row, col| {
        let (x, y) = (xs[col], ys[row]);
        let total = fixtures.iter().fold(0.0, |acc, fixture| {
            acc + irradiance_contribution(fixture, x, y, working_height, calibration).value()
        });
        total * correction
    });

    Ok(IrradianceField {
        grid: grid.clone(),
        values,
        working_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::fixture::models::LED_PANEL_320W;
    use crate::hardware::room::SurfaceReflectance;
    use approx::assert_relative_eq;

    fn setup() -> (Room, SampleGrid) {
        let room = Room::new(4.0, 3.0, 3.0, SurfaceReflectance::default()).unwrap();
        let grid = SampleGrid::build(&room, 0.5).unwrap();
        (room, grid)
    }

    #[test]
    fn test_empty_fixture_list_is_dark() {
        let (room, grid) = setup();
        let field = compute_field(&room, &[], &grid, 0.9, &CalibrationProfile::default()).unwrap();
        assert_eq!(field.shape(), (7, 9));
        assert!(field.iter().all(|v| v == Ppfd::ZERO));
    }

    #[test]
    fn test_single_fixture_matches_point_model() {
        let (room, grid) = setup();
        let cal = CalibrationProfile::default();
        let fixture = LED_PANEL_320W.place(2.0, 1.5, 2.5);
        let field = compute_field(&room, &[fixture.clone()], &grid, 0.9, &cal).unwrap();

        let correction = room.reflectance.bulk_correction();
        for (x, y, ppfd) in field.samples() {
            let direct = irradiance_contribution(&fixture, x, y, 0.9, &cal).value();
            assert_relative_eq!(ppfd.value(), direct * correction, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_contributions_add() {
        let (room, grid) = setup();
        let cal = CalibrationProfile::default();
        let a = LED_PANEL_320W.place(1.0, 1.0, 2.5);
        let b = LED_PANEL_320W.place(3.0, 2.0, 2.5);

        let fa = compute_field(&room, &[a.clone()], &grid, 0.9, &cal).unwrap();
        let fb = compute_field(&room, &[b.clone()], &grid, 0.9, &cal).unwrap();
        let both = compute_field(&room, &[a, b], &grid, 0.9, &cal).unwrap();

        for ((va, vb), vab) in fa.iter().zip(fb.iter()).zip(both.iter()) {
            assert_relative_eq!(vab.value(), va.value() + vb.value(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_brightest_point_under_fixture() {
        let (room, grid) = setup();
        let fixture = LED_PANEL_320W.place(2.0, 1.5, 2.5);
        let field =
            compute_field(&room, &[fixture], &grid, 0.9, &CalibrationProfile::default()).unwrap();

        let centre = field.ppfd_at(3, 4).unwrap();
        assert!(field.iter().all(|v| v <= centre));
        assert_eq!(field.ppfd_at(99, 0), None);
    }

    #[test]
    fn test_validation_errors() {
        let (room, grid) = setup();
        let cal = CalibrationProfile::default();
        let bad = LED_PANEL_320W.place(1.0, 1.0, 2.5).with_dimming(-1.0);
        let good = LED_PANEL_320W.place(2.0, 2.0, 2.5);

        let err = compute_field(&room, &[good, bad], &grid, 0.9, &cal).unwrap_err();
        assert!(matches!(err, FieldError::Fixture { index: 1, .. }));

        assert_eq!(
            compute_field(&room, &[], &grid, f64::NAN, &cal).unwrap_err().to_string(),
            "working height must be finite, got NaN"
        );

        let mut thin = room.clone();
        thin.width = -1.0;
        assert!(matches!(
            compute_field(&thin, &[], &grid, 0.9, &cal),
            Err(FieldError::Room(_))
        ));
    }
}
