//! Candidate fixture layouts and layout geometry metrics

use shared::algo::coefficient_of_variation_pct;
use shared::range_arg::RangeArg;
use thiserror::Error;

use crate::hardware::fixture::Fixture;
use crate::hardware::room::Room;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("fixture spacing must be positive and finite, got {0}")]
    NonPositiveSpacing(f64),
    #[error("spacing {spacing} needs {count} fixtures, more than the limit of {limit}")]
    TooManyFixtures { spacing: f64, count: f64, limit: usize },
}

/// Largest fixture grid a single layout may hold
pub const MAX_LAYOUT_FIXTURES: usize = 10_000;

/// Validated spacing values of a sweep, in sweep order
pub fn spacing_candidates(sweep: &RangeArg) -> Result<Vec<f64>, LayoutError> {
    sweep
        .values()
        .map(|spacing| {
            if spacing.is_finite() && spacing > 0.0 {
                Ok(spacing)
            } else {
                Err(LayoutError::NonPositiveSpacing(spacing))
            }
        })
        .collect()
}

/// Number of fixtures fitting along an extent at a spacing, at least one
fn count_along(extent: f64, spacing: f64) -> f64 {
    (extent / spacing).floor().max(1.0)
}

/// Offsets of `count` fixtures spaced evenly and centred on `[0, extent]`
fn centred_positions(extent: f64, spacing: f64, count: usize) -> impl Iterator<Item = f64> {
    let start = (extent - (count - 1) as f64 * spacing) / 2.0;
    (0..count).map(move |i| start + i as f64 * spacing)
}

/// Rectangular grid of copies of `template`, centred in the room footprint.
///
/// Each axis holds `max(1, floor(extent / spacing))` fixtures. Only the x
/// and y of the template change; height, dimming and model are kept.
/// Grids larger than [`MAX_LAYOUT_FIXTURES`] are rejected before allocating.
pub fn grid_layout(room: &Room, spacing: f64, template: &Fixture) -> Result<Vec<Fixture>, LayoutError> {
    if !(spacing.is_finite() && spacing > 0.0) {
        return Err(LayoutError::NonPositiveSpacing(spacing));
    }
    let (cols, rows) = (count_along(room.width, spacing), count_along(room.length, spacing));
    let count = cols * rows;
    if !(count <= MAX_LAYOUT_FIXTURES as f64) {
        return Err(LayoutError::TooManyFixtures {
            spacing,
            count,
            limit: MAX_LAYOUT_FIXTURES,
        });
    }
    let (cols, rows) = (cols as usize, rows as usize);

    let xs: Vec<f64> = centred_positions(room.width, spacing, cols).collect();
    let layout = centred_positions(room.length, spacing, rows)
        .flat_map(|y| {
            xs.iter().map(move |&x| Fixture {
                x,
                y,
                ..template.clone()
            })
        })
        .collect();
    Ok(layout)
}

/// Coefficient of variation (percent) of nearest-neighbour distances
/// between emitting fixtures, measured in plan.
///
/// A perfectly regular grid scores 0; fewer than two emitting fixtures also
/// score 0 since there is no spacing to compare.
pub fn fixture_spacing_cv(fixtures: &[Fixture]) -> f64 {
    let active: Vec<&Fixture> = fixtures.iter().filter(|f| f.is_emitting()).collect();
    if active.len() < 2 {
        return 0.0;
    }

    let nearest: Vec<f64> = active
        .iter()
        .enumerate()
        .map(|(i, a)| {
            active
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, b)| (a.x - b.x).hypot(a.y - b.y))
                .fold(f64::INFINITY, f64::min)
        })
        .collect();

    coefficient_of_variation_pct(&nearest)
}

/// Purchase cost of a layout, `None` if any fixture model has no unit cost
pub fn layout_cost(fixtures: &[Fixture]) -> Option<f64> {
    fixtures.iter().map(|f| f.model.unit_cost).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::fixture::models::{LED_BAR_680W, LED_PANEL_320W};
    use crate::hardware::fixture::FixtureModel;
    use crate::hardware::room::SurfaceReflectance;
    use approx::assert_relative_eq;
    use shared::units::{Power, PowerExt, Ppf};

    fn room(width: f64, length: f64) -> Room {
        Room::new(width, length, 3.0, SurfaceReflectance::default()).unwrap()
    }

    #[test]
    fn test_grid_is_centred() {
        let template = LED_BAR_680W.place(0.0, 0.0, 2.7).with_dimming(80.0);
        let layout = grid_layout(&room(10.0, 6.0), 2.0, &template).unwrap();

        // 5 columns x 3 rows
        assert_eq!(layout.len(), 15);
        let xs: Vec<f64> = layout.iter().take(5).map(|f| f.x).collect();
        assert_eq!(xs, vec![1.0, 3.0, 5.0, 7.0, 9.0]);
        assert_eq!(layout[0].y, 1.0);
        assert_eq!(layout[14].y, 5.0);
        assert!(layout.iter().all(|f| f.z == 2.7 && f.dimming_pct == 80.0));
    }

    #[test]
    fn test_small_room_gets_one_fixture() {
        let template = LED_PANEL_320W.place(0.0, 0.0, 2.0);
        let layout = grid_layout(&room(1.2, 0.8), 2.5, &template).unwrap();
        assert_eq!(layout.len(), 1);
        assert_relative_eq!(layout[0].x, 0.6);
        assert_relative_eq!(layout[0].y, 0.4);
    }

    #[test]
    fn test_spacing_validation() {
        let template = LED_PANEL_320W.place(0.0, 0.0, 2.0);
        assert_eq!(
            grid_layout(&room(4.0, 4.0), 0.0, &template),
            Err(LayoutError::NonPositiveSpacing(0.0))
        );

        let sweep = RangeArg::new(-1.0, 1.0, 1.0).unwrap();
        assert!(spacing_candidates(&sweep).is_err());
        let sweep = RangeArg::new(1.5, 3.0, 0.5).unwrap();
        assert_eq!(spacing_candidates(&sweep).unwrap(), vec![1.5, 2.0, 2.5, 3.0]);
    }

    #[test]
    fn test_fixture_count_is_capped() {
        let template = LED_PANEL_320W.place(0.0, 0.0, 2.0);
        assert!(matches!(
            grid_layout(&room(100.0, 100.0), 1e-3, &template),
            Err(LayoutError::TooManyFixtures { limit: MAX_LAYOUT_FIXTURES, .. })
        ));
        assert!(matches!(
            grid_layout(&room(4.0, 4.0), 1e-300, &template),
            Err(LayoutError::TooManyFixtures { .. })
        ));

        // 100 x 100 is exactly at the limit
        let layout = grid_layout(&room(100.0, 100.0), 1.0, &template).unwrap();
        assert_eq!(layout.len(), MAX_LAYOUT_FIXTURES);
    }

    #[test]
    fn test_regular_grid_has_zero_spacing_cv() {
        let template = LED_PANEL_320W.place(0.0, 0.0, 2.0);
        let layout = grid_layout(&room(8.0, 8.0), 2.0, &template).unwrap();
        assert_relative_eq!(fixture_spacing_cv(&layout), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_irregular_spacing_cv() {
        let model = &*LED_PANEL_320W;
        let fixtures = vec![
            model.place(0.0, 0.0, 2.0),
            model.place(1.0, 0.0, 2.0),
            model.place(5.0, 0.0, 2.0),
        ];
        // nearest distances: 1, 1, 4 -> mean 2, std sqrt(2)
        assert_relative_eq!(
            fixture_spacing_cv(&fixtures),
            100.0 * 2.0_f64.sqrt() / 2.0,
            epsilon = 1e-9
        );

        // Disabled fixtures do not count
        let mut with_off = fixtures.clone();
        with_off[2].enabled = false;
        assert_eq!(fixture_spacing_cv(&with_off), 0.0);
    }

    #[test]
    fn test_layout_cost() {
        let fixtures = vec![
            LED_BAR_680W.place(1.0, 1.0, 2.7),
            LED_PANEL_320W.place(2.0, 1.0, 2.7),
        ];
        assert_eq!(layout_cost(&fixtures), Some(1550.0));

        let unpriced = FixtureModel::new("x", Ppf::new(100.0), 60.0, Power::from_watts(50.0));
        let mixed = vec![fixtures[0].clone(), unpriced.place(0.0, 0.0, 2.0)];
        assert_eq!(layout_cost(&mixed), None);
        assert_eq!(layout_cost(&[]), Some(0.0));
    }
}
