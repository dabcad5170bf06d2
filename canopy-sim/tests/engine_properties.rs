//! End-to-end properties of the simulation engine

use approx::{assert_abs_diff_eq, assert_relative_eq};
use canopy_sim::config::SimulationConfig;
use canopy_sim::field::{compute_field, summarize, SampleGrid};
use canopy_sim::hardware::{Fixture, FixtureModel, Room, SurfaceReflectance};
use canopy_sim::optimizer::{
    optimize_lighting_design, OptimizationConstraints, Priority, SuggestionKind,
};
use canopy_sim::photometry::CalibrationProfile;
use canopy_sim::physics::{daily_light_integral, ppfd_for_dli, vapor_state};
use proptest::prelude::*;
use shared::units::{
    Power, PowerExt, Ppf, Ppfd, PressureExt, Ratio, RatioExt, Temperature, TemperatureExt,
};

fn test_room() -> Room {
    Room::new(4.0, 4.0, 3.0, SurfaceReflectance::new(0.8, 0.5, 0.2)).unwrap()
}

fn fixture_strategy() -> impl Strategy<Value = Fixture> {
    (
        0.0..4.0f64,
        0.0..4.0f64,
        1.5..3.0f64,
        0.0..=100.0f64,
        100.0..2000.0f64,
        20.0..90.0f64,
    )
        .prop_map(|(x, y, z, dimming, ppf, half_angle)| {
            FixtureModel::new("prop", Ppf::new(ppf), half_angle, Power::from_watts(ppf / 2.5))
                .place(x, y, z)
                .with_dimming(dimming)
        })
}

fn field_values(fixtures: &[Fixture]) -> Vec<f64> {
    let room = test_room();
    let grid = SampleGrid::build(&room, 0.5).unwrap();
    compute_field(&room, fixtures, &grid, 0.9, &CalibrationProfile::default())
        .unwrap()
        .to_vec()
}

proptest! {
    #[test]
    fn field_is_permutation_invariant(
        fixtures in prop::collection::vec(fixture_strategy(), 1..6),
        rotation in 0usize..6,
    ) {
        let mut permuted = fixtures.clone();
        permuted.reverse();
        let len = permuted.len();
        permuted.rotate_left(rotation % len);

        let a = field_values(&fixtures);
        let b = field_values(&permuted);
        for (va, vb) in a.iter().zip(&b) {
            prop_assert!((va - vb).abs() <= 1e-9 * va.abs().max(1.0));
        }
    }

    #[test]
    fn raising_dimming_never_lowers_the_field(
        fixtures in prop::collection::vec(fixture_strategy(), 1..5),
        pick in 0usize..5,
        boost in 0.0..100.0f64,
    ) {
        let index = pick % fixtures.len();
        let mut brighter = fixtures.clone();
        brighter[index].dimming_pct = (brighter[index].dimming_pct + boost).min(100.0);

        let before = field_values(&fixtures);
        let after = field_values(&brighter);
        for (b, a) in before.iter().zip(&after) {
            prop_assert!(*a >= b - 1e-9 * b.abs());
        }

        let mean = |v: &[f64]| v.iter().sum::<f64>() / v.len() as f64;
        prop_assert!(mean(&after) >= mean(&before) - 1e-9);
    }

    #[test]
    fn uniformity_ratios_are_bounded(fixtures in prop::collection::vec(fixture_strategy(), 1..6)) {
        let room = test_room();
        let grid = SampleGrid::build(&room, 0.5).unwrap();
        let field = compute_field(&room, &fixtures, &grid, 0.9, &CalibrationProfile::default()).unwrap();
        let u = summarize(&field).uniformity;

        let min_avg = u.min_avg.as_fraction();
        let avg_max = u.avg_max.as_fraction();
        let min_max = u.min_max.as_fraction();
        let tol = 1e-12;

        prop_assert!((0.0..=1.0 + tol).contains(&min_avg));
        prop_assert!((0.0..=1.0 + tol).contains(&avg_max));
        prop_assert!(min_max <= avg_max + tol);
        prop_assert!(min_max <= min_avg + tol);
        prop_assert!(u.cv_pct >= 0.0);
    }

    #[test]
    fn dli_round_trips(ppfd in 0.0..3000.0f64, hours in 0.1..=24.0f64) {
        let dli = daily_light_integral(Ppfd::new(ppfd), hours).unwrap();
        let back = ppfd_for_dli(dli, hours).unwrap();
        prop_assert!((back.value() - ppfd).abs() <= 1e-9 * ppfd.max(1.0));
    }

    #[test]
    fn saturated_air_has_no_deficit(celsius in -30.0..50.0f64) {
        let state = vapor_state(Temperature::from_celsius(celsius), Ratio::from_percent(100.0)).unwrap();
        prop_assert!(state.vpd.as_kilopascals().abs() < 1e-9);
        prop_assert!(state.humidity_deficit.value().abs() < 1e-9);
    }
}

#[test]
fn empty_fixture_list_is_degenerate_not_an_error() {
    let room = test_room();
    let grid = SampleGrid::build(&room, 0.25).unwrap();
    let field = compute_field(&room, &[], &grid, 0.9, &CalibrationProfile::default()).unwrap();
    let stats = summarize(&field);

    assert!(field.iter().all(|v| v == Ppfd::ZERO));
    assert_eq!(stats.average, Ppfd::ZERO);
    assert_eq!(stats.uniformity.min_avg.as_fraction(), 0.0);
    assert_eq!(stats.uniformity.avg_max.as_fraction(), 0.0);
    assert_eq!(stats.uniformity.min_max.as_fraction(), 0.0);
    assert_eq!(stats.uniformity.cv_pct, 0.0);
}

#[test]
fn optimizer_suggests_light_for_an_empty_room() {
    let room = Room::new(10.0, 10.0, 3.0, SurfaceReflectance::default()).unwrap();
    let constraints = OptimizationConstraints::for_target(Ppfd::new(400.0));

    let result =
        optimize_lighting_design(&room, &[], &constraints, &SimulationConfig::default()).unwrap();

    assert!(!result.layout.is_empty());
    assert!(result.suggestions.iter().any(|s| s.priority == Priority::High
        && matches!(s.kind, SuggestionKind::Power | SuggestionKind::Placement)));
    assert!(result
        .suggestions
        .windows(2)
        .all(|pair| pair[0].priority <= pair[1].priority));
}

/// Single 1000 µmol/s fixture centred over a 4 x 4 x 3 room
#[test]
fn single_fixture_reference_values() {
    let room = test_room();
    let fixture = FixtureModel::new("reference", Ppf::new(1000.0), 60.0, Power::from_watts(400.0))
        .place(2.0, 2.0, 2.7);
    let config = SimulationConfig::default();

    let grid = SampleGrid::build(&room, config.report_resolution).unwrap();
    let field = compute_field(
        &room,
        std::slice::from_ref(&fixture),
        &grid,
        config.working_height,
        &config.calibration,
    )
    .unwrap();
    let stats = summarize(&field);

    assert_eq!(stats.sample_count, 289);
    assert_relative_eq!(stats.average.value(), 47.791955545729046, max_relative = 1e-9);
    assert_relative_eq!(stats.min.value(), 16.572944023729406, max_relative = 1e-9);
    assert_relative_eq!(stats.max.value(), 107.08573331491722, max_relative = 1e-9);
    assert_relative_eq!(
        stats.uniformity.min_avg.as_fraction(),
        0.34677266988733746,
        max_relative = 1e-9
    );
    assert_relative_eq!(
        stats.uniformity.avg_max.as_fraction(),
        0.446296197133774,
        max_relative = 1e-9
    );
    assert_relative_eq!(stats.uniformity.cv_pct, 47.141864525851915, max_relative = 1e-9);

    // Same scenario on the coarse optimizer grid
    let coarse = SampleGrid::build(&room, 0.5).unwrap();
    let field = compute_field(&room, &[fixture.clone()], &coarse, 0.9, &config.calibration).unwrap();
    let stats = summarize(&field);
    assert_eq!(stats.sample_count, 81);
    assert_relative_eq!(stats.average.value(), 45.076927115347125, max_relative = 1e-9);
    assert_relative_eq!(
        stats.uniformity.min_avg.as_fraction(),
        0.3676591348234759,
        max_relative = 1e-9
    );

    // Reproducible run to run
    let again = compute_field(&room, &[fixture], &coarse, 0.9, &config.calibration).unwrap();
    assert_eq!(field, again);
}

#[test]
fn black_room_removes_reflectance_gain() {
    let bright = test_room();
    let black = Room::new(4.0, 4.0, 3.0, SurfaceReflectance::black()).unwrap();
    let fixture = [FixtureModel::new("r", Ppf::new(1000.0), 60.0, Power::from_watts(400.0))
        .place(2.0, 2.0, 2.7)];
    let cal = CalibrationProfile::default();

    let grid = SampleGrid::build(&bright, 0.5).unwrap();
    let a = summarize(&compute_field(&bright, &fixture, &grid, 0.9, &cal).unwrap());
    let b = summarize(&compute_field(&black, &fixture, &grid, 0.9, &cal).unwrap());

    assert_relative_eq!(a.average.value() / b.average.value(), 1.09, epsilon = 1e-12);
    assert_abs_diff_eq!(
        a.uniformity.min_avg.as_fraction(),
        b.uniformity.min_avg.as_fraction(),
        epsilon = 1e-12
    );
}
