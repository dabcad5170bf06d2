//! Vapor pressure deficit and humidity deficit from temperature and RH.
//!
//! Saturation vapor pressure uses the Magnus approximation
//! `0.6108 * exp(17.27 T / (T + 237.3))` kPa with T in °C. Absolute humidity
//! follows the ideal-gas relation `AH = VP * 2.16679 * 1000 / (T + 273.15)`
//! g/m³ with VP in kPa.

use serde::{Deserialize, Serialize};
use shared::units::{
    AbsoluteHumidity, Pressure, PressureExt, Ratio, RatioExt, Temperature, TemperatureExt,
};

use super::PhysicsError;

const MAGNUS_BASE_KPA: f64 = 0.6108;
const MAGNUS_SLOPE: f64 = 17.27;
const MAGNUS_OFFSET_C: f64 = 237.3;
/// Water vapor gas constant factor, g·K/J
const ABSOLUTE_HUMIDITY_FACTOR: f64 = 2.16679;
const CELSIUS_TO_KELVIN: f64 = 273.15;

/// Vapor pressures and humidities of air at one temperature and RH
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VaporState {
    pub saturation_vapor_pressure: Pressure,
    pub actual_vapor_pressure: Pressure,
    /// Saturation minus actual vapor pressure
    pub vpd: Pressure,
    pub saturation_humidity: AbsoluteHumidity,
    pub actual_humidity: AbsoluteHumidity,
    /// Water the air could still take up before saturating
    pub humidity_deficit: AbsoluteHumidity,
}

fn saturation_vapor_pressure_kpa(celsius: f64) -> f64 {
    MAGNUS_BASE_KPA * (MAGNUS_SLOPE * celsius / (celsius + MAGNUS_OFFSET_C)).exp()
}

fn absolute_humidity(vapor_pressure_kpa: f64, celsius: f64) -> AbsoluteHumidity {
    AbsoluteHumidity::new(
        vapor_pressure_kpa * ABSOLUTE_HUMIDITY_FACTOR * 1000.0 / (celsius + CELSIUS_TO_KELVIN),
    )
}

/// Compute the vapor state of air at `temperature` and relative humidity `rh`
pub fn vapor_state(temperature: Temperature, rh: Ratio) -> Result<VaporState, PhysicsError> {
    let celsius = temperature.as_celsius();
    if !celsius.is_finite() || celsius <= -MAGNUS_OFFSET_C {
        return Err(PhysicsError::Temperature(celsius));
    }
    let rh_fraction = rh.as_fraction();
    if !(0.0..=1.0).contains(&rh_fraction) {
        return Err(PhysicsError::RelativeHumidity(rh.as_percent()));
    }

    let svp = saturation_vapor_pressure_kpa(celsius);
    let avp = svp * rh_fraction;
    let saturation_humidity = absolute_humidity(svp, celsius);
    let actual_humidity = absolute_humidity(avp, celsius);

    Ok(VaporState {
        saturation_vapor_pressure: Pressure::from_kilopascals(svp),
        actual_vapor_pressure: Pressure::from_kilopascals(avp),
        vpd: Pressure::from_kilopascals(svp - avp),
        saturation_humidity,
        actual_humidity,
        humidity_deficit: saturation_humidity - actual_humidity,
    })
}

/// Acceptable climate bands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateTargets {
    pub vpd_min_kpa: f64,
    pub vpd_max_kpa: f64,
    pub humidity_deficit_target: f64,
    pub humidity_deficit_min: f64,
    pub humidity_deficit_max: f64,
}

impl Default for ClimateTargets {
    fn default() -> Self {
        Self {
            vpd_min_kpa: 0.8,
            vpd_max_kpa: 1.2,
            humidity_deficit_target: 5.0,
            humidity_deficit_min: 3.0,
            humidity_deficit_max: 7.0,
        }
    }
}

/// Where a value sits relative to its acceptable band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandStatus {
    Below,
    Within,
    Above,
}

impl BandStatus {
    pub fn classify(value: f64, min: f64, max: f64) -> Self {
        if value < min {
            BandStatus::Below
        } else if value > max {
            BandStatus::Above
        } else {
            BandStatus::Within
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimateAssessment {
    pub state: VaporState,
    pub vpd_status: BandStatus,
    pub humidity_deficit_status: BandStatus,
    /// Humidity deficit minus the target, g/m³
    pub humidity_deficit_offset: f64,
}

impl ClimateAssessment {
    pub fn within_targets(&self) -> bool {
        self.vpd_status == BandStatus::Within && self.humidity_deficit_status == BandStatus::Within
    }
}

/// Classify a vapor state against the target bands
pub fn assess_climate(state: VaporState, targets: &ClimateTargets) -> ClimateAssessment {
    let vpd = state.vpd.as_kilopascals();
    let deficit = state.humidity_deficit.value();
    ClimateAssessment {
        state,
        vpd_status: BandStatus::classify(vpd, targets.vpd_min_kpa, targets.vpd_max_kpa),
        humidity_deficit_status: BandStatus::classify(
            deficit,
            targets.humidity_deficit_min,
            targets.humidity_deficit_max,
        ),
        humidity_deficit_offset: deficit - targets.humidity_deficit_target,
    }
}

/// Air conditions as written in a design file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimateReading {
    pub temperature_c: f64,
    pub relative_humidity_pct: f64,
}

impl ClimateReading {
    pub fn vapor_state(&self) -> Result<VaporState, PhysicsError> {
        vapor_state(
            Temperature::from_celsius(self.temperature_c),
            Ratio::from_percent(self.relative_humidity_pct),
        )
    }

    pub fn assess(&self, targets: &ClimateTargets) -> Result<ClimateAssessment, PhysicsError> {
        Ok(assess_climate(self.vapor_state()?, targets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_magnus_reference_points() {
        let state = vapor_state(Temperature::from_celsius(25.0), Ratio::from_percent(60.0)).unwrap();
        assert_relative_eq!(state.saturation_vapor_pressure.as_kilopascals(), 3.1678, epsilon = 1e-3);
        assert_relative_eq!(state.vpd.as_kilopascals(), 3.1678 * 0.4, epsilon = 1e-3);

        // Magnus gives its base constant at 0 °C
        let freezing = vapor_state(Temperature::from_celsius(0.0), Ratio::from_percent(0.0)).unwrap();
        assert_relative_eq!(freezing.saturation_vapor_pressure.as_kilopascals(), 0.6108, epsilon = 1e-9);
    }

    #[test]
    fn test_absolute_humidity() {
        let state = vapor_state(Temperature::from_celsius(25.0), Ratio::from_percent(100.0)).unwrap();
        // Saturated air at 25 °C holds about 23 g/m³
        assert_relative_eq!(state.saturation_humidity.value(), 23.02, epsilon = 0.05);
        assert_abs_diff_eq!(state.humidity_deficit.value(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(state.vpd.as_kilopascals(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rejects_bad_conditions() {
        assert!(matches!(
            vapor_state(Temperature::from_celsius(25.0), Ratio::from_percent(120.0)),
            Err(PhysicsError::RelativeHumidity(_))
        ));
        assert!(vapor_state(Temperature::from_celsius(-240.0), Ratio::from_percent(50.0)).is_err());
    }

    #[test]
    fn test_assessment_bands() {
        let targets = ClimateTargets::default();

        let good = ClimateReading {
            temperature_c: 20.0,
            relative_humidity_pct: 62.0,
        }
        .assess(&targets)
        .unwrap();
        assert_eq!(good.vpd_status, BandStatus::Within);
        assert_eq!(good.humidity_deficit_status, BandStatus::Within);
        assert!(good.within_targets());

        let humid = ClimateReading {
            temperature_c: 22.0,
            relative_humidity_pct: 90.0,
        }
        .assess(&targets)
        .unwrap();
        assert_eq!(humid.vpd_status, BandStatus::Below);
        assert!(humid.humidity_deficit_offset < 0.0);

        let dry = ClimateReading {
            temperature_c: 30.0,
            relative_humidity_pct: 30.0,
        }
        .assess(&targets)
        .unwrap();
        assert_eq!(dry.vpd_status, BandStatus::Above);
        assert_eq!(dry.humidity_deficit_status, BandStatus::Above);
        assert!(!dry.within_targets());
    }
}
