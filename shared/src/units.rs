//! Type-safe physical units for horticultural lighting simulations
//!
//! Quantities that `uom` models (temperature, pressure, power, dimensionless
//! ratios) are re-exported from it with small extension traits for the units
//! growers actually quote. Photon quantities have no `uom` dimension, so they
//! get dedicated newtypes instead. Every quantity is its own type: a `Ppfd`
//! can never be passed where a `Ppf` or a wattage is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Sub};
use uom::si::power::{kilowatt, watt};
use uom::si::pressure::kilopascal;
use uom::si::ratio::{percent, ratio};
use uom::si::thermodynamic_temperature::{degree_celsius, kelvin};

/// Type alias for temperature with convenient methods
pub type Temperature = uom::si::f64::ThermodynamicTemperature;

/// Type alias for pressure (vapor pressures, deficits)
pub type Pressure = uom::si::f64::Pressure;

/// Type alias for electrical power
pub type Power = uom::si::f64::Power;

/// Type alias for dimensionless ratios (uniformity, relative humidity, dimming)
pub type Ratio = uom::si::f64::Ratio;

/// Extension trait for temperature conversions
pub trait TemperatureExt {
    /// Create temperature from degrees Celsius
    fn from_celsius(celsius: f64) -> Self;

    /// Get temperature in degrees Celsius
    fn as_celsius(&self) -> f64;

    /// Create temperature from Kelvin
    fn from_kelvin(kelvin: f64) -> Self;

    /// Get temperature in Kelvin
    fn as_kelvin(&self) -> f64;
}

/// Extension trait for pressure conversions
pub trait PressureExt {
    /// Create pressure from kilopascals
    fn from_kilopascals(kpa: f64) -> Self;

    /// Get pressure in kilopascals
    fn as_kilopascals(&self) -> f64;
}

/// Extension trait for electrical power conversions
pub trait PowerExt {
    /// Create power from watts
    fn from_watts(watts: f64) -> Self;

    /// Get power in watts
    fn as_watts(&self) -> f64;

    /// Get power in kilowatts
    fn as_kilowatts(&self) -> f64;
}

/// Extension trait for dimensionless ratios
pub trait RatioExt {
    /// Create a ratio from a plain fraction (1.0 == 100 %)
    fn from_fraction(fraction: f64) -> Self;

    /// Get the ratio as a plain fraction
    fn as_fraction(&self) -> f64;

    /// Create a ratio from a percentage
    fn from_percent(pct: f64) -> Self;

    /// Get the ratio as a percentage
    fn as_percent(&self) -> f64;
}

impl TemperatureExt for Temperature {
    fn from_celsius(celsius: f64) -> Self {
        Temperature::new::<degree_celsius>(celsius)
    }

    fn as_celsius(&self) -> f64 {
        self.get::<degree_celsius>()
    }

    fn from_kelvin(kelvin_value: f64) -> Self {
        Temperature::new::<kelvin>(kelvin_value)
    }

    fn as_kelvin(&self) -> f64 {
        self.get::<kelvin>()
    }
}

impl PressureExt for Pressure {
    fn from_kilopascals(kpa: f64) -> Self {
        Pressure::new::<kilopascal>(kpa)
    }

    fn as_kilopascals(&self) -> f64 {
        self.get::<kilopascal>()
    }
}

impl PowerExt for Power {
    fn from_watts(watts: f64) -> Self {
        Power::new::<watt>(watts)
    }

    fn as_watts(&self) -> f64 {
        self.get::<watt>()
    }

    fn as_kilowatts(&self) -> f64 {
        self.get::<kilowatt>()
    }
}

impl RatioExt for Ratio {
    fn from_fraction(fraction: f64) -> Self {
        Ratio::new::<ratio>(fraction)
    }

    fn as_fraction(&self) -> f64 {
        self.get::<ratio>()
    }

    fn from_percent(pct: f64) -> Self {
        Ratio::new::<percent>(pct)
    }

    fn as_percent(&self) -> f64 {
        self.get::<percent>()
    }
}

/// Declares a scalar newtype for a quantity `uom` has no dimension for.
///
/// Arithmetic is closed over the type: quantities add and subtract with
/// themselves, scale by `f64`, and dividing two of them yields a plain `f64`.
macro_rules! scalar_quantity {
    ($(#[$meta:meta])* $name:ident, $unit:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(f64);

        impl $name {
            /// The zero quantity
            pub const ZERO: Self = Self(0.0);

            /// Unit label used when formatting
            pub const UNIT: &'static str = $unit;

            /// Wrap a raw value expressed in this quantity's unit
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// Raw value in this quantity's unit
            pub const fn value(self) -> f64 {
                self.0
            }

            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            pub fn max(self, other: Self) -> Self {
                Self(self.0.max(other.0))
            }

            pub fn min(self, other: Self) -> Self {
                Self(self.0.min(other.0))
            }
        }

        impl Add for $name {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl Sub for $name {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $name {
            type Output = Self;

            fn mul(self, rhs: f64) -> Self {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $name {
            type Output = Self;

            fn div(self, rhs: f64) -> Self {
                Self(self.0 / rhs)
            }
        }

        impl Div for $name {
            type Output = f64;

            fn div(self, rhs: Self) -> f64 {
                self.0 / rhs.0
            }
        }

        impl std::iter::Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|q| q.0).sum())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match f.precision() {
                    Some(p) => write!(f, "{:.*} {}", p, self.0, $unit),
                    None => write!(f, "{} {}", self.0, $unit),
                }
            }
        }
    };
}

scalar_quantity!(
    /// Photosynthetic photon flux: total photon output of a fixture, µmol/s
    Ppf,
    "µmol/s"
);

scalar_quantity!(
    /// Photosynthetic photon flux density arriving at a plane, µmol·m⁻²·s⁻¹
    Ppfd,
    "µmol/m²/s"
);

scalar_quantity!(
    /// Daily light integral, mol·m⁻²·day⁻¹
    Dli,
    "mol/m²/day"
);

scalar_quantity!(
    /// Electrical power per unit of floor area, in the caller's length unit squared
    PowerDensity,
    "W/unit²"
);

scalar_quantity!(
    /// Absolute humidity, g/m³
    AbsoluteHumidity,
    "g/m³"
);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_temperature_conversions() {
        let temp_c = Temperature::from_celsius(0.0);
        assert_relative_eq!(temp_c.as_kelvin(), 273.15, epsilon = 0.01);

        let temp_c = Temperature::from_celsius(25.0);
        assert_relative_eq!(temp_c.as_kelvin(), 298.15, epsilon = 0.01);

        let temp_k = Temperature::from_kelvin(373.15);
        assert_relative_eq!(temp_k.as_celsius(), 100.0, epsilon = 0.01);
    }

    #[test]
    fn test_pressure_and_power() {
        let vpd = Pressure::from_kilopascals(1.2);
        assert_relative_eq!(vpd.as_kilopascals(), 1.2, epsilon = 1e-12);

        let draw = Power::from_watts(680.0);
        assert_relative_eq!(draw.as_watts(), 680.0, epsilon = 1e-12);
        assert_relative_eq!(draw.as_kilowatts(), 0.68, epsilon = 1e-12);
    }

    #[test]
    fn test_ratio_percent_and_fraction() {
        let rh = Ratio::from_percent(65.0);
        assert_relative_eq!(rh.as_fraction(), 0.65, epsilon = 1e-12);

        let uniformity = Ratio::from_fraction(0.8);
        assert_relative_eq!(uniformity.as_percent(), 80.0, epsilon = 1e-9);
    }

    #[test]
    fn test_quantity_arithmetic() {
        let a = Ppfd::new(300.0);
        let b = Ppfd::new(100.0);

        assert_eq!((a + b).value(), 400.0);
        assert_eq!((a - b).value(), 200.0);
        assert_eq!((a * 2.0).value(), 600.0);
        assert_eq!((a / 3.0).value(), 100.0);
        assert_eq!(a / b, 3.0);

        let total: Ppf = [Ppf::new(1.0), Ppf::new(2.5)].into_iter().sum();
        assert_eq!(total.value(), 3.5);

        let mut acc = Dli::ZERO;
        acc += Dli::new(12.0);
        assert_eq!(acc, Dli::new(12.0));
    }

    #[test]
    fn test_quantity_display() {
        assert_eq!(format!("{:.1}", Ppfd::new(412.345)), "412.3 µmol/m²/s");
        assert_eq!(format!("{}", Dli::new(17.0)), "17 mol/m²/day");
    }

    #[test]
    fn test_quantity_serializes_as_bare_number() {
        let json = serde_json::to_string(&Ppf::new(1700.0)).unwrap();
        assert_eq!(json, "1700.0");

        let back: Ppf = serde_json::from_str("1700").unwrap();
        assert_eq!(back, Ppf::new(1700.0));
    }
}
