//! Daily light integral conversions.
//!
//! `DLI = PPFD x hours x 3600 / 1e6`. The constants are exact unit
//! conversions (seconds per hour, µmol per mol) and must not be tuned.

use shared::units::{Dli, Ppfd};

use super::PhysicsError;

pub const SECONDS_PER_HOUR: f64 = 3600.0;
pub const MICROMOLES_PER_MOLE: f64 = 1_000_000.0;
pub const HOURS_PER_DAY: f64 = 24.0;

fn check_ppfd(ppfd: Ppfd) -> Result<(), PhysicsError> {
    if ppfd.is_finite() && ppfd.value() >= 0.0 {
        Ok(())
    } else {
        Err(PhysicsError::NegativeQuantity {
            quantity: "PPFD",
            value: ppfd.value(),
        })
    }
}

/// Light received per day at a constant PPFD over `photoperiod_hours`.
///
/// A zero-hour photoperiod is allowed and yields zero.
pub fn daily_light_integral(ppfd: Ppfd, photoperiod_hours: f64) -> Result<Dli, PhysicsError> {
    if !(0.0..=HOURS_PER_DAY).contains(&photoperiod_hours) {
        return Err(PhysicsError::Photoperiod {
            hours: photoperiod_hours,
            allowed: "[0, 24]",
        });
    }
    check_ppfd(ppfd)?;
    Ok(Dli::new(
        ppfd.value() * photoperiod_hours * SECONDS_PER_HOUR / MICROMOLES_PER_MOLE,
    ))
}

/// Constant PPFD needed to deliver `dli` over `photoperiod_hours`.
///
/// Inverse of [`daily_light_integral`]; the photoperiod must be strictly positive.
pub fn ppfd_for_dli(dli: Dli, photoperiod_hours: f64) -> Result<Ppfd, PhysicsError> {
    if !(photoperiod_hours > 0.0 && photoperiod_hours <= HOURS_PER_DAY) {
        return Err(PhysicsError::Photoperiod {
            hours: photoperiod_hours,
            allowed: "(0, 24]",
        });
    }
    if !(dli.is_finite() && dli.value() >= 0.0) {
        return Err(PhysicsError::NegativeQuantity {
            quantity: "DLI",
            value: dli.value(),
        });
    }
    Ok(Ppfd::new(
        dli.value() * MICROMOLES_PER_MOLE / (photoperiod_hours * SECONDS_PER_HOUR),
    ))
}

/// Hours of light at `ppfd` needed to reach `target`.
///
/// `None` when the target cannot be met within one day, including when the
/// PPFD is zero.
pub fn photoperiod_for_dli(ppfd: Ppfd, target: Dli) -> Option<f64> {
    if target.value() <= 0.0 {
        return Some(0.0);
    }
    if !(ppfd.is_finite() && ppfd.value() > 0.0) {
        return None;
    }
    let hours = target.value() * MICROMOLES_PER_MOLE / (ppfd.value() * SECONDS_PER_HOUR);
    (hours <= HOURS_PER_DAY).then_some(hours)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_values() {
        // 500 µmol/m²/s for 12 h is the textbook 21.6 mol/m²/day
        let dli = daily_light_integral(Ppfd::new(500.0), 12.0).unwrap();
        assert_relative_eq!(dli.value(), 21.6, epsilon = 1e-12);

        let dli = daily_light_integral(Ppfd::new(1000.0), 18.0).unwrap();
        assert_relative_eq!(dli.value(), 64.8, epsilon = 1e-12);

        assert_eq!(daily_light_integral(Ppfd::new(800.0), 0.0).unwrap(), Dli::ZERO);
    }

    #[test]
    fn test_inverse() {
        let ppfd = ppfd_for_dli(Dli::new(21.6), 12.0).unwrap();
        assert_relative_eq!(ppfd.value(), 500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_photoperiod_rejections() {
        assert!(matches!(
            daily_light_integral(Ppfd::new(500.0), 25.0),
            Err(PhysicsError::Photoperiod { .. })
        ));
        assert!(daily_light_integral(Ppfd::new(500.0), -1.0).is_err());
        assert!(ppfd_for_dli(Dli::new(20.0), 0.0).is_err());
        assert!(daily_light_integral(Ppfd::new(-5.0), 12.0).is_err());
        assert!(ppfd_for_dli(Dli::new(f64::NAN), 12.0).is_err());
    }

    #[test]
    fn test_photoperiod_for_target() {
        let hours = photoperiod_for_dli(Ppfd::new(500.0), Dli::new(21.6)).unwrap();
        assert_relative_eq!(hours, 12.0, epsilon = 1e-9);

        assert_eq!(photoperiod_for_dli(Ppfd::new(100.0), Dli::new(40.0)), None);
        assert_eq!(photoperiod_for_dli(Ppfd::ZERO, Dli::new(10.0)), None);
        assert_eq!(photoperiod_for_dli(Ppfd::ZERO, Dli::ZERO), Some(0.0));
    }
}
