//! Light fixture models and placed fixtures.
//!
//! A [`FixtureModel`] is the photometric and electrical datasheet of a
//! luminaire: photon output, beam shape, draw, spectrum. A [`Fixture`] is one
//! such model mounted at a position in a room with its own on/off state and
//! dimming level.
//!
//! # Examples
//!
//! ```rust
//! use canopy_sim::hardware::fixture::models::LED_BAR_680W;
//!
//! let fixture = LED_BAR_680W.place(2.0, 2.0, 2.7).with_dimming(75.0);
//! println!("{}: {:.0} at {:.2} µmol/J", fixture.model.name,
//!          fixture.effective_ppf(), fixture.model.efficacy());
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use shared::units::{Power, PowerExt, Ppf};
use thiserror::Error;

/// Error types for fixture validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FixtureError {
    #[error("dimming level must be within [0, 100], got {0}")]
    DimmingOutOfRange(f64),
    #[error("{field} must be finite and non-negative, got {value}")]
    InvalidOutput { field: &'static str, value: f64 },
    #[error("beam half-angle must be within (0, 180) degrees, got {0}")]
    InvalidBeamAngle(f64),
    #[error("fixture position must be finite, got ({x}, {y}, {z})")]
    NonFinitePosition { x: f64, y: f64, z: f64 },
    #[error("spectral fractions must be within [0, 1] and sum to at most 1")]
    InvalidSpectrum,
}

/// Share of a fixture's PPF falling in the red and blue wavebands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralMix {
    pub red_fraction: f64,
    pub blue_fraction: f64,
}

impl SpectralMix {
    pub fn new(red_fraction: f64, blue_fraction: f64) -> Self {
        Self {
            red_fraction,
            blue_fraction,
        }
    }

    /// Red:blue photon ratio, `None` when there is no blue at all
    pub fn red_blue_ratio(&self) -> Option<f64> {
        (self.blue_fraction > 0.0).then(|| self.red_fraction / self.blue_fraction)
    }

    fn validate(&self) -> Result<(), FixtureError> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if in_unit(self.red_fraction)
            && in_unit(self.blue_fraction)
            && self.red_fraction + self.blue_fraction <= 1.0 + 1e-9
        {
            Ok(())
        } else {
            Err(FixtureError::InvalidSpectrum)
        }
    }
}

/// Photometric and electrical specification of a luminaire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureModel {
    /// Model name or identifier
    #[serde(default)]
    pub name: String,
    /// Total photosynthetic photon flux at full output
    pub ppf: Ppf,
    /// Half-angle of the beam measured from straight down, in degrees
    pub beam_half_angle_deg: f64,
    /// Rated electrical draw at full output
    pub wattage: Power,
    /// Optional red/blue composition of the output
    #[serde(default)]
    pub spectrum: Option<SpectralMix>,
    /// Optional purchase price per unit, in the caller's currency
    #[serde(default)]
    pub unit_cost: Option<f64>,
}

impl FixtureModel {
    pub fn new(name: impl Into<String>, ppf: Ppf, beam_half_angle_deg: f64, wattage: Power) -> Self {
        Self {
            name: name.into(),
            ppf,
            beam_half_angle_deg,
            wattage,
            spectrum: None,
            unit_cost: None,
        }
    }

    pub fn with_spectrum(mut self, spectrum: SpectralMix) -> Self {
        self.spectrum = Some(spectrum);
        self
    }

    pub fn with_unit_cost(mut self, cost: f64) -> Self {
        self.unit_cost = Some(cost);
        self
    }

    /// Photon efficacy in µmol/J, or 0.0 for a model with no rated draw
    pub fn efficacy(&self) -> f64 {
        let watts = self.wattage.as_watts();
        if watts > 0.0 {
            self.ppf.value() / watts
        } else {
            0.0
        }
    }

    /// Mount this model at (x, y, z), enabled and at full output
    pub fn place(&self, x: f64, y: f64, z: f64) -> Fixture {
        Fixture {
            x,
            y,
            z,
            enabled: true,
            dimming_pct: 100.0,
            model: self.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), FixtureError> {
        let ppf = self.ppf.value();
        if !ppf.is_finite() || ppf < 0.0 {
            return Err(FixtureError::InvalidOutput {
                field: "ppf",
                value: ppf,
            });
        }
        let watts = self.wattage.as_watts();
        if !watts.is_finite() || watts < 0.0 {
            return Err(FixtureError::InvalidOutput {
                field: "wattage",
                value: watts,
            });
        }
        if !(self.beam_half_angle_deg > 0.0 && self.beam_half_angle_deg < 180.0) {
            return Err(FixtureError::InvalidBeamAngle(self.beam_half_angle_deg));
        }
        if let Some(spectrum) = &self.spectrum {
            spectrum.validate()?;
        }
        Ok(())
    }
}

fn default_enabled() -> bool {
    true
}

fn default_dimming() -> f64 {
    100.0
}

/// A fixture mounted in a room.
///
/// Fixtures are independent of one another; their contributions are summed,
/// so the order of a fixture list never matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub x: f64,
    pub y: f64,
    /// Mounting height above the floor
    pub z: f64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Output level in percent, 0-100
    #[serde(default = "default_dimming")]
    pub dimming_pct: f64,
    pub model: FixtureModel,
}

impl Fixture {
    pub fn with_dimming(mut self, dimming_pct: f64) -> Self {
        self.dimming_pct = dimming_pct;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Dimming as a fraction in [0, 1]; 0 when the fixture is switched off
    pub fn output_fraction(&self) -> f64 {
        if self.enabled {
            (self.dimming_pct / 100.0).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// PPF actually emitted: rated PPF scaled by dimming, zero when disabled
    pub fn effective_ppf(&self) -> Ppf {
        self.model.ppf * self.output_fraction()
    }

    /// Electrical draw at the current dimming level
    pub fn effective_wattage(&self) -> Power {
        self.model.wattage * self.output_fraction()
    }

    /// Whether this fixture contributes any light
    pub fn is_emitting(&self) -> bool {
        self.effective_ppf().value() > 0.0
    }

    pub fn validate(&self) -> Result<(), FixtureError> {
        if !(self.x.is_finite() && self.y.is_finite() && self.z.is_finite()) {
            return Err(FixtureError::NonFinitePosition {
                x: self.x,
                y: self.y,
                z: self.z,
            });
        }
        if !(0.0..=100.0).contains(&self.dimming_pct) {
            return Err(FixtureError::DimmingOutOfRange(self.dimming_pct));
        }
        self.model.validate()
    }
}

/// Representative horticultural fixture models
pub mod models {
    use super::*;

    /// Eight-bar LED, full-cycle spectrum
    pub static LED_BAR_680W: Lazy<FixtureModel> = Lazy::new(|| {
        FixtureModel::new("LED Bar 680W", Ppf::new(1870.0), 60.0, Power::from_watts(680.0))
            .with_spectrum(SpectralMix::new(0.62, 0.20))
            .with_unit_cost(1100.0)
    });

    /// Compact LED panel for tents and small rooms
    pub static LED_PANEL_320W: Lazy<FixtureModel> = Lazy::new(|| {
        FixtureModel::new("LED Panel 320W", Ppf::new(860.0), 55.0, Power::from_watts(320.0))
            .with_spectrum(SpectralMix::new(0.55, 0.22))
            .with_unit_cost(450.0)
    });

    /// Double-ended high pressure sodium
    pub static DE_HPS_1000W: Lazy<FixtureModel> = Lazy::new(|| {
        FixtureModel::new("DE HPS 1000W", Ppf::new(2100.0), 65.0, Power::from_watts(1000.0))
            .with_spectrum(SpectralMix::new(0.45, 0.06))
            .with_unit_cost(350.0)
    });
}
