//! Lighting design documents.
//!
//! A design is the plain-data description of a room and its fixtures that
//! the command line tools read. The engine itself never stores designs; it
//! only borrows the room and fixture values out of them.

use serde::{Deserialize, Serialize};
use std::path::Path;

use shared::units::PowerDensity;

use crate::config::{read_json, write_json, ConfigError};
use crate::field::stats::FieldStatistics;
use crate::hardware::fixture::Fixture;
use crate::hardware::room::Room;
use crate::optimizer::constraints::OptimizationConstraints;
use crate::physics::acceptance::{evaluate_acceptance, AcceptanceReport};
use crate::physics::climate::{ClimateAssessment, ClimateReading, ClimateTargets};
use crate::physics::PhysicsError;

fn default_photoperiod() -> f64 {
    18.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightingDesign {
    #[serde(default)]
    pub name: String,
    pub room: Room,
    #[serde(default)]
    pub fixtures: Vec<Fixture>,
    #[serde(default)]
    pub constraints: Option<OptimizationConstraints>,
    /// Lights-on hours per day
    #[serde(default = "default_photoperiod")]
    pub photoperiod_hours: f64,
    #[serde(default)]
    pub climate: Option<ClimateReading>,
}

impl LightingDesign {
    pub fn new(name: impl Into<String>, room: Room, fixtures: Vec<Fixture>) -> Self {
        Self {
            name: name.into(),
            room,
            fixtures,
            constraints: None,
            photoperiod_hours: default_photoperiod(),
            climate: None,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        read_json(path.as_ref())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        write_json(self, path.as_ref())
    }

    /// Climate of the room against `targets`, if the design records one
    pub fn assess_climate(
        &self,
        targets: &ClimateTargets,
    ) -> Result<Option<ClimateAssessment>, PhysicsError> {
        self.climate
            .as_ref()
            .map(|reading| reading.assess(targets))
            .transpose()
    }

    /// Accept or reject a lit field under this design's photoperiod and
    /// climate. The climate check is included whenever a reading is present.
    pub fn acceptance(
        &self,
        statistics: &FieldStatistics,
        power_density: PowerDensity,
        constraints: &OptimizationConstraints,
        targets: &ClimateTargets,
    ) -> Result<AcceptanceReport, PhysicsError> {
        let climate = self.assess_climate(targets)?;
        evaluate_acceptance(
            statistics,
            power_density,
            constraints,
            self.photoperiod_hours,
            climate.as_ref(),
        )
    }
}
