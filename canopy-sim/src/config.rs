//! Simulation configuration.
//!
//! Every tunable of the engine lives in one [`SimulationConfig`] value that is
//! passed explicitly into each call. Missing JSON fields fall back to the
//! defaults, so a config file only needs to list what it overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::field::rating::RatingBands;
use crate::optimizer::{DiagnosticThresholds, OptimizerPolicy};
use crate::photometry::point_source::CalibrationProfile;
use crate::physics::climate::ClimateTargets;

/// Error types for reading and writing JSON documents
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Read and deserialize a JSON file
pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let display = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Json {
        path: display,
        source,
    })
}

/// Serialize a value as pretty JSON and write it to a file
pub(crate) fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), ConfigError> {
    let display = path.display().to_string();
    let text = serde_json::to_string_pretty(value).map_err(|source| ConfigError::Json {
        path: display.clone(),
        source,
    })?;
    fs::write(path, text).map_err(|source| ConfigError::Io {
        path: display,
        source,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub calibration: CalibrationProfile,
    /// Height of the canopy plane above the floor, in room units
    pub working_height: f64,
    /// Sample spacing for reported fields
    pub report_resolution: f64,
    pub optimizer: OptimizerPolicy,
    pub diagnostics: DiagnosticThresholds,
    pub rating_bands: RatingBands,
    pub climate_targets: ClimateTargets,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            calibration: CalibrationProfile::default(),
            working_height: 0.9,
            report_resolution: 0.25,
            optimizer: OptimizerPolicy::default(),
            diagnostics: DiagnosticThresholds::default(),
            rating_bands: RatingBands::default(),
            climate_targets: ClimateTargets::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        read_json(path.as_ref())
    }

    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        write_json(self, path.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.calibration.unit_conversion, 4.0);
        assert_eq!(config.working_height, 0.9);
        assert_eq!(config.optimizer.acceptance_floor, 0.8);
        assert_eq!(config.optimizer.spacing_sweep.to_string(), "1.5:3:0.25");
        assert_eq!(config.diagnostics.ideal_red_blue_ratio, 3.0);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = SimulationConfig::default();
        config.working_height = 1.2;
        config.optimizer.fallback_spacing = 1.75;
        config.to_json_file(&path).unwrap();

        let loaded = SimulationConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(
            &path,
            r#"{ "working_height": 0.6, "optimizer": { "spacing_sweep": "1:2:0.5" } }"#,
        )
        .unwrap();

        let config = SimulationConfig::from_json_file(&path).unwrap();
        assert_eq!(config.working_height, 0.6);
        assert_eq!(config.optimizer.spacing_sweep.to_vec(), vec![1.0, 1.5, 2.0]);
        assert_eq!(config.optimizer.fallback_spacing, 2.0);
        assert_eq!(config.report_resolution, 0.25);
    }

    #[test]
    fn test_errors_name_the_file() {
        let err = SimulationConfig::from_json_file("/nonexistent/canopy.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/canopy.json"));

        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            SimulationConfig::from_json_file(&path),
            Err(ConfigError::Json { .. })
        ));
    }
}
