use clap::Parser;
use std::path::PathBuf;

use crate::config::{ConfigError, SimulationConfig};
use crate::design::LightingDesign;

/// Common arguments shared across the simulation binaries
#[derive(Parser, Debug, Clone)]
pub struct SharedSimulationArgs {
    /// Lighting design JSON file (room, fixtures, constraints)
    #[arg(long)]
    pub design: PathBuf,

    /// Simulation config JSON file; built-in defaults when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the report grid resolution, in room units
    #[arg(long)]
    pub resolution: Option<f64>,

    /// Override the canopy working height, in room units
    #[arg(long)]
    pub working_height: Option<f64>,
}

impl SharedSimulationArgs {
    /// Load the design and config, applying command line overrides
    pub fn load(&self) -> Result<(LightingDesign, SimulationConfig), ConfigError> {
        let design = LightingDesign::load(&self.design)?;
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_json_file(path)?,
            None => SimulationConfig::default(),
        };
        if let Some(resolution) = self.resolution {
            config.report_resolution = resolution;
        }
        if let Some(height) = self.working_height {
            config.working_height = height;
        }
        Ok((design, config))
    }
}
