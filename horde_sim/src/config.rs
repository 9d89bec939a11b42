use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use bevy::{math::Vec2, prelude::Resource};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const BUILTIN_SIMULATION_CONFIG: &str = include_str!("data/simulation_config.json");

pub const CONFIG_PATH_ENV: &str = "HORDE_SIM_CONFIG_PATH";

/// Per-tick tunables read by the pipeline phases.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub human_speed: f32,
    pub zombie_speed: f32,
    pub infection_distance: f32,
    /// Hex size of the spatial index. Larger cells find targets further away
    /// at the cost of longer bucket scans.
    pub spatial_scale: f32,
    /// Actors per parallel work item.
    pub chunk_size: usize,
    pub heading_seed: u64,
    pub population: PopulationConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            human_speed: 10.0,
            zombie_speed: 12.5,
            infection_distance: 1.0,
            spatial_scale: 10.0,
            chunk_size: 64,
            heading_seed: 0x9E37_79B9_7F4A_7C15,
            population: PopulationConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn builtin() -> Self {
        serde_json::from_str(BUILTIN_SIMULATION_CONFIG)
            .expect("builtin simulation config should parse")
    }

    pub fn from_json_str(json: &str) -> Result<Self, SimulationConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, SimulationConfigError> {
        let contents =
            fs::read_to_string(path).map_err(|source| SimulationConfigError::ReadFailed {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<(), SimulationConfigError> {
        let non_negative = [
            ("human_speed", self.human_speed),
            ("zombie_speed", self.zombie_speed),
            ("infection_distance", self.infection_distance),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SimulationConfigError::Invalid {
                    field,
                    reason: "must be a finite, non-negative number",
                });
            }
        }
        if !self.spatial_scale.is_finite() || self.spatial_scale <= 0.0 {
            return Err(SimulationConfigError::Invalid {
                field: "spatial_scale",
                reason: "must be a finite, positive number",
            });
        }
        if self.chunk_size == 0 {
            return Err(SimulationConfigError::Invalid {
                field: "chunk_size",
                reason: "must be at least 1",
            });
        }
        self.population.validate()
    }
}

/// Field rectangle actors are spawned in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Playfield {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            x: -30.0,
            y: -30.0,
            width: 60.0,
            height: 60.0,
        }
    }
}

impl Playfield {
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }
}

/// Parameters of the initial population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub human_count: usize,
    pub zombie_count: usize,
    pub playfield: Playfield,
    /// Zero draws a seed from entropy.
    pub spawn_seed: u64,
    /// Initial wander countdown is drawn uniformly from this range.
    pub initial_timeout: (f32, f32),
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            human_count: 1000,
            zombie_count: 10,
            playfield: Playfield::default(),
            spawn_seed: 0x5A4D_B1E5,
            initial_timeout: (0.0, 2.5),
        }
    }
}

impl PopulationConfig {
    pub fn validate(&self) -> Result<(), SimulationConfigError> {
        let field = &self.playfield;
        if !(field.width.is_finite() && field.height.is_finite())
            || field.width < 0.0
            || field.height < 0.0
        {
            return Err(SimulationConfigError::Invalid {
                field: "population.playfield",
                reason: "width and height must be finite and non-negative",
            });
        }
        let (low, high) = self.initial_timeout;
        if !(low.is_finite() && high.is_finite()) || low < 0.0 || high < low {
            return Err(SimulationConfigError::Invalid {
                field: "population.initial_timeout",
                reason: "must be a non-negative, ordered range",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum SimulationConfigError {
    #[error("failed to parse simulation config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read simulation config from {path:?}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid simulation config field `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Load the config named by `HORDE_SIM_CONFIG_PATH`, falling back to the
/// builtin defaults when the variable is unset or the file is unusable.
pub fn load_simulation_config_from_env() -> (SimulationConfig, Option<PathBuf>) {
    if let Some(path) = env::var_os(CONFIG_PATH_ENV).map(PathBuf::from) {
        match SimulationConfig::from_file(&path) {
            Ok(config) => {
                tracing::info!(
                    target: "horde_sim::config",
                    path = %path.display(),
                    "simulation_config.loaded=file"
                );
                return (config, Some(path));
            }
            Err(err) => {
                tracing::warn!(
                    target: "horde_sim::config",
                    path = %path.display(),
                    error = %err,
                    "simulation_config.load_failed"
                );
            }
        }
    }

    tracing::info!(target: "horde_sim::config", "simulation_config.loaded=builtin");
    (SimulationConfig::builtin(), None)
}
