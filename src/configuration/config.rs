//! Configuration types for loading orbital scenarios from YAML.
//!
//! A scenario consists of:
//!
//! - `g` and `scale`        – gravitational constant and the distance/mass scale factor
//! - [`SimulationConfig`]   – optional numerical settings for the substep clock
//! - [`BackgroundConfig`]   – optional non-physical backdrop
//! - [`BodyConfig`]         – initial state for each body
//!
//! # YAML format
//!
//! ```yaml
//! g: 6.67384e-20          # gravitational constant, before scaling
//! scale: 1.0e3            # divides masses, radii and positions
//!
//! simulation:             # every field optional
//!   time_scale: 800.0     # simulated seconds per real second
//!   max_substep: 100.0    # largest simulated dt per RK4 step
//!   max_substeps: 100000  # cap per tick
//!   min_distance: 1.0e-6  # gravity clamp
//!
//! background:
//!   mesh: "body.obj"
//!   texture: "milkyway.jpg"
//!   radius: 1.0e5
//!   tilt: 60.0            # degrees
//!
//! bodies:
//!   - name: "Sun"
//!     mass: 1.989e30
//!     radius: 696342.0
//!     mesh: "body.obj"
//!     texture: "sun.jpg"
//!     position: [0.0, 0.0, 0.0]
//!     velocity: [0.0, 0.0, 0.0]
//!     tilt: 7.25            # degrees
//!     rotational_speed: 0.1 # radians per simulated second
//! ```
//!
//! The scenario builder maps this into the runtime [`OrbitalSystem`](crate::OrbitalSystem),
//! applying the scale factor on the way.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::simulation::params::{
    MAX_DELTA_T, MAX_SUBSTEPS_PER_TICK, MIN_PAIR_DISTANCE, SIM_SECONDS_PER_REAL_SECOND,
};

fn default_scale() -> f64 {
    1.0
}

fn default_time_scale() -> f64 {
    SIM_SECONDS_PER_REAL_SECOND
}

fn default_max_substep() -> f64 {
    MAX_DELTA_T
}

fn default_max_substeps() -> usize {
    MAX_SUBSTEPS_PER_TICK
}

fn default_min_distance() -> f64 {
    MIN_PAIR_DISTANCE
}

/// Numerical settings for the substep clock and gravity clamp
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    #[serde(default = "default_time_scale")]
    pub time_scale: f64, // simulated seconds per real second
    #[serde(default = "default_max_substep")]
    pub max_substep: f64, // stability bound on one step, in simulated seconds
    #[serde(default = "default_max_substeps")]
    pub max_substeps: usize, // substeps per tick before time is dropped
    #[serde(default = "default_min_distance")]
    pub min_distance: f64, // scaled distance below which pairs are clamped
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_scale: default_time_scale(),
            max_substep: default_max_substep(),
            max_substeps: default_max_substeps(),
            min_distance: default_min_distance(),
        }
    }
}

/// Non-physical backdrop drawn before the bodies
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BackgroundConfig {
    pub mesh: String,
    pub texture: Option<String>,
    pub radius: f64, // render scale, not divided by `scale`
    #[serde(default)]
    pub tilt: f64, // degrees about +X
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BodyConfig {
    pub name: String,
    pub mass: f64, // unscaled mass
    pub radius: f64, // unscaled bounding radius
    pub mesh: Option<String>,
    pub texture: Option<String>,
    pub position: [f64; 3], // unscaled initial position
    pub velocity: [f64; 3], // unscaled initial velocity
    #[serde(default)]
    pub tilt: f64, // axial tilt in degrees
    #[serde(default)]
    pub rotational_speed: f64, // radians per simulated second
    #[serde(default)]
    pub linear_thrust: Option<[f64; 3]>,
    #[serde(default)]
    pub angular_thrust: Option<f64>,
}

/// Top-level scenario configuration loaded from YAML
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub g: f64, // gravitational constant before scaling
    #[serde(default = "default_scale")]
    pub scale: f64, // distance / mass scale factor
    #[serde(default)]
    pub simulation: SimulationConfig,
    pub background: Option<BackgroundConfig>,
    #[serde(default)]
    pub bodies: Vec<BodyConfig>,
}

impl ScenarioConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let cfg: ScenarioConfig = serde_yaml::from_str(yaml)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Reject values the core cannot simulate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.g.is_finite() {
            return Err(ConfigError::Invalid(format!("g must be finite, got {}", self.g)));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ConfigError::Invalid(format!("scale must be positive, got {}", self.scale)));
        }

        if let Some(bg) = &self.background {
            if !(bg.radius.is_finite() && bg.tilt.is_finite()) {
                return Err(ConfigError::Invalid("background has a non-finite radius or tilt".to_owned()));
            }
        }

        for body in &self.bodies {
            let finite = [body.mass, body.radius, body.tilt, body.rotational_speed]
                .iter()
                .chain(&body.position)
                .chain(&body.velocity)
                .chain(body.linear_thrust.iter().flatten())
                .chain(&body.angular_thrust)
                .all(|x| x.is_finite());
            if !finite {
                return Err(ConfigError::Invalid(format!("body {:?} has a non-finite value", body.name)));
            }
            if body.mass < 0.0 {
                return Err(ConfigError::Invalid(format!("body {:?} has negative mass", body.name)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
g: 1.0
bodies:
  - name: "Sun"
    mass: 1000.0
    radius: 2.0
    position: [0.0, 0.0, 0.0]
    velocity: [0.0, 0.0, 0.0]
"#;

    #[test]
    fn minimal_scenario_fills_defaults() {
        let cfg = ScenarioConfig::from_yaml_str(MINIMAL).unwrap();
        assert_eq!(cfg.scale, 1.0);
        assert_eq!(cfg.simulation, SimulationConfig::default());
        assert!(cfg.background.is_none());

        let sun = &cfg.bodies[0];
        assert_eq!(sun.name, "Sun");
        assert_eq!(sun.mesh, None);
        assert_eq!(sun.tilt, 0.0);
        assert_eq!(sun.linear_thrust, None);
    }

    #[test]
    fn partial_simulation_block_keeps_other_defaults() {
        let yaml = "g: 1.0\nsimulation:\n  max_substep: 0.5\n";
        let cfg = ScenarioConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(cfg.simulation.max_substep, 0.5);
        assert_eq!(cfg.simulation.time_scale, SIM_SECONDS_PER_REAL_SECOND);
        assert!(cfg.bodies.is_empty());
    }

    #[test]
    fn rejects_bad_scale_and_mass() {
        let err = ScenarioConfig::from_yaml_str("g: 1.0\nscale: 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let yaml = MINIMAL.replace("mass: 1000.0", "mass: -1.0");
        let err = ScenarioConfig::from_yaml_str(&yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_non_finite_thrust_and_background() {
        let yaml = format!("{MINIMAL}    linear_thrust: [.nan, 0.0, 0.0]\n");
        let err = ScenarioConfig::from_yaml_str(&yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let yaml = format!("{MINIMAL}    angular_thrust: .inf\n");
        let err = ScenarioConfig::from_yaml_str(&yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let yaml = format!("{MINIMAL}background:\n  mesh: \"body.obj\"\n  radius: .inf\n");
        let err = ScenarioConfig::from_yaml_str(&yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let yaml = format!("{MINIMAL}    linear_thrust: [1.0, 0.0, 0.0]\n    angular_thrust: 0.5\n");
        assert!(ScenarioConfig::from_yaml_str(&yaml).is_ok());
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let err = ScenarioConfig::from_yaml_str("g: [not a number").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }
}
