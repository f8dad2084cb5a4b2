//! Build fully-initialized orbital systems from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime
//! [`Scenario`] containing the scale factor it was built with and an
//! [`OrbitalSystem`] with every body at t = 0.
//!
//! Scaling keeps magnitudes tractable: with scale factor `s`,
//! `g`, masses, radii and positions are divided by `s` and velocities by
//! `sqrt(s)`. Render handles come from the caller's asset table.

use std::path::Path;

use tracing::{debug, warn};

use crate::configuration::config::{BackgroundConfig, BodyConfig, ScenarioConfig};
use crate::error::ConfigError;
use crate::visualization::render::{Background, RenderAssets};

use super::params::Parameters;
use super::states::{CelestialBody, NVec3};
use super::system::OrbitalSystem;

/// A loaded scenario ready to be ticked by the host loop
#[derive(Debug, Clone)]
pub struct Scenario {
    pub scale: f64, // factor the configuration was divided by
    pub system: OrbitalSystem,
}

impl Scenario {
    /// Read, validate and build the scenario at `path`.
    pub fn load(path: impl AsRef<Path>, assets: &mut impl RenderAssets) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let cfg = ScenarioConfig::from_path(path)?;
        debug!(path = %path.display(), bodies = cfg.bodies.len(), "loaded scenario file");
        Self::build_scenario(&cfg, assets)
    }

    pub fn build_scenario(cfg: &ScenarioConfig, assets: &mut impl RenderAssets) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let scale = cfg.scale;

        // Parameters (runtime) from the root and simulation blocks
        let sim = &cfg.simulation;
        let parameters = Parameters {
            g: cfg.g / scale,
            time_scale: sim.time_scale,
            max_substep: sim.max_substep,
            max_substeps: sim.max_substeps,
            min_distance: sim.min_distance,
        };

        let mut system = OrbitalSystem::new(parameters)?;
        if let Some(bg) = &cfg.background {
            system = system.with_background(build_background(bg, assets));
        }

        // Bodies: map `BodyConfig` -> runtime `CelestialBody`, in file order
        for bc in &cfg.bodies {
            system.add_body(build_body(bc, scale, assets))?;
        }

        debug!(bodies = system.len(), g = system.g(), "built scenario");
        Ok(Self { scale, system })
    }
}

fn build_background(bg: &BackgroundConfig, assets: &mut impl RenderAssets) -> Background {
    let renderable = assets.load(&bg.mesh, bg.texture.as_deref());
    if renderable.is_none() {
        warn!(mesh = %bg.mesh, "background mesh failed to load");
    }
    Background::new(bg.radius, bg.tilt, renderable)
}

fn build_body(bc: &BodyConfig, scale: f64, assets: &mut impl RenderAssets) -> CelestialBody {
    let position = NVec3::from(bc.position) / scale;
    let velocity = NVec3::from(bc.velocity) / scale.sqrt();

    let mut body = CelestialBody::planet(&*bc.name, bc.mass / scale, bc.radius / scale, position, velocity)
        .with_tilt(bc.tilt)
        .with_spin(bc.rotational_speed)
        .with_thrust(
            bc.linear_thrust.map(NVec3::from).unwrap_or_else(NVec3::zeros),
            bc.angular_thrust.unwrap_or(0.0),
        );

    if let Some(mesh) = &bc.mesh {
        match assets.load(mesh, bc.texture.as_deref()) {
            Some(handle) => body = body.with_renderable(handle),
            None => warn!(body = %bc.name, mesh = %mesh, "mesh failed to load, body will be invisible"),
        }
    }
    body
}
