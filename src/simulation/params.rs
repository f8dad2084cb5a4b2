//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - gravitational constant `g` (already rescaled for the scenario),
//! - real-to-simulated time scale,
//! - largest stable substep and the per-tick substep cap,
//! - minimum pair distance used by the gravity clamp

use crate::error::SimError;

/// Gravitational constant in km^3 / (kg s^2)
pub const DEFAULT_G: f64 = 6.67384e-20;
pub const SIM_SECONDS_PER_REAL_SECOND: f64 = 1.0;
pub const MAX_DELTA_T: f64 = 100.0;
pub const MAX_SUBSTEPS_PER_TICK: usize = 100_000;
pub const MIN_PAIR_DISTANCE: f64 = 1.0e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub g: f64, // gravitational constant
    pub time_scale: f64, // simulated seconds per real second
    pub max_substep: f64, // stability bound on one RK4 dt
    pub max_substeps: usize, // substeps allowed per tick before time is dropped
    pub min_distance: f64, // pairs closer than this are clamped
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            g: DEFAULT_G,
            time_scale: SIM_SECONDS_PER_REAL_SECOND,
            max_substep: MAX_DELTA_T,
            max_substeps: MAX_SUBSTEPS_PER_TICK,
            min_distance: MIN_PAIR_DISTANCE,
        }
    }
}

impl Parameters {
    pub fn with_g(mut self, g: f64) -> Self {
        self.g = g;
        self
    }

    pub fn with_max_substep(mut self, max_substep: f64) -> Self {
        self.max_substep = max_substep;
        self
    }

    pub fn with_time_scale(mut self, time_scale: f64) -> Self {
        self.time_scale = time_scale;
        self
    }

    pub fn validate(&self) -> Result<(), SimError> {
        let invalid = |name, value| Err(SimError::InvalidParameter { name, value });

        if !self.g.is_finite() {
            return invalid("g", self.g);
        }
        if !self.time_scale.is_finite() || self.time_scale < 0.0 {
            return invalid("time_scale", self.time_scale);
        }
        if !self.max_substep.is_finite() || self.max_substep <= 0.0 {
            return invalid("max_substep", self.max_substep);
        }
        if self.max_substeps == 0 {
            return invalid("max_substeps", 0.0);
        }
        if !self.min_distance.is_finite() || self.min_distance <= 0.0 {
            return invalid("min_distance", self.min_distance);
        }
        Ok(())
    }
}
