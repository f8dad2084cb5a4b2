//! Conservation monitoring.
//!
//! Gravity-only systems conserve energy and linear momentum; drift in either
//! measures integration error and is a cheap check that the substep bound is
//! small enough for a scenario.

use super::forces::NewtonianGravity;
use super::states::{CelestialBody, NVec3};

/// Compute total linear momentum: sum_i m_i * v_i
pub fn total_momentum(bodies: &[CelestialBody]) -> NVec3 {
    bodies.iter().map(CelestialBody::momentum).sum()
}

pub fn kinetic_energy(bodies: &[CelestialBody]) -> f64 {
    bodies.iter().map(CelestialBody::kinetic_energy).sum()
}

pub fn total_energy(bodies: &[CelestialBody], gravity: &NewtonianGravity) -> f64 {
    kinetic_energy(bodies) + gravity.potential_energy(bodies)
}

/// Baseline conservation quantities to track drift.
#[derive(Debug, Clone)]
pub struct ConservationState {
    pub baseline_energy: f64,
    pub baseline_momentum: NVec3,
}

impl ConservationState {
    pub fn new(bodies: &[CelestialBody], gravity: &NewtonianGravity) -> Self {
        Self {
            baseline_energy: total_energy(bodies, gravity),
            baseline_momentum: total_momentum(bodies),
        }
    }

    /// Compare the current state against the baseline.
    pub fn check(&self, bodies: &[CelestialBody], gravity: &NewtonianGravity) -> ConservationReport {
        let energy = total_energy(bodies, gravity);

        // relative where the baseline allows it
        let energy_error = if self.baseline_energy.abs() > 1e-12 {
            (energy - self.baseline_energy).abs() / self.baseline_energy.abs()
        } else {
            (energy - self.baseline_energy).abs()
        };

        ConservationReport {
            energy_error,
            momentum_error: total_momentum(bodies) - self.baseline_momentum,
        }
    }
}

/// Conservation errors at one point in time.
#[derive(Debug, Clone, Copy)]
pub struct ConservationReport {
    /// |E - E0| / |E0|
    pub energy_error: f64,
    /// p - p0
    pub momentum_error: NVec3,
}

impl ConservationReport {
    pub fn is_violated(&self, energy_tol: f64, momentum_tol: f64) -> bool {
        self.energy_error > energy_tol || self.momentum_error.norm() > momentum_tol
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pair() -> Vec<CelestialBody> {
        vec![
            CelestialBody::planet("a", 2.0, 1.0, NVec3::zeros(), NVec3::new(1.0, 0.0, 0.0)),
            CelestialBody::planet("b", 1.0, 1.0, NVec3::new(4.0, 0.0, 0.0), NVec3::new(0.0, -2.0, 0.0)),
        ]
    }

    #[test]
    fn momentum_and_energy_of_a_pair() {
        let bodies = pair();
        let gravity = NewtonianGravity::new(1.0, 1e-6);

        assert_relative_eq!(total_momentum(&bodies), NVec3::new(2.0, -2.0, 0.0));
        assert_relative_eq!(kinetic_energy(&bodies), 1.0 + 2.0);
        // -g * 2 * 1 / 4
        assert_relative_eq!(total_energy(&bodies, &gravity), 3.0 - 0.5);
    }

    #[test]
    fn report_flags_drift() {
        let mut bodies = pair();
        let gravity = NewtonianGravity::new(1.0, 1e-6);
        let baseline = ConservationState::new(&bodies, &gravity);
        assert!(!baseline.check(&bodies, &gravity).is_violated(1e-12, 1e-12));

        bodies[1].v *= 2.0;
        let report = baseline.check(&bodies, &gravity);
        assert!(report.is_violated(1e-3, 1e-3));
        assert_relative_eq!(report.momentum_error, NVec3::new(0.0, -2.0, 0.0));
    }
}
