//! Acceleration contributors for the gravity core
//!
//! Defines the direct-sum Newtonian gravity field, the [`Acceleration`] trait
//! for terms acting on top of it (constant linear thrust), and [`AccelSet`]
//! which sums those terms.

use std::fmt;
use std::sync::Arc;

use crate::simulation::states::{CelestialBody, NVec3};

/// Trait for acceleration sources.
///
/// `subject` is the index of the body being evaluated in `bodies`. `position`
/// is where to evaluate it, which RK4 moves away from the body's stored
/// position for its intermediate stages.
pub trait Acceleration {
    fn acceleration(&self, subject: usize, position: &NVec3, bodies: &[CelestialBody]) -> NVec3;
}

/// Newtonian gravity, direct O(n) sum per evaluation.
///
/// Pairs closer than `min_distance` are evaluated as if they were
/// `min_distance` apart; exactly coincident pairs are skipped since they
/// have no direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonianGravity {
    pub g: f64, // gravitational constant
    pub min_distance: f64, // clamp for the 1/r^2 term
}

impl NewtonianGravity {
    pub fn new(g: f64, min_distance: f64) -> Self {
        Self { g, min_distance }
    }

    /// Mass-normalised pull of every body except `subject` at `position`.
    pub fn gravity_vector(&self, subject: usize, position: &NVec3, bodies: &[CelestialBody]) -> NVec3 {
        let mut net = NVec3::zeros();

        for (j, body) in bodies.iter().enumerate() {
            if j == subject {
                continue;
            }

            // displacement from the evaluation point towards body j
            let d = body.x - position;
            let r = d.norm();
            if r == 0.0 {
                continue;
            }

            // g * m_j / r^2 along the unit direction d / r
            let r_eff = r.max(self.min_distance);
            let magnitude = self.g * body.mass / (r_eff * r_eff);
            net += d * (magnitude / r);
        }

        net
    }

    /// Pairwise potential energy, `-g m_i m_j / r` with the same clamp.
    pub fn potential_energy(&self, bodies: &[CelestialBody]) -> f64 {
        let mut energy = 0.0;
        for (i, bi) in bodies.iter().enumerate() {
            for bj in &bodies[i + 1..] {
                let r = (bj.x - bi.x).norm();
                if r == 0.0 {
                    continue;
                }
                energy -= self.g * bi.mass * bj.mass / r.max(self.min_distance);
            }
        }
        energy
    }
}

/// Constant linear thrust of the subject, divided by its mass.
/// Massless bodies cannot be pushed.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearThrust;

impl Acceleration for LinearThrust {
    fn acceleration(&self, subject: usize, _position: &NVec3, bodies: &[CelestialBody]) -> NVec3 {
        match bodies.get(subject) {
            Some(body) if body.mass > 0.0 => body.linear_thrust / body.mass,
            _ => NVec3::zeros(),
        }
    }
}

/// Collection of acceleration terms applied on top of gravity (thrust, ...)
/// Their contributions are summed into a single acceleration per evaluation
#[derive(Clone, Default)]
pub struct AccelSet {
    terms: Vec<Arc<dyn Acceleration + Send + Sync>>,
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add an acceleration term
    pub fn with(mut self, term: impl Acceleration + Send + Sync + 'static) -> Self {
        self.terms.push(Arc::new(term));
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Total acceleration on `subject` at `position`
    pub fn accumulate(&self, subject: usize, position: &NVec3, bodies: &[CelestialBody]) -> NVec3 {
        self.terms
            .iter()
            .fold(NVec3::zeros(), |acc, term| acc + term.acceleration(subject, position, bodies))
    }
}

impl fmt::Debug for AccelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccelSet").field("terms", &self.terms.len()).finish()
    }
}
