//! The orbital system: an ordered set of bodies advanced together.
//!
//! [`OrbitalSystem`] owns the bodies, the force terms and the substep clock.
//! The host calls [`OrbitalSystem::interpolate`] once per frame with the
//! elapsed wall-clock time, then reads the index-aligned
//! [`poses`](OrbitalSystem::poses) and [`renderables`](OrbitalSystem::renderables)
//! to draw the frame.

use tracing::{debug, trace};

use crate::error::{SimError, SimResult};
use crate::visualization::render::{Background, RenderAssets, RenderHandle};

use super::clock::SimulationClock;
use super::diagnostics;
use super::forces::{AccelSet, LinearThrust, NewtonianGravity};
use super::integrator;
use super::params::Parameters;
use super::states::{CelestialBody, Mat4, NVec3};

/// What one call to [`OrbitalSystem::interpolate`] did.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickReport {
    pub substeps: usize, // integration steps run, remainder included
    pub simulated: f64, // simulated seconds applied to the clock
    pub dropped: f64, // simulated seconds discarded by the substep cap
}

#[derive(Debug, Clone)]
pub struct OrbitalSystem {
    bodies: Vec<CelestialBody>,
    background: Option<Background>,
    params: Parameters,
    gravity: NewtonianGravity,
    forces: AccelSet, // terms on top of gravity
    clock: SimulationClock,
    t: f64, // total simulated seconds
}

impl OrbitalSystem {
    /// Empty system driven by `params`.
    pub fn new(params: Parameters) -> SimResult<Self> {
        params.validate()?;

        let gravity = NewtonianGravity::new(params.g, params.min_distance);
        let forces = AccelSet::new().with(LinearThrust);
        let clock = SimulationClock::from_params(&params);

        Ok(Self {
            bodies: Vec::new(),
            background: None,
            params,
            gravity,
            forces,
            clock,
            t: 0.0,
        })
    }

    /// Attach a background as the leading render entry.
    pub fn with_background(mut self, background: Background) -> Self {
        self.background = Some(background);
        self
    }

    /// Append a body; returns its index.
    pub fn add_body(&mut self, body: CelestialBody) -> SimResult<usize> {
        if self.body_by_name(body.name()).is_some() {
            return Err(SimError::DuplicateName(body.name().to_owned()));
        }

        debug!(name = body.name(), mass = body.mass, "adding body");
        self.bodies.push(body);
        integrator::refresh(&mut self.bodies, &self.gravity, &self.forces);
        Ok(self.bodies.len() - 1)
    }

    /// Remove the body at `index`; later bodies shift down by one.
    ///
    /// The removed body's render handle is returned with it, not released.
    pub fn remove_body(&mut self, index: usize) -> SimResult<CelestialBody> {
        if index >= self.bodies.len() {
            return Err(SimError::BodyIndex {
                index,
                len: self.bodies.len(),
            });
        }

        let body = self.bodies.remove(index);
        debug!(name = body.name(), index, "removed body");
        integrator::refresh(&mut self.bodies, &self.gravity, &self.forces);
        Ok(body)
    }

    /// Advance the system by `real_seconds` of wall-clock time.
    ///
    /// The time is scaled and cut into bounded substeps by the clock; each
    /// substep moves every body with RK4. `interpolate(0.0)` changes nothing.
    pub fn interpolate(&mut self, real_seconds: f64) -> TickReport {
        let plan = self.clock.advance(real_seconds);
        let mut report = TickReport {
            dropped: plan.dropped,
            ..TickReport::default()
        };

        for dt in plan.steps() {
            integrator::rk4_substep(&mut self.bodies, &self.gravity, &self.forces, dt);
            report.substeps += 1;
            report.simulated += dt;
        }

        self.t += report.simulated;
        trace!(t = self.t, substeps = report.substeps, "tick");
        report
    }

    /// Gravity felt by body `subject` if it were at `position`.
    pub fn gravity_vector(&self, subject: usize, position: &NVec3) -> NVec3 {
        self.gravity.gravity_vector(subject, position, &self.bodies)
    }

    /// Pose of every render entry: the background first when present, then
    /// each body in collection order.
    pub fn poses(&self) -> Vec<Mat4> {
        self.background
            .iter()
            .map(|bg| bg.pose)
            .chain(self.bodies.iter().map(|b| *b.pose()))
            .collect()
    }

    /// Render handles, index-aligned with [`poses`](Self::poses).
    pub fn renderables(&self) -> Vec<Option<RenderHandle>> {
        self.background
            .iter()
            .map(|bg| bg.renderable)
            .chain(self.bodies.iter().map(|b| b.renderable))
            .collect()
    }

    /// Ask the asset table to release every handle this system refers to.
    ///
    /// Handles are cleared afterwards so a second call releases nothing.
    /// Returns the number of release requests forwarded.
    pub fn clean_up(&mut self, assets: &mut impl RenderAssets) -> usize {
        let handles = self
            .background
            .iter_mut()
            .map(|bg| &mut bg.renderable)
            .chain(self.bodies.iter_mut().map(|b| &mut b.renderable))
            .filter_map(Option::take);

        let mut released = 0;
        for handle in handles {
            assets.release(handle);
            released += 1;
        }
        debug!(released, "released render handles");
        released
    }

    /// Total kinetic plus potential energy.
    pub fn total_energy(&self) -> f64 {
        diagnostics::total_energy(&self.bodies, &self.gravity)
    }

    /// Total linear momentum.
    pub fn total_momentum(&self) -> NVec3 {
        diagnostics::total_momentum(&self.bodies)
    }

    pub fn g(&self) -> f64 {
        self.params.g
    }

    /// Simulated seconds elapsed since construction.
    pub fn t(&self) -> f64 {
        self.t
    }

    /// The gravity field every body is integrated in.
    pub fn gravity(&self) -> &NewtonianGravity {
        &self.gravity
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    pub fn body(&self, index: usize) -> Option<&CelestialBody> {
        self.bodies.get(index)
    }

    /// Edit the body at `index` in place.
    ///
    /// Cached gravity, acceleration and poses of every body are recomputed
    /// afterwards, so the exported poses follow the edit.
    pub fn modify_body<R>(&mut self, index: usize, edit: impl FnOnce(&mut CelestialBody) -> R) -> SimResult<R> {
        let len = self.bodies.len();
        let body = self
            .bodies
            .get_mut(index)
            .ok_or(SimError::BodyIndex { index, len })?;

        let out = edit(body);
        integrator::refresh(&mut self.bodies, &self.gravity, &self.forces);
        Ok(out)
    }

    pub fn body_by_name(&self, name: &str) -> Option<&CelestialBody> {
        self.bodies.iter().find(|b| b.name() == name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.bodies.iter().position(|b| b.name() == name)
    }
}
