//! Core state types for the gravity simulation.
//!
//! Defines [`CelestialBody`], the physical and kinematic state of one body:
//! - mass, bounding radius and render scale
//! - translational state `x`, `v`, `a`
//! - rotational state about a tilted spin axis
//! - the cached gravity vector and pose snapshot handed to the renderer

use std::f64::consts::TAU;

use nalgebra::{Matrix4, Rotation3, Vector3};

use crate::visualization::render::RenderHandle;

pub type NVec3 = Vector3<f64>;
pub type Mat4 = Matrix4<f64>;

/// Wrap an angle in radians into `[0, 2π)`.
pub fn wrap_angle(theta: f64) -> f64 {
    let wrapped = theta.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to exactly TAU
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

#[derive(Debug, Clone)]
pub struct CelestialBody {
    name: String,
    pub mass: f64, // simulation-scaled mass
    pub radius: f64, // bounding radius
    pub scale: NVec3, // per-axis render scale
    pub x: NVec3, // position
    pub v: NVec3, // velocity
    pub a: NVec3, // net acceleration at `x`, refreshed every substep
    tilt: f64, // inclination of the spin axis away from +Y, radians
    angular_position: f64, // radians, always in [0, 2π)
    pub angular_velocity: f64, // radians per simulated second
    pub angular_accel: f64, // radians per simulated second^2
    pub linear_thrust: NVec3, // constant force, divided by mass when applied
    pub angular_thrust: f64, // constant torque-like term, divided by mass when applied
    gravity: NVec3, // last gravity vector evaluated at `x`
    pose: Mat4, // translate * rotate * scale snapshot
    pub renderable: Option<RenderHandle>, // key into the external asset table
}

impl CelestialBody {
    /// A body at rest at the origin with unit render scale.
    pub fn new(name: impl Into<String>, mass: f64, radius: f64) -> Self {
        let mut body = Self {
            name: name.into(),
            mass,
            radius,
            scale: NVec3::repeat(1.0),
            x: NVec3::zeros(),
            v: NVec3::zeros(),
            a: NVec3::zeros(),
            tilt: 0.0,
            angular_position: 0.0,
            angular_velocity: 0.0,
            angular_accel: 0.0,
            linear_thrust: NVec3::zeros(),
            angular_thrust: 0.0,
            gravity: NVec3::zeros(),
            pose: Mat4::identity(),
            renderable: None,
        };
        body.snapshot_pose();
        body
    }

    /// A fully initialised planet: rendered as a sphere scaled to its radius.
    pub fn planet(
        name: impl Into<String>,
        mass: f64,
        radius: f64,
        position: NVec3,
        velocity: NVec3,
    ) -> Self {
        let mut body = Self::new(name, mass, radius);
        body.scale = NVec3::repeat(radius);
        body.x = position;
        body.v = velocity;
        body.snapshot_pose();
        body
    }

    /// Tilt the spin axis by `degrees` about +X. Fixed for the body's lifetime.
    pub fn with_tilt(mut self, degrees: f64) -> Self {
        self.tilt = degrees.to_radians();
        self.snapshot_pose();
        self
    }

    /// Initial spin rate in radians per simulated second.
    pub fn with_spin(mut self, angular_velocity: f64) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn with_scale(mut self, scale: NVec3) -> Self {
        self.scale = scale;
        self.snapshot_pose();
        self
    }

    pub fn with_thrust(mut self, linear: NVec3, angular: f64) -> Self {
        self.linear_thrust = linear;
        self.angular_thrust = angular;
        self
    }

    pub fn with_renderable(mut self, handle: RenderHandle) -> Self {
        self.renderable = Some(handle);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tilt of the spin axis in radians.
    pub fn tilt(&self) -> f64 {
        self.tilt
    }

    /// Unit spin axis: +Y rotated by the tilt about +X.
    pub fn rotation_axis(&self) -> NVec3 {
        Rotation3::from_axis_angle(&NVec3::x_axis(), self.tilt) * NVec3::y()
    }

    pub fn angular_position(&self) -> f64 {
        self.angular_position
    }

    /// Set the spin angle, wrapped into `[0, 2π)`.
    pub fn set_angular_position(&mut self, theta: f64) {
        self.angular_position = wrap_angle(theta);
    }

    /// Gravity vector felt at the current position as of the last substep.
    pub fn gravity_vector(&self) -> NVec3 {
        self.gravity
    }

    pub(crate) fn set_gravity_vector(&mut self, gravity: NVec3) {
        self.gravity = gravity;
    }

    /// Pose snapshot as of the last substep.
    pub fn pose(&self) -> &Mat4 {
        &self.pose
    }

    /// Translation column of the pose snapshot.
    pub fn pose_translation(&self) -> NVec3 {
        self.pose.fixed_view::<3, 1>(0, 3).into_owned()
    }

    /// Recompute the pose: scale first, then spin about the tilted axis, then
    /// place in the world.
    pub fn snapshot_pose(&mut self) {
        let spin = Rotation3::from_axis_angle(&NVec3::y_axis(), self.angular_position);
        let tilt = Rotation3::from_axis_angle(&NVec3::x_axis(), self.tilt);
        self.pose = Mat4::new_translation(&self.x)
            * (tilt * spin).to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale);
    }

    pub fn momentum(&self) -> NVec3 {
        self.mass * self.v
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.v.norm_squared()
    }
}
