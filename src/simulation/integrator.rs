//! Fixed-step time integrators for the gravity core
//!
//! Translation is advanced with classical 4th-order Runge–Kutta on
//! `r'' = A(r)`, with every body stepped through each stage together so the
//! coupled system keeps 4th-order accuracy. Rotation never feeds back into the
//! force field, so it is advanced with a single explicit Euler update.

use super::forces::{AccelSet, NewtonianGravity};
use super::states::{CelestialBody, NVec3};

/// `base + delta * factor`, elementwise
fn offset(base: &[NVec3], delta: &[NVec3], factor: f64) -> Vec<NVec3> {
    base.iter().zip(delta).map(|(b, d)| b + d * factor).collect()
}

/// One RK4 step of the coupled system `r_i'' = accel(r)_i` over `dt`.
///
/// `accel` maps the positions of all bodies to their accelerations. Each
/// stage evaluates it once on a single shifted snapshot of every position.
pub fn rk4<F>(r: &[NVec3], v: &[NVec3], dt: f64, mut accel: F) -> (Vec<NVec3>, Vec<NVec3>)
where
    F: FnMut(&[NVec3]) -> Vec<NVec3>,
{
    let scaled = |xs: Vec<NVec3>| -> Vec<NVec3> { xs.into_iter().map(|x| dt * x).collect() };

    let k0 = scaled(v.to_vec());
    let l0 = scaled(accel(r));

    let k1 = scaled(offset(v, &l0, 0.5));
    let l1 = scaled(accel(&offset(r, &k0, 0.5)));

    let k2 = scaled(offset(v, &l1, 0.5));
    let l2 = scaled(accel(&offset(r, &k1, 0.5)));

    let k3 = scaled(offset(v, &l2, 1.0));
    let l3 = scaled(accel(&offset(r, &k2, 1.0)));

    let r_new = (0..r.len())
        .map(|i| r[i] + (k0[i] + 2.0 * k1[i] + 2.0 * k2[i] + k3[i]) / 6.0)
        .collect();
    let v_new = (0..v.len())
        .map(|i| v[i] + (l0[i] + 2.0 * l1[i] + 2.0 * l2[i] + l3[i]) / 6.0)
        .collect();
    (r_new, v_new)
}

/// Explicit first-order update of the spin state, wrapped to one revolution.
pub fn rotate(body: &mut CelestialBody, dt: f64) {
    let thrust = if body.mass > 0.0 {
        body.angular_thrust / body.mass
    } else {
        0.0
    };
    body.angular_velocity += dt * (body.angular_accel + thrust);
    body.set_angular_position(body.angular_position() + dt * body.angular_velocity);
}

/// Gravity and total acceleration of every body at its stored position.
///
/// The gravity sum runs once per body; `forces` holds the terms added on top.
fn field(bodies: &[CelestialBody], gravity: &NewtonianGravity, forces: &AccelSet) -> Vec<(NVec3, NVec3)> {
    bodies
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let g = gravity.gravity_vector(i, &b.x, bodies);
            (g, g + forces.accumulate(i, &b.x, bodies))
        })
        .collect()
}

/// Advance every body by one substep of `dt`.
///
/// Each RK4 stage places all bodies at their shifted positions before any
/// acceleration is evaluated; new states are committed together at the end.
pub fn rk4_substep(bodies: &mut [CelestialBody], gravity: &NewtonianGravity, forces: &AccelSet, dt: f64) {
    if bodies.is_empty() || dt <= 0.0 {
        return;
    }

    let r0: Vec<NVec3> = bodies.iter().map(|b| b.x).collect();
    let v0: Vec<NVec3> = bodies.iter().map(|b| b.v).collect();

    // stage snapshot, only positions change between evaluations
    let mut stage = bodies.to_vec();
    let (x, v) = rk4(&r0, &v0, dt, |positions| {
        for (body, p) in stage.iter_mut().zip(positions) {
            body.x = *p;
        }
        field(&stage, gravity, forces).into_iter().map(|(_, a)| a).collect()
    });

    for ((body, x), v) in bodies.iter_mut().zip(x).zip(v) {
        body.x = x;
        body.v = v;
        rotate(body, dt);
    }

    refresh(bodies, gravity, forces);
}

/// Recompute cached gravity, acceleration and pose of every body from the
/// current positions.
pub fn refresh(bodies: &mut [CelestialBody], gravity: &NewtonianGravity, forces: &AccelSet) {
    let fields = field(bodies, gravity, forces);

    for (body, (g, a)) in bodies.iter_mut().zip(fields) {
        body.set_gravity_vector(g);
        body.a = a;
        body.snapshot_pose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::forces::{Acceleration, LinearThrust};
    use approx::assert_relative_eq;
    use std::f64::consts::TAU;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Counts how often it is evaluated, contributes nothing.
    struct Counted(Arc<AtomicUsize>);

    impl Acceleration for Counted {
        fn acceleration(&self, _subject: usize, _position: &NVec3, _bodies: &[CelestialBody]) -> NVec3 {
            self.0.fetch_add(1, Ordering::Relaxed);
            NVec3::zeros()
        }
    }

    fn trio() -> Vec<CelestialBody> {
        vec![
            CelestialBody::planet("a", 3.0, 0.1, NVec3::zeros(), NVec3::zeros()),
            CelestialBody::planet("b", 1.0, 0.1, NVec3::new(2.0, 0.0, 0.0), NVec3::zeros()),
            CelestialBody::planet("c", 1.0, 0.1, NVec3::new(0.0, 0.0, 4.0), NVec3::zeros())
                .with_thrust(NVec3::new(0.0, 1.0, 0.0), 0.0),
        ]
    }

    #[test]
    fn rk4_tracks_harmonic_oscillator() {
        // x'' = -x with x(0) = 1, v(0) = 0 gives x = cos t
        let (mut r, mut v) = (vec![NVec3::new(1.0, 0.0, 0.0)], vec![NVec3::zeros()]);
        let dt = 0.01;
        for _ in 0..628 {
            (r, v) = rk4(&r, &v, dt, |p| p.iter().map(|x| -x).collect());
        }
        assert_relative_eq!(r[0].x, 6.28_f64.cos(), epsilon = 1e-8);
        assert_relative_eq!(v[0].x, -(6.28_f64.sin()), epsilon = 1e-8);
    }

    #[test]
    fn rk4_is_exact_for_constant_acceleration() {
        let g = NVec3::new(0.0, -9.81, 0.0);
        let (r, v) = rk4(&[NVec3::zeros()], &[NVec3::new(1.0, 0.0, 0.0)], 2.0, |p| vec![g; p.len()]);
        assert_relative_eq!(r[0], NVec3::new(2.0, -19.62, 0.0), epsilon = 1e-12);
        assert_relative_eq!(v[0], NVec3::new(1.0, -19.62, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn rk4_stages_see_every_body_shifted() {
        // two coupled oscillators x1'' = x2 - x1, x2'' = x1 - x2: the
        // separation s = x2 - x1 obeys s'' = -2 s
        let r = vec![NVec3::zeros(), NVec3::new(1.0, 0.0, 0.0)];
        let v = vec![NVec3::zeros(); 2];
        let coupled = |p: &[NVec3]| vec![p[1] - p[0], p[0] - p[1]];

        let (mut rs, mut vs) = (r, v);
        let dt = 0.01;
        for _ in 0..100 {
            (rs, vs) = rk4(&rs, &vs, dt, coupled);
        }
        let s = rs[1].x - rs[0].x;
        assert_relative_eq!(s, (2.0_f64.sqrt() * 1.0).cos(), epsilon = 1e-9);
        assert_relative_eq!(rs[0].x + rs[1].x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn refresh_sums_gravity_and_extra_terms() {
        let gravity = NewtonianGravity::new(1.0, 1e-9);
        let count = Arc::new(AtomicUsize::new(0));
        let forces = AccelSet::new().with(LinearThrust).with(Counted(count.clone()));
        let mut bodies = trio();

        refresh(&mut bodies, &gravity, &forces);

        // one evaluation of each extra term per body
        assert_eq!(count.load(Ordering::Relaxed), bodies.len());
        for (i, b) in bodies.iter().enumerate() {
            let g = gravity.gravity_vector(i, &b.x, &bodies);
            assert_eq!(b.gravity_vector(), g);
            let thrust = b.linear_thrust / b.mass;
            assert_relative_eq!(b.a, g + thrust, epsilon = 1e-15);
        }
    }

    #[test]
    fn substep_evaluates_four_stages_then_refreshes() {
        let gravity = NewtonianGravity::new(1.0, 1e-9);
        let count = Arc::new(AtomicUsize::new(0));
        let forces = AccelSet::new().with(Counted(count.clone()));
        let mut bodies = trio();

        rk4_substep(&mut bodies, &gravity, &forces, 0.01);
        assert_eq!(count.load(Ordering::Relaxed), 5 * bodies.len());
    }

    #[test]
    fn rotate_wraps_angle() {
        let mut body = CelestialBody::new("spinner", 1.0, 1.0).with_spin(1.0);
        for _ in 0..1000 {
            rotate(&mut body, 0.1);
            let theta = body.angular_position();
            assert!((0.0..TAU).contains(&theta), "angle escaped: {theta}");
        }
        assert_relative_eq!(body.angular_position(), 100.0 % TAU, epsilon = 1e-9);
    }

    #[test]
    fn angular_accel_spins_up() {
        let mut body = CelestialBody::new("spinner", 2.0, 1.0);
        body.angular_accel = 0.5;
        body.angular_thrust = 1.0;
        rotate(&mut body, 2.0);
        // (0.5 + 1.0 / 2.0) * 2.0
        assert_relative_eq!(body.angular_velocity, 2.0);
    }
}
