use std::time::Instant;

use crate::error::SimResult;
use crate::simulation::params::Parameters;
use crate::simulation::states::{CelestialBody, NVec3};
use crate::simulation::system::OrbitalSystem;

/// Helper to build a manual system of size `n`
fn make_system(n: usize, params: &Parameters) -> SimResult<OrbitalSystem> {
    let mut system = OrbitalSystem::new(params.clone())?;

    for i in 0..n {
        let i_f = i as f64;
        // deterministic positions, no rand needed
        let x = NVec3::new(
            (i_f * 0.37).sin() * 5.0,
            (i_f * 0.13).cos() * 5.0,
            (i_f * 0.07).sin() * 5.0,
        );
        let body = CelestialBody::planet(format!("body-{i}"), 1.0, 0.01, x, NVec3::zeros());
        system.add_body(body)?;
    }

    Ok(system)
}

/// Time one `interpolate` call for a range of body counts.
/// Each tick is about 10 substeps and every substep is O(n^2) in gravity terms.
/// Paste output directly into a spreadsheet to graph
pub fn bench_interpolate() -> SimResult<()> {
    let params = Parameters::default()
        .with_g(0.1)
        .with_max_substep(0.001);
    let ticks = 5;

    println!("N,ms_per_tick,substeps");

    for n in [2, 4, 8, 16, 32, 64, 128, 256] {
        let mut system = make_system(n, &params)?;

        // Warm up
        system.interpolate(0.01);

        let t0 = Instant::now();
        let mut substeps = 0;
        for _ in 0..ticks {
            substeps += system.interpolate(0.01).substeps;
        }
        let ms = t0.elapsed().as_secs_f64() * 1000.0 / ticks as f64;

        println!("{},{:.6},{}", n, ms, substeps / ticks);
    }

    Ok(())
}
