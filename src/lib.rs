pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;
pub mod error;

pub use simulation::states::{CelestialBody, NVec3, Mat4, wrap_angle};
pub use simulation::params::Parameters;
pub use simulation::clock::{SimulationClock, StepPlan};
pub use simulation::forces::{Acceleration, AccelSet, NewtonianGravity, LinearThrust};
pub use simulation::integrator::{rk4, rk4_substep};
pub use simulation::diagnostics::{ConservationState, ConservationReport};
pub use simulation::system::{OrbitalSystem, TickReport};
pub use simulation::scenario::Scenario;

pub use configuration::config::{ScenarioConfig, SimulationConfig, BackgroundConfig, BodyConfig};

pub use visualization::render::{RenderHandle, RenderAssets, HeadlessAssets, Background};

pub use error::{SimError, SimResult, ConfigError};

pub use benchmark::benchmark::bench_interpolate;
