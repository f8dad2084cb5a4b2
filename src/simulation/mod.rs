pub mod states;
pub mod params;
pub mod clock;
pub mod forces;
pub mod integrator;
pub mod diagnostics;
pub mod system;
pub mod scenario;
