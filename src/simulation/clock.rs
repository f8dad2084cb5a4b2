//! Substep controller
//!
//! Turns an elapsed wall-clock interval into simulated time and cuts it into
//! bounded substeps, so a long frame (a hitch, a debugger pause) never hands
//! the integrator one oversized step.

use std::iter;

use tracing::warn;

use super::params::Parameters;

/// How one tick is carried out: `substeps` steps of `step` seconds followed by
/// a final `remainder` step (skipped when zero). `dropped` is simulated time
/// that was discarded because the tick hit the substep cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPlan {
    pub substeps: usize,
    pub step: f64,
    pub remainder: f64,
    pub dropped: f64,
}

impl StepPlan {
    fn idle(step: f64) -> Self {
        Self {
            substeps: 0,
            step,
            remainder: 0.0,
            dropped: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.substeps == 0 && self.remainder <= 0.0
    }

    /// Simulated seconds the plan applies.
    pub fn simulated(&self) -> f64 {
        self.substeps as f64 * self.step + self.remainder
    }

    /// Durations of the steps to run, in order.
    pub fn steps(&self) -> impl Iterator<Item = f64> {
        let remainder = (self.remainder > 0.0).then_some(self.remainder);
        iter::repeat(self.step).take(self.substeps).chain(remainder)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationClock {
    time_scale: f64, // simulated seconds per real second
    max_substep: f64, // largest dt handed to one RK4 step
    max_substeps: usize, // cap on whole substeps per tick
}

impl SimulationClock {
    pub fn new(time_scale: f64, max_substep: f64, max_substeps: usize) -> Self {
        Self {
            time_scale,
            max_substep,
            max_substeps,
        }
    }

    pub fn from_params(params: &Parameters) -> Self {
        Self::new(params.time_scale, params.max_substep, params.max_substeps)
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn max_substep(&self) -> f64 {
        self.max_substep
    }

    pub fn max_substeps(&self) -> usize {
        self.max_substeps
    }

    /// Plan the substeps for `real_seconds` of elapsed wall-clock time.
    ///
    /// Negative or non-finite intervals are treated as zero.
    pub fn advance(&self, real_seconds: f64) -> StepPlan {
        if !real_seconds.is_finite() || real_seconds < 0.0 {
            warn!(real_seconds, "ignoring invalid tick interval");
            return StepPlan::idle(self.max_substep);
        }

        let sim_seconds = real_seconds * self.time_scale;
        if sim_seconds <= self.max_substep {
            return StepPlan {
                remainder: sim_seconds,
                ..StepPlan::idle(self.max_substep)
            };
        }

        let whole = (sim_seconds / self.max_substep).floor();
        if whole > self.max_substeps as f64 {
            let applied = self.max_substeps as f64 * self.max_substep;
            let dropped = sim_seconds - applied;
            warn!(
                sim_seconds,
                dropped,
                max_substeps = self.max_substeps,
                "tick exceeds substep cap, dropping simulated time"
            );
            return StepPlan {
                substeps: self.max_substeps,
                dropped,
                ..StepPlan::idle(self.max_substep)
            };
        }

        StepPlan {
            substeps: whole as usize,
            step: self.max_substep,
            remainder: (sim_seconds - whole * self.max_substep).max(0.0),
            dropped: 0.0,
        }
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::from_params(&Parameters::default())
    }
}
