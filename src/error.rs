//! Error types for the simulation core and scenario loading

use thiserror::Error;

/// Result type for core operations
pub type SimResult<T> = Result<T, SimError>;

/// Errors reported by [`OrbitalSystem`](crate::OrbitalSystem)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("body index {index} out of range for a system of {len} bodies")]
    BodyIndex { index: usize, len: usize },

    #[error("a body named {0:?} already exists")]
    DuplicateName(String),

    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

/// Errors raised while loading a scenario file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid scenario: {0}")]
    Invalid(String),

    #[error(transparent)]
    Sim(#[from] SimError),
}
