//! Error types for rheology construction and configuration
//!
//! Evaluation itself never fails: near-singular inputs are floored or
//! clamped. Every error below is raised while building evaluators from
//! configuration, before the first evaluation pass.

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, RheologyError>;

#[derive(Error, Debug)]
pub enum RheologyError {
    /// A velocity component required by the problem dimension was not supplied
    #[error("velocity component '{component}' is required for a {dimension}D problem")]
    MissingComponent {
        component: &'static str,
        dimension: usize,
    },

    /// A parameter value is outside its admissible range
    #[error("invalid value for '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Unrecognized law, boundary kind, unit system or other variant name
    #[error("unknown {what} '{name}' (expected one of: {expected})")]
    UnknownVariant {
        what: &'static str,
        name: String,
        expected: String,
    },

    /// A control update named a parameter the evaluator does not declare
    #[error("'{law}' has no parameter named '{name}'")]
    UnknownParameter { law: &'static str, name: String },

    /// A control update targeted a parameter that is fixed at construction
    #[error("parameter '{name}' of '{law}' is not controllable")]
    NotControllable { law: &'static str, name: String },

    /// Spatial dimension outside 1..=3
    #[error("problem dimension must be 1, 2 or 3, got {0}")]
    InvalidDimension(usize),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl RheologyError {
    pub(crate) fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        RheologyError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown_variant(what: &'static str, name: &str, expected: &[&str]) -> Self {
        RheologyError::UnknownVariant {
            what,
            name: name.to_string(),
            expected: expected.join(", "),
        }
    }
}
