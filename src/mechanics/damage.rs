//! Scalar continuum damage driven by von Mises stress
//!
//! Explicit forward-Euler update per time step at each point:
//!
//! ```text
//! Ξ   = α σ_vm
//! d_k = d_{k-1} + Δt · ḋ(Ξ, d_{k-1})
//! ```
//!
//! with either the linear relaxation rate `ḋ = B (Ξ - d)` or the power law
//! `ḋ = B max(Ξ / (1 - d) - σ_th, 0)^r`. Damage is not clamped; the linear
//! rate lets it decrease when Ξ < d.
//!
//! # References
//! - Pralong & Funk (2005), "Dynamic damage model of crevasse opening and
//!   application to glacier calving"

use serde::{Deserialize, Serialize};

use super::stress::StressTensor;
use crate::error::{Result, RheologyError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageRateKind {
    /// ḋ = B (Ξ - d)
    #[default]
    Linear,
    /// ḋ = B max(Ξ / (1 - d) - σ_th, 0)^r
    PowerLaw,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageLaw {
    /// Weight α on the von Mises stress
    pub alpha: f64,
    /// Rate B (s⁻¹ per unit stress measure)
    pub rate: f64,
    /// Power-law exponent r
    pub exponent: f64,
    /// Power-law threshold σ_th, in the units of Ξ
    pub threshold: f64,
    /// Factor from Pa to the units Ξ is expressed in
    pub stress_scale: f64,
    pub kind: DamageRateKind,
}

impl DamageLaw {
    pub const DEFAULT_ALPHA: f64 = 1.0;
    pub const DEFAULT_RATE: f64 = 1.0;
    pub const DEFAULT_EXPONENT: f64 = 0.43;
    pub const DEFAULT_THRESHOLD: f64 = 0.11;

    pub fn validate(&self) -> Result<()> {
        if !self.alpha.is_finite() {
            return Err(RheologyError::invalid("alpha", "must be finite"));
        }
        if !(self.rate >= 0.0) || !self.rate.is_finite() {
            return Err(RheologyError::invalid(
                "rate",
                format!("must be finite and non-negative, got {}", self.rate),
            ));
        }
        if !(self.exponent > 0.0) {
            return Err(RheologyError::invalid(
                "exponent",
                format!("must be positive, got {}", self.exponent),
            ));
        }
        if !(self.threshold >= 0.0) {
            return Err(RheologyError::invalid(
                "threshold",
                format!("must be non-negative, got {}", self.threshold),
            ));
        }
        if !(self.stress_scale > 0.0) {
            return Err(RheologyError::invalid(
                "stress_scale",
                format!("must be positive, got {}", self.stress_scale),
            ));
        }
        Ok(())
    }

    /// Ξ for a stress state
    pub fn stress_measure(&self, stress: &StressTensor) -> f64 {
        self.alpha * stress.von_mises() * self.stress_scale
    }

    /// Damage rate ḋ at damage `d` under stress measure `xi`
    pub fn rate_of_change(&self, d: f64, xi: f64) -> f64 {
        match self.kind {
            DamageRateKind::Linear => self.rate * (xi - d),
            DamageRateKind::PowerLaw => {
                if d >= 1.0 {
                    return 0.0;
                }
                let excess = (xi / (1.0 - d) - self.threshold).max(0.0);
                self.rate * excess.powf(self.exponent)
            }
        }
    }

    /// Advance damage by one step from the previous value
    ///
    /// # Errors
    /// `InvalidParameter` if `dt` is negative or not finite.
    pub fn step(&self, previous: f64, stress: &StressTensor, dt: f64) -> Result<f64> {
        self.step_with_measure(previous, self.stress_measure(stress), dt)
    }

    pub fn step_with_measure(&self, previous: f64, xi: f64, dt: f64) -> Result<f64> {
        check_time_step(dt)?;
        Ok(previous + dt * self.rate_of_change(previous, xi))
    }
}

impl Default for DamageLaw {
    fn default() -> Self {
        Self {
            alpha: Self::DEFAULT_ALPHA,
            rate: Self::DEFAULT_RATE,
            exponent: Self::DEFAULT_EXPONENT,
            threshold: Self::DEFAULT_THRESHOLD,
            stress_scale: 1.0,
            kind: DamageRateKind::Linear,
        }
    }
}

pub(crate) fn check_time_step(dt: f64) -> Result<()> {
    if dt >= 0.0 && dt.is_finite() {
        Ok(())
    } else {
        Err(RheologyError::invalid(
            "dt",
            format!("time step must be finite and non-negative, got {}", dt),
        ))
    }
}
