//! Glen's flow law for glacier ice
//!
//! Ice is a shear-thinning power-law fluid. The effective viscosity follows
//! from inverting Glen's law ε̇ = A τⁿ:
//!
//! ```text
//! μ = ½ A^(-1/n) II_ε^(-(1 - 1/n)/2)
//! ```
//!
//! The exponent on II_ε is negative, so μ diverges at rest. The invariant is
//! floored at `ii_eps_min` before exponentiation and the result clamped to
//! `bounds`; both are needed for a finite, well-posed Stokes problem.
//!
//! # References
//! - Glen (1955), "The creep of polycrystalline ice"
//! - Cuffey & Paterson, "The Physics of Glaciers", 4th ed., Ch. 3

use super::constitutive::ViscosityBounds;
use super::strain::regularize_invariant;
use crate::error::{Result, RheologyError};

/// Glen's law parameters (SI)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlenIce {
    /// Fluidity A (Pa⁻ⁿ s⁻¹)
    pub fluidity: f64,
    /// Flow-law exponent n
    pub exponent: f64,
    /// Strain-rate invariant floor (s⁻²)
    pub ii_eps_min: f64,
    /// Ice density (kg m⁻³)
    pub density: f64,
    /// Admissible viscosity range (Pa·s)
    pub bounds: ViscosityBounds,
}

impl GlenIce {
    /// Temperate-ice fluidity, 75 MPa⁻³ a⁻¹
    pub const DEFAULT_FLUIDITY: f64 = 2.378234398782344e-24;
    pub const DEFAULT_EXPONENT: f64 = 3.0;
    pub const DEFAULT_II_EPS_MIN: f64 = 1.8962455606291224e-13;
    pub const DEFAULT_DENSITY: f64 = 917.0;
    /// 1e-4 MPa·a
    pub const DEFAULT_VISCOSITY_FLOOR: f64 = 3.1536e9;

    /// Create a Glen's law evaluator with default invariant floor, density and bounds
    ///
    /// # Errors
    /// `InvalidParameter` if A ≤ 0 or n ≤ 0.
    pub fn new(fluidity: f64, exponent: f64) -> Result<Self> {
        let ice = Self {
            fluidity,
            exponent,
            ..Self::default()
        };
        ice.validate()?;
        Ok(ice)
    }

    pub fn with_invariant_floor(mut self, ii_eps_min: f64) -> Self {
        self.ii_eps_min = ii_eps_min;
        self
    }

    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    pub fn with_viscosity_floor(mut self, floor: f64) -> Self {
        self.bounds.min = floor;
        self
    }

    /// Stiffened ("ramped-up") variant: cap viscosity at a near-rigid limit
    pub fn with_rampedup_viscosity(mut self, ceiling: f64) -> Self {
        self.bounds.max = ceiling;
        self
    }

    /// Whether a finite ceiling is configured
    pub fn is_ramped_up(&self) -> bool {
        self.bounds.max.is_finite()
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.fluidity > 0.0) {
            return Err(RheologyError::invalid(
                "fluidity",
                format!("must be positive, got {}", self.fluidity),
            ));
        }
        if !(self.exponent > 0.0) {
            return Err(RheologyError::invalid(
                "exponent",
                format!("must be positive, got {}", self.exponent),
            ));
        }
        if !(self.ii_eps_min > 0.0) {
            return Err(RheologyError::invalid(
                "ii_eps_min",
                format!("must be positive, got {}", self.ii_eps_min),
            ));
        }
        if !(self.density > 0.0) {
            return Err(RheologyError::invalid(
                "density",
                format!("must be positive, got {}", self.density),
            ));
        }
        self.bounds.validate()
    }

    /// A^(-1/n) (Pa s^(1/n))
    #[inline]
    pub fn hardness(&self) -> f64 {
        self.fluidity.powf(-1.0 / self.exponent)
    }

    /// Power-law viscosity without regularization or clamping
    ///
    /// Diverges as `ii_eps → 0` for n > 1.
    pub fn raw_viscosity(&self, ii_eps: f64) -> f64 {
        0.5 * self.hardness() * ii_eps.powf(-(1.0 - 1.0 / self.exponent) / 2.0)
    }

    /// Effective viscosity (Pa·s) for a strain-rate invariant (s⁻²)
    pub fn viscosity(&self, ii_eps: f64) -> f64 {
        let ii_eff = regularize_invariant(ii_eps, self.ii_eps_min);
        let mu = self.raw_viscosity(ii_eff);
        self.bounds.clamp(mu, "glen_ice")
    }

    /// Largest viscosity the power law reaches, i.e. at the invariant floor
    ///
    /// Clamping may still lower it to the ceiling.
    pub fn maximum_viscosity(&self) -> f64 {
        self.raw_viscosity(self.ii_eps_min)
    }

    /// Deviatoric stress magnitude τ_e = 2 μ √II_ε (Pa)
    pub fn effective_stress(&self, ii_eps: f64) -> f64 {
        2.0 * self.viscosity(ii_eps) * ii_eps.max(0.0).sqrt()
    }
}

impl Default for GlenIce {
    fn default() -> Self {
        Self {
            fluidity: Self::DEFAULT_FLUIDITY,
            exponent: Self::DEFAULT_EXPONENT,
            ii_eps_min: Self::DEFAULT_II_EPS_MIN,
            density: Self::DEFAULT_DENSITY,
            bounds: ViscosityBounds::floor(Self::DEFAULT_VISCOSITY_FLOOR),
        }
    }
}
