//! Constitutive laws for the deformable sediment layer beneath the ice
//!
//! Two families are available:
//!
//! - **Stress-ratio (Drucker–Prager type)**: the sediment deforms at the
//!   shear stress its friction allows under the local mean stress,
//!   `μ = f · p / ε̇_e`.
//! - **Linear slip (Gudmundsson–Raymond type)**: a thin layer whose
//!   viscosity is its thickness over a slipperiness coefficient,
//!   `μ = h / C`, optionally modulated by a travelling flood pulse.
//!
//! # References
//! - Gudmundsson & Raymond (2008), "On the limit to resolution and information
//!   on basal properties obtainable from surface data on ice streams"
//! - Drucker & Prager (1952), "Soil mechanics and plastic analysis"

use super::constitutive::ViscosityBounds;
use super::flood::{FloodEvent, LateralProfile, LinearRamp};
use super::strain::regularize_invariant;
use crate::error::{Result, RheologyError};
use crate::point::{Axis, EvaluationPoint};

/// Sediment density, Cuffey & Paterson / TC 14, 261 (2020) (kg m⁻³)
pub const DEFAULT_SEDIMENT_DENSITY: f64 = 1850.0;

/// Upper viscosity bound shared by the sediment laws (Pa·s)
pub const DEFAULT_SEDIMENT_MAX_VISCOSITY: f64 = 1e30;

fn positive(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(RheologyError::invalid(
            name,
            format!("must be positive and finite, got {}", value),
        ))
    }
}

// ============================================================================
// Stress-ratio law
// ============================================================================

/// Frictional sediment: viscosity from a stress ratio
///
/// ```text
/// ε̇_e = √max(II_ε, II_min)
/// μ   = f · p / |ε̇_e|
/// ```
///
/// The resulting deviatoric stress 2μ ε̇_e is proportional to the mean stress,
/// as for a Drucker–Prager material at zero cohesion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DruckerPragerSediment {
    /// Friction coefficient f (dimensionless)
    pub friction_coefficient: f64,
    /// Strain-rate invariant floor (s⁻²)
    pub ii_eps_min: f64,
    /// Density (kg m⁻³)
    pub density: f64,
    pub bounds: ViscosityBounds,
}

impl DruckerPragerSediment {
    pub const DEFAULT_FRICTION_COEFFICIENT: f64 = 1.0;
    pub const DEFAULT_II_EPS_MIN: f64 = 1e-25;

    pub fn new(friction_coefficient: f64) -> Result<Self> {
        let law = Self {
            friction_coefficient,
            ..Self::default()
        };
        law.validate()?;
        Ok(law)
    }

    pub fn with_invariant_floor(mut self, ii_eps_min: f64) -> Self {
        self.ii_eps_min = ii_eps_min;
        self
    }

    pub fn with_bounds(mut self, bounds: ViscosityBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.friction_coefficient >= 0.0) {
            return Err(RheologyError::invalid(
                "friction_coefficient",
                format!("must be non-negative, got {}", self.friction_coefficient),
            ));
        }
        positive("ii_eps_min", self.ii_eps_min)?;
        positive("density", self.density)?;
        self.bounds.validate()
    }

    /// Viscosity (Pa·s) from the strain-rate invariant (s⁻²) and mean stress (Pa)
    pub fn viscosity(&self, ii_eps: f64, pressure: f64) -> f64 {
        let eps_e = regularize_invariant(ii_eps, self.ii_eps_min).sqrt();
        let mu = self.friction_coefficient * pressure / eps_e.abs();
        self.bounds.clamp(mu, "drucker_prager_sediment")
    }
}

impl Default for DruckerPragerSediment {
    fn default() -> Self {
        Self {
            friction_coefficient: Self::DEFAULT_FRICTION_COEFFICIENT,
            ii_eps_min: Self::DEFAULT_II_EPS_MIN,
            density: DEFAULT_SEDIMENT_DENSITY,
            bounds: ViscosityBounds::new(0.0, DEFAULT_SEDIMENT_MAX_VISCOSITY),
        }
    }
}

// ============================================================================
// Linear-slip law
// ============================================================================

/// Thin sediment layer with uniform slipperiness: `μ = h / C`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearSlipSediment {
    /// Layer thickness h (m)
    pub layer_thickness: f64,
    /// Slipperiness coefficient C (m Pa⁻¹ s⁻¹)
    pub slipperiness: f64,
    /// Density (kg m⁻³)
    pub density: f64,
    pub bounds: ViscosityBounds,
}

impl LinearSlipSediment {
    pub const DEFAULT_LAYER_THICKNESS: f64 = 1.0;
    pub const DEFAULT_SLIPPERINESS: f64 = 1.0;

    pub fn new(layer_thickness: f64, slipperiness: f64) -> Result<Self> {
        let law = Self {
            layer_thickness,
            slipperiness,
            ..Self::default()
        };
        law.validate()?;
        Ok(law)
    }

    pub fn validate(&self) -> Result<()> {
        positive("layer_thickness", self.layer_thickness)?;
        positive("slipperiness_coefficient", self.slipperiness)?;
        positive("density", self.density)?;
        self.bounds.validate()
    }

    pub fn viscosity(&self) -> f64 {
        self.bounds
            .clamp(self.layer_thickness / self.slipperiness, "linear_slip_sediment")
    }
}

impl Default for LinearSlipSediment {
    fn default() -> Self {
        Self {
            layer_thickness: Self::DEFAULT_LAYER_THICKNESS,
            slipperiness: Self::DEFAULT_SLIPPERINESS,
            density: DEFAULT_SEDIMENT_DENSITY,
            bounds: ViscosityBounds::new(0.0, DEFAULT_SEDIMENT_MAX_VISCOSITY),
        }
    }
}

// ============================================================================
// Flood-perturbed slip
// ============================================================================

/// How slipperiness or viscosity varies in space and time
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlipVariation {
    /// Uniform slipperiness: `μ = h / C`
    Constant,
    /// Viscosity ramps linearly between a back and a front value
    LinearRamp(LinearRamp),
    /// Slipperiness raised by a travelling pulse: `μ = h / (C + A·pulse)`,
    /// amplitude in m Pa⁻¹ s⁻¹
    Flood(FloodEvent),
    /// Ramped baseline viscosity lowered by a pulse confined laterally:
    /// `μ = μ_ramp(x) − A·pulse·w(y)`, amplitude in Pa·s
    ChannelFlood {
        flood: FloodEvent,
        baseline: LinearRamp,
        lateral: LateralProfile,
        lateral_axis: Axis,
    },
}

impl SlipVariation {
    pub fn name(&self) -> &'static str {
        match self {
            SlipVariation::Constant => "constant",
            SlipVariation::LinearRamp(_) => "linear_ramp",
            SlipVariation::Flood(_) => "subglacial_flood",
            SlipVariation::ChannelFlood { .. } => "channel_flood",
        }
    }

    pub fn valid_types() -> &'static [&'static str] {
        &["constant", "linear_ramp", "subglacial_flood", "channel_flood"]
    }

    pub fn flood(&self) -> Option<&FloodEvent> {
        match self {
            SlipVariation::Flood(flood) | SlipVariation::ChannelFlood { flood, .. } => Some(flood),
            _ => None,
        }
    }

    pub fn flood_mut(&mut self) -> Option<&mut FloodEvent> {
        match self {
            SlipVariation::Flood(flood) | SlipVariation::ChannelFlood { flood, .. } => Some(flood),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            SlipVariation::Constant => Ok(()),
            SlipVariation::LinearRamp(ramp) => ramp.validate(),
            SlipVariation::Flood(flood) => flood.validate(),
            SlipVariation::ChannelFlood {
                flood,
                baseline,
                lateral,
                ..
            } => {
                flood.validate()?;
                baseline.validate()?;
                lateral.validate()
            }
        }
    }
}

impl Default for SlipVariation {
    fn default() -> Self {
        SlipVariation::Constant
    }
}

/// Linear-slip sediment under a transient basal lubrication event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloodPerturbedSlip {
    /// Layer thickness h (m)
    pub layer_thickness: f64,
    /// Background slipperiness C (m Pa⁻¹ s⁻¹)
    pub slipperiness: f64,
    /// Density (kg m⁻³)
    pub density: f64,
    pub variation: SlipVariation,
    pub bounds: ViscosityBounds,
}

impl FloodPerturbedSlip {
    /// The flooded layer is assigned the density of ice
    pub const DEFAULT_DENSITY: f64 = 917.0;

    pub fn new(variation: SlipVariation) -> Result<Self> {
        let law = Self {
            variation,
            ..Self::default()
        };
        law.validate()?;
        Ok(law)
    }

    pub fn validate(&self) -> Result<()> {
        positive("layer_thickness", self.layer_thickness)?;
        positive("slipperiness_coefficient", self.slipperiness)?;
        positive("density", self.density)?;
        self.variation.validate()?;
        if let SlipVariation::Flood(flood) = &self.variation {
            // The pulse peaks at 1, so C + A bounds the slipperiness from below
            let lowest = self.slipperiness + flood.amplitude.min(0.0);
            if !(lowest > 0.0) {
                return Err(RheologyError::invalid(
                    "flood_amplitude",
                    format!(
                        "slipperiness {} + amplitude {} must stay positive",
                        self.slipperiness, flood.amplitude
                    ),
                ));
            }
        }
        self.bounds.validate()
    }

    /// Slipperiness at a point; only the flood variant makes it vary
    pub fn slipperiness_at(&self, point: &EvaluationPoint) -> f64 {
        match &self.variation {
            SlipVariation::Flood(flood) => self.slipperiness + flood.perturbation(point),
            _ => self.slipperiness,
        }
    }

    /// Viscosity (Pa·s) at a point and time
    pub fn viscosity(&self, point: &EvaluationPoint) -> f64 {
        let mu = match &self.variation {
            SlipVariation::Constant => self.layer_thickness / self.slipperiness,
            SlipVariation::LinearRamp(ramp) => ramp.value(point),
            SlipVariation::Flood(_) => self.layer_thickness / self.slipperiness_at(point),
            SlipVariation::ChannelFlood {
                flood,
                baseline,
                lateral,
                lateral_axis,
            } => {
                let weight = lateral.weight(point.coordinate(*lateral_axis));
                baseline.value(point) - flood.perturbation(point) * weight
            }
        };
        self.bounds.clamp(mu, "flood_perturbed_slip")
    }
}

impl Default for FloodPerturbedSlip {
    fn default() -> Self {
        Self {
            layer_thickness: LinearSlipSediment::DEFAULT_LAYER_THICKNESS,
            slipperiness: LinearSlipSediment::DEFAULT_SLIPPERINESS,
            density: Self::DEFAULT_DENSITY,
            variation: SlipVariation::Constant,
            bounds: ViscosityBounds::new(0.0, DEFAULT_SEDIMENT_MAX_VISCOSITY),
        }
    }
}
