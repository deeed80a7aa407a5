//! Constitutive-law dispatch
//!
//! Every material evaluator maps the local kinematic state at one point to an
//! effective viscosity and a density. The law is selected once, from
//! configuration, as a variant of [`ConstitutiveLaw`]; evaluation dispatches on
//! the tag.
//!
//! Evaluation borrows the law immutably. Controllable parameters are changed
//! through `&mut ConstitutiveLaw` between passes, either directly with
//! [`ConstitutiveLaw::set_control`] or in bulk through a [`ControlSchedule`].

use super::flood::LinearRamp;
use super::ice::GlenIce;
use super::sediment::{DruckerPragerSediment, FloodPerturbedSlip, LinearSlipSediment};
use super::strain::StrainRate;
use crate::error::{Result, RheologyError};
use crate::point::EvaluationPoint;

// ============================================================================
// Viscosity bounds
// ============================================================================

/// Closed admissible interval for an effective viscosity (Pa·s)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViscosityBounds {
    pub min: f64,
    pub max: f64,
}

impl ViscosityBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Lower bound only
    pub fn floor(min: f64) -> Self {
        Self {
            min,
            max: f64::INFINITY,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.min >= 0.0) || !self.min.is_finite() {
            return Err(RheologyError::invalid(
                "viscosity_floor",
                format!("must be finite and non-negative, got {}", self.min),
            ));
        }
        if !(self.max >= self.min) {
            return Err(RheologyError::invalid(
                "rampedup_viscosity",
                format!("ceiling {} is below floor {}", self.max, self.min),
            ));
        }
        Ok(())
    }

    /// Clamp `mu` into the interval; NaN maps to the floor
    pub fn clamp(&self, mu: f64, law: &str) -> f64 {
        if mu.is_nan() {
            log::debug!("{}: non-finite viscosity replaced by floor {:.3e}", law, self.min);
            self.min
        } else if mu < self.min {
            log::debug!("{}: viscosity {:.3e} raised to floor {:.3e}", law, mu, self.min);
            self.min
        } else if mu > self.max {
            log::debug!("{}: viscosity {:.3e} capped at {:.3e}", law, mu, self.max);
            self.max
        } else {
            mu
        }
    }

    pub fn contains(&self, mu: f64) -> bool {
        mu >= self.min && mu <= self.max
    }
}

impl Default for ViscosityBounds {
    fn default() -> Self {
        Self::floor(0.0)
    }
}

// ============================================================================
// Uniform material
// ============================================================================

/// Spatially uniform viscosity and density
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantMaterial {
    pub viscosity: f64,
    pub density: f64,
}

impl ConstantMaterial {
    pub fn new(viscosity: f64, density: f64) -> Result<Self> {
        let material = Self { viscosity, density };
        material.validate()?;
        Ok(material)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.viscosity >= 0.0) || !self.viscosity.is_finite() {
            return Err(RheologyError::invalid(
                "viscosity",
                format!("must be finite and non-negative, got {}", self.viscosity),
            ));
        }
        if !(self.density > 0.0) {
            return Err(RheologyError::invalid(
                "density",
                format!("must be positive, got {}", self.density),
            ));
        }
        Ok(())
    }
}

impl Default for ConstantMaterial {
    fn default() -> Self {
        Self {
            viscosity: 1.0,
            density: 1.0,
        }
    }
}

// ============================================================================
// Parameter declarations
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    Real,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Real(f64),
    Text(&'static str),
    /// No default; must be given whenever the parameter is used
    Required,
}

/// Declared configuration parameter of a law
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub kind: ParameterKind,
    pub default: DefaultValue,
    /// May change between evaluation passes
    pub controllable: bool,
}

impl ParameterSpec {
    const fn real(name: &'static str, default: f64, controllable: bool) -> Self {
        Self {
            name,
            kind: ParameterKind::Real,
            default: DefaultValue::Real(default),
            controllable,
        }
    }

    const fn required(name: &'static str) -> Self {
        Self {
            name,
            kind: ParameterKind::Real,
            default: DefaultValue::Required,
            controllable: false,
        }
    }

    const fn text(name: &'static str, default: &'static str) -> Self {
        Self {
            name,
            kind: ParameterKind::Text,
            default: DefaultValue::Text(default),
            controllable: false,
        }
    }
}

const GLEN_PARAMETERS: &[ParameterSpec] = &[
    ParameterSpec::real("fluidity", GlenIce::DEFAULT_FLUIDITY, false),
    ParameterSpec::real("exponent", GlenIce::DEFAULT_EXPONENT, false),
    ParameterSpec::real("ii_eps_min", GlenIce::DEFAULT_II_EPS_MIN, false),
    ParameterSpec::real("density", GlenIce::DEFAULT_DENSITY, false),
    ParameterSpec::real("viscosity_floor", GlenIce::DEFAULT_VISCOSITY_FLOOR, false),
    ParameterSpec::real("rampedup_viscosity", f64::INFINITY, true),
];

const DRUCKER_PRAGER_PARAMETERS: &[ParameterSpec] = &[
    ParameterSpec::real(
        "friction_coefficient",
        DruckerPragerSediment::DEFAULT_FRICTION_COEFFICIENT,
        true,
    ),
    ParameterSpec::real("ii_eps_min", DruckerPragerSediment::DEFAULT_II_EPS_MIN, false),
    ParameterSpec::real("density", super::sediment::DEFAULT_SEDIMENT_DENSITY, false),
    ParameterSpec::real(
        "max_viscosity",
        super::sediment::DEFAULT_SEDIMENT_MAX_VISCOSITY,
        false,
    ),
];

const LINEAR_SLIP_PARAMETERS: &[ParameterSpec] = &[
    ParameterSpec::real(
        "layer_thickness",
        LinearSlipSediment::DEFAULT_LAYER_THICKNESS,
        true,
    ),
    ParameterSpec::real(
        "slipperiness_coefficient",
        LinearSlipSediment::DEFAULT_SLIPPERINESS,
        true,
    ),
    ParameterSpec::real("density", super::sediment::DEFAULT_SEDIMENT_DENSITY, false),
];

const FLOOD_PARAMETERS: &[ParameterSpec] = &[
    ParameterSpec::real(
        "layer_thickness",
        LinearSlipSediment::DEFAULT_LAYER_THICKNESS,
        true,
    ),
    ParameterSpec::real(
        "slipperiness_coefficient",
        LinearSlipSediment::DEFAULT_SLIPPERINESS,
        true,
    ),
    ParameterSpec::real("density", FloodPerturbedSlip::DEFAULT_DENSITY, false),
    ParameterSpec::text("variation", "constant"),
    ParameterSpec::real(
        "flood_start_position",
        super::flood::FloodEvent::DEFAULT_START_POSITION,
        true,
    ),
    ParameterSpec::real("flood_amplitude", super::flood::FloodEvent::DEFAULT_AMPLITUDE, true),
    ParameterSpec::real("flood_peak_time", super::flood::FloodEvent::DEFAULT_PEAK_TIME, true),
    ParameterSpec::real(
        "flood_spread_time",
        super::flood::FloodEvent::DEFAULT_SPREAD_TIME,
        true,
    ),
    ParameterSpec::real("flood_speed", super::flood::FloodEvent::DEFAULT_SPEED, true),
    ParameterSpec::text("flood_axis", "x"),
    // Baseline of the channel flood
    ParameterSpec::real("ramp_back", LinearRamp::DEFAULT_BACK, false),
    ParameterSpec::real("ramp_front", LinearRamp::DEFAULT_FRONT, false),
    ParameterSpec::real("ramp_length", LinearRamp::DEFAULT_LENGTH, false),
    ParameterSpec::text("ramp_axis", "x"),
    // Cross-channel confinement of the channel flood
    ParameterSpec::text("lateral_profile", "uniform"),
    ParameterSpec::real("lateral_center", 0.0, false),
    ParameterSpec::required("lateral_half_width"),
    ParameterSpec::required("lateral_width"),
    ParameterSpec::text("lateral_axis", "y"),
];

const CONSTANT_PARAMETERS: &[ParameterSpec] = &[
    ParameterSpec::real("viscosity", 1.0, true),
    ParameterSpec::real("density", 1.0, false),
];

// ============================================================================
// Law selection
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LawKind {
    Glen,
    DruckerPrager,
    LinearSlip,
    FloodPerturbedSlip,
    Constant,
}

impl LawKind {
    pub fn valid_types() -> &'static [&'static str] {
        &[
            "glen",
            "drucker_prager",
            "linear_slip",
            "flood_perturbed_slip",
            "constant",
        ]
    }

    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "glen" => Ok(LawKind::Glen),
            "drucker_prager" => Ok(LawKind::DruckerPrager),
            "linear_slip" => Ok(LawKind::LinearSlip),
            "flood_perturbed_slip" => Ok(LawKind::FloodPerturbedSlip),
            "constant" => Ok(LawKind::Constant),
            _ => Err(RheologyError::unknown_variant(
                "constitutive law",
                s,
                Self::valid_types(),
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LawKind::Glen => "glen",
            LawKind::DruckerPrager => "drucker_prager",
            LawKind::LinearSlip => "linear_slip",
            LawKind::FloodPerturbedSlip => "flood_perturbed_slip",
            LawKind::Constant => "constant",
        }
    }
}

/// Kinematic and mechanical state at one evaluation point
#[derive(Debug, Clone, Copy)]
pub struct MaterialInput<'a> {
    pub point: &'a EvaluationPoint,
    pub strain_rate: &'a StrainRate,
    /// Mean stress (Pa), used by pressure-dependent laws
    pub pressure: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialOutput {
    /// Effective viscosity (Pa·s)
    pub viscosity: f64,
    /// Density (kg m⁻³)
    pub density: f64,
}

/// Material law for one region of the domain
#[derive(Debug, Clone, PartialEq)]
pub enum ConstitutiveLaw {
    GlenIce(GlenIce),
    DruckerPragerSediment(DruckerPragerSediment),
    LinearSlipSediment(LinearSlipSediment),
    FloodPerturbedSlip(FloodPerturbedSlip),
    Constant(ConstantMaterial),
}

impl ConstitutiveLaw {
    pub fn kind(&self) -> LawKind {
        match self {
            ConstitutiveLaw::GlenIce(_) => LawKind::Glen,
            ConstitutiveLaw::DruckerPragerSediment(_) => LawKind::DruckerPrager,
            ConstitutiveLaw::LinearSlipSediment(_) => LawKind::LinearSlip,
            ConstitutiveLaw::FloodPerturbedSlip(_) => LawKind::FloodPerturbedSlip,
            ConstitutiveLaw::Constant(_) => LawKind::Constant,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            ConstitutiveLaw::GlenIce(law) => law.validate(),
            ConstitutiveLaw::DruckerPragerSediment(law) => law.validate(),
            ConstitutiveLaw::LinearSlipSediment(law) => law.validate(),
            ConstitutiveLaw::FloodPerturbedSlip(law) => law.validate(),
            ConstitutiveLaw::Constant(material) => material.validate(),
        }
    }

    /// Effective viscosity at one point (Pa·s)
    pub fn viscosity(&self, input: &MaterialInput<'_>) -> f64 {
        match self {
            ConstitutiveLaw::GlenIce(law) => law.viscosity(input.strain_rate.second_invariant()),
            ConstitutiveLaw::DruckerPragerSediment(law) => {
                law.viscosity(input.strain_rate.second_invariant(), input.pressure)
            }
            ConstitutiveLaw::LinearSlipSediment(law) => law.viscosity(),
            ConstitutiveLaw::FloodPerturbedSlip(law) => law.viscosity(input.point),
            ConstitutiveLaw::Constant(material) => material.viscosity,
        }
    }

    pub fn density(&self) -> f64 {
        match self {
            ConstitutiveLaw::GlenIce(law) => law.density,
            ConstitutiveLaw::DruckerPragerSediment(law) => law.density,
            ConstitutiveLaw::LinearSlipSediment(law) => law.density,
            ConstitutiveLaw::FloodPerturbedSlip(law) => law.density,
            ConstitutiveLaw::Constant(material) => material.density,
        }
    }

    pub fn evaluate(&self, input: &MaterialInput<'_>) -> MaterialOutput {
        MaterialOutput {
            viscosity: self.viscosity(input),
            density: self.density(),
        }
    }

    /// Declared parameters with their defaults
    pub fn parameters(&self) -> &'static [ParameterSpec] {
        match self.kind() {
            LawKind::Glen => GLEN_PARAMETERS,
            LawKind::DruckerPrager => DRUCKER_PRAGER_PARAMETERS,
            LawKind::LinearSlip => LINEAR_SLIP_PARAMETERS,
            LawKind::FloodPerturbedSlip => FLOOD_PARAMETERS,
            LawKind::Constant => CONSTANT_PARAMETERS,
        }
    }

    /// Names of the fields this law produces, viscosity first
    pub fn outputs(&self) -> &'static [&'static str] {
        match self.kind() {
            LawKind::Glen => &["mu_ice", "rho_ice"],
            LawKind::DruckerPrager | LawKind::LinearSlip => &["mu_sediment", "rho_sediment"],
            LawKind::FloodPerturbedSlip => &["mu_floodedsediment", "rho_floodedsediment"],
            LawKind::Constant => &["mu", "rho"],
        }
    }

    pub fn parameter(&self, name: &str) -> Option<&'static ParameterSpec> {
        self.parameters().iter().find(|spec| spec.name == name)
    }

    /// Update one controllable parameter
    ///
    /// The law is left unchanged if the name is unknown, the parameter is not
    /// controllable, or the new value fails validation.
    pub fn set_control(&mut self, name: &str, value: f64) -> Result<()> {
        let law = self.name();
        let spec = self
            .parameter(name)
            .ok_or_else(|| RheologyError::UnknownParameter {
                law,
                name: name.to_string(),
            })?;
        if !spec.controllable {
            return Err(RheologyError::NotControllable {
                law,
                name: name.to_string(),
            });
        }

        let mut updated = self.clone();
        updated.write_control(name, value)?;
        updated.validate()?;

        log::debug!("{}: control '{}' set to {:e}", law, name, value);
        *self = updated;
        Ok(())
    }

    fn write_control(&mut self, name: &str, value: f64) -> Result<()> {
        let law = self.name();
        let not_controllable = || RheologyError::NotControllable {
            law,
            name: name.to_string(),
        };

        match (self, name) {
            (ConstitutiveLaw::GlenIce(ice), "rampedup_viscosity") => ice.bounds.max = value,
            (ConstitutiveLaw::DruckerPragerSediment(dp), "friction_coefficient") => {
                dp.friction_coefficient = value
            }
            (ConstitutiveLaw::LinearSlipSediment(slip), "slipperiness_coefficient") => {
                slip.slipperiness = value
            }
            (ConstitutiveLaw::LinearSlipSediment(slip), "layer_thickness") => {
                slip.layer_thickness = value
            }
            (ConstitutiveLaw::FloodPerturbedSlip(flood), "layer_thickness") => {
                flood.layer_thickness = value
            }
            (ConstitutiveLaw::FloodPerturbedSlip(flood), "slipperiness_coefficient") => {
                flood.slipperiness = value
            }
            (ConstitutiveLaw::FloodPerturbedSlip(law), flood_name) => {
                let flood = law.variation.flood_mut().ok_or_else(not_controllable)?;
                match flood_name {
                    "flood_start_position" => flood.start_position = value,
                    "flood_amplitude" => flood.amplitude = value,
                    "flood_peak_time" => flood.peak_time = value,
                    "flood_spread_time" => flood.spread_time = value,
                    "flood_speed" => flood.speed = value,
                    _ => return Err(not_controllable()),
                }
            }
            (ConstitutiveLaw::Constant(material), "viscosity") => material.viscosity = value,
            _ => return Err(not_controllable()),
        }
        Ok(())
    }
}

impl From<GlenIce> for ConstitutiveLaw {
    fn from(law: GlenIce) -> Self {
        ConstitutiveLaw::GlenIce(law)
    }
}

impl From<DruckerPragerSediment> for ConstitutiveLaw {
    fn from(law: DruckerPragerSediment) -> Self {
        ConstitutiveLaw::DruckerPragerSediment(law)
    }
}

impl From<LinearSlipSediment> for ConstitutiveLaw {
    fn from(law: LinearSlipSediment) -> Self {
        ConstitutiveLaw::LinearSlipSediment(law)
    }
}

impl From<FloodPerturbedSlip> for ConstitutiveLaw {
    fn from(law: FloodPerturbedSlip) -> Self {
        ConstitutiveLaw::FloodPerturbedSlip(law)
    }
}

impl From<ConstantMaterial> for ConstitutiveLaw {
    fn from(material: ConstantMaterial) -> Self {
        ConstitutiveLaw::Constant(material)
    }
}

// ============================================================================
// Control schedule
// ============================================================================

/// Controllable-parameter updates queued during a pass
///
/// `apply` runs between passes and is all-or-nothing: if any update fails the
/// law is untouched and the queue is kept.
#[derive(Debug, Clone, Default)]
pub struct ControlSchedule {
    updates: Vec<(String, f64)>,
}

impl ControlSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: f64) {
        self.updates.push((name.into(), value));
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Apply all queued updates in order; returns how many were applied
    pub fn apply(&mut self, law: &mut ConstitutiveLaw) -> Result<usize> {
        let mut updated = law.clone();
        for (name, value) in &self.updates {
            updated.set_control(name, *value)?;
        }
        *law = updated;
        Ok(self.updates.drain(..).count())
    }
}
