/// Rheology of glacier ice and subglacial sediment
///
/// This module provides implementations for:
/// - Strain-rate tensor and second invariant from velocity gradients
/// - Glen's flow law for ice
/// - Frictional and linear-slip sediment laws, with flood perturbations
/// - Constitutive-law dispatch and controllable parameters
/// - Viscous stress assembly and von Mises stress
/// - Stress-driven continuum damage

pub mod constitutive;
pub mod damage;
pub mod flood;
pub mod ice;
pub mod sediment;
pub mod strain;
pub mod stress;

pub use constitutive::{
    ConstantMaterial, ConstitutiveLaw, ControlSchedule, DefaultValue, LawKind, MaterialInput,
    MaterialOutput, ParameterKind, ParameterSpec, ViscosityBounds,
};
pub use damage::{DamageLaw, DamageRateKind};
pub use flood::{FloodEvent, LateralProfile, LinearRamp};
pub use ice::GlenIce;
pub use sediment::{DruckerPragerSediment, FloodPerturbedSlip, LinearSlipSediment, SlipVariation};
pub use strain::{regularize_invariant, StrainRate, VelocityGradient};
pub use stress::StressTensor;
