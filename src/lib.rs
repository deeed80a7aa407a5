pub mod error;
pub mod point;
pub mod utils;
pub mod mechanics;
pub mod physics;
pub mod bc;     // Boundary stresses
pub mod state;  // Per-point damage history
pub mod updates;
pub mod config;

pub use error::{Result, RheologyError};
pub use point::{Axis, Dimension, EvaluationPoint, PointId};
pub use mechanics::{
    ConstantMaterial, ConstitutiveLaw, ControlSchedule, DamageLaw, DamageRateKind,
    DruckerPragerSediment, FloodEvent, FloodPerturbedSlip, GlenIce, LateralProfile, LawKind,
    LinearRamp, LinearSlipSediment, MaterialInput, MaterialOutput, ParameterKind, ParameterSpec,
    SlipVariation, StrainRate, StressTensor, VelocityGradient, ViscosityBounds,
};
pub use physics::{MultiOrmsbyWavelet, WaterColumn};
pub use bc::{AppliedStress, BoundaryStress, HydrostaticPressure, StressSource};
pub use state::{DamageRecord, DamageState};
pub use config::RheologyConfig;
pub use updates::{compute_point_properties, output_fields, update_damage, PointProperties, PointSample};
pub use utils::units;
