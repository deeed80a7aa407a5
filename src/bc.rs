//! Boundary stress terms
//!
//! Each boundary term produces a scalar stress at a boundary point. Its
//! contribution to the momentum residual is that scalar along the outward
//! unit normal; integration against test functions and face geometry is left
//! to the host assembly.
//!
//! - Hydrostatic: water pressure below a free surface, compressive positive
//! - Applied stress: a constant or wavelet-modulated value, independent of position

use nalgebra::Vector3;

use crate::error::{Result, RheologyError};
use crate::physics::{MultiOrmsbyWavelet, WaterColumn};
use crate::point::EvaluationPoint;

/// Water pressure on a submerged boundary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HydrostaticPressure {
    /// ρ_w (kg/m³)
    pub water_density: f64,
    /// g (m/s²)
    pub gravity: f64,
    /// z_w (m)
    pub water_level: f64,
}

impl HydrostaticPressure {
    pub fn new(water_density: f64, gravity: f64, water_level: f64) -> Result<Self> {
        let bc = Self {
            water_density,
            gravity,
            water_level,
        };
        bc.validate()?;
        Ok(bc)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.water_density > 0.0) {
            return Err(RheologyError::invalid(
                "water_density",
                format!("must be positive, got {}", self.water_density),
            ));
        }
        if !(self.gravity > 0.0) {
            return Err(RheologyError::invalid(
                "gravity",
                format!("must be positive, got {}", self.gravity),
            ));
        }
        if !self.water_level.is_finite() {
            return Err(RheologyError::invalid("water_level", "must be finite"));
        }
        Ok(())
    }

    fn column(&self) -> WaterColumn {
        WaterColumn::new(self.water_density, self.gravity, self.water_level)
    }

    /// Pressure at elevation `z` (Pa); zero at and above the water level
    pub fn pressure(&self, z: f64) -> f64 {
        self.column().pressure(z)
    }

    /// p · n at a boundary point
    pub fn traction(&self, point: &EvaluationPoint, normal: &Vector3<f64>) -> Vector3<f64> {
        normal * self.pressure(point.elevation())
    }
}

impl Default for HydrostaticPressure {
    fn default() -> Self {
        Self {
            water_density: WaterColumn::SEAWATER_DENSITY,
            gravity: WaterColumn::GRAVITY,
            water_level: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StressSource {
    /// Fixed stress (Pa)
    Constant(f64),
    /// Time-varying stress (Pa), peak equal to the wavelet scale factor
    Wavelet(MultiOrmsbyWavelet),
}

/// Prescribed normal stress on a boundary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedStress {
    pub source: StressSource,
}

impl AppliedStress {
    pub fn constant(value: f64) -> Self {
        Self {
            source: StressSource::Constant(value),
        }
    }

    pub fn wavelet(wavelet: MultiOrmsbyWavelet) -> Self {
        Self {
            source: StressSource::Wavelet(wavelet),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match &self.source {
            StressSource::Constant(value) if !value.is_finite() => {
                Err(RheologyError::invalid("value", "applied stress must be finite"))
            }
            StressSource::Constant(_) => Ok(()),
            StressSource::Wavelet(wavelet) => wavelet.validate(),
        }
    }

    /// Stress at time `t` (Pa)
    pub fn value(&self, t: f64) -> f64 {
        match &self.source {
            StressSource::Constant(value) => *value,
            StressSource::Wavelet(wavelet) => wavelet.value(t),
        }
    }

    /// Update the applied magnitude between passes
    ///
    /// For a wavelet source this rescales its peak.
    pub fn set_value(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(RheologyError::invalid("value", "applied stress must be finite"));
        }
        match &mut self.source {
            StressSource::Constant(v) => *v = value,
            StressSource::Wavelet(wavelet) => wavelet.scale_factor = value,
        }
        Ok(())
    }

    pub fn traction(&self, point: &EvaluationPoint, normal: &Vector3<f64>) -> Vector3<f64> {
        normal * self.value(point.time)
    }
}

/// Boundary stress term selected from configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryStress {
    Hydrostatic(HydrostaticPressure),
    Applied(AppliedStress),
}

impl BoundaryStress {
    /// Parse a boundary kind from config
    ///
    /// `value` is the water level for "hydrostatic" and the stress for
    /// "applied_stress".
    pub fn from_str(s: &str, value: f64) -> Result<Self> {
        match s {
            "hydrostatic" => Ok(BoundaryStress::Hydrostatic(HydrostaticPressure {
                water_level: value,
                ..HydrostaticPressure::default()
            })),
            "applied_stress" => Ok(BoundaryStress::Applied(AppliedStress::constant(value))),
            _ => Err(RheologyError::unknown_variant(
                "boundary kind",
                s,
                Self::valid_types(),
            )),
        }
    }

    pub fn valid_types() -> &'static [&'static str] {
        &["hydrostatic", "applied_stress"]
    }

    pub fn name(&self) -> &'static str {
        match self {
            BoundaryStress::Hydrostatic(_) => "hydrostatic",
            BoundaryStress::Applied(_) => "applied_stress",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            BoundaryStress::Hydrostatic(bc) => bc.validate(),
            BoundaryStress::Applied(bc) => bc.validate(),
        }
    }

    /// Scalar stress at a boundary point (Pa)
    pub fn magnitude(&self, point: &EvaluationPoint) -> f64 {
        match self {
            BoundaryStress::Hydrostatic(bc) => bc.pressure(point.elevation()),
            BoundaryStress::Applied(bc) => bc.value(point.time),
        }
    }

    pub fn traction(&self, point: &EvaluationPoint, normal: &Vector3<f64>) -> Vector3<f64> {
        normal * self.magnitude(point)
    }

    /// Update a controllable value; only the applied stress "value" is controllable
    pub fn set_control(&mut self, name: &str, value: f64) -> Result<()> {
        let kind = self.name();
        match (self, name) {
            (BoundaryStress::Applied(bc), "value") => bc.set_value(value),
            (BoundaryStress::Hydrostatic(_), "water_density" | "gravity" | "water_level") => {
                Err(RheologyError::NotControllable {
                    law: kind,
                    name: name.to_string(),
                })
            }
            _ => Err(RheologyError::UnknownParameter {
                law: kind,
                name: name.to_string(),
            }),
        }
    }
}
