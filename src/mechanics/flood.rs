//! Spatiotemporal forcing for transient subglacial floods
//!
//! A flood is a Gaussian pulse in time that travels down-glacier at constant
//! speed from a start position. A point at distance `Δx = x - x₀` downstream
//! sees the peak `Δt = Δx / c` later than the source:
//!
//! ```text
//! pulse(x, t) = exp(-(t - Δt - t_peak)² / (2 σ_t²))     for x > x₀
//!             = 0                                        otherwise
//! ```
//!
//! The pulse is dimensionless; the sediment law scales it by an amplitude in
//! the units of whatever it perturbs (slipperiness or viscosity).

use crate::error::{Result, RheologyError};
use crate::point::{Axis, EvaluationPoint};

/// Travelling flood pulse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloodEvent {
    /// Position x₀ where the flood enters the bed (m)
    pub start_position: f64,
    /// Peak perturbation, in units of the perturbed quantity
    pub amplitude: f64,
    /// Time of the peak at x₀ (s)
    pub peak_time: f64,
    /// Temporal spread σ_t (s)
    pub spread_time: f64,
    /// Propagation speed c (m s⁻¹)
    pub speed: f64,
    /// Propagation axis
    pub axis: Axis,
}

impl FloodEvent {
    pub const DEFAULT_START_POSITION: f64 = 10_000.0;
    pub const DEFAULT_AMPLITUDE: f64 = 1e-10;
    /// One day
    pub const DEFAULT_PEAK_TIME: f64 = 86_400.0;
    /// Three hours
    pub const DEFAULT_SPREAD_TIME: f64 = 10_800.0;
    pub const DEFAULT_SPEED: f64 = 0.83;

    pub fn validate(&self) -> Result<()> {
        if !(self.speed > 0.0) {
            return Err(RheologyError::invalid(
                "flood_speed",
                format!("must be positive, got {}", self.speed),
            ));
        }
        if !(self.spread_time > 0.0) {
            return Err(RheologyError::invalid(
                "flood_spread_time",
                format!("must be positive, got {}", self.spread_time),
            ));
        }
        if !self.amplitude.is_finite() {
            return Err(RheologyError::invalid("flood_amplitude", "must be finite"));
        }
        Ok(())
    }

    /// Distance downstream of the flood start; non-positive upstream
    #[inline]
    pub fn distance(&self, point: &EvaluationPoint) -> f64 {
        point.coordinate(self.axis) - self.start_position
    }

    /// Delay between the peak at x₀ and the peak at `point` (s)
    #[inline]
    pub fn arrival_delay(&self, point: &EvaluationPoint) -> f64 {
        self.distance(point) / self.speed
    }

    /// Whether the flood reaches `point` at all
    #[inline]
    pub fn reaches(&self, point: &EvaluationPoint) -> bool {
        self.distance(point) > 0.0
    }

    /// Dimensionless pulse shape in [0, 1]
    pub fn pulse(&self, point: &EvaluationPoint) -> f64 {
        if !self.reaches(point) {
            return 0.0;
        }
        let local_time = point.time - self.arrival_delay(point);
        let lag = local_time - self.peak_time;
        (-(lag * lag) / (2.0 * self.spread_time * self.spread_time)).exp()
    }

    /// Amplitude-scaled perturbation
    pub fn perturbation(&self, point: &EvaluationPoint) -> f64 {
        self.amplitude * self.pulse(point)
    }
}

impl Default for FloodEvent {
    fn default() -> Self {
        Self {
            start_position: Self::DEFAULT_START_POSITION,
            amplitude: Self::DEFAULT_AMPLITUDE,
            peak_time: Self::DEFAULT_PEAK_TIME,
            spread_time: Self::DEFAULT_SPREAD_TIME,
            speed: Self::DEFAULT_SPEED,
            axis: Axis::X,
        }
    }
}

/// Baseline viscosity interpolated linearly along a channel
///
/// `back` at coordinate 0, `front` at coordinate `length`; held constant
/// outside that span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRamp {
    /// Viscosity at the upstream end (Pa·s)
    pub back: f64,
    /// Viscosity at the downstream end (Pa·s)
    pub front: f64,
    /// Channel length (m)
    pub length: f64,
    pub axis: Axis,
}

impl LinearRamp {
    pub const DEFAULT_BACK: f64 = 1e11;
    pub const DEFAULT_FRONT: f64 = 1e9;
    pub const DEFAULT_LENGTH: f64 = 25_000.0;

    pub fn validate(&self) -> Result<()> {
        if !(self.length > 0.0) {
            return Err(RheologyError::invalid(
                "ramp_length",
                format!("must be positive, got {}", self.length),
            ));
        }
        if self.back < 0.0 || self.front < 0.0 {
            return Err(RheologyError::invalid(
                "ramp_viscosity",
                format!("back ({}) and front ({}) must be non-negative", self.back, self.front),
            ));
        }
        Ok(())
    }

    pub fn value(&self, point: &EvaluationPoint) -> f64 {
        let s = (point.coordinate(self.axis) / self.length).clamp(0.0, 1.0);
        self.back + (self.front - self.back) * s
    }
}

impl Default for LinearRamp {
    fn default() -> Self {
        Self {
            back: Self::DEFAULT_BACK,
            front: Self::DEFAULT_FRONT,
            length: Self::DEFAULT_LENGTH,
            axis: Axis::X,
        }
    }
}

/// Cross-channel weighting of a perturbation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LateralProfile {
    /// Whole width
    Uniform,
    /// Sharp band `|y - center| ≤ half_width`
    Band { center: f64, half_width: f64 },
    /// Gaussian falloff with standard deviation `width`
    Gaussian { center: f64, width: f64 },
}

impl LateralProfile {
    pub fn validate(&self) -> Result<()> {
        match *self {
            LateralProfile::Uniform => Ok(()),
            LateralProfile::Band { half_width, .. } if half_width < 0.0 => Err(
                RheologyError::invalid("band_half_width", "must be non-negative"),
            ),
            LateralProfile::Gaussian { width, .. } if !(width > 0.0) => Err(
                RheologyError::invalid("gaussian_width", "must be positive"),
            ),
            _ => Ok(()),
        }
    }

    /// Weight in [0, 1] at lateral coordinate `y`
    pub fn weight(&self, y: f64) -> f64 {
        match *self {
            LateralProfile::Uniform => 1.0,
            LateralProfile::Band { center, half_width } => {
                if (y - center).abs() <= half_width {
                    1.0
                } else {
                    0.0
                }
            }
            LateralProfile::Gaussian { center, width } => {
                let d = y - center;
                (-(d * d) / (2.0 * width * width)).exp()
            }
        }
    }
}

impl Default for LateralProfile {
    fn default() -> Self {
        LateralProfile::Uniform
    }
}
