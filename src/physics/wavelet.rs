//! Recurrent Ormsby wavelet for time-varying applied stresses
//!
//! The Ormsby wavelet is the band-pass filter with trapezoidal spectrum
//! defined by corner frequencies f1 < f2 ≤ f3 < f4:
//!
//! ```text
//! w(t) = [ πf4²/(f3-f4) sinc²(πf4 τ) - πf3²/(f3-f4) sinc²(πf3 τ) ]
//!      - [ πf2²/(f2-f1) sinc²(πf2 τ) - πf1²/(f2-f1) sinc²(πf1 τ) ],   τ = t - t_peak
//! ```
//!
//! normalized by its value at τ = 0 so that the peak equals `scale_factor`.
//! The wavelet is repeated `repetitions` times with peaks at
//! `peak_time · (k + 1)`, k = 0..repetitions.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RheologyError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiOrmsbyWavelet {
    pub f1: f64,
    pub f2: f64,
    pub f3: f64,
    pub f4: f64,
    /// Peak time of the first wavelet and recurrence interval (s)
    pub peak_time: f64,
    pub repetitions: u32,
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
}

fn default_scale_factor() -> f64 {
    1.0
}

#[inline]
fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        x.sin() / x
    }
}

impl MultiOrmsbyWavelet {
    pub fn validate(&self) -> Result<()> {
        if !(self.f1 >= 0.0) {
            return Err(RheologyError::invalid(
                "f1",
                format!("must be non-negative, got {}", self.f1),
            ));
        }
        if !(self.f1 < self.f2) {
            return Err(RheologyError::invalid(
                "f2",
                format!("f1 ({}) must be below f2 ({})", self.f1, self.f2),
            ));
        }
        if !(self.f2 <= self.f3) {
            return Err(RheologyError::invalid(
                "f3",
                format!("f2 ({}) must not exceed f3 ({})", self.f2, self.f3),
            ));
        }
        if !(self.f3 < self.f4) {
            return Err(RheologyError::invalid(
                "f4",
                format!("f3 ({}) must be below f4 ({})", self.f3, self.f4),
            ));
        }
        if !self.peak_time.is_finite() || !self.scale_factor.is_finite() {
            return Err(RheologyError::invalid(
                "peak_time",
                "peak time and scale factor must be finite",
            ));
        }
        Ok(())
    }

    /// Unnormalized band-pass response at lag `tau`
    fn response(&self, tau: f64) -> f64 {
        let (f1, f2, f3, f4) = (self.f1, self.f2, self.f3, self.f4);
        let term = |f: f64, denom: f64| {
            let s = sinc(PI * f * tau);
            PI * f * f / denom * s * s
        };
        (term(f4, f3 - f4) - term(f3, f3 - f4)) - (term(f2, f2 - f1) - term(f1, f2 - f1))
    }

    /// Peak time of the k-th repetition (s)
    pub fn peak(&self, k: u32) -> f64 {
        self.peak_time * (k as f64 + 1.0)
    }

    pub fn value(&self, t: f64) -> f64 {
        let norm = self.response(0.0);
        (0..self.repetitions)
            .map(|k| self.scale_factor / norm * self.response(t - self.peak(k)))
            .sum()
    }
}
