//! Unit conversion utilities for glacier rheology
//!
//! Evaluators work in SI only. Configuration files may instead be written in
//! the legacy glaciological system (MPa, years); those values are converted
//! once, when evaluators are built, through the functions below.

use serde::{Deserialize, Serialize};


// ============================================================================
// Time Conversions
// ============================================================================

/// Seconds per year (365 days)
///
/// Glaciological fluidities are tabulated with this year; the SI default
/// fluidity 2.378234398782344e-24 Pa⁻³ s⁻¹ equals 75 MPa⁻³ a⁻¹ with it.
pub const SECONDS_PER_YEAR: f64 = 365.0 * 24.0 * 3600.0;

/// Seconds per day
pub const SECONDS_PER_DAY: f64 = 24.0 * 3600.0;

/// Seconds per hour
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Convert years to seconds
///
/// # Examples
/// ```
/// use glacial_rheology::utils::units::years_to_seconds;
/// let dt_sec = years_to_seconds(1.0); // 3.1536e7 s
/// ```
#[inline]
pub fn years_to_seconds(years: f64) -> f64 {
    years * SECONDS_PER_YEAR
}

/// Convert seconds to years
#[inline]
pub fn seconds_to_years(seconds: f64) -> f64 {
    seconds / SECONDS_PER_YEAR
}

/// Convert days to seconds
#[inline]
pub fn days_to_seconds(days: f64) -> f64 {
    days * SECONDS_PER_DAY
}

/// Convert hours to seconds
#[inline]
pub fn hours_to_seconds(hours: f64) -> f64 {
    hours * SECONDS_PER_HOUR
}

// ============================================================================
// Pressure Conversions
// ============================================================================

/// Megapascals to pascals conversion factor
pub const MPA_TO_PA: f64 = 1e6;

/// Pascals to megapascals conversion factor
pub const PA_TO_MPA: f64 = 1e-6;

/// Convert megapascals to pascals
#[inline]
pub fn mpa_to_pa(mpa: f64) -> f64 {
    mpa * MPA_TO_PA
}

/// Convert pascals to megapascals
#[inline]
pub fn pa_to_mpa(pa: f64) -> f64 {
    pa * PA_TO_MPA
}

// ============================================================================
// Rheological Conversions
// ============================================================================

/// Convert a viscosity from MPa·a to Pa·s
///
/// # Examples
/// ```
/// use glacial_rheology::utils::units::mpa_year_to_pa_s;
/// let floor = mpa_year_to_pa_s(1e-4); // 3.1536e9 Pa·s
/// ```
#[inline]
pub fn mpa_year_to_pa_s(viscosity: f64) -> f64 {
    viscosity * MPA_TO_PA * SECONDS_PER_YEAR
}

/// Convert a viscosity from Pa·s to MPa·a
#[inline]
pub fn pa_s_to_mpa_year(viscosity: f64) -> f64 {
    viscosity / (MPA_TO_PA * SECONDS_PER_YEAR)
}

/// Convert Glen's fluidity from MPa⁻ⁿ a⁻¹ to Pa⁻ⁿ s⁻¹
#[inline]
pub fn glen_fluidity_to_si(fluidity: f64, exponent: f64) -> f64 {
    fluidity * PA_TO_MPA.powf(exponent) / SECONDS_PER_YEAR
}

/// Convert a squared strain-rate invariant from a⁻² to s⁻²
#[inline]
pub fn invariant_to_si(ii_eps: f64) -> f64 {
    ii_eps / (SECONDS_PER_YEAR * SECONDS_PER_YEAR)
}

/// Convert a velocity from m a⁻¹ to m s⁻¹
#[inline]
pub fn m_per_year_to_m_per_s(speed: f64) -> f64 {
    speed / SECONDS_PER_YEAR
}

/// Convert a slipperiness coefficient from m MPa⁻¹ a⁻¹ to m Pa⁻¹ s⁻¹
#[inline]
pub fn slipperiness_to_si(slipperiness: f64) -> f64 {
    slipperiness / (MPA_TO_PA * SECONDS_PER_YEAR)
}

// ============================================================================
// Unit Systems
// ============================================================================

/// Unit system a configuration file is written in
///
/// A file declares exactly one; values are never mixed across systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    /// Pa, s, m, kg m⁻³
    #[default]
    Si,
    /// MPa, years, m, kg m⁻³
    MpaYear,
}

impl UnitSystem {
    pub fn viscosity(self, value: f64) -> f64 {
        match self {
            UnitSystem::Si => value,
            UnitSystem::MpaYear => mpa_year_to_pa_s(value),
        }
    }

    pub fn stress(self, value: f64) -> f64 {
        match self {
            UnitSystem::Si => value,
            UnitSystem::MpaYear => mpa_to_pa(value),
        }
    }

    pub fn time(self, value: f64) -> f64 {
        match self {
            UnitSystem::Si => value,
            UnitSystem::MpaYear => years_to_seconds(value),
        }
    }

    pub fn speed(self, value: f64) -> f64 {
        match self {
            UnitSystem::Si => value,
            UnitSystem::MpaYear => m_per_year_to_m_per_s(value),
        }
    }

    pub fn fluidity(self, value: f64, exponent: f64) -> f64 {
        match self {
            UnitSystem::Si => value,
            UnitSystem::MpaYear => glen_fluidity_to_si(value, exponent),
        }
    }

    pub fn invariant(self, value: f64) -> f64 {
        match self {
            UnitSystem::Si => value,
            UnitSystem::MpaYear => invariant_to_si(value),
        }
    }

    pub fn slipperiness(self, value: f64) -> f64 {
        match self {
            UnitSystem::Si => value,
            UnitSystem::MpaYear => slipperiness_to_si(value),
        }
    }

    /// Damage rate coefficients are per unit time
    pub fn rate(self, value: f64) -> f64 {
        match self {
            UnitSystem::Si => value,
            UnitSystem::MpaYear => value / SECONDS_PER_YEAR,
        }
    }

    /// Rate of change per unit time, e.g. frequencies in Hz vs a⁻¹
    pub fn frequency(self, value: f64) -> f64 {
        self.rate(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_time_conversions() {
        let years = 1000.0;
        let seconds = years_to_seconds(years);
        assert!((seconds_to_years(seconds) - years).abs() < 1e-10);

        assert_eq!(SECONDS_PER_YEAR, 31_536_000.0);
        assert_eq!(days_to_seconds(1.0), 86_400.0);
        assert_eq!(hours_to_seconds(3.0), 10_800.0);
    }

    #[test]
    fn test_legacy_glen_fluidity() {
        // 75 MPa⁻³ a⁻¹ is the SI default fluidity
        let a_si = glen_fluidity_to_si(75.0, 3.0);
        assert_relative_eq!(a_si, 2.378234398782344e-24, max_relative = 1e-12);
    }

    #[test]
    fn test_legacy_viscosity_floor() {
        // 1e-4 MPa·a is the SI ice viscosity floor
        assert_relative_eq!(mpa_year_to_pa_s(1e-4), 3.1536e9, max_relative = 1e-12);
        assert_relative_eq!(pa_s_to_mpa_year(3.1536e9), 1e-4, max_relative = 1e-12);
    }

    #[test]
    fn test_invariant_is_rate_squared() {
        let ii = invariant_to_si(1.0);
        assert_relative_eq!(ii * SECONDS_PER_YEAR * SECONDS_PER_YEAR, 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_si_is_identity() {
        let si = UnitSystem::Si;
        assert_eq!(si.viscosity(5.0), 5.0);
        assert_eq!(si.stress(5.0), 5.0);
        assert_eq!(si.fluidity(5.0, 3.0), 5.0);
        assert_eq!(si.slipperiness(5.0), 5.0);
    }
}
