//! Utility modules for glacier rheology
//!
//! Helper functions shared by the evaluators and the configuration layer.

pub mod units;

// Re-export commonly used items
pub use units::{
    years_to_seconds, seconds_to_years,
    days_to_seconds, hours_to_seconds,
    mpa_to_pa, pa_to_mpa,
    mpa_year_to_pa_s, pa_s_to_mpa_year,
    glen_fluidity_to_si, UnitSystem,
};
