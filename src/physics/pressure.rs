use nalgebra::Point3;
use rayon::prelude::*;

/// Hydrostatic water column
///
/// Pressure below the free surface `water_level`:
///
/// ```text
/// p(z) = ρ_w g (z_w - z)   for z < z_w
///      = 0                 otherwise
/// ```
///
/// The cutoff at the water level is sharp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterColumn {
    /// Water density ρ_w (kg/m³), seawater: 1028
    pub density: f64,
    /// Gravitational acceleration g (m/s²)
    pub gravity: f64,
    /// Free-surface elevation z_w (m)
    pub water_level: f64,
}

impl WaterColumn {
    pub const SEAWATER_DENSITY: f64 = 1028.0;
    pub const GRAVITY: f64 = 9.81;

    pub fn new(density: f64, gravity: f64, water_level: f64) -> Self {
        Self {
            density,
            gravity,
            water_level,
        }
    }

    /// Depth below the free surface, zero above it (m)
    #[inline]
    pub fn depth(&self, z: f64) -> f64 {
        if z < self.water_level {
            self.water_level - z
        } else {
            0.0
        }
    }

    /// Pressure at elevation `z` (Pa)
    #[inline]
    pub fn pressure(&self, z: f64) -> f64 {
        self.density * self.gravity * self.depth(z)
    }

    /// Pressure at many points, elevation taken from the vertical coordinate
    pub fn pressure_field(&self, points: &[Point3<f64>]) -> Vec<f64> {
        points.par_iter().map(|p| self.pressure(p.z)).collect()
    }
}

impl Default for WaterColumn {
    fn default() -> Self {
        Self::new(Self::SEAWATER_DENSITY, Self::GRAVITY, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ten_metres_of_seawater() {
        let column = WaterColumn::default();
        assert_relative_eq!(column.pressure(-10.0), 100_846.8, max_relative = 1e-12);
    }

    #[test]
    fn test_zero_at_and_above_surface() {
        let column = WaterColumn::new(1000.0, 9.81, 5.0);
        assert_eq!(column.pressure(5.0), 0.0);
        assert_eq!(column.pressure(50.0), 0.0);
        assert!(column.pressure(5.0 - 1e-9) > 0.0);
        assert!(column.pressure(5.0 - 1e-9) < 1e-3);
    }

    #[test]
    fn test_pressure_field() {
        let column = WaterColumn::default();
        let points = vec![
            Point3::new(0.0, 0.0, -1.0),
            Point3::new(10.0, 0.0, 2.0),
            Point3::new(0.0, 3.0, -100.0),
        ];
        let field = column.pressure_field(&points);
        assert_eq!(field.len(), 3);
        assert_eq!(field[1], 0.0);
        assert_relative_eq!(field[2], 100.0 * field[0], max_relative = 1e-12);
    }
}
