//! Viscous stress assembly
//!
//! ```text
//! σ_ii = 2μ ε̇_ii + p     (axis i present in the problem, else 0)
//! σ_ij = 2μ ε̇_ij
//! ```
//!
//! Each shear component is stored once, so the tensor is symmetric by
//! construction.

use nalgebra::{Matrix3, SMatrix};

use super::strain::StrainRate;
use crate::point::{Axis, Dimension};

/// Symmetric Cauchy stress (Pa)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StressTensor {
    pub xx: f64,
    pub yy: f64,
    pub zz: f64,
    pub xy: f64,
    pub xz: f64,
    pub yz: f64,
}

impl StressTensor {
    /// Full stress from viscosity, strain rate and pressure
    pub fn assemble(
        viscosity: f64,
        strain_rate: &StrainRate,
        pressure: f64,
        dimension: Dimension,
    ) -> Self {
        let mut stress = Self::assemble_deviatoric(viscosity, strain_rate, dimension);
        for axis in Axis::ALL {
            if dimension.has_axis(axis) {
                *stress.normal_mut(axis) += pressure;
            }
        }
        stress
    }

    /// Viscous part only, without the pressure term
    pub fn assemble_deviatoric(
        viscosity: f64,
        strain_rate: &StrainRate,
        dimension: Dimension,
    ) -> Self {
        let two_mu = 2.0 * viscosity;
        let normal = |axis: Axis, eps: f64| {
            if dimension.has_axis(axis) {
                two_mu * eps
            } else {
                0.0
            }
        };

        Self {
            xx: normal(Axis::X, strain_rate.xx),
            yy: normal(Axis::Y, strain_rate.yy),
            zz: normal(Axis::Z, strain_rate.zz),
            xy: two_mu * strain_rate.xy,
            xz: two_mu * strain_rate.xz,
            yz: two_mu * strain_rate.yz,
        }
    }

    fn normal_mut(&mut self, axis: Axis) -> &mut f64 {
        match axis {
            Axis::X => &mut self.xx,
            Axis::Y => &mut self.yy,
            Axis::Z => &mut self.zz,
        }
    }

    /// Normal component followed by the two shears acting on the `axis` face
    ///
    /// x: (xx, xy, xz), y: (yy, yx, yz), z: (zz, zx, zy)
    pub fn row(&self, axis: Axis) -> [f64; 3] {
        match axis {
            Axis::X => [self.xx, self.xy, self.xz],
            Axis::Y => [self.yy, self.xy, self.yz],
            Axis::Z => [self.zz, self.xz, self.yz],
        }
    }

    /// Symmetric component accessor, `None` past index 2
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        match (i.min(j), i.max(j)) {
            (0, 0) => Some(self.xx),
            (1, 1) => Some(self.yy),
            (2, 2) => Some(self.zz),
            (0, 1) => Some(self.xy),
            (0, 2) => Some(self.xz),
            (1, 2) => Some(self.yz),
            _ => None,
        }
    }

    pub fn to_matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.xx, self.xy, self.xz,
            self.xy, self.yy, self.yz,
            self.xz, self.yz, self.zz,
        )
    }

    /// Voigt vector [σ_xx, σ_yy, σ_zz, σ_xy, σ_yz, σ_xz]
    pub fn to_voigt(&self) -> SMatrix<f64, 6, 1> {
        SMatrix::<f64, 6, 1>::from_column_slice(&[
            self.xx, self.yy, self.zz, self.xy, self.yz, self.xz,
        ])
    }

    /// Mean normal stress tr(σ)/3
    pub fn mean_stress(&self) -> f64 {
        (self.xx + self.yy + self.zz) / 3.0
    }

    /// Trace-free part s = σ - tr(σ)/3 I
    pub fn deviator(&self) -> Self {
        let mean = self.mean_stress();
        Self {
            xx: self.xx - mean,
            yy: self.yy - mean,
            zz: self.zz - mean,
            ..*self
        }
    }

    /// Von Mises equivalent stress √(3/2 s:s)
    ///
    /// Pressure only drops out in 3D. Below that the absent axes carry no
    /// pressure, so take this on [`StressTensor::assemble_deviatoric`].
    pub fn von_mises(&self) -> f64 {
        let s = self.deviator();
        let s_dot_s = s.xx * s.xx
            + s.yy * s.yy
            + s.zz * s.zz
            + 2.0 * (s.xy * s.xy + s.xz * s.xz + s.yz * s.yz);
        (1.5 * s_dot_s).sqrt()
    }

    /// Components entering the momentum equation for `axis`
    ///
    /// Upper-triangular split: x takes (xx, xy, xz), y takes (yy, yz), z takes (zz).
    pub fn momentum_flux(&self, axis: Axis) -> Vec<f64> {
        match axis {
            Axis::X => vec![self.xx, self.xy, self.xz],
            Axis::Y => vec![self.yy, self.yz],
            Axis::Z => vec![self.zz],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_strain_rate() -> StrainRate {
        StrainRate {
            xx: 1e-9,
            yy: -4e-10,
            zz: -6e-10,
            xy: 2e-10,
            xz: -3e-10,
            yz: 5e-11,
        }
    }

    #[test]
    fn test_assemble_3d() {
        let eps = sample_strain_rate();
        let stress = StressTensor::assemble(1e13, &eps, -1e6, Dimension::Three);

        assert_relative_eq!(stress.xx, 2e4 - 1e6, max_relative = 1e-12);
        assert_relative_eq!(stress.yy, -8e3 - 1e6, max_relative = 1e-12);
        assert_relative_eq!(stress.zz, -1.2e4 - 1e6, max_relative = 1e-12);
        assert_relative_eq!(stress.xy, 4e3, max_relative = 1e-12);
        assert_eq!(stress.get(1, 0), stress.get(0, 1));
        assert_relative_eq!(stress.get(2, 1).unwrap(), 1e3, max_relative = 1e-12);
        assert_eq!(stress.get(3, 0), None);
        assert_relative_eq!(stress.mean_stress(), -1e6, max_relative = 1e-12);
    }

    #[test]
    fn test_absent_axes_are_zero() {
        let eps = sample_strain_rate();
        let stress = StressTensor::assemble(1e13, &eps, -1e6, Dimension::Two);
        assert_eq!(stress.zz, 0.0);
        assert_relative_eq!(stress.yy, -8e3 - 1e6, max_relative = 1e-12);

        let stress = StressTensor::assemble(1e13, &eps, -1e6, Dimension::One);
        assert_eq!(stress.yy, 0.0);
        assert_eq!(stress.zz, 0.0);
    }

    #[test]
    fn test_matrix_symmetric() {
        let stress = StressTensor::assemble(3e12, &sample_strain_rate(), 5e5, Dimension::Three);
        let m = stress.to_matrix();
        assert_eq!(m, m.transpose());
        assert_eq!(m[(2, 0)], stress.xz);
        assert_eq!(stress.to_voigt()[4], stress.yz);
    }

    #[test]
    fn test_rows_and_momentum_flux() {
        let stress = StressTensor::assemble(1e12, &sample_strain_rate(), 0.0, Dimension::Three);
        assert_eq!(stress.row(Axis::Y), [stress.yy, stress.xy, stress.yz]);
        assert_eq!(stress.row(Axis::Z), [stress.zz, stress.xz, stress.yz]);
        assert_eq!(stress.momentum_flux(Axis::X).len(), 3);
        assert_eq!(stress.momentum_flux(Axis::Y), vec![stress.yy, stress.yz]);
        assert_eq!(stress.momentum_flux(Axis::Z), vec![stress.zz]);
    }

    #[test]
    fn test_von_mises_uniaxial() {
        let stress = StressTensor {
            xx: 3e5,
            ..Default::default()
        };
        assert_relative_eq!(stress.von_mises(), 3e5, max_relative = 1e-12);
    }

    #[test]
    fn test_von_mises_pure_shear() {
        let stress = StressTensor {
            xy: 1e5,
            ..Default::default()
        };
        assert_relative_eq!(stress.von_mises(), 3f64.sqrt() * 1e5, max_relative = 1e-12);
    }

    #[test]
    fn test_von_mises_ignores_pressure() {
        let eps = sample_strain_rate();
        let dev = StressTensor::assemble_deviatoric(1e13, &eps, Dimension::Three);
        let full = StressTensor::assemble(1e13, &eps, -5e6, Dimension::Three);
        assert_relative_eq!(dev.von_mises(), full.von_mises(), max_relative = 1e-6);
    }
}
