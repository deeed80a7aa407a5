//! Strain-rate kinematics from velocity gradients
//!
//! Turns a sampled velocity gradient into the symmetric strain-rate tensor
//! and its second invariant, the scalar every viscosity law is driven by.

use nalgebra::{Matrix3, SMatrix, Vector3};

use crate::error::{Result, RheologyError};
use crate::point::{Axis, Dimension};

/// Velocity gradient at an evaluation point
///
/// Row `i` holds the gradient of velocity component `i`:
/// ```text
///     [u_x  u_y  u_z]
///     [v_x  v_y  v_z]
///     [w_x  w_y  w_z]
/// ```
/// Components the problem dimension does not resolve are stored as zero rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityGradient {
    dimension: Dimension,
    rows: [Vector3<f64>; 3],
}

impl VelocityGradient {
    /// Build from per-component gradients
    ///
    /// `grad_v` is required in 2D and 3D, `grad_w` in 3D. Gradients supplied
    /// for components beyond the dimension are ignored.
    ///
    /// # Errors
    /// `MissingComponent` if a component required by `dimension` is absent.
    pub fn new(
        dimension: Dimension,
        grad_u: Vector3<f64>,
        grad_v: Option<Vector3<f64>>,
        grad_w: Option<Vector3<f64>>,
    ) -> Result<Self> {
        let dim = dimension.as_usize();

        let grad_v = match (dimension.has_axis(Axis::Y), grad_v) {
            (true, Some(g)) => g,
            (true, None) => {
                return Err(RheologyError::MissingComponent {
                    component: "velocity_y",
                    dimension: dim,
                })
            }
            (false, _) => Vector3::zeros(),
        };

        let grad_w = match (dimension.has_axis(Axis::Z), grad_w) {
            (true, Some(g)) => g,
            (true, None) => {
                return Err(RheologyError::MissingComponent {
                    component: "velocity_z",
                    dimension: dim,
                })
            }
            (false, _) => Vector3::zeros(),
        };

        Ok(Self {
            dimension,
            rows: [grad_u, grad_v, grad_w],
        })
    }

    /// Build from a full 3×3 gradient matrix (rows = ∇u, ∇v, ∇w)
    ///
    /// Rows beyond the problem dimension are zeroed.
    pub fn from_matrix(dimension: Dimension, grad: &Matrix3<f64>) -> Self {
        let mut rows = [Vector3::zeros(); 3];
        for axis in Axis::ALL {
            if dimension.has_axis(axis) {
                let i = axis.index();
                rows[i] = grad.row(i).transpose();
            }
        }
        Self { dimension, rows }
    }

    /// Zero gradient (rigid motion)
    pub fn zeros(dimension: Dimension) -> Self {
        Self {
            dimension,
            rows: [Vector3::zeros(); 3],
        }
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// ∂v_i/∂x_j
    #[inline]
    pub fn component(&self, i: usize, j: usize) -> f64 {
        self.rows[i][j]
    }

    pub fn to_matrix(&self) -> Matrix3<f64> {
        Matrix3::from_rows(&[
            self.rows[0].transpose(),
            self.rows[1].transpose(),
            self.rows[2].transpose(),
        ])
    }

    /// Symmetric part of the gradient
    pub fn strain_rate(&self) -> StrainRate {
        StrainRate::from_gradient(self)
    }
}

/// Symmetric strain-rate tensor ε̇ = ½(∇v + ∇vᵀ)
///
/// Only the six independent components are stored, so `xy` is by
/// construction the value used wherever `yx` is needed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StrainRate {
    pub xx: f64,
    pub yy: f64,
    pub zz: f64,
    pub xy: f64,
    pub xz: f64,
    pub yz: f64,
}

impl StrainRate {
    pub fn from_gradient(grad: &VelocityGradient) -> Self {
        let g = |i: usize, j: usize| grad.component(i, j);

        Self {
            xx: g(0, 0),
            yy: g(1, 1),
            zz: g(2, 2),
            xy: 0.5 * (g(0, 1) + g(1, 0)),
            xz: 0.5 * (g(0, 2) + g(2, 0)),
            yz: 0.5 * (g(1, 2) + g(2, 1)),
        }
    }

    /// Second invariant
    ///
    /// ```text
    /// II_ε = ½ (ε_xx² + ε_yy² + ε_zz² + 2(ε_xy² + ε_xz² + ε_yz²))
    /// ```
    ///
    /// Units are s⁻²; `sqrt(II_ε)` is the effective strain rate.
    pub fn second_invariant(&self) -> f64 {
        0.5 * (self.xx * self.xx
            + self.yy * self.yy
            + self.zz * self.zz
            + 2.0 * (self.xy * self.xy + self.xz * self.xz + self.yz * self.yz))
    }

    /// Effective strain rate √II_ε (s⁻¹)
    pub fn effective(&self) -> f64 {
        self.second_invariant().sqrt()
    }

    /// Volumetric rate tr(ε̇); zero for incompressible flow
    pub fn trace(&self) -> f64 {
        self.xx + self.yy + self.zz
    }

    /// Component (i, j); symmetric in its indices, `None` past index 2
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

    /// Voigt vector [ε_xx, ε_yy, ε_zz, γ_xy, γ_yz, γ_zx] with engineering shear γ = 2ε
    pub fn to_voigt(&self) -> SMatrix<f64, 6, 1> {
        SMatrix::<f64, 6, 1>::from_column_slice(&[
            self.xx,
            self.yy,
            self.zz,
            2.0 * self.xy,
            2.0 * self.yz,
            2.0 * self.xz,
        ])
    }
}

/// Floor the strain-rate invariant before it enters a negative or fractional power
///
/// Returns `max(ii_eps, ii_eps_min)`. Below the floor every law sees the
/// floor value exactly, so viscosity at rest is finite and well defined.
pub fn regularize_invariant(ii_eps: f64, ii_eps_min: f64) -> f64 {
    if ii_eps < ii_eps_min || ii_eps.is_nan() {
        log::debug!(
            "strain-rate invariant {:.3e} floored at {:.3e}",
            ii_eps,
            ii_eps_min
        );
        ii_eps_min
    } else {
        ii_eps
    }
}
