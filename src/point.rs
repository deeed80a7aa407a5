//! Evaluation points, spatial dimensionality and axes

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RheologyError};

/// Spatial position and time at which an evaluator is queried
///
/// Owned by the caller and only ever borrowed by evaluators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationPoint {
    /// Position (m)
    pub position: Point3<f64>,
    /// Simulation time (s)
    pub time: f64,
}

impl EvaluationPoint {
    pub fn new(x: f64, y: f64, z: f64, time: f64) -> Self {
        Self {
            position: Point3::new(x, y, z),
            time,
        }
    }

    /// Point at t = 0
    pub fn at(position: Point3<f64>) -> Self {
        Self { position, time: 0.0 }
    }

    /// Coordinate along an axis
    #[inline]
    pub fn coordinate(&self, axis: Axis) -> f64 {
        self.position[axis.index()]
    }

    /// Elevation (z coordinate)
    #[inline]
    pub fn elevation(&self) -> f64 {
        self.position.z
    }
}

/// Number of spatial dimensions of the host problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum Dimension {
    One,
    Two,
    Three,
}

impl Dimension {
    pub fn from_usize(dim: usize) -> Result<Self> {
        match dim {
            1 => Ok(Dimension::One),
            2 => Ok(Dimension::Two),
            3 => Ok(Dimension::Three),
            other => Err(RheologyError::InvalidDimension(other)),
        }
    }

    pub fn as_usize(self) -> usize {
        match self {
            Dimension::One => 1,
            Dimension::Two => 2,
            Dimension::Three => 3,
        }
    }

    /// Whether the problem resolves velocity along `axis`
    #[inline]
    pub fn has_axis(self, axis: Axis) -> bool {
        axis.index() < self.as_usize()
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Dimension::Three
    }
}

impl TryFrom<usize> for Dimension {
    type Error = RheologyError;

    fn try_from(dim: usize) -> Result<Self> {
        Dimension::from_usize(dim)
    }
}

impl From<Dimension> for usize {
    fn from(dim: Dimension) -> usize {
        dim.as_usize()
    }
}

/// Cartesian axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl Default for Axis {
    fn default() -> Self {
        Axis::X
    }
}

/// Stable identifier of an evaluation point across time steps
///
/// The host decides what it encodes (element and quadrature index, cell id, ...);
/// it only has to stay the same for the same physical point between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(pub u64);

impl PointId {
    /// Identifier for quadrature point `qp` of element `elem`
    pub fn quadrature(elem: u32, qp: u32) -> Self {
        PointId(((elem as u64) << 32) | qp as u64)
    }
}
