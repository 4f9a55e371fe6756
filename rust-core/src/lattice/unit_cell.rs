use nalgebra::{Cholesky, Matrix3};
use serde::{Deserialize, Serialize};

use crate::config::{ANGLE_TOLERANCE_DEGREES, MIN_RELATIVE_METRIC_DETERMINANT};
use crate::error::ReductionError;
use crate::lattice::change_of_basis::ChangeOfBasis;
use crate::Result;

/// A crystallographic unit cell.
///
/// Stored both as the six parameters `(a, b, c, α, β, γ)` (angles in degrees) and as the
/// six independent metrical matrix entries `(g11, g22, g33, g12, g13, g23)`. Both views
/// are validated on construction, so every `UnitCell` has a positive-definite metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitCell {
    parameters: [f64; 6],
    metrical_matrix: [f64; 6],
}

impl UnitCell {
    /// Construct from lengths and angles (degrees).
    pub fn from_parameters(parameters: [f64; 6]) -> Result<Self> {
        let corrupt = |reason: &str| ReductionError::CorruptUnitCell {
            parameters,
            reason: reason.to_string(),
        };

        if parameters.iter().any(|p| !p.is_finite()) {
            return Err(corrupt("parameters must be finite"));
        }
        if parameters[..3].iter().any(|&l| l <= 0.0) {
            return Err(corrupt("lengths must be positive"));
        }
        if parameters[3..]
            .iter()
            .any(|&angle| angle <= ANGLE_TOLERANCE_DEGREES || angle >= 180.0 - ANGLE_TOLERANCE_DEGREES)
        {
            return Err(corrupt("angles must lie strictly between 0 and 180 degrees"));
        }

        let [a, b, c, alpha, beta, gamma] = parameters;
        let metrical_matrix = [
            a * a,
            b * b,
            c * c,
            a * b * gamma.to_radians().cos(),
            a * c * beta.to_radians().cos(),
            b * c * alpha.to_radians().cos(),
        ];

        let g = metric_from_entries(&metrical_matrix);
        if !is_positive_definite(&g) {
            return Err(corrupt("implied metric tensor is not positive definite"));
        }
        if is_degenerate(&g) {
            return Err(corrupt("basis vectors are coplanar"));
        }

        Ok(UnitCell {
            parameters,
            metrical_matrix,
        })
    }

    /// Construct from `(g11, g22, g33, g12, g13, g23)`.
    pub fn from_metrical_matrix(entries: [f64; 6]) -> Result<Self> {
        let corrupt = |reason: &str| ReductionError::CorruptMetricalMatrix {
            entries,
            reason: reason.to_string(),
        };

        if entries.iter().any(|g| !g.is_finite()) {
            return Err(corrupt("entries must be finite"));
        }
        let g = metric_from_entries(&entries);
        if !is_positive_definite(&g) {
            return Err(corrupt("metrical matrix is not positive definite"));
        }
        if is_degenerate(&g) {
            return Err(corrupt("metrical matrix is singular"));
        }

        let (a, b, c) = (entries[0].sqrt(), entries[1].sqrt(), entries[2].sqrt());
        let angle = |g: f64, l1: f64, l2: f64| (g / (l1 * l2)).clamp(-1.0, 1.0).acos().to_degrees();
        let parameters = [
            a,
            b,
            c,
            angle(entries[5], b, c),
            angle(entries[4], a, c),
            angle(entries[3], a, b),
        ];

        Ok(UnitCell {
            parameters,
            metrical_matrix: entries,
        })
    }

    /// Construct from six values interpreted either as parameters or as metrical matrix entries.
    pub fn from_six(values: [f64; 6], is_metrical_matrix: bool) -> Result<Self> {
        if is_metrical_matrix {
            Self::from_metrical_matrix(values)
        } else {
            Self::from_parameters(values)
        }
    }

    /// `(a, b, c, α, β, γ)` with angles in degrees.
    pub fn parameters(&self) -> [f64; 6] {
        self.parameters
    }

    /// `(g11, g22, g33, g12, g13, g23)`.
    pub fn metrical_matrix(&self) -> [f64; 6] {
        self.metrical_matrix
    }

    /// Metric tensor G = A^T * A.
    pub fn metric_tensor(&self) -> Matrix3<f64> {
        metric_from_entries(&self.metrical_matrix)
    }

    /// Get lattice parameters: a, b, c (lengths)
    pub fn lengths(&self) -> (f64, f64, f64) {
        (self.parameters[0], self.parameters[1], self.parameters[2])
    }

    /// Get lattice angles: α, β, γ (in degrees)
    pub fn angles(&self) -> (f64, f64, f64) {
        (self.parameters[3], self.parameters[4], self.parameters[5])
    }

    pub fn volume(&self) -> f64 {
        self.metric_tensor().determinant().max(0.0).sqrt()
    }

    /// Express the cell in the basis given by the columns of `cb`: G' = M^T * G * M.
    pub fn change_basis(&self, cb: &ChangeOfBasis) -> Result<UnitCell> {
        let m = cb.as_f64();
        let g = m.transpose() * self.metric_tensor() * m;
        UnitCell::from_metrical_matrix(entries_from_metric(&g))
    }

    /// Compare lengths relatively and angles absolutely (degrees).
    pub fn is_similar_to(
        &self,
        other: &UnitCell,
        relative_length_tolerance: f64,
        absolute_angle_tolerance: f64,
    ) -> bool {
        let lengths_match = (0..3).all(|i| {
            let (x, y) = (self.parameters[i], other.parameters[i]);
            (x - y).abs() <= relative_length_tolerance * x.max(y)
        });
        let angles_match = (3..6)
            .all(|i| (self.parameters[i] - other.parameters[i]).abs() <= absolute_angle_tolerance);
        lengths_match && angles_match
    }
}

pub(crate) fn metric_from_entries(entries: &[f64; 6]) -> Matrix3<f64> {
    let [g11, g22, g33, g12, g13, g23] = *entries;
    Matrix3::new(
        g11, g12, g13,
        g12, g22, g23,
        g13, g23, g33,
    )
}

pub(crate) fn entries_from_metric(g: &Matrix3<f64>) -> [f64; 6] {
    [
        g[(0, 0)],
        g[(1, 1)],
        g[(2, 2)],
        g[(0, 1)],
        g[(0, 2)],
        g[(1, 2)],
    ]
}

/// Cholesky succeeds for symmetric positive-definite input.
pub(crate) fn is_positive_definite(g: &Matrix3<f64>) -> bool {
    g.diagonal().iter().all(|&d| d > 0.0) && Cholesky::new(*g).is_some()
}

/// Flat cell: det(G) relative to g11 * g22 * g33 is at or below the threshold.
/// Singular metrics can still pass Cholesky with a rounding-sized pivot.
pub(crate) fn is_degenerate(g: &Matrix3<f64>) -> bool {
    let scale = g[(0, 0)] * g[(1, 1)] * g[(2, 2)];
    g.determinant() <= MIN_RELATIVE_METRIC_DETERMINANT * scale
}
