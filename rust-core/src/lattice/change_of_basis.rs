use std::fmt;

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

/// Integer change-of-basis matrix.
///
/// Column `j` holds the coordinates of the new basis vector `j` expressed in the old
/// basis, so a metric tensor transforms as `G' = M^T * G * M` and successive changes
/// compose by right multiplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangeOfBasis {
    matrix: Matrix3<i32>,
}

impl ChangeOfBasis {
    pub fn identity() -> Self {
        ChangeOfBasis {
            matrix: Matrix3::identity(),
        }
    }

    /// Build from row-major entries.
    pub fn from_rows(rows: [[i32; 3]; 3]) -> Self {
        let [r0, r1, r2] = rows;
        ChangeOfBasis {
            matrix: Matrix3::new(
                r0[0], r0[1], r0[2],
                r1[0], r1[1], r1[2],
                r2[0], r2[1], r2[2],
            ),
        }
    }

    pub fn diagonal(i: i32, j: i32, k: i32) -> Self {
        Self::from_rows([[i, 0, 0], [0, j, 0], [0, 0, k]])
    }

    pub fn matrix(&self) -> &Matrix3<i32> {
        &self.matrix
    }

    pub fn rows(&self) -> [[i32; 3]; 3] {
        let m = &self.matrix;
        [
            [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
            [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
            [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
        ]
    }

    pub fn as_f64(&self) -> Matrix3<f64> {
        self.matrix.map(f64::from)
    }

    pub fn is_identity(&self) -> bool {
        self.matrix == Matrix3::identity()
    }

    /// Apply `next` after `self`: `self <- self * next`.
    pub fn compose(&mut self, next: &ChangeOfBasis) {
        self.matrix *= next.matrix;
    }

    pub fn determinant(&self) -> i32 {
        let m = &self.matrix;
        m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)])
            - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)])
            + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)])
    }

    pub fn is_unimodular(&self) -> bool {
        self.determinant().abs() == 1
    }

    /// Exact integer inverse; `None` unless the matrix is unimodular.
    pub fn inverse(&self) -> Option<ChangeOfBasis> {
        let det = self.determinant();
        if det.abs() != 1 {
            return None;
        }
        let m = &self.matrix;
        let cofactor = |r0: usize, r1: usize, c0: usize, c1: usize| {
            m[(r0, c0)] * m[(r1, c1)] - m[(r0, c1)] * m[(r1, c0)]
        };
        // Adjugate (transposed cofactor matrix) divided by det = ±1
        let adjugate = Matrix3::new(
            cofactor(1, 2, 1, 2), -cofactor(0, 2, 1, 2), cofactor(0, 1, 1, 2),
            -cofactor(1, 2, 0, 2), cofactor(0, 2, 0, 2), -cofactor(0, 1, 0, 2),
            cofactor(1, 2, 0, 1), -cofactor(0, 2, 0, 1), cofactor(0, 1, 0, 1),
        );
        Some(ChangeOfBasis {
            matrix: adjugate * det,
        })
    }
}

impl Default for ChangeOfBasis {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for ChangeOfBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.rows();
        write!(
            f,
            "[[{}, {}, {}], [{}, {}, {}], [{}, {}, {}]]",
            rows[0][0], rows[0][1], rows[0][2],
            rows[1][0], rows[1][1], rows[1][2],
            rows[2][0], rows[2][1], rows[2][2],
        )
    }
}
